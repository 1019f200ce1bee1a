//! # Error Types
//!
//! This module defines all error types for the Belfry simulator.
//!
//! Configuration problems are reported before a course starts, so nothing
//! here ever interrupts a running simulation. Audio sample failures are
//! reported through [`BelfryError::SampleLoad`] but the loader recovers from
//! them by falling back to synthesized tones.
//!
//! ## Error Types
//! - `OutOfRange` - Method table access outside the plain course
//! - `TempoOutOfRange` / `BellOutOfRange` - Rejected configuration values
//! - `AlreadyRunning` - Start or reconfiguration attempted mid-course
//! - `Config` - Unreadable or malformed YAML configuration
//! - `SampleLoad` - A bell sample could not be fetched or decoded
//!
//! ## Usage
//! ```rust
//! use belfry::{BelfryError, SimConfig};
//!
//! match SimConfig::new(2, 50) {
//!     Ok(config) => println!("Ringing the {}", config.user_bell()),
//!     Err(BelfryError::TempoOutOfRange { tempo_ms, .. }) => {
//!         eprintln!("A blow of {}ms is not ringable", tempo_ms);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BelfryError {
    /// Method table row index outside the course.
    ///
    /// # Example
    /// ```
    /// # use belfry::BelfryError;
    /// let err = BelfryError::OutOfRange { index: 41, len: 41 };
    /// assert_eq!(err.to_string(), "Row 41 is outside the method table (0..41)");
    /// ```
    #[error("Row {index} is outside the method table (0..{len})")]
    OutOfRange { index: usize, len: usize },

    /// Tempo outside the ringable range.
    ///
    /// # Example
    /// ```
    /// # use belfry::BelfryError;
    /// let err = BelfryError::TempoOutOfRange { tempo_ms: 50, min: 180, max: 1000 };
    /// assert_eq!(err.to_string(), "Tempo 50ms must be between 180ms and 1000ms");
    /// ```
    #[error("Tempo {tempo_ms}ms must be between {min}ms and {max}ms")]
    TempoOutOfRange { tempo_ms: u32, min: u32, max: u32 },

    /// The practised bell must be one of the working bells after the treble.
    ///
    /// # Example
    /// ```
    /// # use belfry::BelfryError;
    /// let err = BelfryError::BellOutOfRange { bell: 6 };
    /// assert_eq!(err.to_string(), "Bell 6 cannot be rung by hand (choose 2 to 5)");
    /// ```
    #[error("Bell {bell} cannot be rung by hand (choose 2 to 5)")]
    BellOutOfRange { bell: u8 },

    /// Start or reconfiguration while a course is being rung.
    #[error("The bells are already ringing; stand them first")]
    AlreadyRunning,

    /// Invalid configuration file.
    ///
    /// # Example
    /// ```
    /// # use belfry::BelfryError;
    /// let err = BelfryError::Config("unknown field `tempoo`".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: unknown field `tempoo`");
    /// ```
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A bell sample could not be fetched or decoded.
    #[error("Failed to load sample for bell {bell}: {message}")]
    SampleLoad { bell: u8, message: String },

    /// Audio output device problem.
    #[error("Audio device error: {0}")]
    Device(String),
}
