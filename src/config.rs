//! # Simulator Configuration
//!
//! Validated settings for a practice session: which bell the learner rings,
//! how fast the band rings, where bell samples come from and how chatty the
//! log is.
//!
//! ## Validation Rules
//! - `user-bell` must be 2, 3, 4 or 5 (the treble leads the band, the tenor covers)
//! - `tempo` is the length of one blow in milliseconds, 180 to 1000 inclusive
//!
//! Values are checked here, at the configuration boundary, so the scheduler
//! never sees an unringable setup.
//!
//! ## YAML Format
//! ```yaml
//! user-bell: 3
//! tempo: 450
//! samples: ./bells        # directory holding 1.wav .. 6.wav
//! log-level: info
//! ```
//! `samples` may also be an `http(s)://` base URL, or omitted for
//! synthesized tones only.
//!
//! ## Example
//! ```rust
//! use belfry::SimConfig;
//!
//! let config = SimConfig::from_yaml("user-bell: 4\ntempo: 300\n")?;
//! assert_eq!(config.user_bell(), 4);
//! assert_eq!(config.tempo_ms(), 300);
//! # Ok::<(), belfry::BelfryError>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::BelfryError;
use crate::method::Bell;

pub const MIN_TEMPO_MS: u32 = 180;
pub const MAX_TEMPO_MS: u32 = 1000;
pub const DEFAULT_TEMPO_MS: u32 = 600;
pub const DEFAULT_USER_BELL: Bell = 2;

/// Base URL of the RingingRoom tower samples (`1.wav` .. `6.wav`).
pub const RINGING_ROOM_SAMPLES: &str =
    "https://cdn.jsdelivr.net/gh/RingingRoom/ringingroom@master/ringingroom/static/audio";

/// Where bell recordings are fetched from.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SampleSource {
    /// Synthesized tones for every bell.
    #[default]
    Synthesized,
    /// Directory containing `1.wav` .. `6.wav`.
    Directory(PathBuf),
    /// Base URL; `{url}/{bell}.wav` is fetched for each bell.
    Remote(String),
}

impl SampleSource {
    /// Interpret a path-or-URL setting.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            SampleSource::Synthesized
        } else if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            SampleSource::Remote(trimmed.trim_end_matches('/').to_string())
        } else {
            SampleSource::Directory(PathBuf::from(trimmed))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = BelfryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(BelfryError::Config(format!("Unknown log level: {}", s))),
        }
    }
}

impl LogLevel {
    pub fn as_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Validated simulator configuration.
///
/// The bell and tempo are only reachable through validating constructors
/// and setters, so a `SimConfig` always holds a ringable setup:
///
/// ```compile_fail
/// use belfry::SimConfig;
///
/// let config = SimConfig { user_bell: 9, tempo_ms: 0, ..SimConfig::default() };
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    user_bell: Bell,
    tempo_ms: u32,
    pub samples: SampleSource,
    pub log_level: LogLevel,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            user_bell: DEFAULT_USER_BELL,
            tempo_ms: DEFAULT_TEMPO_MS,
            samples: SampleSource::default(),
            log_level: LogLevel::default(),
        }
    }
}

/// Raw configuration for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawConfig {
    user_bell: Option<u8>,
    tempo: Option<u32>,
    samples: Option<String>,
    log_level: Option<String>,
}

impl SimConfig {
    /// Build a configuration with synthesized tones, validating both values.
    pub fn new(user_bell: Bell, tempo_ms: u32) -> Result<Self, BelfryError> {
        Ok(Self {
            user_bell: validate_user_bell(user_bell)?,
            tempo_ms: validate_tempo(tempo_ms)?,
            ..Self::default()
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, BelfryError> {
        let raw: RawConfig = if content.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| BelfryError::Config(e.to_string()))?
        };

        let mut config = SimConfig::default();
        if let Some(bell) = raw.user_bell {
            config.user_bell = validate_user_bell(bell)?;
        }
        if let Some(tempo) = raw.tempo {
            config.tempo_ms = validate_tempo(tempo)?;
        }
        if let Some(ref samples) = raw.samples {
            config.samples = SampleSource::parse(samples);
        }
        if let Some(ref level) = raw.log_level {
            config.log_level = level.parse()?;
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, BelfryError> {
        let content = fs::read_to_string(path)
            .map_err(|e| BelfryError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    pub fn user_bell(&self) -> Bell {
        self.user_bell
    }

    pub fn tempo_ms(&self) -> u32 {
        self.tempo_ms
    }

    pub fn set_user_bell(&mut self, bell: Bell) -> Result<(), BelfryError> {
        self.user_bell = validate_user_bell(bell)?;
        Ok(())
    }

    pub fn set_tempo(&mut self, tempo_ms: u32) -> Result<(), BelfryError> {
        self.tempo_ms = validate_tempo(tempo_ms)?;
        Ok(())
    }
}

pub fn validate_user_bell(bell: Bell) -> Result<Bell, BelfryError> {
    if (2..=5).contains(&bell) {
        Ok(bell)
    } else {
        Err(BelfryError::BellOutOfRange { bell })
    }
}

pub fn validate_tempo(tempo_ms: u32) -> Result<u32, BelfryError> {
    if (MIN_TEMPO_MS..=MAX_TEMPO_MS).contains(&tempo_ms) {
        Ok(tempo_ms)
    } else {
        Err(BelfryError::TempoOutOfRange {
            tempo_ms,
            min: MIN_TEMPO_MS,
            max: MAX_TEMPO_MS,
        })
    }
}
