//! # Simulator Module
//!
//! The ringing simulator: a fixed-tempo scheduler that rings a band of
//! automatic bells through a plain course while the learner rings one bell
//! by hand, and a judge that scores each of the learner's pulls.
//!
//! ## Sub-modules
//! - `types` - SimulationState, ScoreCard, StrikeJudgment, Snapshot
//! - `engine` - The [`Simulator`] state machine
//! - `judge` - Ideal strike times and tier banding
//!
//! ## Phases
//!
//! ```text
//! Idle --start--> WarmupRounds --6 rows--> MethodCourse --row 39--> Finishing --4 rows--> Idle
//! ```
//!
//! - **WarmupRounds**: six rows of rounds, then "Go"
//! - **MethodCourse**: method rows 1 to 39 from the table
//! - **Finishing**: "That's all", four rows of rounds, then "Stand"
//!
//! `stop()` returns to Idle from anywhere without a call.
//!
//! ## Rhythm
//!
//! One tick is one blow. A handstroke row has six slots (five working bells
//! and the tenor). A backstroke row has seven: the extra slot is the
//! handstroke gap, a silent beat before the next handstroke row.
//!
//! ```text
//! hand:  1 2 3 4 5 6
//! back:  1 2 3 4 5 6 .
//! hand:  1 2 3 4 5 6
//! ```
//!
//! ## Scoring
//!
//! The ideal time for the learner's bell is the row start plus one tempo
//! per place ahead of it. The absolute deviation maps to a tier:
//!
//! | deviation | tier |
//! |-----------|------|
//! | < 45ms    | 5    |
//! | < 85ms    | 4    |
//! | < 140ms   | 3    |
//! | < 210ms   | 2    |
//! | < 300ms   | 1    |
//! | otherwise | 0    |
//!
//! ## Related Modules
//! - `method` - Row data for each change
//! - `audio` - The [`Bells`](crate::audio::Bells) the scheduler strikes
//! - `narrator` - Calls made at phase changes
//! - `runner` - Real-time driver for the terminal

mod types;
mod engine;
mod judge;

#[cfg(test)]
mod tests;

pub use types::{
    Phase, ScoreCard, SimulationState, Snapshot, StrikeJudgment, BACKSTROKE_SLOTS,
    FINISHING_ROWS, HANDSTROKE_SLOTS, WARMUP_ROUNDS,
};
pub use engine::Simulator;
pub use judge::{ideal_strike_ms, judge_strike, tier_for_offset, TIER_BANDS_MS};
