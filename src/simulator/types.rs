//! Simulator state and snapshot type definitions
//!
//! These types are owned by [`Simulator`](super::Simulator). Renderers only
//! ever see them through a [`Snapshot`].

use serde::Serialize;

use crate::method::{Bell, MethodTable, Row, STAGE};

/// Rows of rounds rung before the method starts.
pub const WARMUP_ROUNDS: u8 = 6;

/// Rows of rounds rung after "That's all" before standing.
pub const FINISHING_ROWS: u8 = 4;

/// Slots in a handstroke row: one per bell.
pub const HANDSTROKE_SLOTS: i8 = STAGE as i8;

/// Slots in a backstroke row: one per bell plus the handstroke gap.
pub const BACKSTROKE_SLOTS: i8 = STAGE as i8 + 1;

/// Where the course has got to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Idle,
    WarmupRounds,
    MethodCourse,
    Finishing,
}

/// Scheduler state for one course attempt.
///
/// # Fields
/// - `blow_index`: slot within the current row, `-1` before the first blow
/// - `current_row_index`: method table row, meaningful once rounds are over
/// - `row_start_ms`: time of the current row's first blow, the zero point
///   for ideal strike times
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationState {
    pub is_running: bool,
    pub user_bell: Bell,
    pub tempo_ms: u32,
    pub rounds_completed: u8,
    pub current_row_index: usize,
    pub blow_index: i8,
    pub is_handstroke: bool,
    pub is_finishing: bool,
    pub finishing_rows_rung: u8,
    pub row_start_ms: f64,
}

impl SimulationState {
    pub fn new(user_bell: Bell, tempo_ms: u32) -> Self {
        Self {
            is_running: false,
            user_bell,
            tempo_ms,
            rounds_completed: 0,
            current_row_index: 1,
            blow_index: -1,
            is_handstroke: true,
            is_finishing: false,
            finishing_rows_rung: 0,
            row_start_ms: 0.0,
        }
    }

    pub fn phase(&self) -> Phase {
        if !self.is_running {
            Phase::Idle
        } else if self.is_finishing {
            Phase::Finishing
        } else if self.rounds_completed < WARMUP_ROUNDS {
            Phase::WarmupRounds
        } else {
            Phase::MethodCourse
        }
    }

    pub fn slots_in_row(&self) -> i8 {
        if self.is_handstroke {
            HANDSTROKE_SLOTS
        } else {
            BACKSTROKE_SLOTS
        }
    }

    /// Rounds are rung during warm-up and wind-down.
    pub fn is_ringing_rounds(&self) -> bool {
        self.rounds_completed < WARMUP_ROUNDS || self.is_finishing
    }

    pub fn active_row(&self, table: &MethodTable) -> Row {
        if self.is_ringing_rounds() {
            Row::ROUNDS
        } else {
            table.row_clamped(self.current_row_index)
        }
    }
}

/// Result of judging one strike.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrikeJudgment {
    /// 0 (miss) to 5 (perfect)
    pub tier: u8,
    /// Actual minus ideal; negative is quick, positive is slow
    pub offset_ms: f64,
}

impl StrikeJudgment {
    pub fn is_early(&self) -> bool {
        self.offset_ms < 0.0
    }

    pub fn is_late(&self) -> bool {
        self.offset_ms > 0.0
    }

    /// Short feedback text for the renderer.
    pub fn label(&self) -> &'static str {
        match self.tier {
            5 => "Perfect!",
            4 => "Good",
            3 => "Close",
            2 => "Uneven",
            1 => "Poor",
            _ => "Miss-timed!",
        }
    }
}

/// Running score for the current course.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCard {
    pub total_score: u32,
    pub total_attempts: u32,
    pub last_strike_score: u8,
    pub last_timing_offset_ms: f64,
    pub early_strikes: u32,
    pub late_strikes: u32,
}

impl ScoreCard {
    pub fn record(&mut self, judgment: StrikeJudgment) {
        self.total_score += u32::from(judgment.tier);
        self.total_attempts += 1;
        self.last_strike_score = judgment.tier;
        self.last_timing_offset_ms = judgment.offset_ms;
        if judgment.is_early() {
            self.early_strikes += 1;
        } else if judgment.is_late() {
            self.late_strikes += 1;
        }
    }

    /// Score as a percentage of a perfect score for the same attempts.
    pub fn accuracy_percent(&self) -> u32 {
        if self.total_attempts == 0 {
            return 0;
        }
        let possible = self.total_attempts as f64 * 5.0;
        (self.total_score as f64 / possible * 100.0).round() as u32
    }
}

/// Read-only view pushed to renderers after every state change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub is_running: bool,
    pub phase: Phase,
    pub row: [Bell; STAGE],
    pub blow_index: i8,
    pub is_handstroke: bool,
    pub user_bell: Bell,
    pub tempo_ms: u32,
    pub rounds_completed: u8,
    pub current_row_index: usize,
    pub is_finishing: bool,
    pub finishing_rows_rung: u8,
    pub total_score: u32,
    pub total_attempts: u32,
    pub last_strike_score: u8,
    pub last_timing_offset_ms: f64,
    pub accuracy_percent: u32,
}
