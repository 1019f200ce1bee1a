//! Strike timing judge
//!
//! Compares when the learner pulled against when their bell should have
//! sounded. The ideal time for a bell is the row start plus one blow per
//! place ahead of it; the deviation is then banded into a tier.

use crate::method::MethodTable;
use super::types::{SimulationState, StrikeJudgment};

/// Upper bounds (exclusive, milliseconds) for tiers 5 down to 1.
/// Anything at or beyond the last bound scores 0.
pub const TIER_BANDS_MS: [f64; 5] = [45.0, 85.0, 140.0, 210.0, 300.0];

/// Tier for a signed timing offset. Quick and slow are banded alike.
pub fn tier_for_offset(offset_ms: f64) -> u8 {
    let magnitude = offset_ms.abs();
    for (i, bound) in TIER_BANDS_MS.iter().enumerate() {
        if magnitude < *bound {
            return 5 - i as u8;
        }
    }
    0
}

/// When the user's bell should strike in the current row.
pub fn ideal_strike_ms(state: &SimulationState, table: &MethodTable) -> Option<f64> {
    let place = state.active_row(table).place_of(state.user_bell)?;
    Some(state.row_start_ms + place as f64 * f64::from(state.tempo_ms))
}

/// Judge a strike at `actual_ms`. Returns `None` when no course is running.
pub fn judge_strike(
    actual_ms: f64,
    state: &SimulationState,
    table: &MethodTable,
) -> Option<StrikeJudgment> {
    if !state.is_running {
        return None;
    }
    let ideal = ideal_strike_ms(state, table)?;
    let offset_ms = actual_ms - ideal;
    Some(StrikeJudgment {
        tier: tier_for_offset(offset_ms),
        offset_ms,
    })
}
