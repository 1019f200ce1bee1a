//! Real-time driver.
//!
//! One thread owns the simulator and does all the work: it waits for user
//! input until the next tick is due, then ticks. Strikes and ticks are
//! therefore never handled at the same time and the simulator needs no
//! locking.
//!
//! Ticks are scheduled at fixed deadlines from the start of the course and
//! stamped with the deadline rather than the wake-up time, so scheduling
//! jitter never accumulates into the ideal strike times.

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use crate::audio::Bells;
use crate::error::BelfryError;
use crate::narrator::Narrator;
use crate::simulator::{ScoreCard, Simulator};

/// User actions delivered to a running course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Strike,
    Stop,
}

/// Ring one course in real time, returning the final score.
///
/// Returns when the course stands, on [`Input::Stop`], or immediately with
/// [`BelfryError::AlreadyRunning`] if the simulator was already started. If
/// the input channel closes the course carries on to the end unattended.
pub fn run<B: Bells, N: Narrator>(
    sim: &mut Simulator<B, N>,
    inputs: &Receiver<Input>,
) -> Result<ScoreCard, BelfryError> {
    let origin = Instant::now();
    let ms_since = |at: Instant| at.saturating_duration_since(origin).as_secs_f64() * 1000.0;

    sim.start(0.0)?;
    let period = Duration::from_millis(u64::from(sim.state().tempo_ms));
    let mut next_tick = origin + period;
    let mut inputs_open = true;

    while sim.is_running() {
        let wait = next_tick.saturating_duration_since(Instant::now());
        let event = if inputs_open {
            inputs.recv_timeout(wait)
        } else {
            thread::sleep(wait);
            Err(RecvTimeoutError::Timeout)
        };

        match event {
            Ok(Input::Strike) => {
                sim.strike(ms_since(Instant::now()));
            }
            Ok(Input::Stop) => sim.stop(),
            Err(RecvTimeoutError::Timeout) => {
                sim.tick(ms_since(next_tick));
                next_tick += period;
            }
            Err(RecvTimeoutError::Disconnected) => {
                debug!("Input closed; ringing on unattended");
                inputs_open = false;
            }
        }
    }

    Ok(sim.score().clone())
}
