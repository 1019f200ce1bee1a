//! Row and stroke scheduler
//!
//! Drives the course one blow per tick. The scheduler never reads a clock:
//! every entry point takes the current time in milliseconds, so the caller
//! decides what "now" is (a wall clock in the terminal runner,
//! `performance.now()` in the browser, a counter in tests).

use log::{debug, info};

use crate::audio::Bells;
use crate::config::{validate_tempo, validate_user_bell, SimConfig};
use crate::error::BelfryError;
use crate::method::{Bell, MethodTable, STAGE, PLAIN_BOB_DOUBLES};
use crate::narrator::{Call, Narrator};
use super::judge::judge_strike;
use super::types::{
    Phase, ScoreCard, SimulationState, Snapshot, StrikeJudgment, FINISHING_ROWS, WARMUP_ROUNDS,
};

type Observer = Box<dyn FnMut(&Snapshot)>;

/// The ringing simulator.
///
/// Owns all simulation and score state. Bells and narrator are
/// fire-and-forget collaborators; observers receive a [`Snapshot`] after
/// every change.
///
/// # Example
/// ```rust
/// use belfry::{CallLog, Simulator, SimConfig, StrikeLog, Phase};
///
/// let config = SimConfig::new(2, 300)?;
/// let mut sim = Simulator::new(&config, StrikeLog::default(), CallLog::default());
///
/// sim.start(0.0)?;
/// sim.tick(300.0); // treble leads
/// assert_eq!(sim.phase(), Phase::WarmupRounds);
/// assert_eq!(sim.bells().struck, vec![1]);
///
/// // Bell 2 is due one blow after the treble
/// let judgment = sim.strike(601.0).unwrap();
/// assert_eq!(judgment.tier, 5);
/// # Ok::<(), belfry::BelfryError>(())
/// ```
pub struct Simulator<B: Bells, N: Narrator> {
    table: MethodTable,
    state: SimulationState,
    score: ScoreCard,
    bells: B,
    narrator: N,
    observers: Vec<Observer>,
}

impl<B: Bells, N: Narrator> Simulator<B, N> {
    pub fn new(config: &SimConfig, bells: B, narrator: N) -> Self {
        Self {
            table: PLAIN_BOB_DOUBLES,
            state: SimulationState::new(config.user_bell(), config.tempo_ms()),
            score: ScoreCard::default(),
            bells,
            narrator,
            observers: Vec::new(),
        }
    }

    /// Register a renderer. It is called synchronously and must not block.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&Snapshot) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn score(&self) -> &ScoreCard {
        &self.score
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn table(&self) -> &MethodTable {
        &self.table
    }

    pub fn bells(&self) -> &B {
        &self.bells
    }

    pub fn bells_mut(&mut self) -> &mut B {
        &mut self.bells
    }

    pub fn narrator(&self) -> &N {
        &self.narrator
    }

    pub fn narrator_mut(&mut self) -> &mut N {
        &mut self.narrator
    }

    /// Striking order of the row being rung, cover included.
    pub fn active_row(&self) -> [Bell; STAGE] {
        self.state.active_row(&self.table).with_cover()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            is_running: self.state.is_running,
            phase: self.state.phase(),
            row: self.active_row(),
            blow_index: self.state.blow_index,
            is_handstroke: self.state.is_handstroke,
            user_bell: self.state.user_bell,
            tempo_ms: self.state.tempo_ms,
            rounds_completed: self.state.rounds_completed,
            current_row_index: self.state.current_row_index,
            is_finishing: self.state.is_finishing,
            finishing_rows_rung: self.state.finishing_rows_rung,
            total_score: self.score.total_score,
            total_attempts: self.score.total_attempts,
            last_strike_score: self.score.last_strike_score,
            last_timing_offset_ms: self.score.last_timing_offset_ms,
            accuracy_percent: self.score.accuracy_percent(),
        }
    }

    /// Choose the bell to ring. Rejected while running.
    pub fn set_user_bell(&mut self, bell: Bell) -> Result<(), BelfryError> {
        if self.state.is_running {
            return Err(BelfryError::AlreadyRunning);
        }
        self.state.user_bell = validate_user_bell(bell)?;
        self.notify();
        Ok(())
    }

    /// Change the blow length. Rejected while running, since ideal strike
    /// times are measured from the row start at the current tempo.
    pub fn set_tempo(&mut self, tempo_ms: u32) -> Result<(), BelfryError> {
        if self.state.is_running {
            return Err(BelfryError::AlreadyRunning);
        }
        self.state.tempo_ms = validate_tempo(tempo_ms)?;
        self.notify();
        Ok(())
    }

    /// "Look to": reset everything and begin warm-up rounds.
    pub fn start(&mut self, now_ms: f64) -> Result<(), BelfryError> {
        if self.state.is_running {
            return Err(BelfryError::AlreadyRunning);
        }
        let mut state = SimulationState::new(self.state.user_bell, self.state.tempo_ms);
        state.is_running = true;
        // The treble leads one blow after "look to"
        state.row_start_ms = now_ms + f64::from(state.tempo_ms);
        self.state = state;
        self.score = ScoreCard::default();
        info!(
            "Look to! Ringing the {} at {}ms per blow",
            self.state.user_bell, self.state.tempo_ms
        );
        self.notify();
        Ok(())
    }

    /// Halt ringing. Keeps state for display until the next start.
    pub fn stop(&mut self) {
        if !self.state.is_running {
            return;
        }
        self.state.is_running = false;
        info!(
            "Stopped after {} strikes, score {}",
            self.score.total_attempts, self.score.total_score
        );
        self.notify();
    }

    /// Advance one blow. Does nothing while idle.
    pub fn tick(&mut self, now_ms: f64) {
        if !self.state.is_running {
            return;
        }

        self.state.blow_index += 1;
        if self.state.blow_index >= self.state.slots_in_row() {
            self.complete_row(now_ms);
            if !self.state.is_running {
                self.notify();
                return;
            }
        } else if self.state.blow_index == 0 {
            // First blow of the course starts the first row
            self.state.row_start_ms = now_ms;
        }

        self.sound_current_slot();
        self.notify();
    }

    /// The learner pulls their rope. Ignored unless a course is running.
    pub fn strike(&mut self, now_ms: f64) -> Option<StrikeJudgment> {
        let judgment = judge_strike(now_ms, &self.state, &self.table)?;
        self.bells.play(self.state.user_bell);
        self.score.record(judgment);
        debug!(
            "Strike: tier {} ({:+.0}ms)",
            judgment.tier, judgment.offset_ms
        );
        self.notify();
        Some(judgment)
    }

    fn complete_row(&mut self, now_ms: f64) {
        let state = &mut self.state;
        state.blow_index = 0;
        state.row_start_ms = now_ms;
        state.is_handstroke = !state.is_handstroke;

        if state.is_finishing {
            state.finishing_rows_rung += 1;
            if state.finishing_rows_rung >= FINISHING_ROWS {
                state.is_running = false;
                info!("Stand: course finished with score {}", self.score.total_score);
                self.narrator.announce(Call::Stand);
            }
        } else if state.rounds_completed < WARMUP_ROUNDS {
            state.rounds_completed += 1;
            if state.rounds_completed == WARMUP_ROUNDS {
                state.current_row_index = 1;
                info!("Go: ringing {}", self.table.name());
                self.narrator.announce(Call::Go);
            }
        } else if state.current_row_index >= self.table.last_change_index() {
            state.is_finishing = true;
            state.finishing_rows_rung = 0;
            info!("That's all: the course has come round");
            self.narrator.announce(Call::ThatsAll);
        } else {
            state.current_row_index += 1;
        }

        debug!(
            "Row complete: {:?}, row {} ({})",
            state.phase(),
            state.current_row_index,
            if state.is_handstroke { "handstroke" } else { "backstroke" }
        );
    }

    fn sound_current_slot(&mut self) {
        let slot = self.state.blow_index;
        // Negative before the first blow, STAGE for the handstroke gap
        if slot < 0 || slot as usize >= STAGE {
            return;
        }
        let bell = self.active_row()[slot as usize];
        if bell != self.state.user_bell {
            self.bells.play(bell);
        }
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for observer in &mut self.observers {
            observer(&snapshot);
        }
    }
}
