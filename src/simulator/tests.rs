use super::*;
use crate::audio::StrikeLog;
use crate::config::SimConfig;
use crate::narrator::{Call, CallLog};
use std::cell::RefCell;
use std::rc::Rc;

type TestSim = Simulator<StrikeLog, CallLog>;

fn simulator(user_bell: u8, tempo_ms: u32) -> TestSim {
    let config = SimConfig::new(user_bell, tempo_ms).unwrap();
    Simulator::new(&config, StrikeLog::default(), CallLog::default())
}

/// Ticks at the configured tempo, tracking time.
struct Driver {
    now: f64,
    ticks: usize,
}

impl Driver {
    fn start(sim: &mut TestSim) -> Self {
        sim.start(0.0).unwrap();
        Driver { now: 0.0, ticks: 0 }
    }

    fn tick(&mut self, sim: &mut TestSim) {
        self.now += sim.state().tempo_ms as f64;
        self.ticks += 1;
        sim.tick(self.now);
    }

    /// Tick until the current row is complete (or ringing stops).
    fn ring_row(&mut self, sim: &mut TestSim) {
        loop {
            let before = sim.state().blow_index;
            self.tick(sim);
            let after = sim.state().blow_index;
            if !sim.is_running() || (before >= 0 && after == 0) {
                return;
            }
        }
    }
}

#[test]
fn test_start_resets_state() {
    let mut sim = simulator(3, 400);
    sim.start(1234.0).unwrap();
    let state = sim.state();
    assert!(state.is_running);
    assert_eq!(state.rounds_completed, 0);
    assert_eq!(state.current_row_index, 1);
    assert_eq!(state.blow_index, -1);
    assert!(state.is_handstroke);
    assert!(!state.is_finishing);
    assert_eq!(state.row_start_ms, 1634.0);
    assert_eq!(sim.phase(), Phase::WarmupRounds);
}

#[test]
fn test_start_twice_is_rejected() {
    let mut sim = simulator(2, 300);
    sim.start(0.0).unwrap();
    assert!(matches!(sim.start(10.0), Err(crate::BelfryError::AlreadyRunning)));
}

#[test]
fn test_restart_after_stop_resets_score_and_counters() {
    let mut sim = simulator(2, 300);
    let mut driver = Driver::start(&mut sim);
    for _ in 0..20 {
        driver.tick(&mut sim);
    }
    sim.strike(driver.now + 50.0);
    sim.strike(driver.now + 500.0);
    assert_eq!(sim.score().total_attempts, 2);
    assert!(sim.state().rounds_completed > 0);
    sim.stop();

    sim.start(driver.now + 1000.0).unwrap();
    assert_eq!(sim.score().total_score, 0);
    assert_eq!(sim.score().total_attempts, 0);
    assert_eq!(sim.state().rounds_completed, 0);
    assert_eq!(sim.state().blow_index, -1);
    assert!(sim.state().is_handstroke);
}

#[test]
fn test_strike_before_first_blow_is_a_blow_early() {
    let mut sim = simulator(2, 300);
    sim.start(0.0).unwrap();

    // Bell 2 is due at 600: the treble leads at 300
    let judgment = sim.strike(290.0).unwrap();
    assert_eq!(judgment.offset_ms, -310.0);
    assert_eq!(judgment.tier, 0);

    // The first tick lands on the same row start
    sim.tick(300.0);
    assert_eq!(sim.state().row_start_ms, 300.0);
    assert_eq!(sim.strike(600.0).unwrap().tier, 5);
}

#[test]
fn test_stop_is_idempotent() {
    let mut sim = simulator(4, 300);
    let mut driver = Driver::start(&mut sim);
    for _ in 0..9 {
        driver.tick(&mut sim);
    }
    sim.stop();
    let once = (sim.state().clone(), sim.score().clone());
    sim.stop();
    assert_eq!((sim.state().clone(), sim.score().clone()), once);
    assert_eq!(sim.phase(), Phase::Idle);
}

#[test]
fn test_stop_keeps_state_for_display() {
    let mut sim = simulator(2, 300);
    let mut driver = Driver::start(&mut sim);
    for _ in 0..8 {
        driver.tick(&mut sim);
    }
    let before = sim.state().blow_index;
    sim.stop();
    assert_eq!(sim.state().blow_index, before);
    assert_eq!(sim.state().rounds_completed, 1);
}

#[test]
fn test_tick_while_idle_does_nothing() {
    let mut sim = simulator(2, 300);
    sim.tick(300.0);
    assert_eq!(sim.state().blow_index, -1);
    assert!(sim.bells().struck.is_empty());
}

#[test]
fn test_first_row_strikes_everyone_but_user() {
    let mut sim = simulator(3, 300);
    let mut driver = Driver::start(&mut sim);
    for _ in 0..6 {
        driver.tick(&mut sim);
    }
    assert_eq!(sim.bells().struck, vec![1, 2, 4, 5, 6]);
}

#[test]
fn test_handstroke_gap_is_silent() {
    let mut sim = simulator(2, 300);
    let mut driver = Driver::start(&mut sim);
    driver.ring_row(&mut sim); // handstroke row, 7th tick starts the backstroke
    assert!(!sim.state().is_handstroke);
    let struck_before = sim.bells().struck.len();
    for _ in 0..5 {
        driver.tick(&mut sim);
    }
    assert_eq!(sim.state().blow_index, 5);
    assert_eq!(sim.bells().struck.len(), struck_before + 4); // bells 3 4 5 6
    driver.tick(&mut sim);
    assert_eq!(sim.state().blow_index, 6);
    assert_eq!(sim.bells().struck.len(), struck_before + 4);
    driver.tick(&mut sim);
    assert_eq!(sim.state().blow_index, 0);
    assert!(sim.state().is_handstroke);
}

#[test]
fn test_row_lengths_alternate() {
    let mut sim = simulator(2, 300);
    let mut driver = Driver::start(&mut sim);
    driver.ring_row(&mut sim);
    assert_eq!(driver.ticks, 7); // -1 to 0, five more blows, completion
    let mark = driver.ticks;
    driver.ring_row(&mut sim);
    assert_eq!(driver.ticks - mark, 7); // backstroke with gap
    let mark = driver.ticks;
    driver.ring_row(&mut sim);
    assert_eq!(driver.ticks - mark, 6); // handstroke
}

#[test]
fn test_warmup_reaches_method_and_calls_go_once() {
    let mut sim = simulator(2, 300);
    let mut driver = Driver::start(&mut sim);
    for _ in 0..36 {
        driver.tick(&mut sim);
    }
    assert_eq!(sim.state().rounds_completed, 5);
    assert!(sim.narrator().calls.is_empty());

    // Six rows of rounds with three handstroke gaps
    for _ in 36..40 {
        driver.tick(&mut sim);
    }
    assert_eq!(sim.state().rounds_completed, 6);
    assert_eq!(sim.state().current_row_index, 1);
    assert_eq!(sim.phase(), Phase::MethodCourse);
    assert_eq!(sim.narrator().calls, vec![Call::Go]);
    assert_eq!(sim.active_row(), [2, 1, 4, 3, 5, 6]);

    driver.ring_row(&mut sim);
    assert_eq!(sim.narrator().calls, vec![Call::Go]);
    assert_eq!(sim.state().current_row_index, 2);
}

#[test]
fn test_method_rows_follow_table() {
    let mut sim = simulator(5, 300);
    let mut driver = Driver::start(&mut sim);
    for _ in 0..6 {
        driver.ring_row(&mut sim);
    }
    for index in 1..=10 {
        assert_eq!(sim.state().current_row_index, index);
        let expected = sim.table().row_at(index).unwrap().with_cover();
        assert_eq!(sim.active_row(), expected);
        driver.ring_row(&mut sim);
    }
}

#[test]
fn test_full_course_calls_thats_all_then_stand() {
    let mut sim = simulator(2, 300);
    let mut driver = Driver::start(&mut sim);
    for _ in 0..6 {
        driver.ring_row(&mut sim);
    }
    // Ring method rows 1 to 38
    while sim.state().current_row_index < 39 {
        driver.ring_row(&mut sim);
    }
    assert!(!sim.state().is_finishing);
    assert_eq!(sim.narrator().calls, vec![Call::Go]);

    // Row 39 completes: the course has come round
    driver.ring_row(&mut sim);
    assert!(sim.state().is_finishing);
    assert_eq!(sim.state().finishing_rows_rung, 0);
    assert_eq!(sim.phase(), Phase::Finishing);
    assert_eq!(sim.narrator().calls, vec![Call::Go, Call::ThatsAll]);
    assert_eq!(sim.active_row(), [1, 2, 3, 4, 5, 6]);

    for rung in 1..4 {
        driver.ring_row(&mut sim);
        assert_eq!(sim.state().finishing_rows_rung, rung);
        assert!(sim.is_running());
    }
    driver.ring_row(&mut sim);
    assert!(!sim.is_running());
    assert_eq!(sim.phase(), Phase::Idle);
    assert_eq!(sim.narrator().calls, vec![Call::Go, Call::ThatsAll, Call::Stand]);

    // Nothing more happens once stood
    let struck = sim.bells().struck.len();
    driver.tick(&mut sim);
    assert_eq!(sim.bells().struck.len(), struck);
}

#[test]
fn test_strike_in_rounds() {
    let mut sim = simulator(2, 300);
    sim.start(0.0).unwrap();
    sim.tick(300.0); // first blow, row starts here
    assert_eq!(sim.state().row_start_ms, 300.0);
    let judgment = sim.strike(601.0).unwrap();
    assert_eq!(judgment.offset_ms, 1.0);
    assert_eq!(judgment.tier, 5);
    assert_eq!(sim.score().total_score, 5);
    assert_eq!(sim.score().total_attempts, 1);
    assert_eq!(sim.score().last_strike_score, 5);
    assert_eq!(sim.score().last_timing_offset_ms, 1.0);
    // The user's own bell sounds on the strike
    assert_eq!(sim.bells().struck.last(), Some(&2));
}

#[test]
fn test_strike_accumulates_and_tracks_direction() {
    let mut sim = simulator(3, 300);
    sim.start(0.0).unwrap();
    sim.tick(300.0);
    // bell 3 due at 900
    sim.strike(800.0); // 100 quick -> 3
    sim.strike(1150.0); // 250 slow -> 1
    sim.strike(2000.0); // miss -> 0
    let score = sim.score();
    assert_eq!(score.total_score, 4);
    assert_eq!(score.total_attempts, 3);
    assert_eq!(score.early_strikes, 1);
    assert_eq!(score.late_strikes, 2);
    assert_eq!(score.last_strike_score, 0);
    assert_eq!(score.accuracy_percent(), 27);
}

#[test]
fn test_strike_while_idle_is_ignored() {
    let mut sim = simulator(2, 300);
    assert!(sim.strike(100.0).is_none());
    assert_eq!(sim.score().total_attempts, 0);
    assert!(sim.bells().struck.is_empty());
}

#[test]
fn test_strike_does_not_move_the_schedule() {
    let mut sim = simulator(2, 300);
    sim.start(0.0).unwrap();
    sim.tick(300.0);
    let before = sim.state().clone();
    sim.strike(450.0);
    assert_eq!(sim.state(), &before);
}

#[test]
fn test_configuration_locked_while_running() {
    let mut sim = simulator(2, 300);
    sim.start(0.0).unwrap();
    assert!(sim.set_tempo(400).is_err());
    assert!(sim.set_user_bell(3).is_err());
    assert_eq!(sim.state().tempo_ms, 300);
    assert_eq!(sim.state().user_bell, 2);
    sim.stop();
    sim.set_tempo(400).unwrap();
    sim.set_user_bell(3).unwrap();
    assert_eq!(sim.state().tempo_ms, 400);
    assert_eq!(sim.state().user_bell, 3);
}

#[test]
fn test_invalid_tempo_rejected_without_mutation() {
    let mut sim = simulator(2, 300);
    let before = sim.state().clone();
    assert!(matches!(
        sim.set_tempo(50),
        Err(crate::BelfryError::TempoOutOfRange { tempo_ms: 50, .. })
    ));
    assert_eq!(sim.state(), &before);
}

#[test]
fn test_observers_receive_snapshots() {
    let seen: Rc<RefCell<Vec<Snapshot>>> = Rc::new(RefCell::new(Vec::new()));
    let mut sim = simulator(2, 300);
    let sink = Rc::clone(&seen);
    sim.subscribe(move |snapshot| sink.borrow_mut().push(snapshot.clone()));

    sim.start(0.0).unwrap();
    sim.tick(300.0);
    sim.strike(600.0);
    sim.stop();
    sim.stop();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 4);
    assert!(seen[0].is_running);
    assert_eq!(seen[0].blow_index, -1);
    assert_eq!(seen[1].blow_index, 0);
    assert_eq!(seen[1].row, [1, 2, 3, 4, 5, 6]);
    assert_eq!(seen[2].total_attempts, 1);
    assert_eq!(seen[2].accuracy_percent, 100);
    assert!(!seen[3].is_running);
    assert_eq!(seen[3].phase, Phase::Idle);
}
