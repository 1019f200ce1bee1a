pub mod audio;
pub mod config;
pub mod error;
pub mod method;
pub mod narrator;
pub mod runner;
pub mod simulator;

pub use audio::{Belfry, Bells, StrikeLog};
pub use config::{SampleSource, SimConfig};
pub use error::*;
pub use method::{Bell, MethodTable, Row, PLAIN_BOB_DOUBLES};
pub use narrator::{Call, CallLog, LogNarrator, Narrator};
pub use simulator::{Phase, ScoreCard, Simulator, Snapshot, StrikeJudgment};

/// Build a simulator for `config` once its bells are loaded.
/// This is the main entry point for the library.
///
/// Loading blocks until every sample has been fetched or has fallen back to
/// a synthesized tone, so the returned simulator is always ready to start.
pub fn ring<S: audio::PcmSink>(
    config: &SimConfig,
    sink: S,
) -> Simulator<Belfry<S>, LogNarrator> {
    let outcome = audio::spawn_load(config.samples.clone()).wait();
    Simulator::new(config, Belfry::from_outcome(outcome, sink), LogNarrator)
}
