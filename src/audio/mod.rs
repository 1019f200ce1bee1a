//! # Audio Module
//!
//! Bell sounds for the simulator.
//!
//! ## Sub-modules
//! - `voice` - Recorded and synthesized sound sources with decay envelopes
//! - `loader` - Background loading and WAV decoding of bell samples
//! - `sink` - Where rendered strikes go ([`PcmSink`])
//! - `device` - Sound card output (`device-audio` feature)
//!
//! ## Sound Sources
//! Each bell gets exactly one [`Voice`], chosen when the [`Belfry`] is
//! built:
//! - **Sampled**: a recording, gain 0.7 decaying to silence over 3 seconds
//! - **Synthesized**: a sine at the bell's pitch, gain 0.15 over 1.2 seconds
//!
//! The scheduler only sees the [`Bells`] trait and never knows which kind
//! of voice a bell has.
//!
//! ## Example
//! ```rust
//! use belfry::audio::{Belfry, Bells, NullSink, VoiceKind};
//!
//! let mut belfry = Belfry::synthesized(NullSink::new(8000));
//! assert_eq!(belfry.voice_kind(3), Some(VoiceKind::Synthesized));
//! belfry.play(3);
//! ```

mod voice;
mod loader;
mod sink;
#[cfg(feature = "device-audio")]
mod device;

use std::collections::BTreeMap;

use crate::method::{Bell, STAGE};

pub use voice::{pitch_for, Envelope, Sample, SoundSource, Voice, VoiceKind, BELL_PITCHES_HZ};
pub use loader::{decode_wav, load_samples, spawn_load, LoadHandle, LoadOutcome};
pub use sink::{NullSink, PcmSink, DEFAULT_SAMPLE_RATE};
#[cfg(feature = "device-audio")]
pub use device::DeviceSink;

/// Something that can sound a bell. Implementations must not block.
pub trait Bells {
    fn play(&mut self, bell: Bell);
}

impl<B: Bells + ?Sized> Bells for Box<B> {
    fn play(&mut self, bell: Bell) {
        (**self).play(bell);
    }
}

/// Records which bells were struck, in order.
#[derive(Debug, Default)]
pub struct StrikeLog {
    pub struck: Vec<Bell>,
}

impl Bells for StrikeLog {
    fn play(&mut self, bell: Bell) {
        self.struck.push(bell);
    }
}

/// The tower's bells: one pre-rendered voice per bell, sent to a sink.
pub struct Belfry<S: PcmSink> {
    voices: BTreeMap<Bell, Voice>,
    sink: S,
    warning: Option<String>,
}

impl<S: PcmSink> Belfry<S> {
    /// Every bell synthesized.
    pub fn synthesized(sink: S) -> Self {
        Self::from_outcome(LoadOutcome::default(), sink)
    }

    /// Build voices from loaded samples; bells without one are synthesized.
    pub fn from_outcome(outcome: LoadOutcome, sink: S) -> Self {
        let sample_rate = sink.sample_rate();
        let mut samples = outcome.samples;
        let voices = (1..=STAGE as Bell)
            .map(|bell| {
                let voice = match samples.remove(&bell) {
                    Some(sample) => Voice::new(&SoundSource::Sampled(sample), sample_rate),
                    None => Voice::synthesized(bell, sample_rate),
                };
                (bell, voice)
            })
            .collect();
        Self {
            voices,
            sink,
            warning: outcome.warning,
        }
    }

    pub fn voice_kind(&self, bell: Bell) -> Option<VoiceKind> {
        self.voices.get(&bell).map(Voice::kind)
    }

    /// Non-blocking notice for the renderer when samples were unavailable.
    /// The loader has already logged it.
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: PcmSink> Bells for Belfry<S> {
    fn play(&mut self, bell: Bell) {
        let pcm = match self.voices.get(&bell) {
            Some(voice) => voice.pcm(),
            None => Voice::synthesized(bell, self.sink.sample_rate()).pcm(),
        };
        self.sink.submit(pcm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesized_belfry_has_all_bells() {
        let belfry = Belfry::synthesized(NullSink::new(8000));
        for bell in 1..=6 {
            assert_eq!(belfry.voice_kind(bell), Some(VoiceKind::Synthesized));
        }
        assert_eq!(belfry.voice_kind(7), None);
        assert!(belfry.warning().is_none());
    }

    #[test]
    fn test_mixed_voices_and_warning() {
        let mut samples = BTreeMap::new();
        samples.insert(2, Sample { sample_rate: 8000, data: vec![0.25; 100] });
        let outcome = LoadOutcome {
            samples,
            warning: Some("bells 1, 3, 4, 5, 6 unavailable".to_string()),
        };
        let belfry = Belfry::from_outcome(outcome, NullSink::new(8000));
        assert_eq!(belfry.voice_kind(2), Some(VoiceKind::Sampled));
        assert_eq!(belfry.voice_kind(1), Some(VoiceKind::Synthesized));
        assert!(belfry.warning().unwrap().contains("unavailable"));
    }

    #[test]
    fn test_play_submits_to_sink() {
        let mut belfry = Belfry::synthesized(NullSink::new(8000));
        belfry.play(1);
        belfry.play(6);
        belfry.play(9);
        assert_eq!(belfry.sink().submitted, 3);
    }

    #[test]
    fn test_strike_log() {
        let mut log = StrikeLog::default();
        log.play(4);
        log.play(1);
        assert_eq!(log.struck, vec![4, 1]);
    }
}
