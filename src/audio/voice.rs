//! Bell voices: recorded or synthesized, both shaped by a decaying envelope.

use std::f32::consts::TAU;
use std::sync::Arc;

use crate::method::Bell;

/// Approximate strike pitches for bells 1 to 6, treble to tenor.
pub const BELL_PITCHES_HZ: [f32; 6] = [523.25, 493.88, 440.00, 392.00, 349.23, 261.63];

/// Pitch used for a bell outside the tower.
pub const DEFAULT_PITCH_HZ: f32 = 440.0;

pub fn pitch_for(bell: Bell) -> f32 {
    (bell as usize)
        .checked_sub(1)
        .and_then(|i| BELL_PITCHES_HZ.get(i))
        .copied()
        .unwrap_or(DEFAULT_PITCH_HZ)
}

/// Exponential gain ramp from `start_gain` to `end_gain` over `seconds`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub start_gain: f32,
    pub end_gain: f32,
    pub seconds: f32,
}

impl Envelope {
    /// Recorded bells ring on for three seconds.
    pub const SAMPLED: Envelope = Envelope { start_gain: 0.7, end_gain: 0.001, seconds: 3.0 };

    /// Fallback tones are quieter and shorter.
    pub const SYNTHESIZED: Envelope = Envelope { start_gain: 0.15, end_gain: 0.001, seconds: 1.2 };

    pub fn gain_at(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return self.start_gain;
        }
        if t >= self.seconds {
            return self.end_gain;
        }
        self.start_gain * (self.end_gain / self.start_gain).powf(t / self.seconds)
    }

    pub fn frames(&self, sample_rate: u32) -> usize {
        (self.seconds * sample_rate as f32).round() as usize
    }
}

/// Decoded mono PCM at its native rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub sample_rate: u32,
    pub data: Vec<f32>,
}

impl Sample {
    /// Linear-interpolated value at fractional frame `pos`.
    fn at(&self, pos: f64) -> f32 {
        let i = pos.floor() as usize;
        let frac = (pos - i as f64) as f32;
        match (self.data.get(i), self.data.get(i + 1)) {
            (Some(a), Some(b)) => a + (b - a) * frac,
            (Some(a), None) => *a,
            _ => 0.0,
        }
    }
}

/// How a bell makes its sound.
#[derive(Debug, Clone, PartialEq)]
pub enum SoundSource {
    Sampled(Sample),
    Synthesized { frequency_hz: f32 },
}

impl SoundSource {
    pub fn envelope(&self) -> Envelope {
        match self {
            SoundSource::Sampled(_) => Envelope::SAMPLED,
            SoundSource::Synthesized { .. } => Envelope::SYNTHESIZED,
        }
    }

    /// Render one strike as mono PCM at `sample_rate`.
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let envelope = self.envelope();
        let rate = sample_rate.max(1) as f32;
        match self {
            SoundSource::Sampled(sample) => {
                let step = sample.sample_rate as f64 / rate as f64;
                let available = (sample.data.len() as f64 / step).floor() as usize;
                let frames = envelope.frames(sample_rate).min(available);
                (0..frames)
                    .map(|n| sample.at(n as f64 * step) * envelope.gain_at(n as f32 / rate))
                    .collect()
            }
            SoundSource::Synthesized { frequency_hz } => {
                let frames = envelope.frames(sample_rate);
                (0..frames)
                    .map(|n| {
                        let t = n as f32 / rate;
                        (TAU * frequency_hz * t).sin() * envelope.gain_at(t)
                    })
                    .collect()
            }
        }
    }
}

/// A bell's sound, rendered once and shared with every strike.
#[derive(Debug, Clone)]
pub struct Voice {
    source_kind: VoiceKind,
    pcm: Arc<Vec<f32>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceKind {
    Sampled,
    Synthesized,
}

impl Voice {
    pub fn new(source: &SoundSource, sample_rate: u32) -> Self {
        let source_kind = match source {
            SoundSource::Sampled(_) => VoiceKind::Sampled,
            SoundSource::Synthesized { .. } => VoiceKind::Synthesized,
        };
        Self {
            source_kind,
            pcm: Arc::new(source.render(sample_rate)),
        }
    }

    pub fn synthesized(bell: Bell, sample_rate: u32) -> Self {
        Self::new(&SoundSource::Synthesized { frequency_hz: pitch_for(bell) }, sample_rate)
    }

    pub fn kind(&self) -> VoiceKind {
        self.source_kind
    }

    pub fn pcm(&self) -> Arc<Vec<f32>> {
        Arc::clone(&self.pcm)
    }
}
