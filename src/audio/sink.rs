//! PCM destinations for rendered strikes.

use std::sync::Arc;

/// Sample rate voices are rendered at when no device dictates one.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Accepts rendered strikes for mixing. `submit` must return immediately.
pub trait PcmSink {
    fn sample_rate(&self) -> u32;
    fn submit(&mut self, pcm: Arc<Vec<f32>>);
}

/// Discards audio, counting what it was given.
#[derive(Debug)]
pub struct NullSink {
    sample_rate: u32,
    pub submitted: usize,
}

impl NullSink {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate, submitted: 0 }
    }
}

impl Default for NullSink {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl PcmSink for NullSink {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn submit(&mut self, _pcm: Arc<Vec<f32>>) {
        self.submitted += 1;
    }
}
