//! Sound card output through cpal.
//!
//! The stream callback owns the mix. Strikes arrive over a channel and play
//! to completion; the callback never allocates beyond growing its list of
//! active strikes.

use std::sync::mpsc::{channel, Sender};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use log::{error, info};

use crate::error::BelfryError;
use super::sink::PcmSink;

pub struct DeviceSink {
    sender: Sender<Arc<Vec<f32>>>,
    sample_rate: u32,
    // Dropping the stream silences the device
    _stream: cpal::Stream,
}

impl DeviceSink {
    /// Open the default output device.
    pub fn open() -> Result<Self, BelfryError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| BelfryError::Device("no audio output device".to_string()))?;
        let supported = device
            .default_output_config()
            .map_err(|e| BelfryError::Device(e.to_string()))?;
        if supported.sample_format() != SampleFormat::F32 {
            return Err(BelfryError::Device(format!(
                "unsupported sample format {:?}",
                supported.sample_format()
            )));
        }
        let config: StreamConfig = supported.into();
        let channels = (config.channels as usize).max(1);
        let sample_rate = config.sample_rate.0;

        let (sender, receiver) = channel::<Arc<Vec<f32>>>();
        let mut active: Vec<(Arc<Vec<f32>>, usize)> = Vec::new();

        let stream = device
            .build_output_stream(
                &config,
                move |out: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for pcm in receiver.try_iter() {
                        active.push((pcm, 0));
                    }
                    for frame in out.chunks_mut(channels) {
                        let mut mixed = 0.0f32;
                        for (data, cursor) in active.iter_mut() {
                            if let Some(s) = data.get(*cursor) {
                                mixed += s;
                                *cursor += 1;
                            }
                        }
                        let value = mixed.clamp(-1.0, 1.0);
                        for s in frame.iter_mut() {
                            *s = value;
                        }
                    }
                    active.retain(|(data, cursor)| *cursor < data.len());
                },
                |err| error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| BelfryError::Device(e.to_string()))?;
        stream.play().map_err(|e| BelfryError::Device(e.to_string()))?;

        info!("Audio output opened ({} Hz, {} ch)", sample_rate, channels);
        Ok(Self {
            sender,
            sample_rate,
            _stream: stream,
        })
    }
}

impl PcmSink for DeviceSink {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn submit(&mut self, pcm: Arc<Vec<f32>>) {
        let _ = self.sender.send(pcm);
    }
}
