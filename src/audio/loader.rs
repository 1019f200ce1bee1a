//! Bell sample loading.
//!
//! Fetching recordings is the only slow step before ringing, so it runs on
//! its own thread. Failures never stop the simulator: any bell that cannot
//! be loaded rings a synthesized tone instead, and the outcome carries a
//! warning for the renderer to show.

use std::collections::BTreeMap;
use std::fs;
use std::io::Cursor;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

use log::{debug, info, warn};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::config::SampleSource;
use crate::error::BelfryError;
use crate::method::{Bell, STAGE};
use super::voice::Sample;

/// Result of loading the tower's samples.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub samples: BTreeMap<Bell, Sample>,
    /// Set when one or more bells fell back to synthesized tones.
    pub warning: Option<String>,
}

impl LoadOutcome {
    pub fn is_fallback(&self) -> bool {
        self.samples.len() < STAGE
    }
}

/// Load every bell from `source`, blocking until done.
pub fn load_samples(source: &SampleSource) -> LoadOutcome {
    if *source == SampleSource::Synthesized {
        return LoadOutcome::default();
    }

    let mut outcome = LoadOutcome::default();
    let mut failures = Vec::new();
    for bell in 1..=STAGE as Bell {
        match fetch_bytes(source, bell).and_then(|bytes| decode_wav(bytes, bell)) {
            Ok(sample) => {
                outcome.samples.insert(bell, sample);
            }
            Err(e) => {
                debug!("{}", e);
                failures.push(bell);
            }
        }
    }

    if failures.is_empty() {
        info!("Belfry initialized with recorded samples for all {} bells", STAGE);
    } else {
        let list: Vec<String> = failures.iter().map(|b| b.to_string()).collect();
        let warning = format!(
            "Failed to load bell sounds for bell(s) {}. Falling back to digital tones.",
            list.join(", ")
        );
        warn!("{}", warning);
        outcome.warning = Some(warning);
    }
    outcome
}

/// A sample load running on a background thread.
pub struct LoadHandle {
    receiver: Receiver<LoadOutcome>,
}

impl LoadHandle {
    /// Block until loading finishes. A crashed loader yields a fallback
    /// outcome rather than an error.
    pub fn wait(self) -> LoadOutcome {
        self.receiver.recv().unwrap_or_else(|_| loader_lost())
    }
}

fn loader_lost() -> LoadOutcome {
    let warning = "Sample loading was interrupted. Falling back to digital tones.";
    warn!("{}", warning);
    LoadOutcome {
        samples: BTreeMap::new(),
        warning: Some(warning.to_string()),
    }
}

/// Start loading on a background thread.
pub fn spawn_load(source: SampleSource) -> LoadHandle {
    let (sender, receiver) = channel();
    thread::spawn(move || {
        let _ = sender.send(load_samples(&source));
    });
    LoadHandle { receiver }
}

fn fetch_bytes(source: &SampleSource, bell: Bell) -> Result<Vec<u8>, BelfryError> {
    match source {
        SampleSource::Synthesized => Err(BelfryError::SampleLoad {
            bell,
            message: "no sample source configured".to_string(),
        }),
        SampleSource::Directory(dir) => {
            let path = dir.join(format!("{}.wav", bell));
            fs::read(&path).map_err(|e| BelfryError::SampleLoad {
                bell,
                message: format!("{}: {}", path.display(), e),
            })
        }
        SampleSource::Remote(base) => fetch_remote(base, bell),
    }
}

#[cfg(feature = "remote-samples")]
fn fetch_remote(base: &str, bell: Bell) -> Result<Vec<u8>, BelfryError> {
    let url = format!("{}/{}.wav", base, bell);
    let fail = |message: String| BelfryError::SampleLoad { bell, message };
    let mut response = ureq::get(&url)
        .call()
        .map_err(|e| fail(format!("{}: {}", url, e)))?;
    response
        .body_mut()
        .read_to_vec()
        .map_err(|e| fail(format!("{}: {}", url, e)))
}

#[cfg(not(feature = "remote-samples"))]
fn fetch_remote(_base: &str, bell: Bell) -> Result<Vec<u8>, BelfryError> {
    Err(BelfryError::SampleLoad {
        bell,
        message: "remote samples are not enabled in this build".to_string(),
    })
}

/// Decode a WAV file to mono PCM.
pub fn decode_wav(bytes: Vec<u8>, bell: Bell) -> Result<Sample, BelfryError> {
    let fail = |message: String| BelfryError::SampleLoad { bell, message };

    let stream = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());
    let mut hint = Hint::new();
    hint.with_extension("wav");
    let probed = symphonia::default::get_probe()
        .format(&hint, stream, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| fail(e.to_string()))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| fail("no audio track".to_string()))?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| fail("unknown sample rate".to_string()))?;
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| fail(e.to_string()))?;

    let mut data = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(fail(e.to_string())),
        };
        if packet.track_id() != track_id {
            continue;
        }
        let decoded = decoder.decode(&packet).map_err(|e| fail(e.to_string()))?;
        let spec = *decoded.spec();
        let channels = spec.channels.count().max(1);
        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        for frame in buffer.samples().chunks(channels) {
            data.push(frame.iter().sum::<f32>() / channels as f32);
        }
    }

    if data.is_empty() {
        return Err(fail("sample is empty".to_string()));
    }
    Ok(Sample { sample_rate, data })
}
