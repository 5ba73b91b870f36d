//! Audio output: cue mixer and the cpal stream that drains it.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::Sample;
use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard};

use super::player::{Cue, CuePlayer};
use super::tones::ToneBank;
use crate::error::AudioError;
use crate::params::ToneConfig;
use crate::sync::lock;

/// One buffer being played back
#[derive(Debug)]
struct Voice {
    samples: Arc<[i16]>,

    /// Fractional read position in source samples
    cursor: f64,
}

impl Voice {
    fn new(samples: Arc<[i16]>) -> Self {
        Self {
            samples,
            cursor: 0.0,
        }
    }

    /// Next source sample as f32, or `None` when exhausted
    fn next(&mut self, step: f64) -> Option<f32> {
        let sample = *self.samples.get(self.cursor as usize)?;
        self.cursor += step;
        Some(sample as f32 / i16::MAX as f32)
    }
}

/// Sweep and chime tracks; each holds at most one voice
#[derive(Debug, Default)]
struct Channels {
    sweep: Option<Voice>,
    chime: Option<Voice>,
}

impl Channels {
    fn next_sample(&mut self, step: f64) -> f32 {
        let sweep = advance(&mut self.sweep, step);
        let chime = advance(&mut self.chime, step);
        (sweep + chime).clamp(-1.0, 1.0)
    }

    fn is_idle(&self) -> bool {
        self.sweep.is_none() && self.chime.is_none()
    }
}

fn advance(track: &mut Option<Voice>, step: f64) -> f32 {
    match track.as_mut().and_then(|voice| voice.next(step)) {
        Some(sample) => sample,
        None => {
            *track = None;
            0.0
        }
    }
}

/// Thread-safe cue player feeding the output stream
///
/// Buffers come from a [`ToneBank`] and are resampled by nearest sample
/// when the device rate differs from the synthesis rate.
#[derive(Debug)]
pub struct CueMixer {
    tones: Mutex<ToneBank>,
    channels: Mutex<Channels>,

    /// Source samples consumed per output frame
    step: f64,
}

impl CueMixer {
    pub fn new(tones: ToneBank, output_rate_hz: u32) -> Self {
        let step = tones.config().sample_rate_hz as f64 / output_rate_hz.max(1) as f64;
        Self {
            tones: Mutex::new(tones),
            channels: Mutex::new(Channels::default()),
            step,
        }
    }

    /// True while a sweep or the chime is still sounding
    pub fn is_playing(&self) -> bool {
        !lock(&self.channels).is_idle()
    }

    /// Fill interleaved frames, copying the mono mix to every channel
    pub fn render<T: Sample>(&self, data: &mut [T], channel_count: usize, convert: impl Fn(f32) -> T) {
        let mut channels = self.channels();
        for frame in data.chunks_mut(channel_count.max(1)) {
            frame.fill(convert(channels.next_sample(self.step)));
        }
    }

    fn channels(&self) -> MutexGuard<'_, Channels> {
        lock(&self.channels)
    }
}

impl CuePlayer for CueMixer {
    fn play(&self, cue: Cue) {
        let buffer = lock(&self.tones).buffer_for(cue);
        let mut channels = self.channels();
        match cue {
            Cue::Success => channels.chime = buffer.map(Voice::new),
            Cue::Inhale { .. } | Cue::Exhale { .. } => {
                if buffer.is_none() {
                    debug!("No audible sweep for {:?}", cue);
                }
                channels.sweep = buffer.map(Voice::new);
            }
        }
    }

    fn stop(&self) {
        let mut channels = self.channels();
        channels.sweep = None;
        channels.chime = None;
    }
}

/// Audio system owning the output stream
///
/// The stream is not `Send`, so it stays with whoever created the system;
/// the scheduler gets the shareable [`CueMixer`] through [`AudioSystem::player`].
pub struct AudioSystem {
    mixer: Arc<CueMixer>,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,
}

impl AudioSystem {
    /// Open the default output device and start a silent stream
    pub fn new(config: ToneConfig) -> Result<Self, AudioError> {
        let tones = ToneBank::new(config)?;
        let preferred_rate = tones.config().sample_rate_hz;

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let supported = pick_output_config(&device, preferred_rate)?;
        let sample_format = supported.sample_format();
        let stream_config: cpal::StreamConfig = supported.config();

        info!(
            "Audio: {} @ {}Hz, {} channel(s), {:?}",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            stream_config.sample_rate.0,
            stream_config.channels,
            sample_format
        );
        if stream_config.sample_rate.0 != preferred_rate {
            warn!(
                "Device does not run at {}Hz; resampling cues to {}Hz",
                preferred_rate, stream_config.sample_rate.0
            );
        }

        let mixer = Arc::new(CueMixer::new(tones, stream_config.sample_rate.0));
        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, &mixer)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, &mixer)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, &mixer)?,
            other => return Err(AudioError::UnsupportedSampleFormat(other)),
        };
        stream.play()?;

        Ok(Self {
            mixer,
            _stream: stream,
        })
    }

    /// Shareable player handle for the scheduler
    pub fn player(&self) -> Arc<CueMixer> {
        Arc::clone(&self.mixer)
    }
}

/// Prefer a config at the synthesis rate in a format we can write, else the device default
fn pick_output_config(
    device: &cpal::Device,
    preferred_rate_hz: u32,
) -> Result<cpal::SupportedStreamConfig, AudioError> {
    let rate = cpal::SampleRate(preferred_rate_hz);
    let matched = device.supported_output_configs()?.find(|range| {
        range.min_sample_rate() <= rate
            && rate <= range.max_sample_rate()
            && matches!(
                range.sample_format(),
                cpal::SampleFormat::F32 | cpal::SampleFormat::I16 | cpal::SampleFormat::U16
            )
    });

    match matched {
        Some(range) => Ok(range.with_sample_rate(rate)),
        None => Ok(device.default_output_config()?),
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mixer: &Arc<CueMixer>,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let mixer = Arc::clone(mixer);
    let channel_count = config.channels as usize;
    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            mixer.render(data, channel_count, |s: f32| T::from_sample(s));
        },
        |err| warn!("Audio stream error: {}", err),
        None,
    )
}
