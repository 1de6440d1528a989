use std::sync::Arc;
use std::time::Duration;

use crate::config::{AudioSettings, TimingSettings};
use crate::morse::Symbol;

/// Fixed parameters for tone synthesis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneParams {
    pub sample_rate: u32,
    pub frequency_hz: f32,
    /// Fraction of full scale (0.0 - 1.0)
    pub volume: f32,
}

impl From<&AudioSettings> for ToneParams {
    fn from(settings: &AudioSettings) -> Self {
        Self {
            sample_rate: settings.sample_rate,
            frequency_hz: settings.tone_frequency_hz,
            volume: settings.volume,
        }
    }
}

/// Mono 16-bit PCM for one tone
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToneBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl ToneBuffer {
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }

    /// Signed little-endian byte stream, two bytes per sample
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}

/// Generate a plain sine tone. No envelope is applied, so the tone
/// starts at zero and stops wherever the last sample falls.
pub fn generate(params: ToneParams, duration_ms: u32) -> ToneBuffer {
    let count = (duration_ms as u64 * params.sample_rate as u64 / 1000) as usize;
    let peak = params.volume as f64 * i16::MAX as f64;
    let step = 2.0 * std::f64::consts::PI * params.frequency_hz as f64 / params.sample_rate as f64;

    let samples = (0..count)
        .map(|i| {
            let value = (peak * (step * i as f64).sin()).round();
            value.clamp(i16::MIN as f64, i16::MAX as f64) as i16
        })
        .collect();

    ToneBuffer {
        samples,
        sample_rate: params.sample_rate,
    }
}

/// Precomputed dot and dash tones, shared with the output sink
#[derive(Clone, Debug)]
pub struct ToneBank {
    dot: Arc<ToneBuffer>,
    dash: Arc<ToneBuffer>,
}

impl ToneBank {
    pub fn new(params: ToneParams, dit_ms: u32, dah_ms: u32) -> Self {
        Self {
            dot: Arc::new(generate(params, dit_ms)),
            dash: Arc::new(generate(params, dah_ms)),
        }
    }

    pub fn from_settings(audio: &AudioSettings, timing: &TimingSettings) -> Self {
        Self::new(ToneParams::from(audio), timing.dit_ms, timing.dah_ms)
    }

    pub fn tone(&self, symbol: Symbol) -> &Arc<ToneBuffer> {
        match symbol {
            Symbol::Dot => &self.dot,
            Symbol::Dash => &self.dash,
        }
    }
}
