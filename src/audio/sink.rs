use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use super::tone::ToneBuffer;
use crate::error::AudioError;

/// Extra time allowed past a tone's length before the device counts as stalled
const STALL_MARGIN: Duration = Duration::from_millis(500);

/// Destination for rendered tones.
///
/// `play` blocks until the whole tone has been handed to the output.
/// Implementations live on the playback worker thread only.
pub trait ToneSink {
    fn play(&mut self, tone: &Arc<ToneBuffer>) -> Result<(), AudioError>;
}

/// Plays tones on the default output device.
///
/// The device is opened on first use and reopened after a failure, so a
/// missing device only costs the requests made while it is missing.
#[derive(Default)]
pub struct CpalSink {
    output: Option<DeviceOutput>,
}

impl CpalSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ToneSink for CpalSink {
    fn play(&mut self, tone: &Arc<ToneBuffer>) -> Result<(), AudioError> {
        if tone.is_empty() {
            return Ok(());
        }

        if self.output.is_none() {
            self.output = Some(DeviceOutput::open()?);
        }

        let result = match self.output.as_ref() {
            Some(output) => output.play(tone),
            None => Err(AudioError::Unavailable("output not open".to_string())),
        };

        if result.is_err() {
            // Drop the stream so the next request reopens the device
            self.output = None;
        }
        result
    }
}

/// Read position inside the tone currently being rendered
struct Playhead {
    tone: Option<Arc<ToneBuffer>>,
    position: f64,
    step: f64,
    finished: bool,
}

impl Playhead {
    fn idle() -> Self {
        Self {
            tone: None,
            position: 0.0,
            step: 1.0,
            finished: false,
        }
    }

    fn start(&mut self, tone: Arc<ToneBuffer>, device_rate: u32) {
        // Tones are rendered at a fixed rate; step through them at the device rate
        self.step = tone.sample_rate() as f64 / device_rate.max(1) as f64;
        self.position = 0.0;
        self.tone = Some(tone);
        self.finished = false;
    }

    fn stop(&mut self) {
        self.tone = None;
        self.finished = false;
    }

    fn next_sample(&mut self) -> f32 {
        let Some(tone) = &self.tone else {
            return 0.0;
        };

        match tone.samples().get(self.position as usize).copied() {
            Some(sample) => {
                self.position += self.step;
                f32::from(sample) / 32768.0
            }
            None => {
                self.tone = None;
                self.finished = true;
                0.0
            }
        }
    }

    fn take_finished(&mut self) -> bool {
        std::mem::take(&mut self.finished)
    }
}

struct DeviceOutput {
    _stream: cpal::Stream,
    playhead: Arc<Mutex<Playhead>>,
    done_rx: Receiver<()>,
    sample_rate: u32,
}

impl DeviceOutput {
    fn open() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| AudioError::Unavailable("no audio output device found".to_string()))?;

        let supported_config = device
            .default_output_config()
            .map_err(|e| AudioError::Unavailable(e.to_string()))?;
        let sample_rate = supported_config.sample_rate().0;
        let config = supported_config.config();

        let playhead = Arc::new(Mutex::new(Playhead::idle()));
        let (done_tx, done_rx) = bounded::<()>(1);

        let stream = match supported_config.sample_format() {
            cpal::SampleFormat::F32 => {
                Self::build_stream::<f32>(&device, &config, Arc::clone(&playhead), done_tx)
            }
            cpal::SampleFormat::I16 => {
                Self::build_stream::<i16>(&device, &config, Arc::clone(&playhead), done_tx)
            }
            cpal::SampleFormat::U16 => {
                Self::build_stream::<u16>(&device, &config, Arc::clone(&playhead), done_tx)
            }
            other => {
                return Err(AudioError::Unavailable(format!(
                    "unsupported sample format {:?}",
                    other
                )))
            }
        }
        .map_err(|e| AudioError::Unavailable(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::Unavailable(e.to_string()))?;

        log::debug!(
            "Opened audio output at {} Hz, {} channel(s)",
            sample_rate,
            config.channels
        );

        Ok(Self {
            _stream: stream,
            playhead,
            done_rx,
            sample_rate,
        })
    }

    fn build_stream<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        playhead: Arc<Mutex<Playhead>>,
        done_tx: Sender<()>,
    ) -> Result<cpal::Stream, cpal::BuildStreamError>
    where
        T: cpal::SizedSample + cpal::FromSample<f32>,
    {
        let channels = config.channels as usize;

        device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let finished = {
                    let mut playhead = playhead.lock().unwrap_or_else(PoisonError::into_inner);

                    // Duplicate mono to all channels
                    for frame in data.chunks_mut(channels) {
                        let converted: T = T::from_sample(playhead.next_sample());
                        for channel_sample in frame.iter_mut() {
                            *channel_sample = converted;
                        }
                    }

                    playhead.take_finished()
                };

                if finished {
                    let _ = done_tx.try_send(());
                }
            },
            |err| log::error!("Audio stream error: {}", err),
            None,
        )
    }

    fn play(&self, tone: &Arc<ToneBuffer>) -> Result<(), AudioError> {
        // Clear a completion left over from an abandoned tone
        while self.done_rx.try_recv().is_ok() {}

        self.playhead
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .start(Arc::clone(tone), self.sample_rate);

        match self.done_rx.recv_timeout(tone.duration() + STALL_MARGIN) {
            Ok(()) => Ok(()),
            Err(_) => {
                self.playhead
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .stop();
                Err(AudioError::Stalled)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::tone::{generate, ToneParams};

    fn short_tone(sample_rate: u32) -> Arc<ToneBuffer> {
        Arc::new(generate(
            ToneParams {
                sample_rate,
                frequency_hz: 600.0,
                volume: 0.5,
            },
            10,
        ))
    }

    #[test]
    fn test_playhead_same_rate() {
        let tone = short_tone(8000);
        let mut playhead = Playhead::idle();
        playhead.start(Arc::clone(&tone), 8000);

        let mut rendered = 0;
        while !playhead.take_finished() {
            playhead.next_sample();
            rendered += 1;
        }
        // One extra call notices the end of the tone
        assert_eq!(rendered, tone.len() + 1);
        assert_eq!(playhead.next_sample(), 0.0);
    }

    #[test]
    fn test_playhead_resamples_to_device_rate() {
        let tone = short_tone(8000);
        let mut playhead = Playhead::idle();
        playhead.start(Arc::clone(&tone), 16000);

        let mut rendered = 0;
        while !playhead.take_finished() {
            playhead.next_sample();
            rendered += 1;
        }
        assert_eq!(rendered, tone.len() * 2 + 1);
    }

    #[test]
    fn test_playhead_idle_is_silent() {
        let mut playhead = Playhead::idle();
        assert_eq!(playhead.next_sample(), 0.0);
        assert!(!playhead.take_finished());
    }

    #[test]
    fn test_playhead_scales_samples() {
        let tone = short_tone(44100);
        let mut playhead = Playhead::idle();
        playhead.start(Arc::clone(&tone), 44100);
        for &sample in tone.samples().iter().take(20) {
            let value = playhead.next_sample();
            assert!((value - f32::from(sample) / 32768.0).abs() < f32::EPSILON);
            assert!(value.abs() <= 0.5);
        }
    }
}
