use crate::config::{AudioSettings, TimingSettings};
use crate::error::AudioError;
use crate::morse::Symbol;

/// Messages from UI thread to the playback worker
#[derive(Clone, Debug)]
pub enum PlaybackCommand {
    /// Play one symbol's tone
    PlaySymbol { symbol: Symbol, epoch: u64 },
    /// Play symbols back to back with the inter-symbol pause between them
    PlaySequence { symbols: Vec<Symbol>, epoch: u64 },
    /// Regenerate tones and pause length
    UpdateSettings {
        audio: AudioSettings,
        timing: TimingSettings,
    },
    /// Stop the worker and release the output device
    Shutdown,
}

/// Messages from the playback worker to the UI thread
#[derive(Clone, Debug, PartialEq)]
pub enum PlaybackEvent {
    /// A request was dropped because the output could not be used
    AudioUnavailable(AudioError),
}
