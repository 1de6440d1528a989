//! Symbol accumulator and character finalizer
//!
//! Keyed symbols collect in a code buffer until the user stops keying for
//! the character timeout (or forces it), at which point the code is
//! decoded and appended to the translation.

pub mod timeout;
pub mod words;

pub use timeout::PendingTimeout;
pub use words::TargetWords;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

use crate::audio::PlaybackHandle;
use crate::config::TimingSettings;
use crate::error::ConfigError;
use crate::morse::{MorseTable, Symbol};

/// Appended when a code is not in the table
pub const UNKNOWN_CHAR: char = '?';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputState {
    /// No code keyed, no countdown running
    Idle,
    /// Code keyed, countdown running
    Accumulating,
}

/// How the translation compares with the target word
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetMatch {
    Empty,
    /// Correct so far, not finished
    OnTrack,
    Complete,
    Mismatch,
}

pub struct Trainer {
    table: MorseTable,
    words: TargetWords,
    code: String,
    translated: String,
    target: String,
    timeout: PendingTimeout,
    playback: Option<PlaybackHandle>,
    rng: SmallRng,
}

impl Trainer {
    pub fn new(
        table: MorseTable,
        words: TargetWords,
        timing: &TimingSettings,
    ) -> Result<Self, ConfigError> {
        Self::with_rng(table, words, timing, SmallRng::from_entropy())
    }

    pub fn with_rng(
        table: MorseTable,
        words: TargetWords,
        timing: &TimingSettings,
        rng: SmallRng,
    ) -> Result<Self, ConfigError> {
        timing.validate()?;
        if table.is_empty() {
            return Err(ConfigError::EmptyTable);
        }
        if words.is_empty() {
            return Err(ConfigError::EmptyWordList);
        }

        let mut trainer = Self {
            table,
            words,
            code: String::new(),
            translated: String::new(),
            target: String::new(),
            timeout: PendingTimeout::new(Duration::from_millis(
                timing.character_timeout_ms as u64,
            )),
            playback: None,
            rng,
        };
        trainer.draw_target();
        Ok(trainer)
    }

    /// Play each keyed symbol through this handle
    pub fn with_playback(mut self, playback: PlaybackHandle) -> Self {
        self.playback = Some(playback);
        self
    }

    pub fn add_symbol(&mut self, symbol: Symbol) {
        self.add_symbol_at(symbol, Instant::now());
    }

    /// Append a symbol, sound it, and restart the character countdown
    pub fn add_symbol_at(&mut self, symbol: Symbol, now: Instant) {
        self.code.push(symbol.as_char());
        if let Some(playback) = &self.playback {
            playback.play_symbol(symbol);
        }
        self.timeout.restart(now);
    }

    /// Finalize the character if the countdown has run out.
    /// Call this regularly from the event loop.
    pub fn tick(&mut self) -> Option<char> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Option<char> {
        if self.timeout.fire(now) {
            self.finalize_character()
        } else {
            None
        }
    }

    /// Decode the pending code now. Does nothing when no code is pending.
    pub fn finalize_character(&mut self) -> Option<char> {
        self.timeout.cancel();
        if self.code.is_empty() {
            return None;
        }

        let ch = self.table.lookup(&self.code).unwrap_or(UNKNOWN_CHAR);
        log::debug!("Decoded {:?} as {:?}", self.code, ch);
        self.code.clear();
        self.translated.push(ch);
        Some(ch)
    }

    /// Clear everything, stop playback and pick a new target
    pub fn reset(&mut self) {
        self.timeout.cancel();
        if let Some(playback) = &self.playback {
            playback.cancel();
        }
        self.code.clear();
        self.translated.clear();
        self.draw_target();
    }

    /// Replace the candidate list; takes effect at the next reset
    pub fn set_words(&mut self, words: TargetWords) {
        self.words = words;
    }

    pub fn apply_timing(&mut self, timing: &TimingSettings) -> Result<(), ConfigError> {
        timing.validate()?;
        self.timeout
            .set_duration(Duration::from_millis(timing.character_timeout_ms as u64));
        Ok(())
    }

    fn draw_target(&mut self) {
        self.target = self.words.random(&mut self.rng).to_string();
    }

    pub fn current_code(&self) -> &str {
        &self.code
    }

    pub fn translated(&self) -> &str {
        &self.translated
    }

    pub fn target_word(&self) -> &str {
        &self.target
    }

    pub fn table(&self) -> &MorseTable {
        &self.table
    }

    pub fn state(&self) -> InputState {
        if self.code.is_empty() {
            InputState::Idle
        } else {
            InputState::Accumulating
        }
    }

    /// Time left before the pending character is decoded
    pub fn time_remaining(&self, now: Instant) -> Option<Duration> {
        self.timeout.remaining(now)
    }

    pub fn target_match(&self) -> TargetMatch {
        if self.translated.is_empty() {
            TargetMatch::Empty
        } else if self.translated == self.target {
            TargetMatch::Complete
        } else if self.target.starts_with(self.translated.as_str()) {
            TargetMatch::OnTrack
        } else {
            TargetMatch::Mismatch
        }
    }
}
