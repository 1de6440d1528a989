//! Morse code keying trainer
//!
//! The engine behind the trainer window: a symbol accumulator that decodes
//! characters on a timeout, and a single-worker tone playback pipeline.

pub mod audio;
pub mod config;
pub mod error;
pub mod keys;
pub mod messages;
pub mod morse;
pub mod trainer;
