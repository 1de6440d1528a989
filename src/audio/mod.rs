pub mod engine;
pub mod sink;
pub mod tone;

pub use engine::{PlaybackEngine, PlaybackHandle};
pub use sink::{CpalSink, ToneSink};
pub use tone::{ToneBank, ToneBuffer, ToneParams};
