use thiserror::Error;

/// Failures while rendering a tone on the output device.
///
/// These never take the playback worker down; the request that hit
/// them is dropped and the next one tries again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),

    #[error("audio output stopped consuming samples")]
    Stalled,
}

/// Rejected configuration data. Raised when building a table, a word
/// list or a trainer, never afterwards.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("morse table is empty")]
    EmptyTable,

    #[error("character {0:?} has an empty code")]
    EmptyCode(char),

    #[error("character {0:?} has code {1:?} containing something other than '.' or '-'")]
    InvalidCode(char, String),

    #[error("code {code:?} is shared by {first:?} and {second:?}")]
    DuplicateCode {
        code: String,
        first: char,
        second: char,
    },

    #[error("target word list is empty")]
    EmptyWordList,

    #[error("timing value {0} must be greater than zero")]
    InvalidTiming(&'static str),
}
