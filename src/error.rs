//! Error type shared by the player core, the backend and the runtime.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayerError {
    /// No audio output could be opened. Playback is impossible for this session.
    #[error("audio backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The backend failed while playing the current track.
    #[error("{message}")]
    Playback { message: String, debug: Option<String> },

    /// Tags could not be read; callers fall back to the file name.
    #[error("could not read metadata from {}: {reason}", path.display())]
    MetadataUnreadable { path: PathBuf, reason: String },

    /// A seek was requested while stopped or before the duration is known.
    #[error("seek rejected")]
    SeekRejected,

    /// A playlist index outside `0..len`.
    #[error("index {index} out of range for playlist of {len}")]
    InvalidIndex { index: usize, len: usize },

    #[error("config: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
