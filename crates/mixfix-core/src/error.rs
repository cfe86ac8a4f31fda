//! Error types for Mix Fix audio operations

use thiserror::Error;

/// Errors that can occur during audio operations
#[derive(Error, Debug)]
pub enum AudioError {
    /// Decode or metadata failure while loading a source
    #[error("Failed to load audio source: {0}")]
    Load(String),

    /// The platform declined to start playback
    #[error("Playback rejected: {0}")]
    PlaybackRejected(String),

    /// A load continuation arrived for a generation that is no longer current
    #[error("Load superseded by a newer request")]
    Superseded,

    /// Input that violates the decode-layer contract (e.g. an empty sample buffer)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for audio operations
pub type AudioResult<T> = Result<T, AudioError>;
