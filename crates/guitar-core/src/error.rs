use thiserror::Error;

/// Failures surfaced by the touch-to-sound pipeline.
///
/// None of these are fatal: each one degrades to "no feedback for this
/// touch" and the instrument keeps accepting input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GuitarError {
    #[error("degenerate viewport geometry (width {width}, playable extent {extent})")]
    DegenerateGeometry { width: f32, extent: f32 },

    #[error("string index {index} out of range (sound bank holds {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("missing audio resource: {0}")]
    MissingAudioResource(String),

    #[error("failed to decode audio resource {resource}: {reason}")]
    AudioDecodeFailure { resource: String, reason: String },

    #[error("invalid sound bank: {0}")]
    InvalidSoundBank(String),
}

pub type Result<T> = std::result::Result<T, GuitarError>;
