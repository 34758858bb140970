use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an analysis run or a playback request.
#[derive(Error, Debug)]
pub enum VibeError {
    /// The file could not be opened, probed or decoded.
    #[error("Failed to decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    /// Decoding succeeded but produced no audio frames.
    #[error("Audio track is empty: {}", .path.display())]
    EmptyTrack { path: PathBuf },

    /// In-memory audio handed to the segmenter has no frames.
    #[error("Audio contains no frames")]
    NoFrames,

    /// Segment window length must be positive.
    #[error("Segment window must be greater than 0 ms")]
    InvalidWindow,

    /// Output device or stream failure.
    #[error("Playback failed: {0}")]
    Playback(String),

    /// Built without the `playback` feature.
    #[error(
        "Playback support requires the 'playback' feature. \
         Rebuild with: cargo build --features playback"
    )]
    PlaybackUnavailable,
}

/// Failure of the DSP estimator on a single waveform.
///
/// Never fatal: the orchestrator substitutes zeroed features for the
/// affected segment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    #[error("Sample rate must be non-zero")]
    ZeroSampleRate,

    #[error("Input contains non-finite samples")]
    NonFiniteInput,

    #[error("Estimator produced a non-finite {0}")]
    NonFiniteFeature(&'static str),
}

pub type Result<T> = std::result::Result<T, VibeError>;

impl VibeError {
    pub(crate) fn decode(path: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        VibeError::Decode {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}
