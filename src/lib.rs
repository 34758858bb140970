//! Classify the vibe of a music track and pick the window that fits it best.
//!
//! The track is decoded once, summarized into a [`FeatureVector`] for
//! classification, then cut into fixed windows that are scored against the
//! archetype of the detected [`VibeLabel`].

pub mod audio;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod playback;
pub mod vibe;

pub use audio::features::{FeatureExtractor, FeatureVector, SegmentFeatures};
pub use error::{ExtractError, Result, VibeError};
pub use pipeline::{
    analyze_segments, analyze_track, play, run, select_best, AnalysisConfig, AnalysisReport,
};
pub use vibe::{classify, VibeLabel};
