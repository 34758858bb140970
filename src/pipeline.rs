use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::audio::analysis::SpectralExtractor;
use crate::audio::decode::{decode_audio, decode_audio_limited, AudioData};
use crate::audio::features::{FeatureExtractor, FeatureVector, SegmentFeatures};
use crate::audio::segment::{segment, DEFAULT_WINDOW_MS};
use crate::audio::waveform::Waveform;
use crate::error::Result;
use crate::vibe::{best_window, classify, BestWindow, VibeLabel};

pub use crate::playback::play;
pub use crate::vibe::select_best;

/// Seconds of audio used to classify the whole track.
pub const DEFAULT_ANALYSIS_SECS: f32 = 60.0;

/// Inputs for one analysis run.
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    pub file_path: PathBuf,
    pub window_ms: u32,
    /// 0 analyzes the whole track
    pub analysis_secs: f32,
    /// Use this vibe instead of the classified one when picking a window
    pub vibe_override: Option<VibeLabel>,
    pub show_progress: bool,
}

impl AnalysisConfig {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            window_ms: DEFAULT_WINDOW_MS,
            analysis_secs: DEFAULT_ANALYSIS_SECS,
            vibe_override: None,
            show_progress: false,
        }
    }
}

/// Outcome of [`run`].
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisReport {
    pub file_path: PathBuf,
    pub track: FeatureVector,
    /// Vibe classified from `track`
    pub detected_vibe: VibeLabel,
    /// Vibe the window was selected for
    pub target_vibe: VibeLabel,
    pub segment_count: usize,
    pub best: Option<BestWindow>,
}

/// Whole-track features over the first `analysis_secs` seconds.
///
/// Only that prefix is decoded; 0 decodes and analyzes the whole file.
pub fn analyze_track(path: &Path, analysis_secs: f32) -> Result<FeatureVector> {
    let audio = decode_audio_limited(path, Some(analysis_secs))?;
    Ok(track_features(&audio, analysis_secs, &SpectralExtractor::default()))
}

/// Per-window features over the whole track.
pub fn analyze_segments(path: &Path, window_ms: u32) -> Result<Vec<SegmentFeatures>> {
    let audio = decode_audio(path)?;
    segment_features(&audio, window_ms, &SpectralExtractor::default(), false)
}

/// Decode once, classify the track, score every window against the vibe.
pub fn run(config: &AnalysisConfig, extractor: &dyn FeatureExtractor) -> Result<AnalysisReport> {
    log::info!("Decoding {}...", config.file_path.display());
    let audio = decode_audio(&config.file_path)?;

    log::info!("Pass 1: Whole-track features...");
    let track = track_features(&audio, config.analysis_secs, extractor);
    let detected_vibe = classify(&track);
    log::info!(
        "Track: tempo={:.1} BPM, energy={:.4}, contrast={:.2} -> {}",
        track.tempo_bpm,
        track.energy,
        track.spectral_contrast,
        detected_vibe
    );

    let target_vibe = config.vibe_override.unwrap_or(detected_vibe);
    if target_vibe != detected_vibe {
        log::info!("Overriding target vibe: {}", target_vibe);
    }

    log::info!("Pass 2: Segment features ({}ms windows)...", config.window_ms);
    let segments = segment_features(&audio, config.window_ms, extractor, config.show_progress)?;

    log::info!("Pass 3: Selecting best {} window...", target_vibe);
    let best = best_window(&segments, target_vibe);
    match best {
        Some(w) => log::info!("Best window: {}-{}ms (score {:.3})", w.start_ms, w.end_ms, w.score),
        None => log::info!("No window selected"),
    }

    Ok(AnalysisReport {
        file_path: config.file_path.clone(),
        track,
        detected_vibe,
        target_vibe,
        segment_count: segments.len(),
        best,
    })
}

fn track_features(
    audio: &AudioData,
    analysis_secs: f32,
    extractor: &dyn FeatureExtractor,
) -> FeatureVector {
    let mut mono = audio.to_mono();
    if analysis_secs > 0.0 {
        let limit = (analysis_secs as f64 * audio.sample_rate as f64) as usize;
        mono.truncate(limit);
    }
    let waveform = Waveform::raw(mono, audio.sample_rate);
    extractor.extract_or_default(waveform.samples(), waveform.sample_rate())
}

/// Segment the track and extract features per window in parallel.
///
/// Output order follows segment order, independent of worker scheduling.
fn segment_features(
    audio: &AudioData,
    window_ms: u32,
    extractor: &dyn FeatureExtractor,
    show_progress: bool,
) -> Result<Vec<SegmentFeatures>> {
    let segments = segment(audio, window_ms)?;

    let pb = if show_progress {
        let pb = ProgressBar::new(segments.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} segments ({eta} remaining)",
        ) {
            pb.set_style(style.progress_chars("=>-"));
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    let features: Vec<SegmentFeatures> = segments
        .par_iter()
        .map(|seg| {
            let features =
                extractor.extract_or_default(seg.waveform.samples(), seg.waveform.sample_rate());
            log::debug!(
                "Segment {}-{}ms: tempo={:.1}, energy={:.4}, contrast={:.2}",
                seg.start_ms,
                seg.end_ms,
                features.tempo_bpm,
                features.energy,
                features.spectral_contrast
            );
            pb.inc(1);
            SegmentFeatures {
                start_ms: seg.start_ms,
                end_ms: seg.end_ms,
                features,
            }
        })
        .collect();

    pb.finish_and_clear();
    Ok(features)
}
