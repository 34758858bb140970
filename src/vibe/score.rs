use serde::Serialize;

use super::classify::VibeLabel;
use crate::audio::features::{FeatureVector, SegmentFeatures};
use crate::audio::segment::Segment;

/// Energy lives on a ~0-0.15 scale; weight it up so it competes with
/// tempo and contrast distances.
const ENERGY_WEIGHT: f32 = 100.0;

/// Ideal feature values for a vibe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Archetype {
    Target {
        tempo_bpm: f32,
        energy: f32,
        spectral_contrast: f32,
    },
    /// Scores every segment 0.
    Neutral,
}

impl Archetype {
    pub fn for_vibe(vibe: VibeLabel) -> Self {
        let target = |tempo_bpm: f32, energy: f32, spectral_contrast: f32| Archetype::Target {
            tempo_bpm,
            energy,
            spectral_contrast,
        };
        match vibe {
            VibeLabel::Slow => target(70.0, 0.015, 18.0),
            VibeLabel::Soothing => target(85.0, 0.02, 22.0),
            VibeLabel::Party => target(130.0, 0.05, 35.0),
            VibeLabel::MoodSetting => target(100.0, 0.03, 28.0),
            VibeLabel::Unclassified => Archetype::Neutral,
        }
    }

    /// Negated weighted L1 distance; higher is closer, 0 is a perfect match.
    pub fn score(&self, features: &FeatureVector) -> f32 {
        match *self {
            Archetype::Target {
                tempo_bpm,
                energy,
                spectral_contrast,
            } => -((features.tempo_bpm - tempo_bpm).abs()
                + ENERGY_WEIGHT * (features.energy - energy).abs()
                + (features.spectral_contrast - spectral_contrast).abs()),
            Archetype::Neutral => 0.0,
        }
    }
}

/// Winning window of a selection pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BestWindow {
    pub start_ms: u64,
    pub end_ms: u64,
    pub score: f32,
}

/// Index of the best-scoring item, scanning in ascending `start_ms`.
///
/// Only a strictly greater score replaces the running best, so ties go
/// to the earliest window.
fn best_index<'a, I>(vibe: VibeLabel, items: I) -> Option<(usize, f32)>
where
    I: IntoIterator<Item = (u64, &'a FeatureVector)>,
{
    let archetype = Archetype::for_vibe(vibe);
    let mut order: Vec<(usize, u64, &FeatureVector)> = items
        .into_iter()
        .enumerate()
        .map(|(idx, (start_ms, features))| (idx, start_ms, features))
        .collect();
    order.sort_by_key(|&(_, start_ms, _)| start_ms);

    let mut best: Option<(usize, f32)> = None;
    for (idx, start_ms, features) in order {
        let score = archetype.score(features);
        log::debug!("Segment @{}ms scored {:.3} for {}", start_ms, score, vibe);
        let best_score = best.map_or(f32::NEG_INFINITY, |(_, s)| s);
        if score > best_score {
            best = Some((idx, score));
        }
    }
    best
}

/// Pick the segment that best matches `vibe`, or `None` for no segments.
pub fn select<'a>(vibe: VibeLabel, scored: &'a [(Segment, FeatureVector)]) -> Option<&'a Segment> {
    let (idx, _) = best_index(vibe, scored.iter().map(|(seg, f)| (seg.start_ms, f)))?;
    Some(&scored[idx].0)
}

/// Best window with its score.
pub fn best_window(segments: &[SegmentFeatures], vibe: VibeLabel) -> Option<BestWindow> {
    let (idx, score) = best_index(vibe, segments.iter().map(|s| (s.start_ms, &s.features)))?;
    let seg = &segments[idx];
    Some(BestWindow {
        start_ms: seg.start_ms,
        end_ms: seg.end_ms,
        score,
    })
}

/// `(start_ms, end_ms)` of the window that best matches `vibe`.
pub fn select_best(segments: &[SegmentFeatures], vibe: VibeLabel) -> Option<(u64, u64)> {
    best_window(segments, vibe).map(|w| (w.start_ms, w.end_ms))
}
