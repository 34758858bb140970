use serde::Serialize;
use std::fmt;

use crate::audio::features::FeatureVector;

/// Dominant mood of a track or segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
pub enum VibeLabel {
    Slow,
    Soothing,
    Party,
    #[serde(rename = "Mood-setting")]
    MoodSetting,
    Unclassified,
}

impl VibeLabel {
    pub const ALL: [VibeLabel; 5] = [
        VibeLabel::Slow,
        VibeLabel::Soothing,
        VibeLabel::Party,
        VibeLabel::MoodSetting,
        VibeLabel::Unclassified,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VibeLabel::Slow => "Slow",
            VibeLabel::Soothing => "Soothing",
            VibeLabel::Party => "Party",
            VibeLabel::MoodSetting => "Mood-setting",
            VibeLabel::Unclassified => "Unclassified",
        }
    }
}

impl fmt::Display for VibeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map features to a vibe. Rules are checked in order; the first match wins.
pub fn classify(features: &FeatureVector) -> VibeLabel {
    let FeatureVector {
        tempo_bpm: tempo,
        energy,
        spectral_contrast: contrast,
    } = *features;

    if tempo < 80.0 && energy < 0.02 && contrast < 20.0 {
        VibeLabel::Slow
    } else if (70.0..=100.0).contains(&tempo) && energy < 0.03 && contrast < 25.0 {
        VibeLabel::Soothing
    } else if tempo > 120.0 && energy > 0.04 && contrast > 30.0 {
        VibeLabel::Party
    } else if (90.0..=160.0).contains(&tempo) && (0.10..=0.14).contains(&energy) {
        VibeLabel::MoodSetting
    } else {
        VibeLabel::Unclassified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vibe(tempo: f32, energy: f32, contrast: f32) -> VibeLabel {
        classify(&FeatureVector::new(tempo, energy, contrast))
    }

    #[test]
    fn scenarios() {
        assert_eq!(vibe(65.0, 0.01, 15.0), VibeLabel::Slow);
        assert_eq!(vibe(140.0, 0.06, 35.0), VibeLabel::Party);
        assert_eq!(vibe(105.0, 0.12, 40.0), VibeLabel::MoodSetting);
        assert_eq!(vibe(50.0, 0.5, 5.0), VibeLabel::Unclassified);
    }

    #[test]
    fn slow_boundaries_are_strict() {
        assert_eq!(vibe(79.9, 0.01, 15.0), VibeLabel::Slow);
        // tempo 80 fails rule 1 but lands in Soothing's tempo range
        assert_eq!(vibe(80.0, 0.01, 15.0), VibeLabel::Soothing);
        assert_eq!(vibe(65.0, 0.02, 15.0), VibeLabel::Unclassified);
        assert_eq!(vibe(65.0, 0.01, 20.0), VibeLabel::Unclassified);
        assert_eq!(vibe(75.0, 0.02, 15.0), VibeLabel::Soothing);
        assert_eq!(vibe(75.0, 0.01, 20.0), VibeLabel::Soothing);
    }

    #[test]
    fn slow_takes_precedence_over_soothing() {
        // satisfies both rule 1 and rule 2
        assert_eq!(vibe(75.0, 0.01, 15.0), VibeLabel::Slow);
    }

    #[test]
    fn soothing_boundaries() {
        assert_eq!(vibe(100.0, 0.025, 22.0), VibeLabel::Soothing);
        assert_eq!(vibe(100.1, 0.025, 22.0), VibeLabel::Unclassified);
        assert_eq!(vibe(70.0, 0.025, 22.0), VibeLabel::Soothing);
        assert_eq!(vibe(69.9, 0.025, 22.0), VibeLabel::Unclassified);
        assert_eq!(vibe(85.0, 0.03, 22.0), VibeLabel::Unclassified);
        assert_eq!(vibe(85.0, 0.025, 25.0), VibeLabel::Unclassified);
    }

    #[test]
    fn party_boundaries_are_strict() {
        assert_eq!(vibe(120.1, 0.05, 35.0), VibeLabel::Party);
        assert_eq!(vibe(120.0, 0.05, 35.0), VibeLabel::Unclassified);
        assert_eq!(vibe(130.0, 0.04, 35.0), VibeLabel::Unclassified);
        assert_eq!(vibe(130.0, 0.05, 30.0), VibeLabel::Unclassified);
    }

    #[test]
    fn party_takes_precedence_over_mood_setting() {
        assert_eq!(vibe(130.0, 0.12, 35.0), VibeLabel::Party);
        assert_eq!(vibe(130.0, 0.12, 30.0), VibeLabel::MoodSetting);
    }

    #[test]
    fn mood_setting_boundaries_are_inclusive() {
        assert_eq!(vibe(90.0, 0.10, 0.0), VibeLabel::MoodSetting);
        assert_eq!(vibe(160.0, 0.14, 0.0), VibeLabel::MoodSetting);
        assert_eq!(vibe(89.9, 0.12, 0.0), VibeLabel::Unclassified);
        assert_eq!(vibe(160.1, 0.12, 0.0), VibeLabel::Unclassified);
        assert_eq!(vibe(120.0, 0.099, 0.0), VibeLabel::Unclassified);
        assert_eq!(vibe(120.0, 0.141, 0.0), VibeLabel::Unclassified);
    }

    #[test]
    fn zeroed_features_classify_as_slow() {
        // degenerate silent input: tempo 0, energy 0, contrast 0
        assert_eq!(classify(&FeatureVector::default()), VibeLabel::Slow);
    }

    #[test]
    fn deterministic() {
        let f = FeatureVector::new(97.0, 0.11, 26.0);
        assert_eq!(classify(&f), classify(&f));
    }

    #[test]
    fn display_names() {
        assert_eq!(VibeLabel::MoodSetting.to_string(), "Mood-setting");
        assert_eq!(
            serde_json::to_string(&VibeLabel::MoodSetting).unwrap(),
            "\"Mood-setting\""
        );
    }
}
