use serde::Serialize;

use crate::error::ExtractError;

/// Acoustic summary of one waveform (whole track or a single segment).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct FeatureVector {
    /// Estimated global tempo (BPM), 0 when no pulse was found
    pub tempo_bpm: f32,
    /// Mean absolute amplitude
    pub energy: f32,
    /// Mean spectral contrast across frames and octave bands (dB)
    pub spectral_contrast: f32,
}

impl FeatureVector {
    pub fn new(tempo_bpm: f32, energy: f32, spectral_contrast: f32) -> Self {
        Self {
            tempo_bpm,
            energy,
            spectral_contrast,
        }
    }

    pub(crate) fn check_finite(self) -> Result<Self, ExtractError> {
        if !self.tempo_bpm.is_finite() {
            return Err(ExtractError::NonFiniteFeature("tempo"));
        }
        if !self.energy.is_finite() {
            return Err(ExtractError::NonFiniteFeature("energy"));
        }
        if !self.spectral_contrast.is_finite() {
            return Err(ExtractError::NonFiniteFeature("spectral contrast"));
        }
        Ok(self)
    }
}

/// Features of one analysis window, with its position in the track.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SegmentFeatures {
    pub start_ms: u64,
    pub end_ms: u64,
    pub features: FeatureVector,
}

/// DSP backend computing a [`FeatureVector`] from mono samples.
///
/// Implementations must not keep mutable state between calls: the
/// pipeline invokes `extract` concurrently from several threads.
pub trait FeatureExtractor: Send + Sync {
    fn extract(&self, samples: &[f32], sample_rate: u32) -> Result<FeatureVector, ExtractError>;

    /// Like [`extract`](Self::extract), but degrades to zeroed features on failure.
    fn extract_or_default(&self, samples: &[f32], sample_rate: u32) -> FeatureVector {
        match self.extract(samples, sample_rate) {
            Ok(features) => features,
            Err(err) => {
                log::warn!("Feature extraction failed ({}), using zeroed features", err);
                FeatureVector::default()
            }
        }
    }
}

/// Mean absolute amplitude.
pub fn mean_energy(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|s| s.abs()).sum::<f32>() / samples.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl FeatureExtractor for Failing {
        fn extract(&self, _: &[f32], _: u32) -> Result<FeatureVector, ExtractError> {
            Err(ExtractError::ZeroSampleRate)
        }
    }

    #[test]
    fn energy_is_mean_absolute_value() {
        assert!((mean_energy(&[0.5, -0.5, 0.25, -0.25]) - 0.375).abs() < 1e-6);
        assert_eq!(mean_energy(&[]), 0.0);
        assert_eq!(mean_energy(&[0.0; 16]), 0.0);
    }

    #[test]
    fn failure_degrades_to_zero_features() {
        let features = Failing.extract_or_default(&[0.1, 0.2], 44100);
        assert_eq!(features, FeatureVector::default());
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert!(FeatureVector::new(120.0, 0.1, 20.0).check_finite().is_ok());
        assert_eq!(
            FeatureVector::new(f32::NAN, 0.1, 20.0).check_finite(),
            Err(ExtractError::NonFiniteFeature("tempo"))
        );
        assert!(FeatureVector::new(1.0, 0.1, f32::INFINITY).check_finite().is_err());
    }
}
