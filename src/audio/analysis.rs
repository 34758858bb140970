use rustfft::{num_complex::Complex, FftPlanner};

use super::features::{mean_energy, FeatureExtractor, FeatureVector};
use crate::error::ExtractError;

const FFT_SIZE: usize = 2048;
const HOP_SIZE: usize = 512;
const CONTRAST_BANDS: usize = 6;
const CONTRAST_FMIN: f32 = 200.0;
const CONTRAST_QUANTILE: f32 = 0.02;
const AMIN: f32 = 1e-10;

/// FFT-based estimator for tempo, energy and spectral contrast.
///
/// Stateless: the FFT plan is rebuilt per call so one instance can be
/// shared across rayon workers.
#[derive(Clone, Debug)]
pub struct SpectralExtractor {
    pub fft_size: usize,
    pub hop_size: usize,
}

impl Default for SpectralExtractor {
    fn default() -> Self {
        Self {
            fft_size: FFT_SIZE,
            hop_size: HOP_SIZE,
        }
    }
}

impl FeatureExtractor for SpectralExtractor {
    fn extract(&self, samples: &[f32], sample_rate: u32) -> Result<FeatureVector, ExtractError> {
        if sample_rate == 0 {
            return Err(ExtractError::ZeroSampleRate);
        }
        if samples.iter().any(|s| !s.is_finite()) {
            return Err(ExtractError::NonFiniteInput);
        }

        let spectra = self.magnitude_frames(samples);
        let hop_secs = self.hop_size as f32 / sample_rate as f32;

        let flux = spectral_flux(&spectra, hop_secs);
        let beat_times = detect_beats(&flux);
        let tempo_bpm = estimate_tempo(&beat_times);
        let spectral_contrast = mean_spectral_contrast(&spectra, sample_rate, self.fft_size);
        let energy = mean_energy(samples);

        log::debug!(
            "Extracted {} frames: onsets={}, tempo={:.1} BPM, energy={:.4}, contrast={:.2}",
            spectra.len(),
            beat_times.len(),
            tempo_bpm,
            energy,
            spectral_contrast
        );

        FeatureVector::new(tempo_bpm, energy, spectral_contrast).check_finite()
    }
}

impl SpectralExtractor {
    /// Hann-windowed STFT magnitudes (`fft_size / 2 + 1` bins per frame).
    ///
    /// Input shorter than one frame is zero-padded to a single frame.
    fn magnitude_frames(&self, samples: &[f32]) -> Vec<Vec<f32>> {
        let n = self.fft_size;
        let hop = self.hop_size.max(1);
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(n);
        let hann = hann_window(n);

        let num_frames = if samples.len() <= n {
            1
        } else {
            (samples.len() - n) / hop + 1
        };

        let mut buffer = vec![Complex::new(0.0f32, 0.0); n];
        (0..num_frames)
            .map(|frame_idx| {
                let pos = frame_idx * hop;
                let end = (pos + n).min(samples.len());
                buffer.fill(Complex::new(0.0, 0.0));
                for (i, &s) in samples[pos..end].iter().enumerate() {
                    buffer[i] = Complex::new(s * hann[i], 0.0);
                }
                fft.process(&mut buffer);
                buffer[..=n / 2].iter().map(|c| c.norm()).collect()
            })
            .collect()
    }
}

/// Positive spectral flux per frame as `(time, flux)`.
fn spectral_flux(spectra: &[Vec<f32>], hop_secs: f32) -> Vec<(f32, f32)> {
    let Some(first) = spectra.first() else {
        return Vec::new();
    };
    let mut prev_magnitudes = vec![0.0f32; first.len()];
    let mut flux_values = Vec::with_capacity(spectra.len());

    for (idx, magnitudes) in spectra.iter().enumerate() {
        let flux: f32 = magnitudes
            .iter()
            .zip(prev_magnitudes.iter())
            .map(|(cur, prev)| (cur - prev).max(0.0))
            .sum();
        flux_values.push((idx as f32 * hop_secs, flux));
        prev_magnitudes.clone_from(magnitudes);
    }

    flux_values
}

fn detect_beats(flux_values: &[(f32, f32)]) -> Vec<f32> {
    if flux_values.is_empty() {
        return Vec::new();
    }

    let window = 20;
    let mut beat_times = Vec::new();

    for i in 0..flux_values.len() {
        let start = i.saturating_sub(window);
        let end = (i + window + 1).min(flux_values.len());
        let local_mean: f32 = flux_values[start..end].iter().map(|(_, f)| f).sum::<f32>()
            / (end - start) as f32;

        let threshold = local_mean * 1.5 + 0.01;

        if flux_values[i].1 > threshold {
            let is_peak = (i == 0 || flux_values[i].1 >= flux_values[i - 1].1)
                && (i == flux_values.len() - 1 || flux_values[i].1 >= flux_values[i + 1].1);

            // Minimum gap between onsets (100ms)
            let far_enough = beat_times
                .last()
                .map_or(true, |&last: &f32| flux_values[i].0 - last > 0.1);

            if is_peak && far_enough {
                beat_times.push(flux_values[i].0);
            }
        }
    }

    beat_times
}

/// Median inter-onset interval in BPM; 0 when no pulse is found.
fn estimate_tempo(beat_times: &[f32]) -> f32 {
    if beat_times.len() < 2 {
        return 0.0;
    }

    // Keep 60-200 BPM intervals
    let mut reasonable: Vec<f32> = beat_times
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|&i| (0.3..=1.0).contains(&i))
        .collect();

    if reasonable.is_empty() {
        return 0.0;
    }

    reasonable.sort_by(f32::total_cmp);
    60.0 / reasonable[reasonable.len() / 2]
}

/// Octave band edges in Hz: `[0, fmin, 2 fmin, ..., nyquist]`, cut at Nyquist.
fn contrast_band_edges(sample_rate: u32) -> Vec<f32> {
    let nyquist = sample_rate as f32 / 2.0;
    let mut edges = vec![0.0f32];
    for k in 0..CONTRAST_BANDS {
        let edge = CONTRAST_FMIN * 2f32.powi(k as i32);
        if edge >= nyquist {
            break;
        }
        edges.push(edge);
    }
    edges.push(nyquist);
    edges
}

/// Mean peak-to-valley ratio (dB) over all frames and octave bands.
fn mean_spectral_contrast(spectra: &[Vec<f32>], sample_rate: u32, fft_size: usize) -> f32 {
    let bin_hz = sample_rate as f32 / fft_size as f32;
    let edges = contrast_band_edges(sample_rate);
    let last_band = edges.len() - 2;

    let mut total = 0.0f64;
    let mut count = 0usize;
    let mut band_buf: Vec<f32> = Vec::with_capacity(fft_size / 2 + 1);

    for magnitudes in spectra {
        for (band, pair) in edges.windows(2).enumerate() {
            band_buf.clear();
            band_buf.extend(magnitudes.iter().enumerate().filter_map(|(bin, &mag)| {
                let freq = bin as f32 * bin_hz;
                let inside = freq >= pair[0] && (freq < pair[1] || band == last_band);
                inside.then_some(mag)
            }));
            if band_buf.is_empty() {
                continue;
            }
            band_buf.sort_by(f32::total_cmp);

            let q = ((CONTRAST_QUANTILE * band_buf.len() as f32).round() as usize).max(1);
            let valley = band_buf[..q].iter().sum::<f32>() / q as f32;
            let peak = band_buf[band_buf.len() - q..].iter().sum::<f32>() / q as f32;

            total += (to_db(peak) - to_db(valley)) as f64;
            count += 1;
        }
    }

    if count == 0 {
        0.0
    } else {
        (total / count as f64) as f32
    }
}

fn to_db(magnitude: f32) -> f32 {
    10.0 * magnitude.max(AMIN).log10()
}

fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos())
        })
        .collect()
}
