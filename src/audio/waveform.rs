/// Mono samples at a fixed sample rate.
///
/// Waveforms built with [`Waveform::normalized`] have a peak absolute
/// amplitude of exactly 1.0, except for pure silence which is kept as-is.
#[derive(Clone, Debug, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Wrap mono samples without touching their amplitude.
    pub fn raw(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Scale mono samples so the loudest one has magnitude 1.0.
    pub fn normalized(mut samples: Vec<f32>, sample_rate: u32) -> Self {
        let peak = peak_amplitude(&samples);
        if peak > 0.0 {
            for s in samples.iter_mut() {
                *s /= peak;
            }
        } else {
            log::debug!("Silent waveform ({} samples), skipping normalization", samples.len());
        }
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_silent(&self) -> bool {
        self.samples.iter().all(|&s| s == 0.0)
    }

    pub fn peak(&self) -> f32 {
        peak_amplitude(&self.samples)
    }
}

pub fn peak_amplitude(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
}
