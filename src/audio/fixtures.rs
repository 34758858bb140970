//! Synthetic signals and WAV files for tests.

use std::path::Path;

/// Write `frames` (one inner vec per frame, one value per channel) as 16-bit PCM.
pub fn write_wav(path: &Path, channels: u16, sample_rate: u32, frames: &[Vec<f32>]) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for frame in frames {
        for &s in frame {
            writer.write_sample((s * i16::MAX as f32) as i16).unwrap();
        }
    }
    writer.finalize().unwrap();
}

/// Short decaying noise bursts every `60 / bpm` seconds.
pub fn click_track(bpm: f32, sample_rate: u32, secs: f32, amplitude: f32) -> Vec<f32> {
    let len = (secs * sample_rate as f32) as usize;
    let period = (60.0 / bpm * sample_rate as f32) as usize;
    let click_len = (sample_rate as usize / 100).max(1);
    let mut seed = 0x2545_f491_u32;
    let mut samples = vec![0.0f32; len];
    for start in (0..len).step_by(period.max(1)) {
        for i in 0..click_len.min(len - start) {
            // xorshift keeps the burst broadband and deterministic
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let noise = (seed as f32 / u32::MAX as f32) * 2.0 - 1.0;
            let decay = 1.0 - i as f32 / click_len as f32;
            samples[start + i] = noise * decay * amplitude;
        }
    }
    samples
}

pub fn sine(freq: f32, sample_rate: u32, secs: f32, amplitude: f32) -> Vec<f32> {
    let len = (secs * sample_rate as f32) as usize;
    (0..len)
        .map(|i| {
            amplitude * (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin()
        })
        .collect()
}
