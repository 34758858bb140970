use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{Result, VibeError};

/// Decoded PCM, interleaved by channel.
#[derive(Clone, Debug)]
pub struct AudioData {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: usize,
}

impl AudioData {
    /// Number of sample frames (one sample per channel each).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1)
    }

    /// Track length in milliseconds, rounded up so the last partial
    /// millisecond still counts.
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.frames() as u64 * 1000).div_ceil(self.sample_rate as u64)
    }

    /// Frame index at which millisecond `ms` starts, clamped to the track.
    pub fn frame_at_ms(&self, ms: u64) -> usize {
        let frame = ms * self.sample_rate as u64 / 1000;
        (frame as usize).min(self.frames())
    }

    /// Per-frame arithmetic mean across channels.
    pub fn to_mono(&self) -> Vec<f32> {
        downmix(&self.samples, self.channels)
    }

    /// Interleaved samples of frames `[start_ms, end_ms)`.
    pub fn slice_ms(&self, start_ms: u64, end_ms: u64) -> &[f32] {
        let ch = self.channels.max(1);
        let start = self.frame_at_ms(start_ms);
        let end = self.frame_at_ms(end_ms).max(start);
        &self.samples[start * ch..end * ch]
    }
}

pub fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Decode the whole file.
pub fn decode_audio(path: &Path) -> Result<AudioData> {
    decode_audio_limited(path, None)
}

/// Decode at most `max_secs` seconds from the start of the file.
pub fn decode_audio_limited(path: &Path, max_secs: Option<f32>) -> Result<AudioData> {
    let file = std::fs::File::open(path).map_err(|e| VibeError::decode(path, e))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| VibeError::decode(path, format!("unrecognized format ({e})")))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or_else(|| VibeError::decode(path, "no audio tracks found"))?;

    let track_id = track.id;
    let mut channels = track.codec_params.channels.map_or(0, |c| c.count());
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| VibeError::decode(path, "unknown sample rate"))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| VibeError::decode(path, e))?;

    let max_frames = max_secs
        .filter(|s| *s > 0.0)
        .map(|s| (s as f64 * sample_rate as f64) as usize);

    let mut all_samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(VibeError::decode(path, e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(err)) => {
                log::debug!("Skipping corrupt packet: {}", err);
                continue;
            }
            Err(e) => return Err(VibeError::decode(path, e)),
        };

        let spec = *decoded.spec();
        if channels == 0 {
            channels = spec.channels.count();
        }
        let num_frames = decoded.frames();

        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        all_samples.extend_from_slice(sample_buf.samples());

        if let Some(limit) = max_frames {
            if all_samples.len() >= limit * channels.max(1) {
                all_samples.truncate(limit * channels.max(1));
                break;
            }
        }
    }

    let channels = channels.max(1);
    // Drop a trailing partial frame, if any.
    all_samples.truncate(all_samples.len() / channels * channels);

    if all_samples.is_empty() {
        return Err(VibeError::EmptyTrack {
            path: path.to_path_buf(),
        });
    }

    let audio = AudioData {
        samples: all_samples,
        sample_rate,
        channels,
    };

    log::info!(
        "Decoded audio: {} frames x {} ch, {}Hz, {:.1}s",
        audio.frames(),
        channels,
        sample_rate,
        audio.frames() as f32 / sample_rate as f32
    );

    Ok(audio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::fixtures::write_wav;

    #[test]
    fn downmix_averages_channels() {
        let mono = downmix(&[0.2, 0.4, -1.0, 1.0, 0.5, 0.0], 2);
        assert_eq!(mono.len(), 3);
        assert!((mono[0] - 0.3).abs() < 1e-6);
        assert!(mono[1].abs() < 1e-6);
        assert!((mono[2] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn downmix_mono_is_identity() {
        assert_eq!(downmix(&[0.1, -0.2], 1), vec![0.1, -0.2]);
    }

    #[test]
    fn duration_rounds_up_partial_millisecond() {
        let audio = AudioData {
            samples: vec![0.0; 44101],
            sample_rate: 44100,
            channels: 1,
        };
        assert_eq!(audio.duration_ms(), 1001);
        assert_eq!(audio.frame_at_ms(1000), 44100);
        assert_eq!(audio.frame_at_ms(5000), 44101);
    }

    #[test]
    fn slice_ms_respects_channels() {
        let audio = AudioData {
            samples: (0..16).map(|i| i as f32).collect(),
            sample_rate: 1000,
            channels: 2,
        };
        // 8 frames at 1kHz = 8ms
        assert_eq!(audio.slice_ms(2, 4), &[4.0, 5.0, 6.0, 7.0]);
        assert!(audio.slice_ms(6, 2).is_empty());
    }

    #[test]
    fn decodes_stereo_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let frames: Vec<Vec<f32>> = (0..800).map(|_| vec![0.5, -0.25]).collect();
        write_wav(&path, 2, 8000, &frames);

        let audio = decode_audio(&path).unwrap();
        assert_eq!(audio.sample_rate, 8000);
        assert_eq!(audio.channels, 2);
        assert_eq!(audio.frames(), 800);
        assert_eq!(audio.duration_ms(), 100);
        assert!((audio.samples[0] - 0.5).abs() < 1e-3);
        assert!((audio.samples[1] + 0.25).abs() < 1e-3);
    }

    #[test]
    fn limited_decode_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.wav");
        let frames: Vec<Vec<f32>> = (0..8000).map(|_| vec![0.1]).collect();
        write_wav(&path, 1, 8000, &frames);

        let audio = decode_audio_limited(&path, Some(0.5)).unwrap();
        assert_eq!(audio.frames(), 4000);
    }

    #[test]
    fn missing_file_is_decode_error() {
        let err = decode_audio(Path::new("/nonexistent/track.wav")).unwrap_err();
        assert!(matches!(err, VibeError::Decode { .. }));
    }

    #[test]
    fn garbage_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.wav");
        std::fs::write(&path, b"definitely not audio").unwrap();
        let err = decode_audio(&path).unwrap_err();
        assert!(matches!(err, VibeError::Decode { .. }));
    }

    #[test]
    fn zero_length_wav_is_empty_track() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        write_wav(&path, 1, 8000, &[]);
        let err = decode_audio(&path).unwrap_err();
        assert!(matches!(err, VibeError::EmptyTrack { .. }));
    }
}
