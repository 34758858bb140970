use super::decode::AudioData;
use super::waveform::Waveform;
use crate::error::{Result, VibeError};

pub const DEFAULT_WINDOW_MS: u32 = 10_000;

/// A fixed-length slice of the track, mono and peak-normalized.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub start_ms: u64,
    pub end_ms: u64,
    pub waveform: Waveform,
}

impl Segment {
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }
}

/// Cut the track into contiguous `[i, i + window_ms)` windows.
///
/// The audio is downmixed to mono first; each window is then normalized
/// on its own peak. The last window ends at the track end and may be
/// shorter than `window_ms`.
///
/// At sample rates where a window can fall between two frames, a window
/// holding no frame is merged into the next one, so every segment holds
/// at least one frame.
pub fn segment(audio: &AudioData, window_ms: u32) -> Result<Vec<Segment>> {
    if window_ms == 0 {
        return Err(VibeError::InvalidWindow);
    }

    let mono = audio.to_mono();
    let duration_ms = audio.duration_ms();
    if mono.is_empty() || duration_ms == 0 {
        return Err(VibeError::NoFrames);
    }

    let window = window_ms as u64;
    let mut segments = Vec::with_capacity(duration_ms.div_ceil(window) as usize);

    let mut start_ms = 0u64;
    while start_ms < duration_ms {
        let start = audio.frame_at_ms(start_ms);
        let mut end_ms = (start_ms + window).min(duration_ms);
        while audio.frame_at_ms(end_ms) <= start && end_ms < duration_ms {
            end_ms = (end_ms + window).min(duration_ms);
        }
        let end = audio.frame_at_ms(end_ms);

        segments.push(Segment {
            start_ms,
            end_ms,
            waveform: Waveform::normalized(mono[start..end].to_vec(), audio.sample_rate),
        });
        start_ms = end_ms;
    }

    log::debug!(
        "Segmented {}ms into {} windows of {}ms",
        duration_ms,
        segments.len(),
        window_ms
    );

    Ok(segments)
}
