use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::audio::decode::{decode_audio, AudioData};
use crate::error::{Result, VibeError};

/// Interleaved samples for `[start_ms, end_ms)`, clamped to the track.
pub fn clip_for_range(audio: &AudioData, start_ms: u64, end_ms: u64) -> Vec<f32> {
    audio.slice_ms(start_ms, end_ms).to_vec()
}

/// Cancels a running [`Player::play_blocking`] from another thread.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Default)]
pub struct Player {
    stop: StopHandle,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Play interleaved samples on the default output device and block
    /// until they are consumed or the player is stopped.
    #[cfg(feature = "playback")]
    pub fn play_blocking(&self, samples: Vec<f32>, sample_rate: u32, channels: u16) -> Result<()> {
        use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
        use std::sync::atomic::AtomicUsize;
        use std::time::Duration;

        if samples.is_empty() {
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| VibeError::Playback("No audio output device found".into()))?;

        let config = cpal::StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let total = samples.len();
        let samples = Arc::new(samples);
        let position = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicBool::new(false));

        let cb_samples = Arc::clone(&samples);
        let cb_position = Arc::clone(&position);
        let cb_finished = Arc::clone(&finished);
        let cb_stop = self.stop.clone();

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if cb_stop.is_stopped() {
                        data.fill(0.0);
                        return;
                    }
                    let start = cb_position.load(Ordering::Relaxed);
                    let n = (total - start).min(data.len());
                    data[..n].copy_from_slice(&cb_samples[start..start + n]);
                    data[n..].fill(0.0);
                    cb_position.store(start + n, Ordering::Relaxed);
                    if start + n >= total {
                        cb_finished.store(true, Ordering::Release);
                    }
                },
                |err| {
                    log::error!("Audio output error: {err}");
                },
                None,
            )
            .map_err(|e| VibeError::Playback(e.to_string()))?;

        stream
            .play()
            .map_err(|e| VibeError::Playback(e.to_string()))?;
        log::info!(
            "Playback started: {:.1}s @ {}Hz, {} ch",
            total as f32 / channels.max(1) as f32 / sample_rate as f32,
            sample_rate,
            channels
        );

        while !finished.load(Ordering::Acquire) && !self.stop.is_stopped() {
            std::thread::sleep(Duration::from_millis(20));
        }
        // Let the device drain the last buffer.
        std::thread::sleep(Duration::from_millis(100));

        if self.stop.is_stopped() {
            log::info!("Playback stopped");
        } else {
            log::info!("Playback finished");
        }
        Ok(())
    }

    #[cfg(not(feature = "playback"))]
    pub fn play_blocking(
        &self,
        _samples: Vec<f32>,
        _sample_rate: u32,
        _channels: u16,
    ) -> Result<()> {
        Err(VibeError::PlaybackUnavailable)
    }
}

/// Decode `path` and play `[start_ms, end_ms)`, blocking until done.
pub fn play(path: &Path, start_ms: u64, end_ms: u64) -> Result<()> {
    if !cfg!(feature = "playback") {
        return Err(VibeError::PlaybackUnavailable);
    }
    let audio = decode_audio(path)?;
    let clip = clip_for_range(&audio, start_ms, end_ms);
    if clip.is_empty() {
        log::warn!("Nothing to play in {}-{}ms", start_ms, end_ms);
        return Ok(());
    }
    Player::new().play_blocking(clip, audio.sample_rate, audio.channels as u16)
}
