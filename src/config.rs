use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisSection,
    #[serde(default)]
    pub playback: PlaybackSection,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisSection {
    #[serde(default = "default_window_ms")]
    pub window_ms: u32,
    /// Seconds of audio used for the whole-track classification; 0 = all
    #[serde(default = "default_analysis_secs")]
    pub analysis_secs: f32,
}

#[derive(Debug, Deserialize)]
pub struct PlaybackSection {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            analysis_secs: default_analysis_secs(),
        }
    }
}

impl Default for PlaybackSection {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
        }
    }
}

pub fn default_window_ms() -> u32 { 10_000 }
pub fn default_analysis_secs() -> f32 { 60.0 }
fn default_enabled() -> bool { true }

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(err) => {
            log::debug!("Invalid config {}: {}", path.display(), err);
            None
        }
    }
}

/// Explicit path, else `./vibecut.toml`, else the user config directories.
pub fn find_config(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| {
        let local = PathBuf::from("vibecut.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("vibecut").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("vibecut").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    })
}
