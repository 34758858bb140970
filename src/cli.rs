use clap::Parser;
use std::path::PathBuf;

use vibecut::VibeLabel;

#[derive(Parser, Debug)]
#[command(
    name = "vibecut",
    about = "Detect a track's vibe and play the window that matches it best"
)]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub input: PathBuf,

    /// Segment window length in milliseconds
    #[arg(long, default_value_t = 10_000)]
    pub window_ms: u32,

    /// Seconds from the start used to classify the track (0 = whole track)
    #[arg(long, default_value_t = 60.0)]
    pub analysis_secs: f32,

    /// Select a window for this vibe instead of the detected one
    #[arg(long, value_enum)]
    pub vibe: Option<VibeLabel>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Analyze only, skip playback
    #[arg(long)]
    pub no_play: bool,

    /// Config file (defaults to ./vibecut.toml or the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
