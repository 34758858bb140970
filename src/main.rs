mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use vibecut::audio::analysis::SpectralExtractor;
use vibecut::config;
use vibecut::{AnalysisConfig, AnalysisReport, VibeError};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();
    let mut play_enabled = true;

    if let Some(ref path) = config::find_config(cli.config.clone()) {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            // Merge: config values apply only when CLI is at its default
            if cli.window_ms == config::default_window_ms() {
                cli.window_ms = cfg.analysis.window_ms;
            }
            if cli.analysis_secs == config::default_analysis_secs() {
                cli.analysis_secs = cfg.analysis.analysis_secs;
            }
            play_enabled = cfg.playback.enabled;
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    if !cli.input.exists() {
        anyhow::bail!("Input file not found: {}", cli.input.display());
    }

    let analysis = AnalysisConfig {
        file_path: cli.input.clone(),
        window_ms: cli.window_ms,
        analysis_secs: cli.analysis_secs,
        vibe_override: cli.vibe,
        show_progress: !cli.json,
    };

    let report = vibecut::run(&analysis, &SpectralExtractor::default())
        .with_context(|| format!("Analysis failed for {}", cli.input.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    let Some(best) = report.best else {
        return Ok(());
    };
    if cli.no_play || !play_enabled {
        return Ok(());
    }

    match vibecut::play(&cli.input, best.start_ms, best.end_ms) {
        Err(VibeError::PlaybackUnavailable) => {
            log::warn!("{}", VibeError::PlaybackUnavailable);
            Ok(())
        }
        other => other.context("Playback failed"),
    }
}

fn print_report(report: &AnalysisReport) {
    let track = &report.track;
    println!(
        "Tempo: {:.1}, Energy: {:.4}, Contrast: {:.2}",
        track.tempo_bpm, track.energy, track.spectral_contrast
    );
    println!("Detected Vibe: {}", report.detected_vibe);
    if report.target_vibe != report.detected_vibe {
        println!("Target Vibe: {}", report.target_vibe);
    }
    match report.best {
        Some(best) => println!(
            "Best {} segment: {}-{} seconds",
            report.target_vibe,
            best.start_ms / 1000,
            best.end_ms / 1000
        ),
        None => println!("No segment found!"),
    }
}
