//! Command-line interface implementation.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::audio::{AudioSink, NullSink};
use crate::models::{load_config, load_scenario, EffectConfig};
use crate::overlay;
use crate::record::{record_scenario, upscale, write_gif};

/// Exit codes
const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;
const EXIT_INVALID_ARGS: u8 = 2;

/// Skyburst - cursor-triggered fireworks overlay for truecolor terminals
#[derive(Parser)]
#[command(name = "skyb")]
#[command(about = "Skyburst - cursor-triggered fireworks overlay for truecolor terminals")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive overlay: click to launch, q or Esc to quit
    Run {
        /// Effect configuration file (.toml, .json or .json5)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the animation frame rate
        #[arg(long)]
        fps: Option<u32>,

        /// Seed the effect's random stream for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Disable the screen-shake cue
        #[arg(long)]
        no_shake: bool,

        /// Disable audio tone planning
        #[arg(long)]
        no_audio: bool,
    },

    /// Replay a scripted trigger scenario and export an animated GIF
    Record {
        /// Scenario file (.toml, .json or .json5)
        scenario: PathBuf,

        /// Output GIF path. Defaults to the scenario path with a .gif
        /// extension
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Effect configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Scale output by integer factor (1-8)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=8))]
        scale: u8,

        /// Write the audio tone plan as JSON
        #[arg(long)]
        tones: Option<PathBuf>,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, fps, seed, no_shake, no_audio } => {
            run_overlay(config.as_deref(), fps, seed, no_shake, no_audio)
        }
        Commands::Record { scenario, output, config, scale, tones } => run_record(
            &scenario,
            output.as_deref(),
            config.as_deref(),
            scale,
            tones.as_deref(),
        ),
    }
}

/// Load the effect config, or the stock defaults when no file is given.
fn effect_config(path: Option<&Path>) -> Result<EffectConfig, ExitCode> {
    match path {
        Some(path) => load_config(path).map_err(|e| {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_INVALID_ARGS)
        }),
        None => Ok(EffectConfig::default()),
    }
}

/// Execute the run command
fn run_overlay(
    config: Option<&Path>,
    fps: Option<u32>,
    seed: Option<u64>,
    no_shake: bool,
    no_audio: bool,
) -> ExitCode {
    // The overlay only makes sense on an interactive terminal; outside
    // one it is skipped entirely rather than treated as an error.
    if !atty::is(atty::Stream::Stdout) {
        eprintln!("skyb: stdout is not an interactive terminal, skipping overlay");
        return ExitCode::from(EXIT_SUCCESS);
    }

    let mut config = match effect_config(config) {
        Ok(config) => config,
        Err(code) => return code,
    };
    if let Some(fps) = fps {
        config.fps = fps;
    }
    if let Some(seed) = seed {
        config.seed = Some(seed);
    }
    if no_shake {
        config.shake.enabled = false;
    }
    if no_audio {
        config.audio.enabled = false;
    }

    // No audio synthesis backend exists on this platform; the effect
    // degrades to silence once, up front, and carries on.
    let sink: Box<dyn AudioSink + Send> = Box::new(NullSink);
    if config.audio.enabled {
        eprintln!("Warning: audio playback unavailable, continuing without sound");
    }

    let handle = overlay::initialize(config, sink);
    match handle.wait() {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the record command
fn run_record(
    scenario_path: &Path,
    output: Option<&Path>,
    config: Option<&Path>,
    scale: u8,
    tones: Option<&Path>,
) -> ExitCode {
    let scenario = match load_scenario(scenario_path) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    let config = match effect_config(config) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let recording = match record_scenario(&scenario, &config) {
        Ok(recording) => recording,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let frames = upscale(recording.frames, scale);
    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => scenario_path.with_extension("gif"),
    };
    if let Err(e) = write_gif(&frames, config.fps, &output_path) {
        eprintln!("Error: failed to save '{}': {}", output_path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }
    println!("Saved: {}", output_path.display());

    if let Some(tones_path) = tones {
        let json = match serde_json::to_string_pretty(&recording.tone_plan) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        };
        if let Err(e) = std::fs::write(tones_path, json) {
            eprintln!("Error: failed to save '{}': {}", tones_path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
        println!("Saved: {}", tones_path.display());
    }

    ExitCode::from(EXIT_SUCCESS)
}
