//! Data models for the effect configuration and scripted scenarios.
//!
//! Every field defaults to the reference behavior of the overlay, so an
//! empty config file (or none at all) reproduces the stock effect.
//! Config files may be TOML or JSON5, dispatched by file extension.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML parsing error
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    /// JSON/JSON5 parsing error
    #[error("failed to parse JSON: {0}")]
    Json(#[from] json5::Error),
    /// Unrecognized file extension
    #[error("unsupported config format '{0}', expected .toml, .json or .json5")]
    UnknownFormat(String),
}

/// Top-level effect configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EffectConfig {
    /// Launch colors, drawn uniformly at random per launch. Any CSS
    /// color string is accepted.
    pub palette: Vec<String>,
    /// Cap on concurrently live sparks; the oldest are dropped when a
    /// burst would overflow it.
    pub max_sparks: usize,
    /// Animation frame rate.
    pub fps: u32,
    /// PRNG seed. Unset means a fresh seed per run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub launch: LaunchConfig,
    pub burst: BurstConfig,
    pub shake: ShakeConfig,
    pub audio: AudioConfig,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            palette: crate::color::DEFAULT_PALETTE.iter().map(|s| s.to_string()).collect(),
            max_sparks: 5000,
            fps: 60,
            seed: None,
            launch: LaunchConfig::default(),
            burst: BurstConfig::default(),
            shake: ShakeConfig::default(),
            audio: AudioConfig::default(),
        }
    }
}

/// Projectile parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LaunchConfig {
    /// Travel speed in pixels per frame.
    pub speed: f64,
    /// Body radius in pixels.
    pub radius: f64,
    /// Distance to target below which the launch explodes.
    pub proximity: f64,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self { speed: 8.0, radius: 2.0, proximity: 50.0 }
    }
}

/// Burst parameters for the radial spark ring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BurstConfig {
    /// Sparks per explosion, spaced evenly around the circle.
    pub count: u32,
    /// Spark radius range `[min, max)` in pixels.
    pub radius: [f64; 2],
    /// Initial spark speed range `[min, max)` in pixels per frame.
    pub speed: [f64; 2],
    /// Per-frame speed multiplier, below 1.
    pub friction: f64,
    /// Constant downward displacement added each frame.
    pub gravity: f64,
    /// Per-frame opacity decrement range `[min, max)`, drawn once per
    /// spark so a burst fades unevenly.
    pub fade: [f64; 2],
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            count: 70,
            radius: [2.0, 5.0],
            speed: [3.0, 9.0],
            friction: 0.93,
            gravity: 0.15,
            fade: [0.008, 0.023],
        }
    }
}

/// Screen-shake cue parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShakeConfig {
    pub enabled: bool,
    /// Length of the shake window in milliseconds.
    pub duration_ms: u64,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self { enabled: true, duration_ms: 500 }
    }
}

/// Audio cue parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// A scripted playback scenario for the recorder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Total frames to simulate.
    pub frames: u32,
    /// PRNG seed used when the effect config leaves its seed unset.
    #[serde(default = "default_scenario_seed")]
    pub seed: u64,
    /// Trigger events, applied at the start of their frame.
    #[serde(default)]
    pub triggers: Vec<TriggerAt>,
}

fn default_scenario_seed() -> u64 {
    42
}

/// A single scripted pointer trigger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TriggerAt {
    pub frame: u32,
    pub x: f64,
    pub y: f64,
}

/// Load an effect configuration from a TOML or JSON5 file.
pub fn load_config(path: &Path) -> Result<EffectConfig, ConfigError> {
    load(path)
}

/// Load a recorder scenario from a TOML or JSON5 file.
pub fn load_scenario(path: &Path) -> Result<Scenario, ConfigError> {
    load(path)
}

fn load<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "toml" => Ok(toml::from_str(&text)?),
        "json" | "json5" => Ok(json5::from_str(&text)?),
        other => Err(ConfigError::UnknownFormat(other.to_string())),
    }
}
