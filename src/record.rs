//! Scripted scenario playback and GIF export.
//!
//! The recorder drives the same engine/renderer pair as the live
//! overlay, but from a scenario file instead of a pointer, which makes
//! the effect reproducible: a seeded run always yields identical
//! frames and an identical audio tone plan.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::imageops::FilterType;
use image::{Delay, Frame, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::{self, ToneSpec};
use crate::color::ColorError;
use crate::engine::FireworksEngine;
use crate::models::{EffectConfig, Scenario};
use crate::render;
use crate::rng::Rng;
use crate::shake::ShakeCue;
use crate::surface::Surface;

/// Error type for recording and export.
#[derive(Debug, Error)]
pub enum RecordError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Image encoding error
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    /// Palette entry failed to parse
    #[error("palette error: {0}")]
    Palette(#[from] ColorError),
}

/// Tones scheduled on one frame of a recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameTones {
    pub frame: u32,
    pub tones: Vec<ToneSpec>,
}

/// A finished scripted run.
pub struct Recording {
    /// One rendered frame per simulated frame, shake applied.
    pub frames: Vec<RgbaImage>,
    /// The audio plan: which tones would have played on which frame.
    pub tone_plan: Vec<FrameTones>,
}

/// Replay a scenario through the engine and collect every frame.
///
/// The scenario's seed applies when the effect config leaves its own
/// seed unset, so the same scenario file replays identically.
pub fn record_scenario(
    scenario: &Scenario,
    config: &EffectConfig,
) -> Result<Recording, RecordError> {
    let mut config = config.clone();
    if config.seed.is_none() {
        config.seed = Some(scenario.seed);
    }
    let audio_on = config.audio.enabled;
    let shake_on = config.shake.enabled;

    let mut engine =
        FireworksEngine::new(config.clone(), scenario.width as f64, scenario.height as f64)?;
    let mut tone_rng = Rng::new(engine.seed().wrapping_add(1));
    let mut surface = Surface::new(scenario.width, scenario.height);
    let mut shake = ShakeCue::new(config.shake.duration_ms, config.fps);

    let mut frames = Vec::with_capacity(scenario.frames as usize);
    let mut tone_plan = Vec::new();

    for frame_no in 0..scenario.frames {
        let mut tones = Vec::new();

        for trigger in scenario.triggers.iter().filter(|t| t.frame == frame_no) {
            engine.pointer_moved(trigger.x, trigger.y);
            engine.trigger_at(trigger.x, trigger.y);
            if audio_on {
                tones.push(audio::launch_tone());
            }
        }

        let events = engine.step();
        for _burst in &events.bursts {
            if audio_on {
                tones.extend(audio::explosion_tones(&mut tone_rng));
            }
            if shake_on {
                shake.trigger();
            }
        }
        shake.tick();

        render::render(&engine, &mut surface);
        frames.push(shifted(surface.frame(), shake.offset()));

        if !tones.is_empty() {
            tone_plan.push(FrameTones { frame: frame_no, tones });
        }
    }

    Ok(Recording { frames, tone_plan })
}

/// Copy a frame displaced by the shake offset; vacated edges stay
/// transparent.
fn shifted(frame: &RgbaImage, (dx, dy): (i32, i32)) -> RgbaImage {
    if (dx, dy) == (0, 0) {
        return frame.clone();
    }
    let (w, h) = frame.dimensions();
    let mut out = RgbaImage::new(w, h);
    for (x, y, pixel) in frame.enumerate_pixels() {
        let tx = x as i32 + dx;
        let ty = y as i32 + dy;
        if tx >= 0 && ty >= 0 && (tx as u32) < w && (ty as u32) < h {
            out.put_pixel(tx as u32, ty as u32, *pixel);
        }
    }
    out
}

/// Scale frames by an integer factor with nearest-neighbor sampling,
/// preserving hard particle edges.
pub fn upscale(frames: Vec<RgbaImage>, factor: u8) -> Vec<RgbaImage> {
    if factor <= 1 {
        return frames;
    }
    frames
        .into_iter()
        .map(|frame| {
            let (w, h) = frame.dimensions();
            image::imageops::resize(&frame, w * factor as u32, h * factor as u32, FilterType::Nearest)
        })
        .collect()
}

/// Write frames as an infinitely looping animated GIF.
///
/// An empty frame list writes nothing and succeeds. Parent directories
/// are created on demand.
pub fn write_gif(frames: &[RgbaImage], fps: u32, path: &Path) -> Result<(), RecordError> {
    if frames.is_empty() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let mut encoder = GifEncoder::new(writer);
    encoder.set_repeat(Repeat::Infinite)?;

    // GIF delays have centisecond granularity; hold at least one
    let delay_ms = (1000 / fps.max(1)).max(10);
    for image in frames {
        let delay = Delay::from_numer_denom_ms(delay_ms, 1);
        encoder.encode_frame(Frame::from_parts(image.clone(), 0, 0, delay))?;
    }

    Ok(())
}
