//! The fireworks animation engine.
//!
//! Owns the live launch and spark collections and advances them one
//! display frame at a time. A pointer trigger spawns a launch from the
//! bottom center of the viewport toward the trigger point; when the
//! launch closes within the proximity threshold of its target it is
//! replaced, in the same frame, by a radial ring of decaying sparks.
//!
//! The engine never draws. [`step`](FireworksEngine::step) prunes
//! exploded launches and faded sparks before it returns, so a renderer
//! running afterward only ever sees live entities.

use std::f64::consts::TAU;

use image::Rgba;

use crate::color::{parse_palette, ColorError};
use crate::models::EffectConfig;
use crate::rng::Rng;

/// A projectile in flight toward its trigger point.
#[derive(Debug, Clone)]
pub struct Launch {
    /// Current position (sub-pixel precision)
    pub x: f64,
    pub y: f64,
    /// Trigger coordinates captured at creation
    pub target_x: f64,
    pub target_y: f64,
    /// Heading in radians, fixed at creation
    pub angle: f64,
    /// Travel speed in pixels per frame
    pub speed: f64,
    /// Body radius in pixels
    pub radius: f64,
    pub color: Rgba<u8>,
    /// Set exactly once, the frame the launch reaches its target
    pub exploded: bool,
}

/// A burst fragment. Independent once spawned; sparks keep no
/// reference to the launch that produced them.
#[derive(Debug, Clone)]
pub struct Spark {
    pub x: f64,
    pub y: f64,
    pub color: Rgba<u8>,
    /// Dot radius in pixels, constant for the spark's lifetime
    pub radius: f64,
    /// Outward speed, decayed by friction every frame
    pub speed: f64,
    /// Ring direction in radians, fixed at creation
    pub angle: f64,
    /// 1.0 at creation, decremented by `fade` each frame
    pub opacity: f64,
    /// Per-frame opacity decrement, drawn once at creation
    pub fade: f64,
}

/// An explosion that happened during a [`FireworksEngine::step`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct Burst {
    pub x: f64,
    pub y: f64,
    pub color: Rgba<u8>,
    /// Sparks spawned for this burst
    pub sparks: u32,
}

/// Everything a driver needs to react to after one frame step.
#[derive(Debug, Clone, Default)]
pub struct StepEvents {
    pub bursts: Vec<Burst>,
}

/// The animation engine. One instance owns one overlay's entities.
pub struct FireworksEngine {
    config: EffectConfig,
    palette: Vec<Rgba<u8>>,
    width: f64,
    height: f64,
    pointer: (f64, f64),
    launches: Vec<Launch>,
    sparks: Vec<Spark>,
    seed: u64,
    rng: Rng,
}

impl FireworksEngine {
    /// Create an engine for a viewport of the given size.
    ///
    /// # Errors
    ///
    /// Returns `ColorError` if a configured palette entry fails to
    /// parse.
    pub fn new(config: EffectConfig, width: f64, height: f64) -> Result<Self, ColorError> {
        let palette = parse_palette(&config.palette)?;
        let seed = config.seed.unwrap_or_else(entropy_seed);
        Ok(Self {
            config,
            palette,
            width,
            height,
            pointer: (0.0, 0.0),
            launches: Vec::new(),
            sparks: Vec::new(),
            seed,
            rng: Rng::new(seed),
        })
    }

    /// The seed this engine's random stream started from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Live launches, oldest first.
    pub fn launches(&self) -> &[Launch] {
        &self.launches
    }

    /// Live sparks, oldest first.
    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    /// Track a viewport change. The launch origin follows the new
    /// bottom center; entities already in flight are left alone.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Remember the pointer position as the fallback trigger target.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.pointer = (x, y);
    }

    /// Spawn one launch toward `(x, y)` from the bottom center of the
    /// viewport. Every call is independent; rapid triggering simply
    /// stacks launches.
    pub fn trigger_at(&mut self, x: f64, y: f64) {
        let origin_x = self.width / 2.0;
        let origin_y = self.height;
        let color = self.palette[self.rng.index(self.palette.len())];
        self.launches.push(Launch {
            x: origin_x,
            y: origin_y,
            target_x: x,
            target_y: y,
            angle: (y - origin_y).atan2(x - origin_x),
            speed: self.config.launch.speed,
            radius: self.config.launch.radius,
            color,
            exploded: false,
        });
    }

    /// Spawn one launch toward the last known pointer position, for
    /// trigger events that carry no coordinates of their own.
    pub fn trigger_at_pointer(&mut self) {
        let (x, y) = self.pointer;
        self.trigger_at(x, y);
    }

    /// Advance the animation one frame.
    ///
    /// Launches advance along their fixed heading; any launch whose
    /// remaining distance to target drops below the proximity threshold
    /// explodes, leaves the live set, and spawns its burst at the
    /// target. Sparks then integrate motion (friction on speed, gravity
    /// on the vertical axis), fade, and are dropped the frame their
    /// opacity reaches zero.
    pub fn step(&mut self) -> StepEvents {
        let mut events = StepEvents::default();

        let proximity = self.config.launch.proximity;
        let mut exploded: Vec<(f64, f64, Rgba<u8>)> = Vec::new();
        self.launches.retain_mut(|launch| {
            launch.x += launch.angle.cos() * launch.speed;
            launch.y += launch.angle.sin() * launch.speed;
            let dx = launch.target_x - launch.x;
            let dy = launch.target_y - launch.y;
            if (dx * dx + dy * dy).sqrt() < proximity {
                launch.exploded = true;
                exploded.push((launch.target_x, launch.target_y, launch.color));
                false
            } else {
                true
            }
        });

        for (x, y, color) in exploded {
            let sparks = self.spawn_burst(x, y, color);
            events.bursts.push(Burst { x, y, color, sparks });
        }

        let friction = self.config.burst.friction;
        let gravity = self.config.burst.gravity;
        self.sparks.retain_mut(|spark| {
            spark.x += spark.angle.cos() * spark.speed;
            spark.y += spark.angle.sin() * spark.speed + gravity;
            spark.speed *= friction;
            spark.opacity -= spark.fade;
            spark.opacity > 0.0
        });

        events
    }

    /// Spawn one burst's ring of sparks at the explosion point.
    fn spawn_burst(&mut self, x: f64, y: f64, color: Rgba<u8>) -> u32 {
        let burst = self.config.burst.clone();
        let count = burst.count;
        for i in 0..count {
            self.sparks.push(Spark {
                x,
                y,
                color,
                radius: self.rng.range(burst.radius[0], burst.radius[1]),
                speed: self.rng.range(burst.speed[0], burst.speed[1]),
                angle: TAU * i as f64 / count as f64,
                opacity: 1.0,
                fade: self.rng.range(burst.fade[0], burst.fade[1]),
            });
        }
        // Overflow policy: drop the oldest sparks first
        if self.sparks.len() > self.config.max_sparks {
            let overflow = self.sparks.len() - self.config.max_sparks;
            self.sparks.drain(..overflow);
        }
        count
    }
}

/// Seed source for unseeded interactive runs.
fn entropy_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED)
}
