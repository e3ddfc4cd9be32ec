//! Per-frame renderer: engine entities onto the surface.
//!
//! Entities draw oldest first, each as a filled body circle plus a
//! larger, dimmer halo of the same color to suggest glow. The engine
//! prunes exploded launches and faded sparks before rendering, so
//! everything handed to this pass is live.

use crate::engine::FireworksEngine;
use crate::surface::Surface;

/// Halo alpha relative to the body for launches.
const LAUNCH_HALO_ALPHA: f64 = 0.5;
/// Halo alpha relative to the spark's own opacity.
const SPARK_HALO_ALPHA: f64 = 0.6;

/// Clear the surface and draw one frame of the animation.
pub fn render(engine: &FireworksEngine, surface: &mut Surface) {
    surface.clear();

    for launch in engine.launches() {
        surface.fill_circle(launch.x, launch.y, launch.radius + 1.0, launch.color, 1.0);
        surface.fill_circle(launch.x, launch.y, launch.radius + 3.0, launch.color, LAUNCH_HALO_ALPHA);
    }

    for spark in engine.sparks() {
        surface.fill_circle(spark.x, spark.y, spark.radius, spark.color, spark.opacity);
        surface.fill_circle(
            spark.x,
            spark.y,
            spark.radius + 2.0,
            spark.color,
            spark.opacity * SPARK_HALO_ALPHA,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BurstConfig, EffectConfig};

    fn engine_with(config: EffectConfig, w: f64, h: f64) -> FireworksEngine {
        FireworksEngine::new(config, w, h).unwrap()
    }

    #[test]
    fn test_idle_engine_renders_empty_frame() {
        let engine = engine_with(EffectConfig { seed: Some(1), ..Default::default() }, 64.0, 64.0);
        let mut surface = Surface::new(64, 64);
        render(&engine, &mut surface);
        assert!(surface.frame().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_launch_draws_body_and_halo() {
        let mut engine =
            engine_with(EffectConfig { seed: Some(1), ..Default::default() }, 64.0, 64.0);
        engine.trigger_at(32.0, 10.0);
        let mut surface = Surface::new(64, 64);
        render(&engine, &mut surface);

        let launch = &engine.launches()[0];
        let (cx, cy) = (launch.x as u32, launch.y.min(63.0) as u32);
        let body = surface.frame().get_pixel(cx, cy);
        assert!(body[3] > 0, "launch body must be drawn");

        // A halo pixel outside the body radius is dimmer than the body
        let halo_y = (launch.y - launch.radius - 2.0).max(0.0) as u32;
        let halo = surface.frame().get_pixel(cx, halo_y);
        assert!(halo[3] > 0, "halo must extend past the body");
        assert!(halo[3] < body[3]);
    }

    #[test]
    fn test_render_clears_previous_frame() {
        let mut engine =
            engine_with(EffectConfig { seed: Some(1), ..Default::default() }, 64.0, 64.0);
        engine.trigger_at(32.0, 10.0);
        let mut surface = Surface::new(64, 64);
        render(&engine, &mut surface);
        let drawn: u32 = surface.frame().pixels().map(|p| p[3] as u32).sum();
        assert!(drawn > 0);

        // Steps later the launch has moved; stale pixels must not linger
        engine.step();
        engine.step();
        render(&engine, &mut surface);
        let launch = &engine.launches()[0];
        let old_body = surface.frame().get_pixel(32, 63);
        assert_eq!(old_body[3], 0, "origin pixel should be cleared once the launch left");
        assert!(launch.y < 63.0);
    }

    #[test]
    fn test_spark_alpha_follows_opacity() {
        let config = EffectConfig {
            seed: Some(1),
            burst: BurstConfig {
                count: 1,
                speed: [0.0, 0.0],
                gravity: 0.0,
                radius: [2.0, 2.0],
                fade: [0.2, 0.2],
                ..Default::default()
            },
            ..Default::default()
        };
        let mut engine = engine_with(config, 64.0, 64.0);
        engine.trigger_at(32.0, 20.0);
        // Run to the explosion
        while engine.sparks().is_empty() {
            engine.step();
        }

        let mut surface = Surface::new(64, 64);
        render(&engine, &mut surface);
        let spark = &engine.sparks()[0];
        let first = surface.frame().get_pixel(spark.x as u32, spark.y as u32)[3];

        engine.step();
        render(&engine, &mut surface);
        let spark = &engine.sparks()[0];
        let second = surface.frame().get_pixel(spark.x as u32, spark.y as u32)[3];
        assert!(second < first, "fading sparks draw dimmer: {} vs {}", second, first);
    }
}
