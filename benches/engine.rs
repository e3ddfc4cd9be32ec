//! Criterion benchmarks for Skyburst critical paths
//!
//! Benchmarks the per-frame hot loop under load:
//! - Engine: stepping a sky full of live sparks
//! - Renderer: drawing those sparks onto the surface
//! - Terminal: encoding a frame as ANSI half-blocks
//! - Audio: synthesizing one explosion tone

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use skyburst::audio::{launch_tone, synthesize, SAMPLE_RATE};
use skyburst::engine::FireworksEngine;
use skyburst::models::EffectConfig;
use skyburst::render::render;
use skyburst::surface::Surface;
use skyburst::terminal::frame_to_ansi;

/// An engine with `bursts` explosions already in the air.
fn busy_engine(bursts: u32) -> FireworksEngine {
    let config = EffectConfig { seed: Some(42), max_sparks: 100_000, ..Default::default() };
    let mut engine = FireworksEngine::new(config, 800.0, 600.0).unwrap();
    for i in 0..bursts {
        engine.trigger_at(100.0 + (i as f64 * 37.0) % 600.0, 100.0 + (i as f64 * 53.0) % 400.0);
    }
    // Run every launch to its explosion
    for _ in 0..80 {
        engine.step();
    }
    engine
}

fn bench_engine_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_step");
    for bursts in [1u32, 10, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(bursts), &bursts, |b, &bursts| {
            b.iter_batched(
                || busy_engine(bursts),
                |mut engine| black_box(engine.step()),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let engine = busy_engine(20);
    let mut surface = Surface::new(800, 600);
    c.bench_function("render_20_bursts", |b| {
        b.iter(|| {
            render(black_box(&engine), &mut surface);
        });
    });
}

fn bench_frame_to_ansi(c: &mut Criterion) {
    let engine = busy_engine(20);
    let mut surface = Surface::new(200, 100);
    render(&engine, &mut surface);
    c.bench_function("frame_to_ansi_200x100", |b| {
        b.iter(|| {
            black_box(frame_to_ansi(surface.frame(), (0, 0)));
        });
    });
}

fn bench_synthesize(c: &mut Criterion) {
    let tone = launch_tone();
    c.bench_function("synthesize_launch_tone", |b| {
        b.iter(|| {
            black_box(synthesize(&tone, SAMPLE_RATE));
        });
    });
}

criterion_group!(benches, bench_engine_step, bench_render, bench_frame_to_ansi, bench_synthesize);
criterion_main!(benches);
