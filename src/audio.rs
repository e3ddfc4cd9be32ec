//! Audio cues: tone planning and deterministic synthesis.
//!
//! Randomness lives entirely in the planning step: a launch or an
//! explosion is turned into plain [`ToneSpec`] records, and
//! [`synthesize`] is a pure function of one record and a sample rate.
//! Playback is behind [`AudioSink`]; when no sink is available the
//! effect simply runs silent.

use serde::{Deserialize, Serialize};

use crate::rng::Rng;

/// Default synthesis rate in Hz.
pub const SAMPLE_RATE: u32 = 44_100;

/// Tones per explosion cluster.
pub const EXPLOSION_TONE_COUNT: usize = 8;

/// Gain floor the decay envelope ramps down to.
const GAIN_FLOOR: f64 = 0.01;

/// Oscillator shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

const WAVEFORMS: [Waveform; 4] =
    [Waveform::Sine, Waveform::Square, Waveform::Sawtooth, Waveform::Triangle];

/// Configuration record for one scheduled tone.
///
/// The frequency ramps exponentially from `start_hz` to `end_hz` over
/// the tone's duration; the gain envelope rises linearly to `peak_gain`
/// over `attack_ms`, then decays exponentially to the floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneSpec {
    pub waveform: Waveform,
    pub start_hz: f64,
    pub end_hz: f64,
    /// Start offset relative to the triggering event.
    pub delay_ms: u32,
    pub attack_ms: u32,
    pub duration_ms: u32,
    pub peak_gain: f64,
}

/// The short ascending tone played when a launch lifts off.
pub fn launch_tone() -> ToneSpec {
    ToneSpec {
        waveform: Waveform::Sine,
        start_hz: 50.0,
        end_hz: 500.0,
        delay_ms: 0,
        attack_ms: 0,
        duration_ms: 300,
        peak_gain: 0.1,
    }
}

/// Plan the randomized tone cluster for one explosion: eight tones of
/// random timbre and frequency, each starting within a 100ms window
/// and decaying over half a second.
pub fn explosion_tones(rng: &mut Rng) -> Vec<ToneSpec> {
    (0..EXPLOSION_TONE_COUNT)
        .map(|_| {
            let start_hz = rng.range(200.0, 1000.0);
            ToneSpec {
                waveform: WAVEFORMS[rng.index(WAVEFORMS.len())],
                start_hz,
                end_hz: start_hz * 0.5,
                delay_ms: rng.range(0.0, 100.0) as u32,
                attack_ms: 10,
                duration_ms: 500,
                peak_gain: 0.2,
            }
        })
        .collect()
}

/// Render a tone to mono f32 samples. Deterministic: the same spec and
/// sample rate always produce identical output. The start offset is
/// rendered as leading silence.
pub fn synthesize(spec: &ToneSpec, sample_rate: u32) -> Vec<f32> {
    let delay_samples = (spec.delay_ms as u64 * sample_rate as u64 / 1000) as usize;
    let tone_samples = (spec.duration_ms as u64 * sample_rate as u64 / 1000) as usize;
    let mut out = vec![0.0f32; delay_samples + tone_samples];

    let duration = spec.duration_ms as f64 / 1000.0;
    let attack = spec.attack_ms as f64 / 1000.0;
    let dt = 1.0 / sample_rate as f64;
    let ratio = if spec.start_hz > 0.0 { spec.end_hz / spec.start_hz } else { 1.0 };

    let mut phase = 0.0f64;
    for (n, sample) in out[delay_samples..].iter_mut().enumerate() {
        let t = n as f64 * dt;
        let freq = spec.start_hz * ratio.powf(t / duration);
        phase += freq * dt;
        *sample = (wave_sample(spec.waveform, phase) * envelope(t, attack, duration, spec.peak_gain))
            as f32;
    }
    out
}

/// One oscillator sample for an accumulated phase in cycles.
fn wave_sample(waveform: Waveform, phase: f64) -> f64 {
    let frac = phase.fract();
    match waveform {
        Waveform::Sine => (std::f64::consts::TAU * frac).sin(),
        Waveform::Square => {
            if frac < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Sawtooth => 2.0 * frac - 1.0,
        Waveform::Triangle => 1.0 - 4.0 * (frac - 0.5).abs(),
    }
}

/// Gain at time `t`: linear attack to the peak, then exponential decay
/// toward the floor.
fn envelope(t: f64, attack: f64, duration: f64, peak: f64) -> f64 {
    if peak <= GAIN_FLOOR {
        return peak;
    }
    if t < attack && attack > 0.0 {
        return peak * t / attack;
    }
    let span = (duration - attack).max(f64::EPSILON);
    peak * (GAIN_FLOOR / peak).powf((t - attack) / span)
}

/// Best-effort tone playback.
pub trait AudioSink {
    fn play(&mut self, tones: &[ToneSpec]);
}

/// Sink for hosts without audio synthesis; tones vanish.
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _tones: &[ToneSpec]) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_tone_constants() {
        let tone = launch_tone();
        assert_eq!(tone.waveform, Waveform::Sine);
        assert_eq!(tone.start_hz, 50.0);
        assert_eq!(tone.end_hz, 500.0);
        assert_eq!(tone.delay_ms, 0);
        assert_eq!(tone.duration_ms, 300);
        assert_eq!(tone.peak_gain, 0.1);
    }

    #[test]
    fn test_explosion_cluster_stays_in_documented_ranges() {
        let mut rng = Rng::new(31);
        for _ in 0..50 {
            let tones = explosion_tones(&mut rng);
            assert_eq!(tones.len(), EXPLOSION_TONE_COUNT);
            for tone in tones {
                assert!((200.0..1000.0).contains(&tone.start_hz));
                assert!((tone.end_hz - tone.start_hz * 0.5).abs() < 1e-9);
                assert!(tone.delay_ms < 100);
                assert_eq!(tone.duration_ms, 500);
                assert_eq!(tone.peak_gain, 0.2);
            }
        }
    }

    #[test]
    fn test_explosion_cluster_varies_timbre() {
        let mut rng = Rng::new(5);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..20 {
            for tone in explosion_tones(&mut rng) {
                seen.insert(format!("{:?}", tone.waveform));
            }
        }
        assert_eq!(seen.len(), 4, "all four waveforms should appear over enough draws");
    }

    #[test]
    fn test_synthesize_is_deterministic() {
        let tone = launch_tone();
        assert_eq!(synthesize(&tone, SAMPLE_RATE), synthesize(&tone, SAMPLE_RATE));
    }

    #[test]
    fn test_synthesize_length_covers_delay_and_duration() {
        let tone = ToneSpec { delay_ms: 100, duration_ms: 500, ..launch_tone() };
        let samples = synthesize(&tone, 1000);
        assert_eq!(samples.len(), 600);
        // The delay window is pure silence
        assert!(samples[..100].iter().all(|s| *s == 0.0));
        assert!(samples[100..].iter().any(|s| *s != 0.0));
    }

    #[test]
    fn test_synthesize_bounded_by_peak_gain() {
        let tone = launch_tone();
        let samples = synthesize(&tone, SAMPLE_RATE);
        assert!(samples.iter().all(|s| s.abs() <= tone.peak_gain as f32 + 1e-6));
    }

    #[test]
    fn test_envelope_decays_over_tone() {
        let tone = ToneSpec { waveform: Waveform::Square, ..launch_tone() };
        let samples = synthesize(&tone, SAMPLE_RATE);
        let quarter = samples.len() / 4;
        let rms = |s: &[f32]| {
            (s.iter().map(|v| (*v as f64).powi(2)).sum::<f64>() / s.len() as f64).sqrt()
        };
        let early = rms(&samples[..quarter]);
        let late = rms(&samples[samples.len() - quarter..]);
        assert!(late < early, "decay envelope: early rms {} vs late {}", early, late);
    }

    #[test]
    fn test_envelope_attack_ramps_up() {
        assert_eq!(envelope(0.0, 0.01, 0.5, 0.2), 0.0);
        assert!((envelope(0.005, 0.01, 0.5, 0.2) - 0.1).abs() < 1e-12);
        assert!((envelope(0.01, 0.01, 0.5, 0.2) - 0.2).abs() < 1e-12);
        // End of the tone sits at the floor
        assert!((envelope(0.5, 0.01, 0.5, 0.2) - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_wave_sample_shapes() {
        assert!((wave_sample(Waveform::Sine, 0.25) - 1.0).abs() < 1e-12);
        assert_eq!(wave_sample(Waveform::Square, 0.1), 1.0);
        assert_eq!(wave_sample(Waveform::Square, 0.9), -1.0);
        assert!((wave_sample(Waveform::Sawtooth, 0.75) - 0.5).abs() < 1e-12);
        assert!((wave_sample(Waveform::Triangle, 0.5) - 1.0).abs() < 1e-12);
        assert!((wave_sample(Waveform::Triangle, 0.0) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tone_spec_serializes() {
        let tone = launch_tone();
        let json = serde_json::to_string(&tone).unwrap();
        assert!(json.contains("\"sine\""));
        let parsed: ToneSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(tone, parsed);
    }
}
