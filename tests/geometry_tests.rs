// Host-side tests for the blob geometry engine.

use blob_core::constants::*;
use blob_core::easing::ease_hue;
use blob_core::{BlobEngine, BlobParams, FeatureVector, SpeechCues};

fn engine(w: f32, h: f32) -> BlobEngine {
    let mut e = BlobEngine::new(BlobParams {
        seed: 42,
        ..BlobParams::default()
    });
    e.resize(w, h);
    e
}

fn loud() -> FeatureVector {
    FeatureVector {
        overall_level: 0.8,
        mid_level: 0.6,
        treble_level: 0.5,
        frequency_spread: 0.6,
        pitch_proxy: 0.7,
    }
}

#[test]
fn base_radius_is_a_fifth_of_the_short_side() {
    let e = engine(800.0, 600.0);
    assert_eq!(e.base_radius(), 120.0);
    let e = engine(300.0, 900.0);
    assert_eq!(e.base_radius(), 60.0);
}

#[test]
fn silence_only_breathes() {
    let mut e = engine(800.0, 600.0);
    let quiet = FeatureVector::default();
    let cues = SpeechCues::default();
    let base = e.base_radius();
    for _ in 0..600 {
        e.update(1.0, &quiet, &cues, true);
        let core = e.current_base_radius();
        assert!((core - base).abs() <= base * BREATHING_AMPLITUDE + 1e-3);
        let deformation = e.state().shape.passive_deformation;
        for r in e.vertices(&quiet).radii() {
            assert!((r - core).abs() <= core * deformation + 1e-3);
        }
    }
    assert_eq!(e.state().pause_ripple, 0.0);
}

#[test]
fn resize_rescales_every_vertex() {
    let mut e = engine(800.0, 600.0);
    let f = loud();
    let cues = SpeechCues::default();
    for _ in 0..120 {
        e.update(1.0, &f, &cues, true);
    }
    let big: Vec<f32> = e.vertices(&f).radii().collect();
    let big_base = e.base_radius();

    e.resize(400.0, 300.0);
    assert_eq!(e.base_radius(), big_base / 2.0);
    let small: Vec<f32> = e.vertices(&f).radii().collect();
    assert_eq!(big.len(), small.len());
    for (b, s) in big.iter().zip(&small) {
        assert!((b / 2.0 - s).abs() < 1e-3, "{} vs {}", b, s);
        assert!(*s >= e.base_radius() * MIN_RADIUS_FRACTION - 1e-4);
    }
}

#[test]
fn radii_respect_bounds_under_extreme_input() {
    let mut e = engine(500.0, 500.0);
    let f = FeatureVector {
        overall_level: 1.0,
        mid_level: 1.0,
        treble_level: 1.0,
        frequency_spread: 1.0,
        pitch_proxy: 1.0,
    };
    let cues = SpeechCues::default();
    for _ in 0..400 {
        e.update(2.0, &f, &cues, true);
        let (min, max) = e.radius_bounds(f.overall_level);
        for r in e.vertices(&f).radii() {
            assert!(r >= min - 1e-3 && r <= max + 1e-3);
        }
    }
}

#[test]
fn loud_input_extends_peaks_only_while_active() {
    let f = loud();
    let cues = SpeechCues::default();
    let mut active = engine(800.0, 600.0);
    let mut idle = active.clone();
    for _ in 0..300 {
        active.update(1.0, &f, &cues, true);
        idle.update(1.0, &f, &cues, false);
    }
    assert!(active.state().shape.peak_multiplier > 1.05);
    assert!((idle.state().shape.peak_multiplier - 1.0).abs() < 1e-6);
    assert!(active.state().active_intensity > 0.99);
    assert!(idle.state().active_intensity < 0.01);
}

#[test]
fn hue_takes_the_short_way_round() {
    assert!((ease_hue(350.0, 10.0, 0.5) - 0.0).abs() < 1e-4);
    assert!((ease_hue(10.0, 350.0, 0.5) - 0.0).abs() < 1e-4);
    let h = ease_hue(20.0, 340.0, 0.25);
    assert!((h - 10.0).abs() < 1e-4);
}

#[test]
fn speaking_shifts_hue_from_base() {
    let mut e = engine(800.0, 600.0);
    let cues = SpeechCues::default();
    for _ in 0..1_000 {
        e.update(1.0, &loud(), &cues, true);
    }
    // pitch 0.7 → +6°, spread 0.6 → +6°
    assert!((e.state().hue - (BASE_HUE + 12.0)).abs() < 0.5);
}

#[test]
fn pause_then_sound_triggers_ripple_and_inhale() {
    let mut e = engine(800.0, 600.0);
    let cues = SpeechCues::default();
    for _ in 0..(PAUSE_MIN_FRAMES + 5) {
        e.update(1.0, &FeatureVector::default(), &cues, true);
    }
    e.update(1.0, &loud(), &cues, true);
    assert!(e.state().pause_ripple > 0.9);
    assert!(e.state().inhale < -0.8);
    for _ in 0..200 {
        e.update(1.0, &loud(), &cues, true);
    }
    assert!(e.state().pause_ripple < 0.01);
    assert_eq!(e.state().inhale, 0.0);
}

#[test]
fn short_pause_does_not_ripple() {
    let mut e = engine(800.0, 600.0);
    let cues = SpeechCues::default();
    for _ in 0..(PAUSE_MIN_FRAMES - 5) {
        e.update(1.0, &FeatureVector::default(), &cues, true);
    }
    e.update(1.0, &loud(), &cues, true);
    assert_eq!(e.state().pause_ripple, 0.0);
}

#[test]
fn emphasis_onset_flashes_brightness() {
    let mut e = engine(800.0, 600.0);
    let mut cues = SpeechCues::default();
    e.update(1.0, &loud(), &cues, true);
    assert_eq!(e.state().flash, 0.0);
    cues.emphasis_onsets += 1;
    e.update(1.0, &loud(), &cues, true);
    assert!(e.state().flash > 0.85);
    e.update(1.0, &loud(), &cues, true);
    assert!(e.state().flash < 0.85);
}
