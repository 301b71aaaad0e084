// Host-side tests for spectrum analysis, smoothing and speech cues.

use blob_core::constants::*;
use blob_core::features::{analyze, BinLayout};
use blob_core::{CaptureError, FeatureExtractor, FeatureVector, SpectrumSource};
use rand::prelude::*;

fn extractor() -> FeatureExtractor {
    FeatureExtractor::new(44_100.0, 256)
}

fn flat(level: u8) -> Vec<u8> {
    vec![level; 256]
}

fn in_unit(f: &FeatureVector) -> bool {
    [
        f.overall_level,
        f.mid_level,
        f.treble_level,
        f.frequency_spread,
        f.pitch_proxy,
    ]
    .iter()
    .all(|v| (0.0..=1.0).contains(v))
}

#[test]
fn fields_stay_in_unit_range_for_arbitrary_spectra() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut ex = extractor();
    for _ in 0..500 {
        let bins: Vec<u8> = (0..256).map(|_| rng.gen()).collect();
        if rng.gen_bool(0.2) {
            ex.tick(None);
        } else {
            ex.tick(Some(bins.as_slice()));
        }
        assert!(in_unit(ex.features()), "{:?}", ex.features());
    }
}

#[test]
fn clamp_repairs_non_finite_values() {
    let mut f = FeatureVector {
        overall_level: f32::NAN,
        mid_level: 3.0,
        treble_level: -1.0,
        frequency_spread: f32::INFINITY,
        pitch_proxy: 0.25,
    };
    f.clamp();
    assert_eq!(f.overall_level, 0.0);
    assert_eq!(f.mid_level, 1.0);
    assert_eq!(f.treble_level, 0.0);
    assert_eq!(f.frequency_spread, 0.0);
    assert_eq!(f.pitch_proxy, 0.25);
}

#[test]
fn inactive_ticks_follow_the_decay_law() {
    let mut ex = extractor();
    for _ in 0..120 {
        ex.tick(Some(flat(200).as_slice()));
    }
    let mut expected = ex.features().overall_level;
    assert!(expected > 0.9);
    let mut crossed = false;
    for _ in 0..200 {
        ex.tick(None);
        expected *= IDLE_DECAY;
        if expected < DECAY_SNAP {
            expected = 0.0;
            crossed = true;
        }
        assert_eq!(ex.features().overall_level, expected);
    }
    assert!(crossed);
    assert_eq!(ex.features().overall_level, 0.0);
}

#[test]
fn silence_settles_spread_and_pitch() {
    let mut ex = extractor();
    for _ in 0..50 {
        ex.tick(Some(flat(90).as_slice()));
    }
    for _ in 0..600 {
        ex.tick(Some(flat(0).as_slice()));
    }
    let f = ex.features();
    assert!(f.overall_level < 1e-6);
    assert!(f.frequency_spread < 1e-6);
    assert!((f.pitch_proxy - NEUTRAL_PITCH).abs() < 1e-4);
}

#[test]
fn loud_tone_pulls_pitch_to_its_bin_and_raises_level_monotonically() {
    let layout = BinLayout::new(44_100.0, 256);
    assert_eq!((layout.pitch_min, layout.pitch_max), (1, 6));

    let mut bins = flat(120);
    bins[3] = 250;
    let target = analyze(&bins, &layout);
    assert!((target.pitch - 0.4).abs() < 1e-6);

    let mut ex = extractor();
    let mut prev = ex.features().overall_level;
    for _ in 0..300 {
        ex.tick(Some(bins.as_slice()));
        let level = ex.features().overall_level;
        assert!(level >= prev);
        assert!(level <= target.overall + 1e-6);
        prev = level;
    }
    assert!((prev - target.overall).abs() < 1e-3);
    assert!((ex.features().pitch_proxy - 0.4).abs() < 1e-3);
}

#[test]
fn weak_peak_keeps_neutral_pitch() {
    let layout = BinLayout::new(44_100.0, 256);
    let mut bins = flat(0);
    bins[4] = PITCH_PEAK_MIN;
    assert_eq!(analyze(&bins, &layout).pitch, NEUTRAL_PITCH);
    bins[4] = PITCH_PEAK_MIN + 1;
    assert!((analyze(&bins, &layout).pitch - 0.6).abs() < 1e-6);
}

#[test]
fn spread_counts_bins_above_threshold() {
    let layout = BinLayout::new(44_100.0, 256);
    let mut bins = flat(BIN_ACTIVITY_THRESHOLD);
    for b in bins.iter_mut().take(64) {
        *b = BIN_ACTIVITY_THRESHOLD + 1;
    }
    assert!((analyze(&bins, &layout).spread - 0.25).abs() < 1e-6);
}

#[test]
fn band_split_follows_sample_rate() {
    let l = BinLayout::new(48_000.0, 256);
    // 93.75 Hz per bin
    assert_eq!(l.mid_end, 43);
    assert_eq!(l.treble_start, 42);
    assert_eq!(l.pitch_min, 1);
    assert_eq!(l.pitch_max, 6);
}

struct Synthetic {
    bins: Option<Vec<u8>>,
}

impl SpectrumSource for Synthetic {
    fn sample_rate(&self) -> f32 {
        44_100.0
    }

    fn read_frequency_bins(&mut self, out: &mut Vec<u8>) -> Result<(), CaptureError> {
        let bins = self.bins.as_ref().ok_or(CaptureError::TransformUnready)?;
        out.clear();
        out.extend_from_slice(bins);
        Ok(())
    }
}

#[test]
fn unready_source_counts_as_inactive() {
    let mut ex = extractor();
    let mut live = Synthetic {
        bins: Some(flat(160)),
    };
    for _ in 0..40 {
        ex.tick_from(Some(&mut live as &mut dyn SpectrumSource));
    }
    let before = ex.features().overall_level;
    assert!(before > 0.9);
    let mut broken = Synthetic { bins: None };
    ex.tick_from(Some(&mut broken as &mut dyn SpectrumSource));
    assert_eq!(ex.features().overall_level, before * IDLE_DECAY);
}

#[test]
fn sudden_rise_is_an_emphasis_moment() {
    let mut ex = extractor();
    for _ in 0..60 {
        ex.tick(Some(flat(30).as_slice()));
    }
    assert!(!ex.cues().emphasis);
    let mut fired_at = None;
    for i in 0..10 {
        ex.tick(Some(flat(255).as_slice()));
        if ex.cues().emphasis && fired_at.is_none() {
            fired_at = Some(i);
        }
    }
    assert!(fired_at.is_some());
    assert_eq!(ex.cues().emphasis_onsets, 1);
}

#[test]
fn reset_restores_defaults_but_keeps_onset_count() {
    let mut ex = extractor();
    for _ in 0..60 {
        ex.tick(Some(flat(30).as_slice()));
    }
    for _ in 0..10 {
        ex.tick(Some(flat(255).as_slice()));
    }
    let onsets = ex.cues().emphasis_onsets;
    ex.reset();
    assert_eq!(*ex.features(), FeatureVector::default());
    assert_eq!(ex.cues().emphasis_onsets, onsets);
    assert!(!ex.cues().emphasis);
}
