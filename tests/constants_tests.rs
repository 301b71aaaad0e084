// Host-side tests for constants and their relationships.
// The main crate is wasm-only, so the pure web constants are included directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use blob_core::constants as core_constants;
use constants::*;

#[test]
fn frame_dt_counts_reference_frames() {
    assert!((frame_dt(1.0 / 60.0) - 1.0).abs() < 1e-4);
    assert!((frame_dt(1.0 / 30.0) - 2.0).abs() < 1e-4);
    assert_eq!(frame_dt(10.0), MAX_FRAME_DT);
}

#[test]
fn frame_dt_ignores_bad_clocks() {
    assert_eq!(frame_dt(0.0), 0.0);
    assert_eq!(frame_dt(-0.5), 0.0);
    assert_eq!(frame_dt(f32::NAN), 0.0);
    assert_eq!(frame_dt(f32::INFINITY), 0.0);
}

#[test]
fn device_pixel_ratio_is_sane() {
    assert_eq!(effective_dpr(0.0), 1.0);
    assert_eq!(effective_dpr(f64::NAN), 1.0);
    assert_eq!(effective_dpr(2.0), 2.0);
    assert_eq!(effective_dpr(8.0), MAX_DEVICE_PIXEL_RATIO);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn page_constants() {
    assert_eq!(BACKGROUND_CSS, "#f8f8f8");
    assert!(!DEFAULT_KEY.is_empty());
    assert!(FALLBACK_CSS_SIZE > 0.0);
    assert!(NOTICE_STYLE.contains("position:absolute"));
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn analysis_constants_agree() {
    assert_eq!(core_constants::FFT_SIZE, 512);
    assert_eq!(core_constants::BIN_COUNT, 256);
    assert_eq!(core_constants::EXTRACTION_TICK_MS, 50);
    assert!(core_constants::DECAY_SNAP < core_constants::SILENCE_THRESHOLD);
    assert!(core_constants::SILENCE_THRESHOLD < core_constants::AUDIO_PRESENCE_THRESHOLD);
    assert!(core_constants::PITCH_MIN_HZ < core_constants::PITCH_MAX_HZ);
    assert!(core_constants::MIN_LAYERS <= core_constants::MAX_LAYERS);
    assert!(core_constants::MIC_RING_MIN_FRACTION < core_constants::MIC_RING_MAX_FRACTION);
    assert!((core_constants::REFERENCE_FPS * REFERENCE_FRAME_SEC - 1.0).abs() < 1e-6);
}
