// Host-side tests for the backend-neutral frame description.

use blob_core::constants::*;
use blob_core::{closed_path, AnalysisParams, BlobInstance, BlobParams, GestureAction};
use instant::Instant;

fn mounted() -> BlobInstance {
    let mut inst = BlobInstance::new(
        "scene",
        AnalysisParams::default(),
        BlobParams {
            seed: 7,
            ..BlobParams::default()
        },
    );
    inst.resize(600.0, 400.0);
    inst
}

fn activate(inst: &mut BlobInstance) {
    let GestureAction::Start(id) = inst.gesture() else {
        panic!("expected a new attempt");
    };
    inst.resolve_activation(id, Ok(44_100.0), Instant::now());
    assert!(inst.is_active());
}

#[test]
fn idle_frame_has_layers_glow_and_mic() {
    let mut inst = mounted();
    let scene = inst.render_frame(1.0);
    assert_eq!((scene.width, scene.height), (600.0, 400.0));
    assert_eq!(scene.center().x, 300.0);
    assert!((MIN_LAYERS..=MAX_LAYERS).contains(&scene.layers.len()));
    assert_eq!(scene.glow.points.len(), VERTEX_COUNT);
    for layer in &scene.layers {
        assert_eq!(layer.points.len(), VERTEX_COUNT);
        assert!((0.0..=1.0).contains(&layer.color.a));
    }
    assert!(scene.internal.is_empty());
    assert!(scene.pause_ripple.is_none());
}

#[test]
fn outer_layer_is_largest() {
    let mut inst = mounted();
    let scene = inst.render_frame(1.0);
    let extent = |pts: &[glam::Vec2]| pts.iter().map(|p| p.length()).fold(0.0, f32::max);
    let outer = extent(&scene.layers[0].points);
    for layer in scene.layers.iter().skip(1) {
        assert!(extent(&layer.points) <= outer + 1e-3);
    }
}

#[test]
fn mic_ring_stays_between_its_fractions() {
    let mut inst = mounted();
    let base = 400.0 / BASE_RADIUS_DIVISOR;
    let quiet = inst.render_frame(1.0);
    assert!((quiet.mic.ring.radius - base * MIC_RING_MIN_FRACTION).abs() < 1e-3);

    activate(&mut inst);
    for _ in 0..60 {
        inst.extraction_tick_bins(Some(&[255u8; 256][..]));
        let scene = inst.render_frame(1.0);
        let r = scene.mic.ring.radius;
        assert!(r >= base * MIC_RING_MIN_FRACTION - 1e-3);
        assert!(r <= base * MIC_RING_MAX_FRACTION + 1e-3);
        assert!(scene.mic.size >= base * MIC_SIZE_FRACTION - 1e-3);
    }
}

#[test]
fn sound_after_a_pause_draws_a_ripple() {
    let mut inst = mounted();
    activate(&mut inst);
    for _ in 0..(PAUSE_MIN_FRAMES + 5) {
        let scene = inst.render_frame(1.0);
        assert!(scene.pause_ripple.is_none());
    }
    inst.extraction_tick_bins(Some(&[255u8; 256][..]));
    assert!(inst.features().overall_level >= SILENCE_THRESHOLD);
    let scene = inst.render_frame(1.0);
    let ripple = scene.pause_ripple.expect("ripple after pause");
    assert!(ripple.radius > 0.0);
    assert!(ripple.color.a > 0.0);
}

#[test]
fn glow_outline_is_a_seamless_curve() {
    let mut inst = mounted();
    let scene = inst.render_frame(1.0);
    let path = closed_path(&scene.glow.points);
    assert_eq!(path.segments.len(), scene.glow.points.len());
    assert_eq!(path.segments.last().map(|s| s.to), Some(path.start));
}
