//! Backend-neutral description of one rendered frame.
//!
//! Everything is in CSS pixels relative to the blob center; the web renderer
//! only strokes and fills what is listed here, back to front.

use crate::blob::{BlobEngine, VertexRing};
use crate::color::Rgba;
use crate::constants::*;
use crate::easing::{lerp, remap};
use crate::features::FeatureVector;
use glam::Vec2;
use smallvec::SmallVec;
use std::f32::consts::TAU;

/// Unfilled closed curve.
#[derive(Clone, Debug, PartialEq)]
pub struct Outline {
    pub points: Vec<Vec2>,
    pub color: Rgba,
    pub line_width: f32,
}

/// Filled closed curve.
#[derive(Clone, Debug, PartialEq)]
pub struct FillLayer {
    pub points: Vec<Vec2>,
    pub color: Rgba,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub radius: f32,
    pub color: Rgba,
    pub line_width: f32,
}

/// Microphone glyph metrics. `size` is the scaled head height unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MicGlyph {
    pub size: f32,
    pub ring: Circle,
    pub body: Rgba,
    /// Grille dots.
    pub accent: Rgba,
}

impl MicGlyph {
    /// Head rectangle `(center_y, width, height, corner_radius)`.
    pub fn head(&self) -> (f32, f32, f32, f32) {
        let s = self.size;
        (-s * 0.3, s * 0.55, s * 0.8, (s * 0.2).max(0.001))
    }

    /// Stand rectangle `(center_y, width, height)`.
    pub fn stand(&self) -> (f32, f32, f32) {
        let s = self.size;
        (s * 0.5, (s * 0.12).max(0.001), s.max(0.001))
    }

    /// Base ellipse `(center_y, radius_x, radius_y)`.
    pub fn base(&self) -> (f32, f32, f32) {
        let s = self.size;
        (s, (s * 0.35).max(0.0005), (s * 0.09).max(0.0005))
    }

    /// Grille dot centers and their shared radius.
    pub fn grille(&self) -> ([Vec2; 6], f32) {
        let s = self.size;
        let dots = [
            Vec2::new(-s * 0.15, -s * 0.4),
            Vec2::new(0.0, -s * 0.4),
            Vec2::new(s * 0.15, -s * 0.4),
            Vec2::new(-s * 0.15, -s * 0.2),
            Vec2::new(0.0, -s * 0.2),
            Vec2::new(s * 0.15, -s * 0.2),
        ];
        (dots, (s * 0.06).max(0.0005))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub internal: Vec<Outline>,
    pub layers: SmallVec<[FillLayer; MAX_LAYERS]>,
    pub glow: Outline,
    pub pause_ripple: Option<Circle>,
    pub mic: MicGlyph,
}

impl Scene {
    pub fn center(&self) -> Vec2 {
        Vec2::new((self.width / 2.0).floor(), (self.height / 2.0).floor())
    }
}

/// Number of fill layers and their alpha/radius steps for a level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerPlan {
    pub count: usize,
    /// Alpha decrement per layer, in percent.
    pub alpha_step: f32,
    pub radius_step: f32,
    pub volume_reactivity: f32,
}

pub fn layer_plan(overall_level: f32, edge_sharpness: f32) -> LayerPlan {
    let reactivity = remap(overall_level, 0.1, 0.8, 0.0, 1.0);
    let sharpness = lerp(edge_sharpness, 1.0, reactivity * 0.8);
    let pulse = remap(overall_level, 0.0, 0.8, 0.0, LAYER_BOOST);
    let count = lerp(BASE_LAYERS, BASE_LAYERS + pulse, sharpness).floor() as usize;
    LayerPlan {
        count: count.clamp(MIN_LAYERS, MAX_LAYERS),
        alpha_step: lerp(
            BASE_ALPHA_STEP,
            BASE_ALPHA_STEP + ALPHA_STEP_BOOST * (1.0 + reactivity),
            sharpness,
        ),
        radius_step: lerp(0.04, 0.01 * (1.0 + reactivity), sharpness),
        volume_reactivity: reactivity,
    }
}

fn internal_rings(engine: &BlobEngine) -> Vec<Outline> {
    let s = engine.state();
    let alpha = s.shape.internal_alpha;
    if alpha <= INTERNAL_ALPHA_MIN_VISIBLE {
        return Vec::new();
    }
    let base = engine.base_radius();
    let n = engine.params().vertex_count.max(3);
    let t = s.phases.internal;
    let max_offset = base * 0.15;
    let color = s.palette.texture(alpha);
    let noise = engine.noise();

    (0..INTERNAL_RING_COUNT)
        .map(|step| {
            let ratio = lerp(0.2, 0.8, step as f32 / INTERNAL_RING_COUNT as f32);
            let points = (0..n)
                .map(|i| {
                    let angle = TAU * i as f32 / n as f32;
                    let (sin_a, cos_a) = angle.sin_cos();
                    let a = noise.sample(
                        cos_a * INTERNAL_POS_SCALE + 10.0,
                        sin_a * INTERNAL_POS_SCALE + 20.0,
                        t + step as f64 * 0.1,
                    );
                    let b = noise.sample(
                        cos_a * INTERNAL_COMPLEXITY_SCALE + 30.0,
                        sin_a * INTERNAL_COMPLEXITY_SCALE + 40.0,
                        t * 0.5 + step as f64 * 0.05,
                    );
                    let offset = remap(a + b, 0.0, 2.0, -max_offset, max_offset);
                    let r = (base * ratio + offset).max(base * 0.1);
                    Vec2::new(cos_a, sin_a) * r
                })
                .collect();
            Outline {
                points,
                color,
                line_width: 0.75,
            }
        })
        .collect()
}

fn fill_layers(
    engine: &BlobEngine,
    ring: &VertexRing,
    plan: &LayerPlan,
) -> SmallVec<[FillLayer; MAX_LAYERS]> {
    let palette = &engine.state().palette;
    let last = (plan.count - 1).max(1) as f32;
    (0..plan.count)
        .map(|layer| {
            let scale = 1.0 - layer as f32 * plan.radius_step;
            let alpha = (EDGE_ALPHA - layer as f32 * plan.alpha_step).max(0.0) / 100.0;
            let mut mix = layer as f32 / last;
            if layer < 2 {
                mix = lerp(mix, 1.0, plan.volume_reactivity * 0.7);
            }
            FillLayer {
                points: ring.scaled(scale),
                color: palette.center.lerp(palette.edge, mix).with_alpha(alpha),
            }
        })
        .collect()
}

/// Assemble the frame for the engine's current state.
pub fn build_scene(engine: &BlobEngine, features: &FeatureVector) -> Scene {
    let (width, height) = engine.size();
    let state = engine.state();
    let base = engine.base_radius();
    let level = features.overall_level.clamp(0.0, 1.0);
    let ring = engine.vertices(features);
    let plan = layer_plan(level, state.shape.edge_sharpness);

    let glow_alpha = 5.0 + remap(level, 0.1, 0.7, 0.0, 15.0);
    let glow = Outline {
        points: ring.scaled(1.01 + level * 0.03),
        color: state.palette.glow(glow_alpha),
        line_width: 1.2 + remap(level, 0.1, 0.7, 0.0, 1.0),
    };

    let pause_ripple = (state.pause_ripple > 0.01).then(|| {
        let intensity = state.pause_ripple;
        Circle {
            radius: base
                * (1.0 + state.shape.passive_deformation + BREATHING_AMPLITUDE)
                * 1.1
                * (1.0 - intensity),
            color: state.palette.center.with_alpha(intensity * 0.5),
            line_width: lerp(0.5, 3.0, intensity),
        }
    });

    let peak = state.shape.peak_multiplier.max(0.0);
    let scale = (1.0 + level * peak * MIC_LEVEL_GAIN).max(0.1);
    let ring_min = (base * MIC_RING_MIN_FRACTION).max(0.1);
    let ring_max = (base * MIC_RING_MAX_FRACTION).max(ring_min + 0.1);
    let mic = MicGlyph {
        size: (base * MIC_SIZE_FRACTION).max(0.1) * scale,
        ring: Circle {
            radius: lerp(ring_min, ring_max, level),
            color: Rgba::WHITE,
            line_width: 2.0,
        },
        body: Rgba::WHITE,
        accent: state.palette.edge.with_alpha(1.0),
    };

    Scene {
        width,
        height,
        internal: internal_rings(engine),
        layers: fill_layers(engine, &ring, &plan),
        glow,
        pause_ripple,
        mic,
    }
}
