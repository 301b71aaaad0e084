//! Blob animation state and per-frame geometry.
//!
//! [`BlobEngine::update`] advances phases and eases every shape parameter
//! toward targets derived from the current features; [`BlobEngine::vertices`]
//! then turns that state into a closed polygon. The engine never writes the
//! feature vector.

use crate::color::Palette;
use crate::constants::*;
use crate::cues::SpeechCues;
use crate::easing::{ease, ease_hue, frame_factor, lerp, remap};
use crate::features::FeatureVector;
use crate::noise::NoiseField;
use crate::params::BlobParams;
use glam::Vec2;
use rand::prelude::*;
use std::f32::consts::TAU;

// Longest step accepted from a single frame (e.g. after a background tab).
const MAX_FRAME_STEP: f32 = 10.0;

/// Noise phase accumulators, one per channel.
#[derive(Clone, Debug, PartialEq)]
pub struct Phases {
    pub passive: f64,
    pub shape: f64,
    pub texture: f64,
    pub waviness: f64,
    pub internal: f64,
    /// Angular offset of the active channels, in `[0, TAU)`.
    pub angular: f32,
    pub breathing: f32,
    /// Seconds of animation time, drives the sinusoidal wave terms.
    pub wave_time: f64,
}

/// Smoothed shape parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeParams {
    pub passive_deformation: f32,
    pub shape_scale: f32,
    pub texture_intensity: f32,
    pub waviness_scale: f32,
    pub waviness_influence: f32,
    pub peak_multiplier: f32,
    pub edge_sharpness: f32,
    /// Internal texture alpha, in percent.
    pub internal_alpha: f32,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            passive_deformation: PASSIVE_DEFORMATION_BASE,
            shape_scale: SHAPE_SCALE_BASE,
            texture_intensity: TEXTURE_INTENSITY_INITIAL,
            waviness_scale: WAVINESS_SCALE_BASE,
            waviness_influence: 0.0,
            peak_multiplier: 1.0,
            edge_sharpness: 1.0,
            internal_alpha: 0.0,
        }
    }
}

/// Inferred speaking style, each in `[0, 1]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpeechMode {
    pub focus: f32,
    pub melody: f32,
    pub emphasis: f32,
}

#[derive(Clone, Debug)]
pub struct BlobState {
    pub phases: Phases,
    pub shape: ShapeParams,
    pub mode: SpeechMode,
    pub hue: f32,
    pub saturation_boost: f32,
    pub brightness_boost: f32,
    pub flash: f32,
    pub breathing_weight: f32,
    /// Eases toward 1 while a capture session runs.
    pub active_intensity: f32,
    pub pause_ripple: f32,
    /// Negative while contracting after a pause.
    pub inhale: f32,
    pub palette: Palette,
    session_active: bool,
    silence_frames: f32,
    seen_onsets: u32,
}

impl BlobState {
    fn new(params: &BlobParams, rng: &mut StdRng) -> Self {
        Self {
            phases: Phases {
                passive: rng.gen_range(0.0..1000.0),
                shape: rng.gen_range(0.0..2000.0),
                texture: rng.gen_range(0.0..3000.0),
                waviness: rng.gen_range(0.0..4000.0),
                internal: rng.gen_range(0.0..6000.0),
                angular: rng.gen_range(0.0..TAU),
                breathing: rng.gen_range(0.0..TAU),
                wave_time: 0.0,
            },
            shape: ShapeParams::default(),
            mode: SpeechMode::default(),
            hue: params.base_hue,
            saturation_boost: 0.0,
            brightness_boost: 0.0,
            flash: 0.0,
            breathing_weight: 1.0,
            active_intensity: 0.0,
            pause_ripple: 0.0,
            inhale: 0.0,
            palette: Palette::new(params.base_hue, 0.0, 0.0, 0.0),
            session_active: false,
            silence_frames: 0.0,
            seen_onsets: 0,
        }
    }

    pub fn session_active(&self) -> bool {
        self.session_active
    }
}

/// Closed polygon, vertices relative to the blob center.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexRing {
    pub points: Vec<Vec2>,
}

impl VertexRing {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn radii(&self) -> impl Iterator<Item = f32> + '_ {
        self.points.iter().map(|p| p.length())
    }

    /// Copy scaled about the center.
    pub fn scaled(&self, factor: f32) -> Vec<Vec2> {
        self.points.iter().map(|p| *p * factor).collect()
    }
}

#[derive(Clone, Debug)]
pub struct BlobEngine {
    params: BlobParams,
    state: BlobState,
    noise: NoiseField,
    width: f32,
    height: f32,
    base_radius: f32,
}

impl BlobEngine {
    pub fn new(params: BlobParams) -> Self {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let noise = NoiseField::new(rng.gen());
        let state = BlobState::new(&params, &mut rng);
        let mut engine = Self {
            params,
            state,
            noise,
            width: 0.0,
            height: 0.0,
            base_radius: 0.0,
        };
        engine.resize(500.0, 500.0);
        engine
    }

    /// Fit to a host region; `baseRadius = min(w, h) / 5`.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.base_radius = self.width.min(self.height) / BASE_RADIUS_DIVISOR;
        log::debug!(
            "[blob] resize {}x{} base_radius={:.1}",
            self.width,
            self.height,
            self.base_radius
        );
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn base_radius(&self) -> f32 {
        self.base_radius
    }

    pub fn state(&self) -> &BlobState {
        &self.state
    }

    pub fn params(&self) -> &BlobParams {
        &self.params
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Base radius including breathing and the post-pause inhale.
    pub fn current_base_radius(&self) -> f32 {
        let s = &self.state;
        let breathing = s.phases.breathing.sin() * BREATHING_AMPLITUDE * s.breathing_weight;
        self.base_radius * (1.0 + breathing + s.inhale * INHALE_DEPTH)
    }

    /// Clamp range for vertex radii at the given overall level.
    pub fn radius_bounds(&self, overall_level: f32) -> (f32, f32) {
        let base = self.base_radius;
        let min = base * MIN_RADIUS_FRACTION;
        let max_core = base
            * (1.0
                + PASSIVE_DEFORMATION_BASE
                + PASSIVE_DEFORMATION_BOOST
                + BREATHING_AMPLITUDE
                + INHALE_DEPTH);
        let max_peak = base * PEAK_MULTIPLIER_MAX;
        let max = (max_core + max_peak * 1.2) * (1.0 + overall_level.clamp(0.0, 1.0) * 0.3);
        (min, max)
    }

    /// Advance one render frame. `dt` is in 60 fps reference frames.
    pub fn update(
        &mut self,
        dt: f32,
        features: &FeatureVector,
        cues: &SpeechCues,
        session_active: bool,
    ) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_STEP)
        } else {
            0.0
        };
        let base_hue = self.params.base_hue;
        let s = &mut self.state;
        s.session_active = session_active;

        let level = features.overall_level;
        let spread = features.frequency_spread;
        let pitch = features.pitch_proxy;
        let present = session_active && level > AUDIO_PRESENCE_THRESHOLD;
        let w = |factor: f32| frame_factor(factor, dt);

        s.active_intensity = ease(
            s.active_intensity,
            if session_active { 1.0 } else { 0.0 },
            w(ACTIVE_STATE_EASE),
        );

        // Speaking style
        let (focus_t, melody_t, emphasis_t) = if present {
            let pc = cues.pitch_change_rate;
            (
                remap(spread, 0.3, 0.7, 0.0, 1.0) * remap(pc, 0.05, 0.005, 0.0, 1.0),
                remap(pc, 0.01, 0.1, 0.0, 1.0),
                if cues.emphasis {
                    1.0
                } else {
                    remap(level, 0.5, 0.9, 0.0, 1.0)
                },
            )
        } else {
            (0.0, 0.0, 0.0)
        };
        s.mode.focus = ease(s.mode.focus, focus_t, w(FOCUS_EASE));
        s.mode.melody = ease(s.mode.melody, melody_t, w(MELODY_EASE));
        s.mode.emphasis = ease(s.mode.emphasis, emphasis_t, w(EMPHASIS_EASE));

        // Phases
        let speed = 1.0 + level * PHASE_SPEED_GAIN;
        let waviness_boost = if present {
            remap(cues.pitch_change_rate, 0.01, 0.1, 1.0, 2.5)
        } else {
            1.0
        };
        let rotation = lerp(1.0, 0.8, s.mode.focus)
            * lerp(1.0, 1.2, s.mode.melody)
            * lerp(1.0, 1.1, s.mode.emphasis);
        let p = &mut s.phases;
        p.passive += (PASSIVE_SPEED * speed * dt) as f64;
        p.shape += (SHAPE_SPEED * speed * dt) as f64;
        p.texture += (TEXTURE_SPEED * speed * dt) as f64;
        p.waviness += (WAVINESS_SPEED * speed * waviness_boost * dt) as f64;
        p.internal += (INTERNAL_SPEED * speed * dt) as f64;
        p.angular = (p.angular + ANGULAR_SPEED * speed * rotation * dt).rem_euclid(TAU);
        p.breathing = (p.breathing + TAU / (BREATHING_PERIOD_SEC * REFERENCE_FPS) * dt)
            .rem_euclid(TAU);
        p.wave_time += (dt / REFERENCE_FPS) as f64;

        // Emphasis flash
        if cues.emphasis_onsets != s.seen_onsets {
            s.seen_onsets = cues.emphasis_onsets;
            if session_active {
                s.flash = 1.0;
            }
        }
        s.flash = (s.flash - FLASH_DECAY * dt).max(0.0);

        // Shape parameters
        let sh = &mut s.shape;
        let peak_t = if present {
            let by_level = remap(level, AUDIO_PRESENCE_THRESHOLD, 0.8, 1.0, PEAK_MULTIPLIER_MAX);
            lerp(by_level, PEAK_MULTIPLIER_MAX, s.mode.emphasis * 0.5)
        } else {
            1.0
        };
        sh.peak_multiplier = ease(sh.peak_multiplier, peak_t, w(PEAK_MULTIPLIER_EASE));

        let deformation_t = PASSIVE_DEFORMATION_BASE
            + if present {
                remap(level, AUDIO_PRESENCE_THRESHOLD, 0.8, 0.0, PASSIVE_DEFORMATION_BOOST)
            } else {
                0.0
            };
        sh.passive_deformation = ease(
            sh.passive_deformation,
            deformation_t,
            w(PASSIVE_DEFORMATION_EASE),
        );

        let shape_t = if session_active && spread > 0.1 {
            SHAPE_SCALE_BASE * (1.0 + remap(spread, 0.1, 0.6, 0.0, SHAPE_SCALE_SPREAD))
        } else {
            SHAPE_SCALE_BASE
        };
        sh.shape_scale = ease(sh.shape_scale, shape_t, w(SHAPE_SCALE_EASE));

        let treble = features.treble_level;
        let texture_t = if session_active && treble > 0.1 {
            remap(treble, 0.1, 0.8, TEXTURE_INTENSITY_BASE, TEXTURE_INTENSITY_MAX)
        } else {
            TEXTURE_INTENSITY_BASE
        };
        sh.texture_intensity = ease(sh.texture_intensity, texture_t, w(TEXTURE_INTENSITY_EASE));

        let mid = features.mid_level;
        let influence_t = if session_active && mid > 0.1 {
            remap(mid, 0.1, 0.8, 0.0, WAVINESS_INFLUENCE_MAX)
        } else {
            0.0
        };
        sh.waviness_influence = ease(
            sh.waviness_influence,
            influence_t,
            w(WAVINESS_INFLUENCE_EASE),
        );

        let pitch_scale = remap(pitch, 0.0, 1.0, -WAVINESS_SCALE_PITCH, WAVINESS_SCALE_PITCH);
        sh.waviness_scale = ease(
            sh.waviness_scale,
            WAVINESS_SCALE_BASE * (1.0 + pitch_scale),
            w(WAVINESS_SCALE_EASE),
        );

        sh.edge_sharpness = ease(
            sh.edge_sharpness,
            remap(s.mode.focus, 0.0, 1.0, 0.7, 1.0),
            w(EDGE_SHARPNESS_EASE),
        );
        sh.internal_alpha = ease(
            sh.internal_alpha,
            remap(spread, 0.1, 0.5, 0.0, INTERNAL_ALPHA_MAX),
            w(INTERNAL_ALPHA_EASE),
        );

        // Color
        let hue_t = if present {
            base_hue
                + remap(pitch, 0.0, 1.0, -HUE_PITCH_RANGE, HUE_PITCH_RANGE)
                + remap(spread, 0.0, 1.0, 0.0, HUE_SPREAD_RANGE)
        } else {
            base_hue
        };
        s.hue = ease_hue(s.hue, hue_t, w(HUE_EASE));
        let (sat_t, bri_t) = if present {
            (
                remap(level, AUDIO_PRESENCE_THRESHOLD, 0.8, 0.0, SATURATION_BOOST_MAX),
                remap(level, AUDIO_PRESENCE_THRESHOLD, 0.8, 0.0, BRIGHTNESS_BOOST_MAX),
            )
        } else {
            (0.0, 0.0)
        };
        s.saturation_boost = ease(s.saturation_boost, sat_t, w(COLOR_BOOST_EASE));
        s.brightness_boost = ease(s.brightness_boost, bri_t, w(COLOR_BOOST_EASE));
        s.palette = Palette::new(s.hue, s.saturation_boost, s.brightness_boost, s.flash);

        // Breathing and pause handling
        let silent = level < SILENCE_THRESHOLD;
        s.breathing_weight = ease(
            s.breathing_weight,
            if silent { 1.0 } else { 0.0 },
            w(BREATHING_WEIGHT_EASE),
        );
        if session_active && silent {
            s.silence_frames += dt;
        } else {
            if session_active && s.silence_frames >= PAUSE_MIN_FRAMES as f32 {
                log::debug!("[blob] pause ended after {:.0} frames", s.silence_frames);
                s.pause_ripple = 1.0;
                s.inhale = -1.0;
            }
            s.silence_frames = 0.0;
        }
        s.pause_ripple = ease(s.pause_ripple, 0.0, w(PAUSE_RIPPLE_EASE));
        s.inhale = ease(s.inhale, 0.0, w(INHALE_EASE));
        if s.inhale.abs() < 1e-4 {
            s.inhale = 0.0;
        }
    }

    /// Compute the polygon for the current state.
    pub fn vertices(&self, features: &FeatureVector) -> VertexRing {
        let n = self.params.vertex_count.max(3);
        let s = &self.state;
        let sh = &s.shape;
        let p = &s.phases;
        let base = self.base_radius;
        let core_base = self.current_base_radius();
        let level = features.overall_level.clamp(0.0, 1.0);
        let treble = features.treble_level.clamp(0.0, 1.0);
        let spread = features.frequency_spread.clamp(0.0, 1.0);
        let (min_r, max_r) = self.radius_bounds(level);

        let deformation = if level > 0.3 {
            lerp(
                sh.passive_deformation,
                sh.passive_deformation * LOUD_WAVINESS_BOOST,
                remap(level, 0.3, 0.9, 0.0, 1.0),
            )
        } else {
            sh.passive_deformation
        };
        let active = s.session_active && s.active_intensity > 0.01;
        let wave_phase = |gain: f64| (p.wave_time * WAVE_SPEED as f64 * gain) as f32;
        let angle_shift = if level > 0.3 {
            wave_phase(0.6).sin() * TAU * 0.02 * remap(level, 0.3, 0.9, 0.0, 1.0)
        } else {
            0.0
        };
        let waviness_scale = sh.waviness_scale * (1.0 + spread * 0.5);
        let waviness_time = p.waviness * (1.0 + remap(spread, 0.0, 1.0, 0.0, 0.5) as f64);
        let influence = if level > 0.2 {
            lerp(
                sh.waviness_influence,
                sh.waviness_influence * LOUD_WAVINESS_BOOST * 1.5,
                remap(level, 0.2, 0.8, 0.0, 1.0),
            )
        } else {
            sh.waviness_influence
        };
        let ripple = (treble > TREBLE_RIPPLE_THRESHOLD).then(|| {
            let count = (2.0 + treble * 6.0).floor();
            let amplitude = core_base * TREBLE_RIPPLE_GAIN * treble;
            let phase = wave_phase(1.2);
            (count, amplitude, phase)
        });
        let peak_gain = (sh.peak_multiplier - 1.0).max(0.0);

        let points = (0..n)
            .map(|i| {
                let angle = TAU * i as f32 / n as f32;
                let (sin_a, cos_a) = angle.sin_cos();

                let passive = self.noise.sample(
                    remap(cos_a, -1.0, 1.0, 0.0, PASSIVE_POS_SCALE),
                    remap(sin_a, -1.0, 1.0, 0.0, PASSIVE_POS_SCALE),
                    p.passive,
                );
                let mut radius = core_base + lerp(-deformation, deformation, passive) * core_base;

                if let Some((count, amplitude, phase)) = ripple {
                    radius += (angle * count + phase).sin() * amplitude;
                }

                if active {
                    let active_angle = angle + p.angular + angle_shift;
                    let (sin_b, cos_b) = active_angle.sin_cos();
                    let at = |scale: f32, t: f64| {
                        self.noise.sample(
                            remap(cos_b, -1.0, 1.0, 0.0, scale),
                            remap(sin_b, -1.0, 1.0, 0.0, scale),
                            t,
                        )
                    };
                    let shape = at(sh.shape_scale, p.shape);
                    let texture = lerp(
                        -sh.texture_intensity,
                        sh.texture_intensity,
                        at(TEXTURE_POS_SCALE, p.texture),
                    );
                    let mut waviness = lerp(-1.0, 1.0, at(waviness_scale, waviness_time)) * influence;
                    if level > 0.3 {
                        waviness += (wave_phase(0.6) + angle * 1.5).sin()
                            * WAVE_AMPLITUDE
                            * 0.6
                            * remap(level, 0.3, 0.8, 0.0, 1.0);
                    }
                    let combined = shape + texture + waviness;
                    radius += base * combined.max(0.0) * peak_gain * s.active_intensity;
                }

                let radius = if radius.is_finite() {
                    radius.clamp(min_r, max_r.max(min_r))
                } else {
                    min_r
                };
                Vec2::new(cos_a, sin_a) * radius
            })
            .collect();
        VertexRing { points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> BlobEngine {
        let mut e = BlobEngine::new(BlobParams::default());
        e.resize(800.0, 600.0);
        e
    }

    #[test]
    fn phases_advance_with_level() {
        let cues = SpeechCues::default();
        let mut quiet = engine();
        let mut loud = quiet.clone();
        let before = quiet.state().phases.passive;
        quiet.update(1.0, &FeatureVector::default(), &cues, true);
        let loud_features = FeatureVector {
            overall_level: 1.0,
            ..FeatureVector::default()
        };
        loud.update(1.0, &loud_features, &cues, true);
        let dq = quiet.state().phases.passive - before;
        let dl = loud.state().phases.passive - before;
        assert!((dq - PASSIVE_SPEED as f64).abs() < 1e-7);
        assert!((dl - PASSIVE_SPEED as f64 * 2.5).abs() < 1e-7);
    }

    #[test]
    fn zero_dt_changes_nothing_but_flags() {
        let mut e = engine();
        let before = e.state().shape.clone();
        e.update(0.0, &FeatureVector::default(), &SpeechCues::default(), false);
        assert_eq!(e.state().shape, before);
    }

    #[test]
    fn non_finite_dt_is_ignored() {
        let mut e = engine();
        let before = e.state().phases.clone();
        e.update(f32::NAN, &FeatureVector::default(), &SpeechCues::default(), false);
        assert_eq!(e.state().phases, before);
    }

    #[test]
    fn ring_has_configured_vertex_count() {
        let e = engine();
        let ring = e.vertices(&FeatureVector::default());
        assert_eq!(ring.len(), VERTEX_COUNT);
    }
}
