//! Small interpolation helpers shared by the extractor and the geometry engine.

/// One easing step: `value*(1-w) + target*w`.
#[inline]
pub fn ease(value: f32, target: f32, w: f32) -> f32 {
    value + (target - value) * w
}

/// Convert a per-reference-frame factor into the factor for `dt` frames so
/// that convergence does not depend on the display refresh rate.
#[inline]
pub fn frame_factor(w: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    1.0 - (1.0 - w.clamp(0.0, 1.0)).powf(dt)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linear remap of `v` from `[in_lo, in_hi]` to `[out_lo, out_hi]`, clamped
/// to the output range. The input range may be descending.
#[inline]
pub fn remap(v: f32, in_lo: f32, in_hi: f32, out_lo: f32, out_hi: f32) -> f32 {
    if (in_hi - in_lo).abs() < f32::EPSILON {
        return out_lo;
    }
    let t = ((v - in_lo) / (in_hi - in_lo)).clamp(0.0, 1.0);
    lerp(out_lo, out_hi, t)
}

/// Clamp to `[0, 1]`, mapping NaN and infinities to 0.
#[inline]
pub fn unit(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Ease a hue in degrees along the shortest arc; the result is in `[0, 360)`.
pub fn ease_hue(current: f32, target: f32, w: f32) -> f32 {
    let mut target = target;
    let diff = target - current;
    if diff > 180.0 {
        target -= 360.0;
    } else if diff < -180.0 {
        target += 360.0;
    }
    ease(current, target, w).rem_euclid(360.0)
}
