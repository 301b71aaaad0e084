//! Coherent noise used for every deformation channel.
//!
//! Perlin noise from the `noise` crate, remapped to `[0, 1]` so the shape
//! formulas can treat 0.5 as "no offset".

use ::noise::{NoiseFn, Perlin};

#[derive(Clone, Debug)]
pub struct NoiseField {
    perlin: Perlin,
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }

    /// Sample at `(x, y, t)`; continuous and deterministic, in `[0, 1]`.
    #[inline]
    pub fn sample(&self, x: f32, y: f32, t: f64) -> f32 {
        let v = self.perlin.get([x as f64, y as f64, t]) as f32;
        ((v + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}
