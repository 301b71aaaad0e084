use crate::constants::*;
use crate::easing::lerp;

/// Linear RGBA color, components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// HSB with hue in degrees and saturation/brightness/alpha in percent.
    pub fn from_hsb(hue: f32, saturation: f32, brightness: f32, alpha: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let s = (saturation / 100.0).clamp(0.0, 1.0);
        let v = (brightness / 100.0).clamp(0.0, 1.0);
        let c = v * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = v - c;
        Self::new(r + m, g + m, b + m, (alpha / 100.0).clamp(0.0, 1.0))
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn lerp(self, other: Rgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            lerp(self.r, other.r, t),
            lerp(self.g, other.g, t),
            lerp(self.b, other.b, t),
            lerp(self.a, other.a, t),
        )
    }

    /// CSS `rgba()` string for canvas fill/stroke styles.
    pub fn to_css(self) -> String {
        let to8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({},{},{},{:.3})",
            to8(self.r),
            to8(self.g),
            to8(self.b),
            self.a.clamp(0.0, 1.0)
        )
    }
}

/// Center/edge colors derived from the smoothed hue and boosts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub hue: f32,
    pub saturation: f32,
    pub brightness: f32,
    pub center: Rgba,
    pub edge: Rgba,
}

impl Palette {
    pub fn new(hue: f32, saturation_boost: f32, brightness_boost: f32, flash: f32) -> Self {
        let saturation = (BASE_SATURATION + saturation_boost).clamp(60.0, 95.0);
        let brightness = (BASE_BRIGHTNESS + brightness_boost + flash * 5.0).clamp(92.0, 100.0);
        Self {
            hue,
            saturation,
            brightness,
            center: Rgba::from_hsb(hue, saturation * 0.8, brightness, 100.0),
            edge: Rgba::from_hsb(hue, saturation, brightness * 0.97, EDGE_ALPHA),
        }
    }

    pub fn glow(&self, alpha_percent: f32) -> Rgba {
        Rgba::from_hsb(self.hue, 50.0, 98.0, alpha_percent)
    }

    pub fn texture(&self, alpha_percent: f32) -> Rgba {
        Rgba::from_hsb(self.hue, BASE_SATURATION * 0.5, 100.0, alpha_percent)
    }
}
