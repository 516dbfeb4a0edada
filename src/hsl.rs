use std::fmt;

use crate::color::RgbColor;
use crate::hex::{rgb_to_hex, HexColor};

/// Hue in degrees [0, 360), saturation and lightness as percentages [0, 100].
///
/// Values are kept at full precision; [`HslColor::rounded`] gives the whole
/// degree/percent form that is shown to users.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HslColor {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl HslColor {
    /// Wraps the hue into [0, 360) and clamps saturation/lightness into [0, 100].
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        let pct = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) };
        let hue = if hue.is_finite() { hue.rem_euclid(360.0) } else { 0.0 };
        HslColor {
            // rem_euclid can land on 360.0 for tiny negative inputs
            hue: if hue >= 360.0 { 0.0 } else { hue },
            saturation: pct(saturation),
            lightness: pct(lightness),
        }
    }

    pub fn to_rgb(&self) -> RgbColor {
        hsl_to_rgb(self)
    }

    /// `(hue, saturation, lightness)` rounded to whole degrees and percent.
    pub fn rounded(&self) -> (u16, u8, u8) {
        let hue = (self.hue.round() as i64).rem_euclid(360) as u16;
        (hue, self.saturation.round() as u8, self.lightness.round() as u8)
    }
}

impl fmt::Display for HslColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, s, l) = self.rounded();
        write!(f, "[{h}, \"{s}%\", \"{l}%\"]")
    }
}

pub fn rgb_to_hsl(rgb: &RgbColor) -> HslColor {
    let n = f64::from(u8::MAX);
    let (r, g, b) = (
        f64::from(rgb.red) / n,
        f64::from(rgb.green) / n,
        f64::from(rgb.blue) / n,
    );

    let max = r.max(g.max(b));
    let min = r.min(g.min(b));
    let l = (max + min) / 2.0;

    if max == min {
        return HslColor::new(0.0, 0.0, l * 100.0);
    }

    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    let h = h / 6.0;

    HslColor::new(h * 360.0, s * 100.0, l * 100.0)
}

/// One channel of the HSL inverse. `t` is the hue fraction, shifted per channel.
pub fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

pub fn hsl_to_rgb(hsl: &HslColor) -> RgbColor {
    let h = hsl.hue / 360.0;
    let s = hsl.saturation / 100.0;
    let l = hsl.lightness / 100.0;

    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
        )
    };

    let n = f64::from(u8::MAX);
    let channel = |c: f64| (c * n).round() as i64;
    RgbColor::clamped(channel(r), channel(g), channel(b))
}

pub fn hsl_to_hex(hsl: &HslColor) -> HexColor {
    rgb_to_hex(&hsl_to_rgb(hsl))
}
