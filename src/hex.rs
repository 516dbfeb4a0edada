use std::fmt;
use std::str::FromStr;

use crate::color::RgbColor;
use crate::error::{ColorError, Result};

/// A normalized, lower-case hex color: `#rrggbb`, or `#rrggbbaa` when it carries alpha.
#[derive(Debug, Clone, PartialEq)]
pub struct HexColor {
    text: String,
    rgb: RgbColor,
}

impl HexColor {
    /// Six digits when the color is opaque, eight otherwise.
    pub fn from_rgba(rgb: &RgbColor) -> Self {
        if rgb.alpha < 1.0 {
            rgb_to_hex_alpha(rgb)
        } else {
            rgb_to_hex(rgb)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn to_rgb(&self) -> RgbColor {
        self.rgb
    }

    pub fn has_alpha(&self) -> bool {
        self.text.len() == 9
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for HexColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self> {
        hex_to_rgba(s).map(|rgb| HexColor::from_rgba(&rgb))
    }
}

/// `#rrggbb`, alpha ignored.
pub fn rgb_to_hex(rgb: &RgbColor) -> HexColor {
    HexColor {
        text: format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue),
        rgb: RgbColor { alpha: 1.0, ..*rgb },
    }
}

/// `#rrggbbaa`, with the alpha byte `round(alpha * 255)`.
pub fn rgb_to_hex_alpha(rgb: &RgbColor) -> HexColor {
    let a = alpha_to_byte(rgb.alpha);
    HexColor {
        text: format!("#{:02x}{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue, a),
        rgb: rgb.with_alpha(f64::from(a) / f64::from(u8::MAX)),
    }
}

/// Parses `#rgb` or `#rrggbb` (the `#` is optional, case is ignored).
/// The result is opaque.
pub fn hex_to_rgb(hex: &str) -> Result<RgbColor> {
    match parse_digits(hex)? {
        Digits::Short(_) | Digits::Long(_) => hex_to_rgba(hex),
        Digits::LongAlpha(_) => Err(ColorError::invalid(hex)),
    }
}

/// Like [`hex_to_rgb`], but also accepts `#rrggbbaa`.
pub fn hex_to_rgba(hex: &str) -> Result<RgbColor> {
    let rgb = match parse_digits(hex)? {
        Digits::Short([r, g, b]) => RgbColor::new(r * 17, g * 17, b * 17),
        Digits::Long([r, g, b]) => RgbColor::new(r, g, b),
        Digits::LongAlpha([r, g, b, a]) => {
            RgbColor::new(r, g, b).with_alpha(f64::from(a) / f64::from(u8::MAX))
        }
    };
    Ok(rgb)
}

enum Digits {
    Short([u8; 3]),
    Long([u8; 3]),
    LongAlpha([u8; 4]),
}

fn parse_digits(hex: &str) -> Result<Digits> {
    let nibble = |c: u8| -> Result<u8> {
        match c {
            b'0'..=b'9' => Ok(c - b'0'),
            b'a'..=b'f' => Ok(c - b'a' + 10),
            b'A'..=b'F' => Ok(c - b'A' + 10),
            _ => Err(ColorError::invalid(hex)),
        }
    };
    let byte = |pair: &[u8]| -> Result<u8> { Ok(nibble(pair[0])? << 4 | nibble(pair[1])?) };

    let bytes = hex.strip_prefix('#').unwrap_or(hex).as_bytes();
    match bytes.len() {
        3 => Ok(Digits::Short([nibble(bytes[0])?, nibble(bytes[1])?, nibble(bytes[2])?])),
        6 => {
            let mut out = [0u8; 3];
            for (slot, pair) in out.iter_mut().zip(bytes.chunks_exact(2)) {
                *slot = byte(pair)?;
            }
            Ok(Digits::Long(out))
        }
        8 => {
            let mut out = [0u8; 4];
            for (slot, pair) in out.iter_mut().zip(bytes.chunks_exact(2)) {
                *slot = byte(pair)?;
            }
            Ok(Digits::LongAlpha(out))
        }
        _ => Err(ColorError::invalid(hex)),
    }
}

fn alpha_to_byte(alpha: f64) -> u8 {
    (alpha.clamp(0.0, 1.0) * f64::from(u8::MAX)).round() as u8
}
