use std::fmt;
use std::str::FromStr;

use crate::error::{ColorError, Result};
use crate::hex::{hex_to_rgba, HexColor};
use crate::hsl::HslColor;

/// An additive color sample: three channels in [0, 255] plus alpha in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f64,
}

impl RgbColor {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        RgbColor { red, green, blue, alpha: 1.0 }
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        RgbColor { alpha: clamp_alpha(alpha), ..self }
    }

    /// Builds a color from unbounded channel values, clamping each into [0, 255].
    pub fn clamped(red: i64, green: i64, blue: i64) -> Self {
        let c = |v: i64| v.clamp(0, 255) as u8;
        RgbColor::new(c(red), c(green), c(blue))
    }

    pub fn channels(&self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    pub fn to_hex(&self) -> HexColor {
        crate::hex::rgb_to_hex(self)
    }

    pub fn to_hsl(&self) -> HslColor {
        crate::hsl::rgb_to_hsl(self)
    }

    /// CSS `rgba(r, g, b, a)` text, as assigned to a swatch background.
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.red, self.green, self.blue, self.alpha)
    }
}

impl Default for RgbColor {
    fn default() -> Self {
        RgbColor::new(0, 0, 0)
    }
}

impl From<[u8; 3]> for RgbColor {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        RgbColor::new(red, green, blue)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.red, self.green, self.blue)
    }
}

fn clamp_alpha(alpha: f64) -> f64 {
    if alpha.is_nan() {
        1.0
    } else {
        alpha.clamp(0.0, 1.0)
    }
}

/// A color in one of the three supported encodings.
///
/// The encoding is fixed when the value is built, either by constructing a
/// variant directly or by parsing text with [`Color::from_str`].
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    Rgb(RgbColor),
    Hsl(HslColor),
    Hex(HexColor),
}

/// Target encoding for [`lighten`] and [`darken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorFormat {
    #[default]
    Hex,
    Rgb,
    Hsl,
}

impl Color {
    pub fn format(&self) -> ColorFormat {
        match self {
            Color::Rgb(_) => ColorFormat::Rgb,
            Color::Hsl(_) => ColorFormat::Hsl,
            Color::Hex(_) => ColorFormat::Hex,
        }
    }

    pub fn to_rgb(&self) -> RgbColor {
        match self {
            Color::Rgb(rgb) => *rgb,
            Color::Hsl(hsl) => hsl.to_rgb(),
            Color::Hex(hex) => hex.to_rgb(),
        }
    }

    pub fn convert(&self, format: ColorFormat) -> Color {
        if self.format() == format {
            return self.clone();
        }
        let rgb = self.to_rgb();
        match format {
            ColorFormat::Rgb => Color::Rgb(rgb),
            ColorFormat::Hsl => Color::Hsl(rgb.to_hsl()),
            ColorFormat::Hex => Color::Hex(rgb.to_hex()),
        }
    }
}

impl From<RgbColor> for Color {
    fn from(rgb: RgbColor) -> Self {
        Color::Rgb(rgb)
    }
}

impl From<HslColor> for Color {
    fn from(hsl: HslColor) -> Self {
        Color::Hsl(hsl)
    }
}

impl From<HexColor> for Color {
    fn from(hex: HexColor) -> Self {
        Color::Hex(hex)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Rgb(rgb) => fmt::Display::fmt(rgb, f),
            Color::Hsl(hsl) => fmt::Display::fmt(hsl, f),
            Color::Hex(hex) => fmt::Display::fmt(hex, f),
        }
    }
}

impl FromStr for Color {
    type Err = ColorError;

    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa` (the `#` is optional),
    /// `rgb(r, g, b)`, `rgba(r, g, b, a)` and `hsl(h, s%, l%)`.
    fn from_str(input: &str) -> Result<Self> {
        let text = input.trim();
        let lower = text.to_ascii_lowercase();

        if let Some(args) = function_args(&lower, "rgba").or_else(|| function_args(&lower, "rgb")) {
            let parts = split_args(args);
            if parts.len() != 3 && parts.len() != 4 {
                return Err(ColorError::invalid(input));
            }
            let channel = |s: &str| -> Result<i64> {
                s.parse::<f64>()
                    .map(|v| v.round() as i64)
                    .map_err(|_| ColorError::invalid(input))
            };
            let rgb = RgbColor::clamped(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?);
            let alpha = match parts.get(3) {
                Some(a) if a.ends_with('%') => to_decimal(*a)?,
                Some(a) => a.parse::<f64>().map_err(|_| ColorError::invalid(input))?,
                None => 1.0,
            };
            return Ok(Color::Rgb(rgb.with_alpha(alpha)));
        }

        if let Some(args) = function_args(&lower, "hsl") {
            let parts = split_args(args);
            if parts.len() != 3 {
                return Err(ColorError::invalid(input));
            }
            let hue: f64 = parts[0].parse().map_err(|_| ColorError::invalid(input))?;
            return Ok(Color::Hsl(HslColor::new(hue, to_number(parts[1])?, to_number(parts[2])?)));
        }

        let rgb = hex_to_rgba(text)?;
        Ok(Color::Hex(HexColor::from_rgba(&rgb)))
    }
}

fn function_args<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    text.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn split_args(args: &str) -> Vec<&str> {
    args.split(',').map(str::trim).collect()
}

/// A value that may carry a trailing `%`.
pub trait Percentage {
    /// `"42%"` becomes `42`. Numbers pass through unchanged.
    fn to_number(&self) -> Result<f64>;

    /// `"42%"` and `"42"` both become `0.42`. An `f64` passes through unchanged.
    fn to_decimal(&self) -> Result<f64> {
        Ok(self.to_number()? / 100.0)
    }
}

impl Percentage for f64 {
    fn to_number(&self) -> Result<f64> {
        Ok(*self)
    }

    fn to_decimal(&self) -> Result<f64> {
        Ok(*self)
    }
}

impl Percentage for str {
    fn to_number(&self) -> Result<f64> {
        let digits = self.trim().trim_end_matches('%').trim_end();
        let value: f64 = digits.parse().map_err(|_| ColorError::invalid(self))?;
        if !value.is_finite() {
            return Err(ColorError::invalid(self));
        }
        // Whole percentages only, truncated toward zero.
        Ok(value.trunc())
    }
}

pub fn to_number<P: Percentage + ?Sized>(value: &P) -> Result<f64> {
    value.to_number()
}

pub fn to_decimal<P: Percentage + ?Sized>(value: &P) -> Result<f64> {
    value.to_decimal()
}

/// Scales each RGB channel by `(100 + percent) / 100`, truncates toward zero,
/// clamps into [0, 255] and re-encodes into `target`.
pub fn lighten(color: &Color, percent: f64, target: ColorFormat) -> Color {
    let rgb = color.to_rgb();
    let scale = |c: u8| (f64::from(c) * (100.0 + percent) / 100.0).trunc() as i64;
    let scaled = RgbColor::clamped(scale(rgb.red), scale(rgb.green), scale(rgb.blue));
    Color::Rgb(scaled).convert(target)
}

pub fn darken(color: &Color, percent: f64, target: ColorFormat) -> Color {
    lighten(color, -percent, target)
}
