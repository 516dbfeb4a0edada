use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::color::RgbColor;
use crate::error::{ColorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sweep {
    #[default]
    Clockwise,
    CounterClockwise,
}

/// A pie slice from `center`, bounded by an arc from `start_angle` to `end_angle` (degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    pub center: (f64, f64),
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub sweep: Sweep,
}

impl Sector {
    /// Whether the ray at `theta` degrees (clockwise from +x) lies inside the slice.
    pub fn covers_angle(&self, theta: f64) -> bool {
        let (from, delta) = match self.sweep {
            Sweep::Clockwise => (self.start_angle, self.end_angle - self.start_angle),
            Sweep::CounterClockwise => (self.end_angle, self.start_angle - self.end_angle),
        };
        if delta >= 360.0 {
            return true;
        }
        (theta - from).rem_euclid(360.0) <= delta.rem_euclid(360.0)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (dx, dy) = (x - self.center.0, y - self.center.1);
        if dx.hypot(dy) > self.radius {
            return false;
        }
        self.covers_angle(dy.atan2(dx).to_degrees())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: RgbColor,
}

/// Concentric radial gradient: colors vary with distance from `center`,
/// from `inner_radius` (offset 0) to `outer_radius` (offset 1).
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: (f64, f64),
    pub inner_radius: f64,
    pub outer_radius: f64,
    stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn new(center: (f64, f64), inner_radius: f64, outer_radius: f64) -> Self {
        RadialGradient { center, inner_radius, outer_radius, stops: Vec::new() }
    }

    pub fn add_color_stop(&mut self, offset: f64, color: RgbColor) {
        let stop = ColorStop { offset: offset.clamp(0.0, 1.0), color };
        // Stops at equal offsets keep insertion order.
        let at = self.stops.partition_point(|s| s.offset <= stop.offset);
        self.stops.insert(at, stop);
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn color_at(&self, x: f64, y: f64) -> RgbColor {
        let span = self.outer_radius - self.inner_radius;
        let dist = (x - self.center.0).hypot(y - self.center.1);
        let t = if span > 0.0 { ((dist - self.inner_radius) / span).clamp(0.0, 1.0) } else { 1.0 };
        self.color_at_offset(t)
    }

    fn color_at_offset(&self, t: f64) -> RgbColor {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return RgbColor::new(0, 0, 0).with_alpha(0.0);
        };
        if t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }

        let next = self.stops.partition_point(|s| s.offset <= t);
        let (a, b) = (&self.stops[next - 1], &self.stops[next]);
        let f = (t - a.offset) / (b.offset - a.offset);
        let lerp = |from: u8, to: u8| {
            (f64::from(from) + (f64::from(to) - f64::from(from)) * f).round() as i64
        };
        RgbColor::clamped(
            lerp(a.color.red, b.color.red),
            lerp(a.color.green, b.color.green),
            lerp(a.color.blue, b.color.blue),
        )
        .with_alpha(a.color.alpha + (b.color.alpha - a.color.alpha) * f)
    }
}

pub trait RasterSurface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn fill_sector(&mut self, sector: &Sector, gradient: &RadialGradient);

    fn pixel(&self, x: i64, y: i64) -> Result<[u8; 4]>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// A fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        PixelBuffer { width, height, data: vec![0; width as usize * height as usize * 4] }
    }

    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(ColorError::DimensionMismatch { expected, actual: data.len() });
        }
        Ok(PixelBuffer { width, height, data })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        let in_bounds = (0..i64::from(self.width)).contains(&x) && (0..i64::from(self.height)).contains(&y);
        in_bounds.then(|| (y as usize * self.width as usize + x as usize) * 4)
    }

    /// Reads any PNG, normalized to 8-bit RGBA.
    pub fn open(path: &Path) -> Result<Self> {
        let mut decoder = png::Decoder::new(File::open(path)?);
        decoder.set_transformations(png::Transformations::normalize_to_color8());
        let mut reader = decoder.read_info()?;
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;
        let samples = info.color_type.samples();

        let data = buf[..info.buffer_size()]
            .chunks_exact(samples)
            .flat_map(|s| match s {
                &[v] => [v, v, v, u8::MAX],
                &[v, a] => [v, v, v, a],
                &[r, g, b] => [r, g, b, u8::MAX],
                &[r, g, b, a] => [r, g, b, a],
                _ => [0, 0, 0, 0],
            })
            .collect();

        PixelBuffer::from_rgba(info.width, info.height, data)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let w = &mut BufWriter::new(file);

        let mut encoder = png::Encoder::new(w, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.data)?;
        Ok(())
    }
}

impl RasterSurface for PixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_sector(&mut self, sector: &Sector, gradient: &RadialGradient) {
        let (cx, cy) = sector.center;
        let r = sector.radius;
        let clip = |lo: f64, hi: u32| lo.floor().clamp(0.0, f64::from(hi)) as i64;
        let (x0, x1) = (clip(cx - r, self.width), clip(cx + r + 1.0, self.width));
        let (y0, y1) = (clip(cy - r, self.height), clip(cy + r + 1.0, self.height));

        for y in y0..y1 {
            for x in x0..x1 {
                // sample at the pixel center
                let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);
                if !sector.contains(px, py) {
                    continue;
                }
                let color = gradient.color_at(px, py);
                if let Some(i) = self.offset(x, y) {
                    let alpha = (color.alpha * f64::from(u8::MAX)).round() as u8;
                    self.data[i..i + 4].copy_from_slice(&[color.red, color.green, color.blue, alpha]);
                }
            }
        }
    }

    fn pixel(&self, x: i64, y: i64) -> Result<[u8; 4]> {
        let i = self.offset(x, y).ok_or(ColorError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.data[i..i + 4]);
        Ok(out)
    }
}
