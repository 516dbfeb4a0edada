use tracing::debug;

use crate::hsl::HslColor;
use crate::surface::{RadialGradient, RasterSurface, Sector, Sweep};

/// Width of each painted slice. Slices are laid down every degree, so
/// neighbours overlap by one degree and no seams show between them.
pub const SECTOR_WIDTH: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    pub center: (f64, f64),
    pub radius: f64,
    pub start_angle: i32,
    pub end_angle: i32,
    pub sweep: Sweep,
}

impl WheelGeometry {
    pub fn with_angles(self, start_angle: i32, end_angle: i32) -> Self {
        WheelGeometry { start_angle, end_angle, ..self }
    }

    pub fn with_sweep(self, sweep: Sweep) -> Self {
        WheelGeometry { sweep, ..self }
    }

    pub fn sector_count(&self) -> usize {
        usize::try_from(self.end_angle - self.start_angle + 1).unwrap_or(0)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (x - self.center.0).hypot(y - self.center.1) <= self.radius
    }
}

/// The wheel is a square anchored at the top-left corner, sized by the
/// smaller surface dimension, sweeping 0 to 360 degrees clockwise.
pub fn compute_geometry(surface_width: u32, surface_height: u32) -> WheelGeometry {
    let diameter = f64::from(surface_width.min(surface_height));
    WheelGeometry {
        center: (diameter / 2.0, diameter / 2.0),
        radius: diameter / 2.0,
        start_angle: 0,
        end_angle: 360,
        sweep: Sweep::Clockwise,
    }
}

/// The slice and fill for one integer angle: hue follows the angle, and the
/// fill runs from near-white at the center to full saturation at the rim.
pub fn sector_at(geometry: &WheelGeometry, angle: i32) -> (Sector, RadialGradient) {
    let sector = Sector {
        center: geometry.center,
        radius: geometry.radius,
        start_angle: f64::from(angle - SECTOR_WIDTH),
        end_angle: f64::from(angle),
        sweep: geometry.sweep,
    };

    let hue = f64::from(angle);
    let mut gradient = RadialGradient::new(geometry.center, 0.0, geometry.radius);
    gradient.add_color_stop(0.0, HslColor::new(hue, 10.0, 100.0).to_rgb());
    gradient.add_color_stop(1.0, HslColor::new(hue, 100.0, 50.0).to_rgb());

    (sector, gradient)
}

/// Paints the wheel, one slice per degree from `start_angle` to `end_angle` inclusive.
pub fn paint<S: RasterSurface + ?Sized>(surface: &mut S, geometry: &WheelGeometry) {
    for angle in geometry.start_angle..=geometry.end_angle {
        let (sector, gradient) = sector_at(geometry, angle);
        surface.fill_sector(&sector, &gradient);
    }

    debug!(
        center = ?geometry.center,
        radius = geometry.radius,
        sectors = geometry.sector_count(),
        "painted color wheel"
    );
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelRenderer {
    geometry: WheelGeometry,
}

impl WheelRenderer {
    pub fn new<S: RasterSurface + ?Sized>(surface: &S) -> Self {
        WheelRenderer { geometry: compute_geometry(surface.width(), surface.height()) }
    }

    pub fn with_geometry(geometry: WheelGeometry) -> Self {
        WheelRenderer { geometry }
    }

    pub fn geometry(&self) -> &WheelGeometry {
        &self.geometry
    }

    pub fn resize<S: RasterSurface + ?Sized>(&mut self, surface: &mut S) {
        let fresh = compute_geometry(surface.width(), surface.height());
        self.geometry = fresh
            .with_angles(self.geometry.start_angle, self.geometry.end_angle)
            .with_sweep(self.geometry.sweep);
        self.paint(surface);
    }

    pub fn paint<S: RasterSurface + ?Sized>(&self, surface: &mut S) {
        paint(surface, &self.geometry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::surface::PixelBuffer;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use test_case::test_case;

    /// Records fills instead of rasterizing them.
    #[derive(Default)]
    struct RecordingSurface {
        size: (u32, u32),
        fills: Vec<(Sector, RadialGradient)>,
    }

    impl RasterSurface for RecordingSurface {
        fn width(&self) -> u32 {
            self.size.0
        }

        fn height(&self) -> u32 {
            self.size.1
        }

        fn fill_sector(&mut self, sector: &Sector, gradient: &RadialGradient) {
            self.fills.push((*sector, gradient.clone()));
        }

        fn pixel(&self, _x: i64, _y: i64) -> Result<[u8; 4]> {
            Ok([0, 0, 0, 0])
        }
    }

    #[test]
    fn geometry_for_square_surface() {
        let g = compute_geometry(300, 300);
        assert_eq!(g.center, (150.0, 150.0));
        assert_eq!(g.radius, 150.0);
        assert_eq!((g.start_angle, g.end_angle, g.sweep), (0, 360, Sweep::Clockwise));
    }

    #[test_case(300, 200 ; "wide")]
    #[test_case(200, 300 ; "tall")]
    fn radius_never_exceeds_half_the_smaller_side(w: u32, h: u32) {
        let g = compute_geometry(w, h);
        assert_eq!(g.radius, 100.0);
        assert_eq!(g.center, (100.0, 100.0));
    }

    #[test]
    fn paint_lays_down_overlapping_two_degree_slices() {
        let mut surface = RecordingSurface { size: (100, 100), ..Default::default() };
        let geometry = compute_geometry(100, 100);
        paint(&mut surface, &geometry);

        assert_eq!(surface.fills.len(), 361);
        assert_eq!(geometry.sector_count(), 361);

        for (i, (sector, _)) in surface.fills.iter().enumerate() {
            assert_eq!(sector.end_angle - sector.start_angle, 2.0);
            assert_eq!(sector.end_angle, i as f64);
            assert_eq!(sector.radius, 50.0);
        }

        // 0 and 360 land on the same slice
        let distinct: HashSet<i64> = surface
            .fills
            .iter()
            .map(|(s, _)| (s.end_angle as i64).rem_euclid(360))
            .collect();
        assert_eq!(distinct.len(), 360);

        let (a, b) = (&surface.fills[10].0, &surface.fills[11].0);
        assert_eq!(a.end_angle - b.start_angle, 1.0);
    }

    #[test]
    fn slice_gradient_runs_from_pale_to_saturated() {
        let (_, gradient) = sector_at(&compute_geometry(100, 100), 120);
        let stops = gradient.stops();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].color.channels(), [255, 255, 255]);
        assert_eq!(stops[1].color.channels(), [0, 255, 0]);
        assert_eq!(gradient.outer_radius, 50.0);
    }

    #[test]
    fn painted_rim_shows_the_hue_of_its_angle() {
        let mut buf = PixelBuffer::new(200, 200);
        paint(&mut buf, &compute_geometry(200, 200));

        // straight right of center is hue 0, straight down is hue 90
        let right = buf.pixel(197, 100).unwrap();
        assert!(right[0] > 240 && right[1] < 40 && right[2] < 40, "{right:?}");
        let down = buf.pixel(100, 197).unwrap();
        assert!(down[0] > 100 && down[1] > 240 && down[2] < 40, "{down:?}");
        assert_eq!(buf.pixel(0, 0).unwrap(), [0, 0, 0, 0]);
    }

    #[test]
    fn resize_recomputes_geometry_and_keeps_angles() {
        let mut surface = RecordingSurface { size: (40, 40), ..Default::default() };
        let mut renderer = WheelRenderer::with_geometry(compute_geometry(10, 10).with_angles(0, 90));
        renderer.resize(&mut surface);
        assert_eq!(renderer.geometry().radius, 20.0);
        assert_eq!(surface.fills.len(), 91);
    }
}
