use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace, warn};

use crate::color::RgbColor;
use crate::error::{ColorError, Result};
use crate::hex::HexColor;
use crate::hsl::HslColor;
use crate::surface::RasterSurface;
use crate::wheel::{WheelGeometry, WheelRenderer};

/// The color record handed to listeners. HSL and hex are always derived
/// from the same RGB sample.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedColor {
    rgb: RgbColor,
    hsl: HslColor,
    hex: HexColor,
}

impl PickedColor {
    pub fn from_rgb(rgb: RgbColor) -> Self {
        PickedColor { rgb, hsl: rgb.to_hsl(), hex: rgb.to_hex() }
    }

    pub fn rgb(&self) -> &RgbColor {
        &self.rgb
    }

    pub fn hsl(&self) -> &HslColor {
        &self.hsl
    }

    pub fn hex(&self) -> &HexColor {
        &self.hex
    }

    pub fn swatch_css(&self) -> String {
        self.rgb.to_css()
    }
}

impl Default for PickedColor {
    fn default() -> Self {
        PickedColor::from_rgb(RgbColor::new(255, 0, 0))
    }
}

impl fmt::Display for PickedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ rgb: {}, hsl: {}, hex: \"{}\" }}", self.rgb, self.hsl, self.hex)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Press { x: i64, y: i64 },
    Move { x: i64, y: i64 },
    Release { x: i64, y: i64 },
    Click { x: i64, y: i64 },
}

impl PointerEvent {
    pub fn position(&self) -> (i64, i64) {
        match *self {
            PointerEvent::Press { x, y }
            | PointerEvent::Move { x, y }
            | PointerEvent::Release { x, y }
            | PointerEvent::Click { x, y } => (x, y),
        }
    }
}

impl FromStr for PointerEvent {
    type Err = ColorError;

    /// `press:X,Y`, `move:X,Y`, `release:X,Y` or `click:X,Y`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ColorError::invalid(format!("pointer event {s:?}"));
        let (kind, at) = s.split_once(':').ok_or_else(invalid)?;
        let (x, y) = at.split_once(',').ok_or_else(invalid)?;
        let x = x.trim().parse().map_err(|_| invalid())?;
        let y = y.trim().parse().map_err(|_| invalid())?;
        match kind.trim().to_ascii_lowercase().as_str() {
            "press" | "down" => Ok(PointerEvent::Press { x, y }),
            "move" => Ok(PointerEvent::Move { x, y }),
            "release" | "up" => Ok(PointerEvent::Release { x, y }),
            "click" => Ok(PointerEvent::Click { x, y }),
            _ => Err(invalid()),
        }
    }
}

type Listener = Box<dyn FnMut(&PickedColor)>;

pub struct PickerController<S: RasterSurface> {
    surface: S,
    renderer: WheelRenderer,
    state: DragState,
    position: Option<(i64, i64)>,
    current: PickedColor,
    listeners: Vec<Listener>,
}

impl<S: RasterSurface> PickerController<S> {
    /// Paints the default wheel onto `surface`.
    pub fn new(surface: S) -> Self {
        let renderer = WheelRenderer::new(&surface);
        Self::with_renderer(surface, renderer)
    }

    pub fn with_geometry(surface: S, geometry: WheelGeometry) -> Self {
        Self::with_renderer(surface, WheelRenderer::with_geometry(geometry))
    }

    /// Wraps a surface that already carries a painted wheel, e.g. one loaded from disk.
    pub fn from_painted(surface: S) -> Self {
        let renderer = WheelRenderer::new(&surface);
        Self::assemble(surface, renderer)
    }

    fn with_renderer(mut surface: S, renderer: WheelRenderer) -> Self {
        renderer.paint(&mut surface);
        Self::assemble(surface, renderer)
    }

    fn assemble(surface: S, renderer: WheelRenderer) -> Self {
        PickerController {
            surface,
            renderer,
            state: DragState::Idle,
            position: None,
            current: PickedColor::default(),
            listeners: Vec::new(),
        }
    }

    pub fn resize(&mut self, surface: S) {
        self.surface = surface;
        self.renderer.resize(&mut self.surface);
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&PickedColor) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn geometry(&self) -> &WheelGeometry {
        self.renderer.geometry()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// The latest picked color; red until something is picked.
    pub fn current(&self) -> &PickedColor {
        &self.current
    }

    pub fn last_position(&self) -> Option<(i64, i64)> {
        self.position
    }

    pub fn handle(&mut self, event: PointerEvent) -> Option<PickedColor> {
        let (x, y) = event.position();
        match event {
            PointerEvent::Press { .. } => {
                let picked = self.change_color(x, y)?;
                self.set_state(DragState::Dragging);
                Some(picked)
            }
            PointerEvent::Move { .. } if self.state == DragState::Dragging => self.change_color(x, y),
            PointerEvent::Move { .. } => None,
            PointerEvent::Release { .. } => {
                self.set_state(DragState::Idle);
                self.change_color(x, y)
            }
            PointerEvent::Click { .. } => self.change_color(x, y),
        }
    }

    /// Reads the pixel under `(x, y)`. Alpha is always 1: the wheel is opaque.
    pub fn sample(&self, x: i64, y: i64) -> Result<PickedColor> {
        let [r, g, b, _] = self.surface.pixel(x, y)?;
        Ok(PickedColor::from_rgb(RgbColor::new(r, g, b)))
    }

    fn change_color(&mut self, x: i64, y: i64) -> Option<PickedColor> {
        let picked = match self.sample(x, y) {
            Ok(picked) => picked,
            Err(error) => {
                warn!(%error, "pointer sample ignored");
                return None;
            }
        };
        trace!(x, y, color = %picked, "sampled wheel");

        self.position = Some((x, y));
        self.current = picked.clone();
        for listener in &mut self.listeners {
            listener(&picked);
        }
        Some(picked)
    }

    fn set_state(&mut self, state: DragState) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "drag state changed");
            self.state = state;
        }
    }
}

impl<S: RasterSurface + fmt::Debug> fmt::Debug for PickerController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickerController")
            .field("surface", &self.surface)
            .field("renderer", &self.renderer)
            .field("state", &self.state)
            .field("position", &self.position)
            .field("current", &self.current)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::PixelBuffer;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;
    use test_case::test_case;

    fn controller() -> (PickerController<PixelBuffer>, Rc<RefCell<Vec<PickedColor>>>) {
        let mut picker = PickerController::new(PixelBuffer::new(60, 60));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        picker.subscribe(move |c| sink.borrow_mut().push(c.clone()));
        (picker, seen)
    }

    #[test]
    fn picked_color_is_consistent() {
        let picked = PickedColor::from_rgb(RgbColor::new(12, 34, 56));
        assert_eq!(picked.hex().as_str(), "#0c2238");
        assert_eq!(picked.hsl().rounded(), (210, 65, 13));
        assert_eq!(picked.swatch_css(), "rgba(12, 34, 56, 1)");
    }

    #[test]
    fn display_has_emitted_record_shape() {
        let picked = PickedColor::from_rgb(RgbColor::new(255, 0, 0));
        assert_eq!(
            picked.to_string(),
            r##"{ rgb: [255, 0, 0], hsl: [0, "100%", "50%"], hex: "#ff0000" }"##
        );
    }

    #[test]
    fn starts_idle_with_red() {
        let (picker, seen) = controller();
        assert_eq!(picker.state(), DragState::Idle);
        assert_eq!(picker.current().hex().as_str(), "#ff0000");
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn press_drag_release_emits_each_step() {
        let (mut picker, seen) = controller();

        assert!(picker.handle(PointerEvent::Move { x: 50, y: 30 }).is_none());
        assert!(picker.handle(PointerEvent::Press { x: 50, y: 30 }).is_some());
        assert_eq!(picker.state(), DragState::Dragging);
        assert!(picker.handle(PointerEvent::Move { x: 30, y: 50 }).is_some());
        assert!(picker.handle(PointerEvent::Move { x: 10, y: 30 }).is_some());
        let last = picker.handle(PointerEvent::Release { x: 30, y: 10 }).unwrap();
        assert_eq!(picker.state(), DragState::Idle);
        assert!(picker.handle(PointerEvent::Move { x: 50, y: 30 }).is_none());

        assert_eq!(seen.borrow().len(), 4);
        assert_eq!(picker.current(), &last);
        assert_eq!(picker.last_position(), Some((30, 10)));
    }

    #[test]
    fn click_emits_regardless_of_drag_state() {
        let (mut picker, seen) = controller();
        picker.handle(PointerEvent::Click { x: 30, y: 30 });
        picker.handle(PointerEvent::Press { x: 30, y: 30 });
        picker.handle(PointerEvent::Click { x: 40, y: 30 });
        assert_eq!(picker.state(), DragState::Dragging);
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn center_click_is_nearly_white() {
        let (mut picker, _) = controller();
        let picked = picker.handle(PointerEvent::Click { x: 30, y: 30 }).unwrap();
        assert!(picked.rgb().channels().iter().all(|c| *c >= 245), "{picked}");
        assert_eq!(picked.hex(), &picked.rgb().to_hex());
        assert!(picked.hsl().lightness > 95.0);
    }

    #[test]
    fn corner_outside_the_disc_is_still_sampled() {
        let (mut picker, _) = controller();
        let picked = picker.handle(PointerEvent::Click { x: 0, y: 0 }).unwrap();
        assert_eq!(picked.rgb(), &RgbColor::new(0, 0, 0));
        assert_eq!(picked.rgb().alpha, 1.0);
    }

    #[test]
    fn press_outside_the_raster_stays_idle() {
        let (mut picker, seen) = controller();
        assert!(picker.handle(PointerEvent::Press { x: -1, y: 10 }).is_none());
        assert_eq!(picker.state(), DragState::Idle);
        assert!(seen.borrow().is_empty());
        assert_eq!(picker.last_position(), None);
    }

    #[test]
    fn drag_leaving_the_raster_keeps_dragging() {
        let (mut picker, seen) = controller();
        picker.handle(PointerEvent::Press { x: 30, y: 30 });
        assert!(picker.handle(PointerEvent::Move { x: 90, y: 30 }).is_none());
        assert_eq!(picker.state(), DragState::Dragging);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn resize_repaints_the_new_surface() {
        let (mut picker, _) = controller();
        picker.resize(PixelBuffer::new(20, 20));
        assert_eq!(picker.geometry().radius, 10.0);
        assert_eq!(picker.surface().width(), 20);
        let center = picker.sample(10, 10).unwrap();
        assert!(center.rgb().channels().iter().all(|c| *c >= 230), "{center}");
        assert!(picker.sample(25, 25).is_err());
    }

    #[test]
    fn from_painted_samples_without_repainting() {
        let painted = PickerController::new(PixelBuffer::new(30, 30)).into_surface();
        let mut picker = PickerController::from_painted(painted.clone());
        assert_eq!(picker.surface(), &painted);
        let picked = picker.handle(PointerEvent::Click { x: 15, y: 15 }).unwrap();
        assert_eq!(picked.rgb().channels()[..3], painted.pixel(15, 15).unwrap()[..3]);
    }

    #[test_case("press:1,2", PointerEvent::Press { x: 1, y: 2 })]
    #[test_case("move: 3, 4", PointerEvent::Move { x: 3, y: 4 })]
    #[test_case("UP:5,6", PointerEvent::Release { x: 5, y: 6 })]
    #[test_case("click:-7,8", PointerEvent::Click { x: -7, y: 8 })]
    fn pointer_event_parses(input: &str, expected: PointerEvent) {
        assert_eq!(input.parse::<PointerEvent>().unwrap(), expected);
    }

    #[test_case("tap:1,2")]
    #[test_case("press:1")]
    #[test_case("press")]
    fn pointer_event_rejects(input: &str) {
        assert!(input.parse::<PointerEvent>().is_err());
    }
}
