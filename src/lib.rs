//! A color wheel picker engine: paints a hue/lightness wheel onto a raster,
//! samples it under the pointer, and keeps RGB, HSL and hex views of the
//! picked color in step.

pub mod color;
pub mod error;
pub mod hex;
pub mod hsl;
pub mod picker;
pub mod surface;
pub mod wheel;

pub use color::{darken, lighten, to_decimal, to_number, Color, ColorFormat, Percentage, RgbColor};
pub use error::{ColorError, Result};
pub use hex::{hex_to_rgb, hex_to_rgba, rgb_to_hex, rgb_to_hex_alpha, HexColor};
pub use hsl::{hsl_to_hex, hsl_to_rgb, rgb_to_hsl, HslColor};
pub use picker::{DragState, PickedColor, PickerController, PointerEvent};
pub use surface::{PixelBuffer, RadialGradient, RasterSurface, Sector, Sweep};
pub use wheel::{compute_geometry, paint, WheelGeometry, WheelRenderer};
