//! Shape definitions for the polygon canvas.

mod polygon;

pub use polygon::RegularPolygon;

use peniko::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Minimum number of sides for a regular polygon.
pub const MIN_SIDES: u32 = 3;

/// Errors raised when constructing or editing shapes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("A polygon needs at least 3 sides, got {0}")]
    TooFewSides(u32),
    #[error("Invalid polygon radius: {0}")]
    InvalidRadius(f64),
}

/// Result type for shape operations.
pub type ShapeResult<T> = Result<T, ShapeError>;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// CSS `navy`.
    pub const fn navy() -> Self {
        Self::new(0, 0, 128, 255)
    }

    /// CSS `cornflowerblue`.
    pub const fn cornflower_blue() -> Self {
        Self::new(100, 149, 237, 255)
    }

    /// Scale the alpha channel by `opacity` (clamped to `[0, 1]`).
    pub fn with_opacity(self, opacity: f64) -> Self {
        let alpha = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a: alpha, ..self }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties for polygons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width.
    pub stroke_width: f64,
    /// Fill color, used when `filled` is set.
    pub fill_color: SerializableColor,
    /// Whether the interior is painted.
    pub filled: bool,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl PolygonStyle {
    /// Get the stroke color with opacity applied.
    pub fn stroke_with_opacity(&self) -> Color {
        self.stroke_color.with_opacity(self.opacity).into()
    }

    /// Get the fill color with opacity applied, or `None` for outline-only polygons.
    pub fn fill_with_opacity(&self) -> Option<Color> {
        self.filled
            .then(|| self.fill_color.with_opacity(self.opacity).into())
    }
}

impl Default for PolygonStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::navy(),
            stroke_width: 1.0,
            fill_color: SerializableColor::cornflower_blue(),
            filled: true,
            opacity: 1.0,
        }
    }
}

/// Unique identifier for polygons.
pub type PolygonId = Uuid;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_opacity() {
        let c = SerializableColor::new(10, 20, 30, 200).with_opacity(0.5);
        assert_eq!(c, SerializableColor::new(10, 20, 30, 100));
        let c = SerializableColor::new(0, 0, 0, 255).with_opacity(3.0);
        assert_eq!(c.a, 255);
    }

    #[test]
    fn test_outline_style_has_no_fill() {
        let style = PolygonStyle {
            filled: false,
            ..Default::default()
        };
        assert!(style.fill_with_opacity().is_none());
        assert!(PolygonStyle::default().fill_with_opacity().is_some());
    }
}
