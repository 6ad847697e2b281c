//! Control values applied to newly drawn polygons.

use crate::shapes::{MIN_SIDES, PolygonStyle, RegularPolygon, SerializableColor, ShapeResult};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest opacity the opacity control allows, so polygons never vanish.
pub const MIN_OPACITY: f64 = 0.1;

/// Side counts offered by the sides control.
pub const SIDE_CHOICES: std::ops::RangeInclusive<u32> = MIN_SIDES..=12;

/// Start angles (degrees) offered by the start angle control.
pub const START_ANGLE_CHOICES: [i32; 8] = [0, 45, 90, 135, 180, 225, 270, 315];

/// Rejected control values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("Side count must be at least 3, got {0}")]
    InvalidSides(u32),
    #[error("Opacity must be a number, got {0}")]
    InvalidOpacity(f64),
}

/// Current values of the drawing controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonSettings {
    /// Side count for new polygons.
    sides: u32,
    /// Start angle for new polygons, in degrees.
    pub start_angle_degrees: f64,
    /// Stroke color for new polygons.
    pub stroke_color: SerializableColor,
    /// Fill color for new polygons.
    pub fill_color: SerializableColor,
    /// Whether new polygons are filled.
    pub filled: bool,
    /// Opacity for new polygons, in `[MIN_OPACITY, 1.0]`.
    opacity: f64,
    /// Draw crosshair guidewires through the anchor while creating.
    pub guidewires: bool,
}

impl Default for PolygonSettings {
    fn default() -> Self {
        Self {
            sides: 8,
            start_angle_degrees: 0.0,
            stroke_color: SerializableColor::navy(),
            fill_color: SerializableColor::cornflower_blue(),
            filled: true,
            opacity: 1.0,
            guidewires: true,
        }
    }
}

impl PolygonSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// Set the side count. Values below 3 are rejected and the old value kept.
    pub fn set_sides(&mut self, sides: u32) -> Result<(), SettingsError> {
        if sides < MIN_SIDES {
            return Err(SettingsError::InvalidSides(sides));
        }
        self.sides = sides;
        Ok(())
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Set the opacity, clamped to `[MIN_OPACITY, 1.0]`. NaN is rejected.
    pub fn set_opacity(&mut self, opacity: f64) -> Result<(), SettingsError> {
        if opacity.is_nan() {
            return Err(SettingsError::InvalidOpacity(opacity));
        }
        self.opacity = opacity.clamp(MIN_OPACITY, 1.0);
        Ok(())
    }

    /// Start angle in radians.
    pub fn start_angle(&self) -> f64 {
        self.start_angle_degrees.to_radians()
    }

    /// Style applied to new polygons.
    pub fn style(&self) -> PolygonStyle {
        PolygonStyle {
            stroke_color: self.stroke_color,
            fill_color: self.fill_color,
            filled: self.filled,
            opacity: self.opacity,
            ..PolygonStyle::default()
        }
    }

    /// Build a polygon from the current settings.
    pub fn build_polygon(&self, center: Point, radius: f64) -> ShapeResult<RegularPolygon> {
        let polygon = RegularPolygon::new(center, radius, self.sides, self.start_angle())?;
        Ok(polygon.with_style(self.style()))
    }
}
