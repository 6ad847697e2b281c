//! Regular polygon shape.

use super::{MIN_SIDES, PolygonId, PolygonStyle, ShapeError, ShapeResult};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use uuid::Uuid;

/// A regular polygon: `sides` vertices evenly spaced on a circle of `radius`
/// around `center`, the first one at `start_angle`.
///
/// Snapshots go through the same checks as [`RegularPolygon::new`] when loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolygonRecord")]
pub struct RegularPolygon {
    pub(crate) id: PolygonId,
    /// Center point.
    pub center: Point,
    /// Distance from the center to every vertex.
    pub(crate) radius: f64,
    /// Number of sides (at least 3).
    sides: u32,
    /// Angle of the first vertex in radians.
    pub start_angle: f64,
    /// Style properties.
    pub style: PolygonStyle,
}

impl RegularPolygon {
    /// Create a new polygon with the default style.
    pub fn new(center: Point, radius: f64, sides: u32, start_angle: f64) -> ShapeResult<Self> {
        if sides < MIN_SIDES {
            return Err(ShapeError::TooFewSides(sides));
        }
        if !radius.is_finite() || radius < 0.0 {
            return Err(ShapeError::InvalidRadius(radius));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            center,
            radius,
            sides,
            start_angle,
            style: PolygonStyle::default(),
        })
    }

    /// Builder-style setter for the style.
    pub fn with_style(mut self, style: PolygonStyle) -> Self {
        self.style = style;
        self
    }

    pub fn id(&self) -> PolygonId {
        self.id
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Vertices in drawing order, starting at `start_angle`.
    pub fn vertices(&self) -> Vec<Point> {
        let step = TAU / self.sides as f64;
        (0..self.sides)
            .map(|i| {
                let angle = self.start_angle + i as f64 * step;
                self.center + Vec2::from_angle(angle) * self.radius
            })
            .collect()
    }

    /// Closed outline through all vertices.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut vertices = self.vertices().into_iter();
        if let Some(first) = vertices.next() {
            path.move_to(first);
            for vertex in vertices {
                path.line_to(vertex);
            }
            path.close_path();
        }
        path
    }

    /// Whether `point` lies inside the filled outline (nonzero winding).
    ///
    /// Outline-only polygons are hit inside as well, so an unfilled polygon
    /// can still be grabbed by its interior.
    pub fn hit_test(&self, point: Point) -> bool {
        // Cheap reject before the winding computation.
        if (point - self.center).hypot() > self.radius {
            return false;
        }
        self.to_path().contains(point)
    }

    /// Axis-aligned bounds of the vertices.
    pub fn bounds(&self) -> Rect {
        self.to_path().bounding_box()
    }

    /// Move the polygon so its center is at `center`.
    pub fn translate_to(&mut self, center: Point) {
        self.center = center;
    }

    /// Rotate around the center by `delta` radians.
    pub fn rotate_by(&mut self, delta: f64) {
        self.start_angle += delta;
    }

    /// A copy rotated by `delta` radians, keeping the same id.
    pub fn rotated(&self, delta: f64) -> Self {
        let mut copy = self.clone();
        copy.rotate_by(delta);
        copy
    }
}

/// A polygon as stored in a snapshot, before validation.
#[derive(Deserialize)]
struct PolygonRecord {
    id: PolygonId,
    center: Point,
    radius: f64,
    sides: u32,
    start_angle: f64,
    style: PolygonStyle,
}

impl TryFrom<PolygonRecord> for RegularPolygon {
    type Error = ShapeError;

    fn try_from(record: PolygonRecord) -> ShapeResult<Self> {
        let polygon = Self::new(record.center, record.radius, record.sides, record.start_angle)?;
        Ok(Self {
            id: record.id,
            style: record.style,
            ..polygon
        })
    }
}
