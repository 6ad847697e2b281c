//! Geometry of the rotation dial drawn around a rotating polygon.
//!
//! The dial is a degree ring with ticks and labels, a tracking ring further
//! out, and a guidewire from the polygon center to a knob on the tracking ring
//! that follows the current rotation.

use kurbo::{Point, Vec2};
use std::f64::consts::TAU;

/// Polygons with a radius at or below this get no dial.
pub const ANNOTATION_MIN_RADIUS: f64 = 50.0;
/// Radius of the centroid marker.
pub const CENTROID_RADIUS: f64 = 10.0;
/// Distance from the polygon outline to the degree ring.
pub const DEGREE_RING_MARGIN: f64 = 35.0;
/// Distance from the polygon outline to the tracking ring.
pub const TRACKING_RING_MARGIN: f64 = 55.0;
/// Length of a long tick. Short ticks are half as long.
pub const TICK_WIDTH: f64 = 10.0;
/// Ticks per full turn (one every 2π/64).
pub const TICK_COUNT: usize = 64;
/// Every n-th tick is a long tick.
pub const LONG_TICK_EVERY: usize = 4;
/// Degree labels per full turn (one every π/8).
pub const LABEL_COUNT: usize = 16;
/// Radius of the knob at the end of the centroid guidewire.
pub const KNOB_RADIUS: f64 = 5.0;

/// A single tick mark, from `inner` to `outer`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub inner: Point,
    pub outer: Point,
    pub long: bool,
}

/// A numeric degree label centered on `position`.
#[derive(Debug, Clone, PartialEq)]
pub struct DialLabel {
    pub position: Point,
    pub degrees: u32,
}

impl DialLabel {
    pub fn text(&self) -> String {
        self.degrees.to_string()
    }
}

/// Dial around a polygon being rotated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationDial {
    /// Polygon center.
    pub center: Point,
    /// Polygon radius the rings are offset from.
    pub polygon_radius: f64,
    /// Current rotation delta in radians.
    pub angle: f64,
}

impl RotationDial {
    /// Dial for a polygon, or `None` when the polygon is too small to annotate.
    pub fn new(center: Point, polygon_radius: f64, angle: f64) -> Option<Self> {
        Self::is_visible(polygon_radius).then_some(Self {
            center,
            polygon_radius,
            angle,
        })
    }

    pub fn is_visible(polygon_radius: f64) -> bool {
        polygon_radius > ANNOTATION_MIN_RADIUS
    }

    pub fn degree_ring_radius(&self) -> f64 {
        self.polygon_radius + DEGREE_RING_MARGIN
    }

    /// Ring drawn along the inner ends of the long ticks.
    pub fn tick_ring_radius(&self) -> f64 {
        self.degree_ring_radius() - TICK_WIDTH
    }

    pub fn tracking_ring_radius(&self) -> f64 {
        self.polygon_radius + TRACKING_RING_MARGIN
    }

    fn on_circle(&self, angle: f64, radius: f64) -> Point {
        self.center + Vec2::from_angle(angle) * radius
    }

    pub fn ticks(&self) -> Vec<Tick> {
        let outer_radius = self.degree_ring_radius();
        (0..TICK_COUNT)
            .map(|i| {
                let angle = i as f64 * TAU / TICK_COUNT as f64;
                let long = i % LONG_TICK_EVERY == 0;
                let length = if long { TICK_WIDTH } else { TICK_WIDTH / 2.0 };
                Tick {
                    inner: self.on_circle(angle, outer_radius - length),
                    outer: self.on_circle(angle, outer_radius),
                    long,
                }
            })
            .collect()
    }

    pub fn labels(&self) -> Vec<DialLabel> {
        let radius = self.degree_ring_radius() - TICK_WIDTH * 2.0;
        (0..LABEL_COUNT)
            .map(|i| {
                let angle = i as f64 * TAU / LABEL_COUNT as f64;
                DialLabel {
                    position: self.on_circle(angle, radius),
                    degrees: angle.to_degrees().round() as u32,
                }
            })
            .collect()
    }

    /// End of the centroid guidewire, on the tracking ring at the rotation angle.
    pub fn knob(&self) -> Point {
        self.on_circle(self.angle, self.tracking_ring_radius())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn dial(angle: f64) -> RotationDial {
        RotationDial::new(Point::new(200.0, 200.0), 80.0, angle).unwrap()
    }

    #[test]
    fn test_hidden_for_small_polygons() {
        assert!(RotationDial::new(Point::ZERO, 50.0, 0.0).is_none());
        assert!(RotationDial::new(Point::ZERO, 20.0, 0.0).is_none());
        assert!(RotationDial::new(Point::ZERO, 50.5, 0.0).is_some());
    }

    #[test]
    fn test_tick_counts() {
        let ticks = dial(0.0).ticks();
        assert_eq!(ticks.len(), 64);
        assert_eq!(ticks.iter().filter(|t| t.long).count(), 16);
        assert!(ticks[0].long);
        assert!(!ticks[1].long);
    }

    #[test]
    fn test_tick_lengths() {
        let d = dial(0.0);
        let ticks = d.ticks();
        let long = (ticks[0].outer - ticks[0].inner).hypot();
        let short = (ticks[1].outer - ticks[1].inner).hypot();
        assert!((long - TICK_WIDTH).abs() < 1e-9);
        assert!((short - TICK_WIDTH / 2.0).abs() < 1e-9);
        assert!(((ticks[5].outer - d.center).hypot() - 115.0).abs() < 1e-9);
    }

    #[test]
    fn test_labels() {
        let labels = dial(0.0).labels();
        assert_eq!(labels.len(), 16);
        let degrees: Vec<u32> = labels.iter().map(|l| l.degrees).collect();
        assert_eq!(degrees[0], 0);
        assert_eq!(degrees[1], 23);
        assert_eq!(degrees[4], 90);
        assert_eq!(degrees[8], 180);
        assert_eq!(labels[8].text(), "180");
        // Labels sit inside the tick ring.
        assert!(((labels[0].position.x - 200.0) - 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_knob_follows_angle() {
        let d = dial(PI / 2.0);
        let knob = d.knob();
        assert!((knob.x - 200.0).abs() < 1e-9);
        assert!((knob.y - (200.0 + 135.0)).abs() < 1e-9);

        let d = dial(PI);
        assert!((d.knob().x - (200.0 - 135.0)).abs() < 1e-9);
    }
}
