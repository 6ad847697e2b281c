//! Pointer interaction state machine.
//!
//! A gesture is always in exactly one [`Interaction`] state. Each pointer
//! handler consumes the current state and returns the next one together with
//! an optional [`InteractionEvent`] describing what changed in the document.
//!
//! ```text
//! Idle --down on empty--> Creating --up--> Idle (polygon committed)
//! Idle --down on polygon--> Armed --move--> Moving --up--> Idle
//!                           Armed --up--> Rotating --down--> Idle (rotation committed)
//! ```

use crate::canvas::PolygonDocument;
use crate::settings::PolygonSettings;
use crate::shapes::{PolygonId, RegularPolygon};
use kurbo::{Point, Vec2};
use std::f64::consts::{PI, TAU};

/// Pointer travel (canvas units) before an armed polygon starts moving.
pub const DRAG_THRESHOLD: f64 = 2.0;
/// Polygons drawn smaller than this are discarded on release.
pub const MIN_RADIUS: f64 = 1.0;

/// Angle of `pointer` around `center`, in `(-π, π]`.
pub fn pointer_angle(center: Point, pointer: Point) -> f64 {
    (pointer - center).atan2()
}

/// Wrap an angle into `(-π, π]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// Rotation of `pointer` around `center` relative to `lock_angle`.
pub fn rotation_delta(center: Point, pointer: Point, lock_angle: f64) -> f64 {
    normalize_angle(pointer_angle(center, pointer) - lock_angle)
}

/// Radius of the rubber-band polygon: the horizontal extent of the drag.
pub fn rubber_band_radius(anchor: Point, current: Point) -> f64 {
    (current.x - anchor.x).abs()
}

/// State of the current pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Drawing a new polygon centered on `anchor`.
    Creating { anchor: Point, current: Point },
    /// A polygon was pressed; a drag moves it, a release starts rotating it.
    Armed {
        id: PolygonId,
        anchor: Point,
        drag_offset: Vec2,
    },
    /// Dragging a polygon; its center stays `drag_offset` behind the pointer.
    Moving { id: PolygonId, drag_offset: Vec2 },
    /// Rotation lock engaged; pointer movement previews the rotation until the
    /// next press commits it.
    Rotating {
        id: PolygonId,
        lock_angle: f64,
        pointer: Point,
    },
}

/// Document-level outcome of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionEvent {
    /// A polygon was pressed and is pending a drag or release.
    Armed(PolygonId),
    /// A new polygon was appended.
    Created(PolygonId),
    /// A polygon center moved.
    Moved { id: PolygonId, center: Point },
    /// A drag ended.
    MoveFinished(PolygonId),
    /// Rotation lock engaged on a polygon.
    RotationStarted { id: PolygonId, lock_angle: f64 },
    /// A rotation was applied to the polygon's start angle.
    Rotated { id: PolygonId, delta: f64 },
    /// The gesture was abandoned without changing the document.
    Cancelled,
}

/// Preview of a rotation in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationPreview {
    pub id: PolygonId,
    pub center: Point,
    pub radius: f64,
    /// Rotation relative to the polygon's stored start angle.
    pub delta: f64,
    pub pointer: Point,
}

type Transition = (Interaction, Option<InteractionEvent>);

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    /// Polygon targeted by the gesture, if any.
    pub fn target(&self) -> Option<PolygonId> {
        match *self {
            Interaction::Armed { id, .. }
            | Interaction::Moving { id, .. }
            | Interaction::Rotating { id, .. } => Some(id),
            Interaction::Idle | Interaction::Creating { .. } => None,
        }
    }

    /// Primary button pressed at `point`.
    pub fn pointer_down(self, point: Point, document: &mut PolygonDocument) -> Transition {
        match self {
            Interaction::Rotating { id, lock_angle, .. } => {
                let Some(center) = document.get(id).map(|p| p.center) else {
                    log::debug!("Rotating polygon {id} vanished, back to idle");
                    return (Interaction::Idle, Some(InteractionEvent::Cancelled));
                };
                let delta = rotation_delta(center, point, lock_angle);
                document.rotate_polygon(id, delta);
                log::info!("Rotated polygon {id} by {:.1}°", delta.to_degrees());
                (Interaction::Idle, Some(InteractionEvent::Rotated { id, delta }))
            }
            Interaction::Idle => Self::press_idle(point, document),
            stale => {
                log::warn!("Pointer down during {stale:?}, restarting gesture");
                Self::press_idle(point, document)
            }
        }
    }

    fn press_idle(point: Point, document: &PolygonDocument) -> Transition {
        match document.polygon_at(point) {
            Some(polygon) => {
                let id = polygon.id();
                log::debug!("Armed polygon {id}");
                (
                    Interaction::Armed {
                        id,
                        anchor: point,
                        drag_offset: point - polygon.center,
                    },
                    Some(InteractionEvent::Armed(id)),
                )
            }
            None => (
                Interaction::Creating {
                    anchor: point,
                    current: point,
                },
                None,
            ),
        }
    }

    /// Pointer moved to `point`.
    pub fn pointer_move(self, point: Point, document: &mut PolygonDocument) -> Transition {
        match self {
            Interaction::Armed {
                id,
                anchor,
                drag_offset,
            } => {
                if (point - anchor).hypot() <= DRAG_THRESHOLD {
                    return (self, None);
                }
                log::debug!("Moving polygon {id}");
                Interaction::Moving { id, drag_offset }.pointer_move(point, document)
            }
            Interaction::Moving { id, drag_offset } => {
                let center = point - drag_offset;
                if document.move_polygon(id, center) {
                    (self, Some(InteractionEvent::Moved { id, center }))
                } else {
                    (Interaction::Idle, Some(InteractionEvent::Cancelled))
                }
            }
            Interaction::Creating { anchor, .. } => (
                Interaction::Creating {
                    anchor,
                    current: point,
                },
                None,
            ),
            Interaction::Rotating { id, lock_angle, .. } => (
                Interaction::Rotating {
                    id,
                    lock_angle,
                    pointer: point,
                },
                None,
            ),
            Interaction::Idle => (self, None),
        }
    }

    /// Primary button released at `point`.
    pub fn pointer_up(
        self,
        point: Point,
        document: &mut PolygonDocument,
        settings: &PolygonSettings,
    ) -> Transition {
        match self {
            Interaction::Creating { anchor, .. } => {
                let radius = rubber_band_radius(anchor, point);
                if radius < MIN_RADIUS {
                    log::debug!("Discarding degenerate polygon at {anchor:?}");
                    return (Interaction::Idle, Some(InteractionEvent::Cancelled));
                }
                match settings.build_polygon(anchor, radius) {
                    Ok(polygon) => {
                        let id = document.add_polygon(polygon);
                        log::info!(
                            "Created {}-gon {id} at ({:.0}, {:.0}) r={radius:.1}",
                            settings.sides(),
                            anchor.x,
                            anchor.y
                        );
                        (Interaction::Idle, Some(InteractionEvent::Created(id)))
                    }
                    Err(e) => {
                        log::warn!("Could not create polygon: {e}");
                        (Interaction::Idle, Some(InteractionEvent::Cancelled))
                    }
                }
            }
            Interaction::Armed { id, .. } => match document.get(id) {
                Some(polygon) => {
                    let lock_angle = pointer_angle(polygon.center, point);
                    log::debug!(
                        "Rotation lock engaged on {id} at {:.1}°",
                        lock_angle.to_degrees()
                    );
                    (
                        Interaction::Rotating {
                            id,
                            lock_angle,
                            pointer: point,
                        },
                        Some(InteractionEvent::RotationStarted { id, lock_angle }),
                    )
                }
                None => (Interaction::Idle, Some(InteractionEvent::Cancelled)),
            },
            Interaction::Moving { id, .. } => {
                (Interaction::Idle, Some(InteractionEvent::MoveFinished(id)))
            }
            Interaction::Rotating { .. } | Interaction::Idle => (self, None),
        }
    }

    /// Abandon the gesture. Moves already applied stay applied; a pending
    /// rotation is dropped.
    pub fn cancel(self) -> Transition {
        if self.is_idle() {
            (self, None)
        } else {
            log::debug!("Cancelled {self:?}");
            (Interaction::Idle, Some(InteractionEvent::Cancelled))
        }
    }

    /// Rubber-band polygon while creating.
    pub fn preview_polygon(&self, settings: &PolygonSettings) -> Option<RegularPolygon> {
        match *self {
            Interaction::Creating { anchor, current } => settings
                .build_polygon(anchor, rubber_band_radius(anchor, current))
                .ok(),
            _ => None,
        }
    }

    /// Rotation preview while the rotation lock is engaged.
    pub fn rotation_preview(&self, document: &PolygonDocument) -> Option<RotationPreview> {
        match *self {
            Interaction::Rotating {
                id,
                lock_angle,
                pointer,
            } => document.get(id).map(|polygon| RotationPreview {
                id,
                center: polygon.center,
                radius: polygon.radius(),
                delta: rotation_delta(polygon.center, pointer, lock_angle),
                pointer,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn doc_with_square(center: Point, radius: f64) -> (PolygonDocument, PolygonId) {
        let mut doc = PolygonDocument::new();
        let polygon = RegularPolygon::new(center, radius, 4, 0.0).unwrap();
        let id = doc.add_polygon(polygon);
        (doc, id)
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(3.0 * PI) - PI).abs() < EPS);
        assert!((normalize_angle(-PI) - PI).abs() < EPS);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < EPS);
        assert!(normalize_angle(TAU).abs() < EPS);
    }

    #[test]
    fn test_pointer_angle_all_quadrants() {
        let c = Point::new(10.0, 10.0);
        assert!(pointer_angle(c, Point::new(20.0, 10.0)).abs() < EPS);
        assert!((pointer_angle(c, Point::new(10.0, 20.0)) - PI / 2.0).abs() < EPS);
        assert!((pointer_angle(c, Point::new(0.0, 10.0)) - PI).abs() < EPS);
        assert!((pointer_angle(c, Point::new(10.0, 0.0)) + PI / 2.0).abs() < EPS);
    }

    #[test]
    fn test_rotation_delta_across_vertical() {
        let c = Point::ZERO;
        let lock = pointer_angle(c, Point::new(10.0, 0.0));
        // Directly left of center: a half turn, which a two-quadrant arctangent reports as 0.
        let delta = rotation_delta(c, Point::new(-10.0, 0.0), lock);
        assert!((delta.abs() - PI).abs() < EPS);
        // Straight below is a quarter turn clockwise in y-down coordinates.
        let delta = rotation_delta(c, Point::new(0.0, 10.0), lock);
        assert!((delta - PI / 2.0).abs() < EPS);
    }

    #[test]
    fn test_down_on_empty_creates() {
        let mut doc = PolygonDocument::new();
        let (state, event) = Interaction::Idle.pointer_down(Point::new(5.0, 5.0), &mut doc);
        assert_eq!(
            state,
            Interaction::Creating {
                anchor: Point::new(5.0, 5.0),
                current: Point::new(5.0, 5.0)
            }
        );
        assert!(event.is_none());
    }

    #[test]
    fn test_create_commits_on_up() {
        let mut doc = PolygonDocument::new();
        let settings = PolygonSettings::new();
        let anchor = Point::new(100.0, 100.0);

        let (state, _) = Interaction::Idle.pointer_down(anchor, &mut doc);
        let (state, _) = state.pointer_move(Point::new(140.0, 130.0), &mut doc);
        let preview = state.preview_polygon(&settings).unwrap();
        assert!((preview.radius - 40.0).abs() < EPS);
        assert!(doc.is_empty());

        let (state, event) = state.pointer_up(Point::new(160.0, 90.0), &mut doc, &settings);
        assert!(state.is_idle());
        let Some(InteractionEvent::Created(id)) = event else {
            panic!("expected Created, got {event:?}");
        };
        let polygon = doc.get(id).unwrap();
        assert_eq!(polygon.center, anchor);
        assert!((polygon.radius() - 60.0).abs() < EPS);
        assert_eq!(polygon.sides(), settings.sides());
    }

    #[test]
    fn test_click_without_drag_creates_nothing() {
        let mut doc = PolygonDocument::new();
        let settings = PolygonSettings::new();
        let p = Point::new(10.0, 10.0);
        let (state, _) = Interaction::Idle.pointer_down(p, &mut doc);
        let (state, event) = state.pointer_up(p, &mut doc, &settings);
        assert!(state.is_idle());
        assert_eq!(event, Some(InteractionEvent::Cancelled));
        assert!(doc.is_empty());
    }

    #[test]
    fn test_drag_moves_with_offset() {
        let (mut doc, id) = doc_with_square(Point::new(100.0, 100.0), 50.0);
        let settings = PolygonSettings::new();

        let (state, event) = Interaction::Idle.pointer_down(Point::new(110.0, 105.0), &mut doc);
        assert_eq!(event, Some(InteractionEvent::Armed(id)));
        assert_eq!(state.target(), Some(id));

        // Within the threshold the polygon stays armed.
        let (state, event) = state.pointer_move(Point::new(111.0, 105.0), &mut doc);
        assert!(matches!(state, Interaction::Armed { .. }));
        assert!(event.is_none());

        let (state, event) = state.pointer_move(Point::new(210.0, 305.0), &mut doc);
        assert!(matches!(state, Interaction::Moving { .. }));
        assert_eq!(
            event,
            Some(InteractionEvent::Moved {
                id,
                center: Point::new(200.0, 300.0)
            })
        );
        assert_eq!(doc.get(id).unwrap().center, Point::new(200.0, 300.0));

        let (state, event) = state.pointer_up(Point::new(210.0, 305.0), &mut doc, &settings);
        assert!(state.is_idle());
        assert_eq!(event, Some(InteractionEvent::MoveFinished(id)));
    }

    #[test]
    fn test_click_engages_rotation_and_second_click_commits() {
        let (mut doc, id) = doc_with_square(Point::new(100.0, 100.0), 60.0);
        let settings = PolygonSettings::new();

        let (state, _) = Interaction::Idle.pointer_down(Point::new(120.0, 100.0), &mut doc);
        let (state, event) = state.pointer_up(Point::new(120.0, 100.0), &mut doc, &settings);
        assert!(matches!(state, Interaction::Rotating { .. }));
        assert_eq!(
            event,
            Some(InteractionEvent::RotationStarted { id, lock_angle: 0.0 })
        );

        let (state, _) = state.pointer_move(Point::new(100.0, 130.0), &mut doc);
        let preview = state.rotation_preview(&doc).unwrap();
        assert!((preview.delta - PI / 2.0).abs() < EPS);
        // Preview does not touch the stored angle.
        assert!(doc.get(id).unwrap().start_angle.abs() < EPS);

        // Releasing while locked keeps the lock.
        let (state, event) = state.pointer_up(Point::new(100.0, 130.0), &mut doc, &settings);
        assert!(matches!(state, Interaction::Rotating { .. }));
        assert!(event.is_none());

        let (state, event) = state.pointer_down(Point::new(100.0, 130.0), &mut doc);
        assert!(state.is_idle());
        let Some(InteractionEvent::Rotated { delta, .. }) = event else {
            panic!("expected Rotated, got {event:?}");
        };
        assert!((delta - PI / 2.0).abs() < EPS);
        assert!((doc.get(id).unwrap().start_angle - PI / 2.0).abs() < EPS);
    }

    #[test]
    fn test_rotation_round_trip_through_state_machine() {
        let (mut doc, id) = doc_with_square(Point::ZERO, 60.0);
        let settings = PolygonSettings::new();
        let spin = |doc: &mut PolygonDocument, from: Point, to: Point| {
            let (s, _) = Interaction::Idle.pointer_down(from, doc);
            let (s, _) = s.pointer_up(from, doc, &settings);
            let (s, _) = s.pointer_move(to, doc);
            s.pointer_down(to, doc)
        };

        spin(&mut doc, Point::new(20.0, 0.0), Point::new(0.0, 20.0));
        spin(&mut doc, Point::new(0.0, 20.0), Point::new(20.0, 0.0));
        assert!(doc.get(id).unwrap().start_angle.abs() < EPS);
    }

    #[test]
    fn test_cancel_discards_rotation() {
        let (doc, id) = doc_with_square(Point::ZERO, 60.0);
        let state = Interaction::Rotating {
            id,
            lock_angle: 0.0,
            pointer: Point::new(0.0, 20.0),
        };
        let (state, event) = state.cancel();
        assert!(state.is_idle());
        assert_eq!(event, Some(InteractionEvent::Cancelled));
        assert!(doc.get(id).unwrap().start_angle.abs() < EPS);
        assert_eq!(Interaction::Idle.cancel(), (Interaction::Idle, None));
    }

    #[test]
    fn test_stale_gesture_restarts_on_down() {
        let mut doc = PolygonDocument::new();
        let stale = Interaction::Creating {
            anchor: Point::ZERO,
            current: Point::new(5.0, 0.0),
        };
        let (state, _) = stale.pointer_down(Point::new(50.0, 50.0), &mut doc);
        assert_eq!(
            state,
            Interaction::Creating {
                anchor: Point::new(50.0, 50.0),
                current: Point::new(50.0, 50.0)
            }
        );
    }

    #[test]
    fn test_target_missing_after_clear() {
        let (mut doc, id) = doc_with_square(Point::ZERO, 60.0);
        let state = Interaction::Moving {
            id,
            drag_offset: Vec2::ZERO,
        };
        doc.clear();
        let (state, event) = state.pointer_move(Point::new(1.0, 1.0), &mut doc);
        assert!(state.is_idle());
        assert_eq!(event, Some(InteractionEvent::Cancelled));
    }
}
