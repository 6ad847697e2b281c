//! Canvas document and state management.

use crate::input::{MouseButton, PointerEvent};
use crate::interaction::{Interaction, InteractionEvent, RotationPreview};
use crate::settings::PolygonSettings;
use crate::shapes::{PolygonId, RegularPolygon};
use kurbo::{Point, Size};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// All polygons drawn on the canvas, back to front.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygonDocument {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    /// Polygons in insertion order, which is also their z-order.
    #[serde(deserialize_with = "unique_polygons")]
    polygons: Vec<RegularPolygon>,
    /// Bumped on every mutation.
    #[serde(skip)]
    revision: u64,
}

/// Reject snapshots in which two polygons share an id.
fn unique_polygons<'de, D>(deserializer: D) -> Result<Vec<RegularPolygon>, D::Error>
where
    D: Deserializer<'de>,
{
    let polygons = Vec::<RegularPolygon>::deserialize(deserializer)?;
    let mut seen = HashSet::with_capacity(polygons.len());
    for polygon in &polygons {
        if !seen.insert(polygon.id()) {
            return Err(serde::de::Error::custom(format!(
                "duplicate polygon id {}",
                polygon.id()
            )));
        }
    }
    Ok(polygons)
}

impl Default for PolygonDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PolygonDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            polygons: Vec::new(),
            revision: 0,
        }
    }

    /// Mutation counter. Two equal revisions of the same document render the same.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Append a polygon on top of all others.
    ///
    /// A polygon whose id is already taken (a clone of one on the canvas)
    /// gets a fresh id.
    pub fn add_polygon(&mut self, mut polygon: RegularPolygon) -> PolygonId {
        if self.get(polygon.id()).is_some() {
            polygon.id = Uuid::new_v4();
            log::debug!("Reassigned duplicate polygon id to {}", polygon.id);
        }
        let id = polygon.id();
        self.polygons.push(polygon);
        self.touch();
        id
    }

    /// Remove every polygon.
    pub fn clear(&mut self) {
        self.polygons.clear();
        self.touch();
    }

    pub fn get(&self, id: PolygonId) -> Option<&RegularPolygon> {
        self.polygons.iter().find(|p| p.id() == id)
    }

    /// Move a polygon's center. Returns false if the polygon is gone.
    pub fn move_polygon(&mut self, id: PolygonId, center: Point) -> bool {
        let Some(polygon) = self.polygons.iter_mut().find(|p| p.id() == id) else {
            return false;
        };
        polygon.translate_to(center);
        self.touch();
        true
    }

    /// Add `delta` radians to a polygon's start angle. Returns false if the polygon is gone.
    pub fn rotate_polygon(&mut self, id: PolygonId, delta: f64) -> bool {
        let Some(polygon) = self.polygons.iter_mut().find(|p| p.id() == id) else {
            return false;
        };
        polygon.rotate_by(delta);
        self.touch();
        true
    }

    /// Polygons back to front.
    pub fn polygons(&self) -> impl Iterator<Item = &RegularPolygon> {
        self.polygons.iter()
    }

    /// Topmost polygon containing `point`.
    pub fn polygon_at(&self, point: Point) -> Option<&RegularPolygon> {
        self.polygons.iter().rev().find(|p| p.hit_test(point))
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Runtime canvas state (not persisted).
#[derive(Debug, Clone)]
pub struct Canvas {
    /// The document being edited.
    pub document: PolygonDocument,
    /// Current pointer gesture.
    interaction: Interaction,
    /// Control values for new polygons.
    pub settings: PolygonSettings,
    /// Viewport size.
    pub viewport_size: Size,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a new canvas with an empty document.
    pub fn new() -> Self {
        Self::with_document(PolygonDocument::new())
    }

    /// Create a canvas with an existing document.
    pub fn with_document(document: PolygonDocument) -> Self {
        Self {
            document,
            interaction: Interaction::Idle,
            settings: PolygonSettings::default(),
            viewport_size: Size::new(800.0, 600.0),
        }
    }

    /// Set the viewport size.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_size = Size::new(width, height);
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    /// Feed a pointer event through the interaction state machine.
    ///
    /// Only the left button drives gestures.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<InteractionEvent> {
        match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => self.pointer_down(position),
            PointerEvent::Up {
                position,
                button: MouseButton::Left,
            } => self.pointer_up(position),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Down { .. } | PointerEvent::Up { .. } => None,
        }
    }

    pub fn pointer_down(&mut self, point: Point) -> Option<InteractionEvent> {
        let (next, event) = self.interaction.pointer_down(point, &mut self.document);
        self.interaction = next;
        event
    }

    pub fn pointer_move(&mut self, point: Point) -> Option<InteractionEvent> {
        let (next, event) = self.interaction.pointer_move(point, &mut self.document);
        self.interaction = next;
        event
    }

    pub fn pointer_up(&mut self, point: Point) -> Option<InteractionEvent> {
        let (next, event) = self
            .interaction
            .pointer_up(point, &mut self.document, &self.settings);
        self.interaction = next;
        event
    }

    /// Abandon the current gesture.
    pub fn cancel(&mut self) -> Option<InteractionEvent> {
        let (next, event) = self.interaction.cancel();
        self.interaction = next;
        event
    }

    /// Remove every polygon and reset the gesture.
    pub fn erase_all(&mut self) {
        log::info!("Erasing {} polygons", self.document.len());
        self.document.clear();
        self.interaction = Interaction::Idle;
    }

    /// Rubber-band polygon while creating.
    pub fn preview_polygon(&self) -> Option<RegularPolygon> {
        self.interaction.preview_polygon(&self.settings)
    }

    /// Rotation in progress, if the rotation lock is engaged.
    pub fn rotation_preview(&self) -> Option<RotationPreview> {
        self.interaction.rotation_preview(&self.document)
    }

    /// Creation anchor to draw guidewires through, when enabled.
    pub fn guidewire_anchor(&self) -> Option<Point> {
        match self.interaction {
            Interaction::Creating { anchor, .. } if self.settings.guidewires => Some(anchor),
            _ => None,
        }
    }
}
