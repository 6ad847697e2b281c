//! PolyDraw Core Library
//!
//! Platform-agnostic data structures and interaction logic for drawing,
//! dragging and rotating regular polygons.

pub mod canvas;
pub mod dial;
pub mod input;
pub mod interaction;
pub mod settings;
pub mod shapes;

pub use canvas::{Canvas, PolygonDocument};
pub use dial::{DialLabel, RotationDial, Tick};
pub use input::{InputState, Modifiers, MouseButton, PointerEvent};
pub use interaction::{Interaction, InteractionEvent, RotationPreview};
pub use settings::{PolygonSettings, SettingsError};
pub use shapes::{PolygonId, PolygonStyle, RegularPolygon, SerializableColor, ShapeError};
