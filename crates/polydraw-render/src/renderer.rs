//! Renderer trait abstraction.

use kurbo::Size;
use peniko::Color;
use polydraw_core::canvas::Canvas;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Spacing of the background grid, in canvas units.
pub const DEFAULT_GRID_SPACING: f64 = 10.0;

/// Grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GridStyle {
    /// No grid (plain background).
    None,
    /// Full grid lines.
    #[default]
    Lines,
}

impl GridStyle {
    /// Cycle to the next grid style.
    pub fn next(self) -> Self {
        match self {
            GridStyle::None => GridStyle::Lines,
            GridStyle::Lines => GridStyle::None,
        }
    }

    /// Get display name for this grid style.
    pub fn name(self) -> &'static str {
        match self {
            GridStyle::None => "None",
            GridStyle::Lines => "Lines",
        }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Viewport size in logical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Background color.
    pub background_color: Color,
    /// Grid display style.
    pub grid_style: GridStyle,
    /// Distance between grid lines.
    pub grid_spacing: f64,
    /// Draw crosshair guidewires through the creation anchor.
    pub guidewires: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(canvas: &'a Canvas, viewport_size: Size) -> Self {
        Self {
            canvas,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::WHITE,
            grid_style: GridStyle::Lines,
            grid_spacing: DEFAULT_GRID_SPACING,
            guidewires: true,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the grid style.
    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    /// Set the grid spacing. Non-positive values fall back to the default.
    pub fn with_grid_spacing(mut self, spacing: f64) -> Self {
        self.grid_spacing = if spacing > 0.0 {
            spacing
        } else {
            DEFAULT_GRID_SPACING
        };
        self
    }

    /// Enable or disable creation guidewires.
    pub fn with_guidewires(mut self, enabled: bool) -> Self {
        self.guidewires = enabled;
        self
    }
}

/// Trait for rendering backends.
///
/// Implementations can use Vello, wgpu directly, or other rendering engines.
pub trait Renderer: Send + Sync {
    /// Build the scene/command buffer for a frame.
    ///
    /// This method is called once per frame and should prepare all drawing commands.
    fn build_scene(&mut self, ctx: &RenderContext);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_style_cycle() {
        assert_eq!(GridStyle::default(), GridStyle::Lines);
        assert_eq!(GridStyle::Lines.next(), GridStyle::None);
        assert_eq!(GridStyle::None.next().name(), "Lines");
    }

    #[test]
    fn test_context_builders() {
        let canvas = Canvas::new();
        let ctx = RenderContext::new(&canvas, Size::new(640.0, 480.0))
            .with_scale_factor(2.0)
            .with_grid(GridStyle::None)
            .with_grid_spacing(-3.0)
            .with_guidewires(false);
        assert_eq!(ctx.scale_factor, 2.0);
        assert_eq!(ctx.grid_style, GridStyle::None);
        assert_eq!(ctx.grid_spacing, DEFAULT_GRID_SPACING);
        assert!(!ctx.guidewires);
    }
}
