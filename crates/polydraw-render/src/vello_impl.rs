//! Vello-based renderer implementation.

use crate::renderer::{GridStyle, RenderContext, Renderer};
use kurbo::{Affine, BezPath, Circle, Line, Point, Rect, Size, Stroke, Vec2};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, FontFamily, FontStack, Layout, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use polydraw_core::dial::{KNOB_RADIUS, RotationDial, CENTROID_RADIUS};
use polydraw_core::interaction::RotationPreview;
use polydraw_core::shapes::{PolygonId, RegularPolygon};
use vello::Scene;

/// Bundled so dial labels render on platforms without system fonts (WASM).
static DEJAVU_SANS: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

const GRID_COLOR: Color = Color::from_rgba8(211, 211, 211, 255);
const GRID_LINE_WIDTH: f64 = 0.5;
const GUIDEWIRE_COLOR: Color = Color::from_rgba8(0, 0, 230, 102);
const GUIDEWIRE_WIDTH: f64 = 0.5;
const CENTROID_STROKE: Color = Color::from_rgba8(0, 0, 0, 204);
const CENTROID_FILL: Color = Color::from_rgba8(255, 255, 255, 51);
const RING_STROKE: Color = Color::from_rgba8(0, 0, 0, 26);
const DIAL_FILL: Color = Color::from_rgba8(100, 140, 230, 26);
const TRACKING_RING_STROKE: Color = Color::from_rgba8(100, 140, 230, 77);
const TICK_LONG_STROKE: Color = Color::from_rgba8(100, 140, 230, 230);
const TICK_SHORT_STROKE: Color = Color::from_rgba8(100, 140, 230, 179);
const LABEL_COLOR: Color = Color::from_rgba8(0, 0, 230, 204);
const LABEL_FONT_SIZE: f32 = 11.0;
const LABEL_FAMILY: &str = "DejaVu Sans";
const SHADOW_COLOR: Color = Color::from_rgba8(0, 0, 0, 102);
const SHADOW_OFFSET: Vec2 = Vec2::new(2.0, 2.0);
const TRACKING_RING_SHADOW: Color = Color::from_rgba8(0, 0, 0, 179);
const TRACKING_RING_SHADOW_OFFSET: Vec2 = Vec2::new(3.0, 3.0);

/// Everything the cached background layer depends on.
#[derive(Debug, Clone, PartialEq)]
struct BackgroundKey {
    document_id: String,
    revision: u64,
    viewport: Size,
    scale_factor: f64,
    background: [u8; 4],
    grid_style: GridStyle,
    grid_spacing: f64,
    /// Polygon drawn in the overlay instead (the one being rotated).
    hidden: Option<PolygonId>,
}

impl BackgroundKey {
    fn new(ctx: &RenderContext, hidden: Option<PolygonId>) -> Self {
        let bg = ctx.background_color.to_rgba8();
        Self {
            document_id: ctx.canvas.document.id.clone(),
            revision: ctx.canvas.document.revision(),
            viewport: ctx.viewport_size,
            scale_factor: ctx.scale_factor,
            background: [bg.r, bg.g, bg.b, bg.a],
            grid_style: ctx.grid_style,
            grid_spacing: ctx.grid_spacing,
            hidden,
        }
    }
}

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Background, grid and committed polygons, reused while only previews change.
    background: Scene,
    background_key: Option<BackgroundKey>,
    background_builds: u64,
    /// Font context for dial labels.
    font_cx: FontContext,
    /// Layout context for dial labels.
    layout_cx: LayoutContext<Brush>,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        let mut font_cx = FontContext::new();
        font_cx.collection.register_fonts(
            vello::peniko::Blob::new(std::sync::Arc::new(DEJAVU_SANS)),
            None,
        );
        Self {
            scene: Scene::new(),
            background: Scene::new(),
            background_key: None,
            background_builds: 0,
            font_cx,
            layout_cx: LayoutContext::new(),
        }
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    fn rebuild_background(&mut self, ctx: &RenderContext, transform: Affine, key: BackgroundKey) {
        self.background.reset();
        let viewport = Rect::from_origin_size(Point::ZERO, ctx.viewport_size);
        self.background
            .fill(Fill::NonZero, transform, ctx.background_color, None, &viewport);

        if ctx.grid_style == GridStyle::Lines {
            render_grid_lines(&mut self.background, viewport, transform, ctx.grid_spacing);
        }

        for polygon in ctx.canvas.document.polygons() {
            if Some(polygon.id()) == key.hidden || !polygon_visible(polygon, viewport) {
                continue;
            }
            render_polygon(&mut self.background, polygon, transform);
        }

        self.background_builds += 1;
        log::trace!(
            "Rebuilt background #{} at revision {}",
            self.background_builds,
            key.revision
        );
        self.background_key = Some(key);
    }

    /// Crosshair through the creation anchor spanning the viewport.
    fn render_guidewires(&mut self, anchor: Point, viewport: Size, transform: Affine) {
        let stroke = Stroke::new(GUIDEWIRE_WIDTH);
        let horizontal = Line::new((0.0, anchor.y + 0.5), (viewport.width, anchor.y + 0.5));
        let vertical = Line::new((anchor.x + 0.5, 0.0), (anchor.x + 0.5, viewport.height));
        self.scene
            .stroke(&stroke, transform, GUIDEWIRE_COLOR, None, &horizontal);
        self.scene
            .stroke(&stroke, transform, GUIDEWIRE_COLOR, None, &vertical);
    }

    /// Centroid, guidewire knob, rings, ticks and degree labels around a
    /// polygon being rotated.
    fn render_rotation_annotations(&mut self, preview: &RotationPreview, transform: Affine) {
        let Some(dial) = RotationDial::new(preview.center, preview.radius, preview.delta) else {
            return;
        };
        let thin = Stroke::new(1.0);

        // Centroid
        let centroid = Circle::new(dial.center, CENTROID_RADIUS);
        self.scene
            .stroke(&thin, transform, CENTROID_STROKE, None, &centroid);
        self.scene
            .fill(Fill::NonZero, transform, CENTROID_FILL, None, &centroid);

        // Guidewire from the center to the knob on the tracking ring
        let knob = dial.knob();
        self.scene.stroke(
            &thin,
            transform,
            CENTROID_STROKE,
            None,
            &Line::new(dial.center, knob),
        );
        let knob_circle = Circle::new(knob, KNOB_RADIUS);
        self.scene
            .stroke(&thin, transform, CENTROID_STROKE, None, &knob_circle);
        self.scene
            .fill(Fill::NonZero, transform, CENTROID_FILL, None, &knob_circle);

        // Tracking ring, over its own shadow
        let tracking_ring = Circle::new(dial.center, dial.tracking_ring_radius());
        self.scene.stroke(
            &thin,
            transform * Affine::translate(TRACKING_RING_SHADOW_OFFSET),
            TRACKING_RING_SHADOW,
            None,
            &tracking_ring,
        );
        self.scene
            .stroke(&thin, transform, TRACKING_RING_STROKE, None, &tracking_ring);

        // Degree dial
        let degree_ring = Circle::new(dial.center, dial.degree_ring_radius());
        self.scene
            .fill(Fill::NonZero, transform, DIAL_FILL, None, &degree_ring);
        self.scene
            .stroke(&thin, transform, RING_STROKE, None, &degree_ring);

        for tick in dial.ticks() {
            let color = if tick.long {
                TICK_LONG_STROKE
            } else {
                TICK_SHORT_STROKE
            };
            self.scene
                .stroke(&thin, transform, color, None, &Line::new(tick.inner, tick.outer));
        }

        self.scene.stroke(
            &thin,
            transform,
            RING_STROKE,
            None,
            &Circle::new(dial.center, dial.tick_ring_radius()),
        );

        for label in dial.labels() {
            self.render_label(&label.text(), label.position, transform);
        }
    }

    fn label_layout(&mut self, text: &str) -> Layout<Brush> {
        let mut builder = self
            .layout_cx
            .ranged_builder(&mut self.font_cx, text, 1.0, false);
        builder.push_default(StyleProperty::FontSize(LABEL_FONT_SIZE));
        builder.push_default(StyleProperty::Brush(Brush::Solid(LABEL_COLOR)));
        builder.push_default(StyleProperty::FontStack(FontStack::Single(
            FontFamily::Named(LABEL_FAMILY.into()),
        )));
        let mut layout = builder.build(text);
        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());
        layout
    }

    /// Draw `text` centered on `position` using Parley for layout.
    fn render_label(&mut self, text: &str, position: Point, transform: Affine) {
        let brush = Brush::Solid(LABEL_COLOR);
        let layout = self.label_layout(text);

        let origin = Point::new(
            position.x - layout.width() as f64 / 2.0,
            position.y - layout.height() as f64 / 2.0,
        );
        let text_transform = transform * Affine::translate(origin.to_vec2());

        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(run.font())
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .font_size(run.font_size())
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();

        let transform = Affine::scale(ctx.scale_factor);
        let rotation = ctx.canvas.rotation_preview();

        let key = BackgroundKey::new(ctx, rotation.map(|r| r.id));
        if self.background_key.as_ref() != Some(&key) {
            self.rebuild_background(ctx, transform, key);
        }
        self.scene.append(&self.background, None);

        // The polygon being rotated is drawn at its preview angle
        if let Some(preview) = rotation {
            if let Some(polygon) = ctx.canvas.document.get(preview.id) {
                render_polygon(&mut self.scene, &polygon.rotated(preview.delta), transform);
            }
        }

        if let Some(preview) = ctx.canvas.preview_polygon() {
            render_polygon(&mut self.scene, &preview, transform);
        }

        if ctx.guidewires {
            if let Some(anchor) = ctx.canvas.guidewire_anchor() {
                self.render_guidewires(anchor, ctx.viewport_size, transform);
            }
        }

        if let Some(preview) = rotation {
            self.render_rotation_annotations(&preview, transform);
        }
    }
}

/// Whether any part of the polygon, shadow included, lands inside `viewport`.
fn polygon_visible(polygon: &RegularPolygon, viewport: Rect) -> bool {
    let margin = polygon.style.stroke_width + SHADOW_OFFSET.x.max(SHADOW_OFFSET.y);
    polygon
        .bounds()
        .inflate(margin, margin)
        .intersect(viewport)
        .area()
        > 0.0
}

/// Stroke the outline, then fill it when the polygon is filled, each over an
/// offset shadow.
fn render_polygon(scene: &mut Scene, polygon: &RegularPolygon, transform: Affine) {
    let path = polygon.to_path();
    let style = &polygon.style;

    let shadow_transform = transform * Affine::translate(SHADOW_OFFSET);
    let shadow = SHADOW_COLOR.multiply_alpha(style.opacity as f32);
    let stroke = Stroke::new(style.stroke_width);
    scene.stroke(&stroke, shadow_transform, shadow, None, &path);
    if style.filled {
        scene.fill(Fill::NonZero, shadow_transform, shadow, None, &path);
    }

    scene.stroke(&stroke, transform, style.stroke_with_opacity(), None, &path);
    if let Some(fill) = style.fill_with_opacity() {
        scene.fill(Fill::NonZero, transform, fill, None, &path);
    }
}

/// Grid line positions covering `from..=to`, aligned to multiples of `spacing`.
fn grid_positions(from: f64, to: f64, spacing: f64) -> impl Iterator<Item = f64> {
    let first = (from / spacing).floor() as i64;
    let last = (to / spacing).ceil() as i64;
    (first..=last).map(move |i| i as f64 * spacing)
}

fn render_grid_lines(scene: &mut Scene, viewport: Rect, transform: Affine, spacing: f64) {
    let stroke = Stroke::new(GRID_LINE_WIDTH);
    let mut path = BezPath::new();

    for x in grid_positions(viewport.x0, viewport.x1, spacing) {
        path.move_to(Point::new(x + 0.5, viewport.y0));
        path.line_to(Point::new(x + 0.5, viewport.y1));
    }
    for y in grid_positions(viewport.y0, viewport.y1, spacing) {
        path.move_to(Point::new(viewport.x0, y + 0.5));
        path.line_to(Point::new(viewport.x1, y + 0.5));
    }

    scene.stroke(&stroke, transform, GRID_COLOR, None, &path);
}
