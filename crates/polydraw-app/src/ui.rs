//! UI components using egui.

use egui::{Align2, Color32, Context, CornerRadius, Frame, Margin, Pos2, Stroke, Vec2};
use polydraw_core::settings::{MIN_OPACITY, PolygonSettings, SIDE_CHOICES, START_ANGLE_CHOICES};
use polydraw_core::shapes::SerializableColor;
use polydraw_render::GridStyle;

const PANEL_BG: Color32 = Color32::from_rgb(250, 250, 252);
const BORDER: Color32 = Color32::from_gray(220);
const TEXT_MUTED: Color32 = Color32::from_rgb(100, 116, 139);

/// UI state mirrored from the canvas each frame.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Stroke color for new polygons.
    pub stroke_color: [u8; 3],
    /// Fill color for new polygons.
    pub fill_color: [u8; 3],
    /// Whether new polygons are filled.
    pub filled: bool,
    /// Side count for new polygons.
    pub sides: u32,
    /// Start angle for new polygons, in degrees.
    pub start_angle: i32,
    /// Opacity for new polygons.
    pub opacity: f32,
    /// Show crosshair guidewires while drawing.
    pub guidewires: bool,
    /// Current grid style.
    pub grid_style: GridStyle,
    /// Number of polygons on the canvas.
    pub polygon_count: usize,
    /// Whether the keyboard shortcuts modal is open.
    pub shortcuts_modal_open: bool,
}

impl Default for UiState {
    fn default() -> Self {
        let mut state = Self {
            stroke_color: [0, 0, 0],
            fill_color: [0, 0, 0],
            filled: true,
            sides: 0,
            start_angle: 0,
            opacity: 1.0,
            guidewires: true,
            grid_style: GridStyle::default(),
            polygon_count: 0,
            shortcuts_modal_open: false,
        };
        state.update_from_settings(&PolygonSettings::default());
        state
    }
}

impl UiState {
    /// Refresh the control values from the canvas settings.
    pub fn update_from_settings(&mut self, settings: &PolygonSettings) {
        let sc = settings.stroke_color;
        let fc = settings.fill_color;
        self.stroke_color = [sc.r, sc.g, sc.b];
        self.fill_color = [fc.r, fc.g, fc.b];
        self.filled = settings.filled;
        self.sides = settings.sides();
        self.start_angle = settings.start_angle_degrees.round() as i32;
        self.opacity = settings.opacity() as f32;
        self.guidewires = settings.guidewires;
    }
}

/// Actions that can be triggered by the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Change stroke color.
    SetStrokeColor(SerializableColor),
    /// Change fill color.
    SetFillColor(SerializableColor),
    /// Turn filling on or off.
    SetFilled(bool),
    /// Change the side count.
    SetSides(u32),
    /// Change the start angle, in degrees.
    SetStartAngle(i32),
    /// Change the opacity.
    SetOpacity(f64),
    /// Turn creation guidewires on or off.
    SetGuidewires(bool),
    /// Change the grid style.
    SetGridStyle(GridStyle),
    /// Remove every polygon.
    EraseAll,
    /// Toggle the keyboard shortcuts modal.
    ShowShortcuts,
}

fn rgb_color(rgb: [u8; 3]) -> SerializableColor {
    SerializableColor::new(rgb[0], rgb[1], rgb[2], 255)
}

/// Render all UI and return any triggered action.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let action = render_controls_panel(ctx, ui_state);
    if ui_state.shortcuts_modal_open {
        render_shortcuts_modal(ctx, ui_state);
    }
    action
}

/// Render the drawing controls in the top-left corner.
fn render_controls_panel(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("controls"))
        .anchor(Align2::LEFT_TOP, Vec2::new(12.0, 12.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_width(190.0);
                ui.spacing_mut().item_spacing = Vec2::new(8.0, 6.0);

                section_label(ui, "Stroke");
                if ui.color_edit_button_srgb(&mut ui_state.stroke_color).changed() {
                    action = Some(UiAction::SetStrokeColor(rgb_color(ui_state.stroke_color)));
                }

                section_label(ui, "Fill");
                ui.horizontal(|ui| {
                    if ui.color_edit_button_srgb(&mut ui_state.fill_color).changed() {
                        action = Some(UiAction::SetFillColor(rgb_color(ui_state.fill_color)));
                    }
                    if ui.checkbox(&mut ui_state.filled, "Filled").changed() {
                        action = Some(UiAction::SetFilled(ui_state.filled));
                    }
                });

                section_label(ui, "Sides");
                let mut sides = ui_state.sides;
                egui::ComboBox::from_id_salt("sides")
                    .selected_text(sides.to_string())
                    .show_ui(ui, |ui| {
                        for choice in SIDE_CHOICES {
                            ui.selectable_value(&mut sides, choice, choice.to_string());
                        }
                    });
                if sides != ui_state.sides {
                    action = Some(UiAction::SetSides(sides));
                }

                section_label(ui, "Start angle");
                let mut start_angle = ui_state.start_angle;
                egui::ComboBox::from_id_salt("start_angle")
                    .selected_text(format!("{start_angle}°"))
                    .show_ui(ui, |ui| {
                        for choice in START_ANGLE_CHOICES {
                            ui.selectable_value(&mut start_angle, choice, format!("{choice}°"));
                        }
                    });
                if start_angle != ui_state.start_angle {
                    action = Some(UiAction::SetStartAngle(start_angle));
                }

                section_label(ui, "Opacity");
                let slider = egui::Slider::new(&mut ui_state.opacity, MIN_OPACITY as f32..=1.0)
                    .fixed_decimals(2);
                if ui.add(slider).changed() {
                    action = Some(UiAction::SetOpacity(ui_state.opacity as f64));
                }

                if ui.checkbox(&mut ui_state.guidewires, "Guidewires").changed() {
                    action = Some(UiAction::SetGuidewires(ui_state.guidewires));
                }

                section_label(ui, "Grid");
                ui.horizontal(|ui| {
                    for style in [GridStyle::Lines, GridStyle::None] {
                        if ui
                            .selectable_label(ui_state.grid_style == style, style.name())
                            .clicked()
                        {
                            action = Some(UiAction::SetGridStyle(style));
                        }
                    }
                });

                ui.separator();
                ui.horizontal(|ui| {
                    let erase = ui.add_enabled(
                        ui_state.polygon_count > 0,
                        egui::Button::new("Erase all"),
                    );
                    if erase.clicked() {
                        action = Some(UiAction::EraseAll);
                    }
                    if ui.small_button("?").on_hover_text("Keyboard shortcuts").clicked() {
                        action = Some(UiAction::ShowShortcuts);
                    }
                });
                ui.label(
                    egui::RichText::new(format!("{} polygons", ui_state.polygon_count))
                        .size(10.0)
                        .color(TEXT_MUTED),
                );
            });
        });

    action
}

/// Render the keyboard shortcuts modal.
fn render_shortcuts_modal(ctx: &Context, ui_state: &mut UiState) {
    use crate::shortcuts::ShortcutRegistry;

    // Backdrop
    egui::Area::new(egui::Id::new("shortcuts_backdrop"))
        .fixed_pos(Pos2::ZERO)
        .order(egui::Order::Background)
        .show(ctx, |ui| {
            let screen_rect = ctx.input(|i| i.content_rect());
            let response = ui.allocate_rect(screen_rect, egui::Sense::click());
            ui.painter()
                .rect_filled(screen_rect, 0.0, Color32::from_black_alpha(80));
            if response.clicked() {
                ui_state.shortcuts_modal_open = false;
            }
        });

    egui::Area::new(egui::Id::new("shortcuts_modal"))
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_width(360.0);
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Keyboard Shortcuts").size(16.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("✕").clicked() {
                            ui_state.shortcuts_modal_open = false;
                        }
                    });
                });
                ui.add_space(12.0);

                for shortcut in ShortcutRegistry::all() {
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(shortcut.format())
                                .size(12.0)
                                .family(egui::FontFamily::Monospace)
                                .color(TEXT_MUTED),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(egui::RichText::new(shortcut.description).size(12.0));
                        });
                    });
                }
                ui.add_space(8.0);
                section_label(
                    ui,
                    "Click a polygon to rotate it, click again to drop it. Drag to move.",
                );
            });
        });
}

/// Common panel frame style.
fn panel_frame() -> Frame {
    Frame::new()
        .fill(PANEL_BG)
        .corner_radius(CornerRadius::same(8))
        .stroke(Stroke::new(1.0, BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 8,
            offset: [0, 2],
            color: Color32::from_black_alpha(15),
        })
        .inner_margin(Margin::same(8))
}

fn section_label(ui: &mut egui::Ui, text: &str) {
    ui.label(egui::RichText::new(text).size(10.0).color(TEXT_MUTED));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_settings() {
        let state = UiState::default();
        let settings = PolygonSettings::default();
        assert_eq!(state.sides, settings.sides());
        assert_eq!(state.stroke_color, [0, 0, 128]);
        assert_eq!(state.fill_color, [100, 149, 237]);
        assert!(state.filled);
        assert!(state.guidewires);
    }

    #[test]
    fn test_update_from_settings() {
        let mut settings = PolygonSettings::default();
        settings.set_sides(5).unwrap();
        settings.start_angle_degrees = 135.0;
        settings.set_opacity(0.4).unwrap();
        settings.filled = false;

        let mut state = UiState::default();
        state.update_from_settings(&settings);
        assert_eq!(state.sides, 5);
        assert_eq!(state.start_angle, 135);
        assert!((state.opacity - 0.4).abs() < 1e-6);
        assert!(!state.filled);
    }

    #[test]
    fn test_render_ui_without_interaction() {
        let ctx = Context::default();
        let mut state = UiState::default();
        let mut action = None;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            action = render_ui(ctx, &mut state);
        });
        assert!(action.is_none());
    }
}
