//! Core application state and lifecycle.

use kurbo::Size;
use peniko::Color;
use polydraw_core::canvas::Canvas;
use polydraw_core::input::PointerEvent;
use polydraw_core::interaction::Interaction;
use polydraw_render::{
    DEFAULT_GRID_SPACING, GridStyle, RenderContext, RenderResult, Renderer, RendererError,
    VelloRenderer,
};
use std::sync::Arc;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
#[cfg(not(target_arch = "wasm32"))]
use winit::dpi::LogicalSize;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use crate::event_handler::EventHandler;
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use crate::ui::{UiAction, UiState, render_ui};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub grid_style: GridStyle,
    pub grid_spacing: f64,
    pub background_color: Color,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "PolyDraw".to_string(),
            width: 1024,
            height: 768,
            grid_style: GridStyle::Lines,
            grid_spacing: DEFAULT_GRID_SPACING,
            background_color: Color::WHITE,
        }
    }
}

/// Apply a control panel action to the canvas.
pub(crate) fn apply_ui_action(canvas: &mut Canvas, ui_state: &mut UiState, action: UiAction) {
    match action {
        UiAction::SetStrokeColor(color) => canvas.settings.stroke_color = color,
        UiAction::SetFillColor(color) => canvas.settings.fill_color = color,
        UiAction::SetFilled(filled) => canvas.settings.filled = filled,
        UiAction::SetSides(sides) => {
            if let Err(e) = canvas.settings.set_sides(sides) {
                log::warn!("{e}, keeping {} sides", canvas.settings.sides());
            }
        }
        UiAction::SetStartAngle(degrees) => canvas.settings.start_angle_degrees = degrees as f64,
        UiAction::SetOpacity(opacity) => {
            if let Err(e) = canvas.settings.set_opacity(opacity) {
                log::warn!("{e}, keeping opacity {}", canvas.settings.opacity());
            }
        }
        UiAction::SetGuidewires(enabled) => canvas.settings.guidewires = enabled,
        UiAction::SetGridStyle(style) => ui_state.grid_style = style,
        UiAction::EraseAll => canvas.erase_all(),
        UiAction::ShowShortcuts => ui_state.shortcuts_modal_open = !ui_state.shortcuts_modal_open,
    }
    ui_state.update_from_settings(&canvas.settings);
}

/// Apply a keyboard shortcut to the canvas.
pub(crate) fn apply_shortcut(canvas: &mut Canvas, ui_state: &mut UiState, action: ShortcutAction) {
    match action {
        ShortcutAction::Cancel => {
            if ui_state.shortcuts_modal_open {
                ui_state.shortcuts_modal_open = false;
            } else {
                canvas.cancel();
            }
        }
        ShortcutAction::EraseAll => apply_ui_action(canvas, ui_state, UiAction::EraseAll),
        ShortcutAction::CycleGrid => ui_state.grid_style = ui_state.grid_style.next(),
        ShortcutAction::ShowShortcuts => apply_ui_action(canvas, ui_state, UiAction::ShowShortcuts),
    }
}

/// Name of a key as used by the shortcut registry.
fn key_name(key: &Key) -> Option<&str> {
    match key {
        Key::Named(NamedKey::Escape) => Some("Escape"),
        Key::Named(NamedKey::Delete) => Some("Delete"),
        Key::Named(NamedKey::Backspace) => Some("Backspace"),
        Key::Character(c) => Some(c.as_str()),
        _ => None,
    }
}

fn logical_size(size: PhysicalSize<u32>, scale_factor: f64) -> Size {
    Size::new(
        size.width as f64 / scale_factor,
        size.height as f64 / scale_factor,
    )
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    polygon_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion (needed for WebGPU/WASM)
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // State
    canvas: Canvas,
    events: EventHandler,
    config: AppConfig,
}

/// Whether a pointer event reaches the canvas when egui may want it.
///
/// A gesture already under way keeps receiving moves and releases over the
/// panel, so a drag that ends there completes. Presses on the panel never
/// reach the canvas: they must not start a polygon or commit a rotation.
fn canvas_receives(
    interaction: Interaction,
    event: PointerEvent,
    egui_wants_pointer: bool,
) -> bool {
    if !egui_wants_pointer {
        return true;
    }
    match event {
        PointerEvent::Down { .. } => false,
        PointerEvent::Move { .. } | PointerEvent::Up { .. } => !interaction.is_idle(),
    }
}

impl AppState {
    fn handle_pointer(&mut self, event: PointerEvent, egui_wants_pointer: bool) {
        let interaction = self.canvas.interaction();
        if !canvas_receives(interaction, event, egui_wants_pointer) {
            // A press while drawing or moving means the release was lost
            if matches!(event, PointerEvent::Down { .. })
                && matches!(
                    interaction,
                    Interaction::Creating { .. } | Interaction::Moving { .. }
                )
            {
                self.canvas.cancel();
                self.window.request_redraw();
            }
            return;
        }
        if let Some(outcome) = self.canvas.handle_pointer(event) {
            log::trace!("{outcome:?}");
        }
        self.window.request_redraw();
    }

    fn render_frame(&mut self, render_cx: &vello::util::RenderContext) -> RenderResult<()> {
        self.ui_state.update_from_settings(&self.canvas.settings);
        self.ui_state.polygon_count = self.canvas.document.len();

        // Run egui and get any actions
        let egui_input = self.egui_state.take_egui_input(&self.window);
        let mut action = None;
        let egui_output = self.egui_ctx.run(egui_input, |ctx| {
            action = render_ui(ctx, &mut self.ui_state);
        });
        if let Some(action) = action {
            log::debug!("UI action {action:?}");
            apply_ui_action(&mut self.canvas, &mut self.ui_state, action);
        }
        self.egui_state
            .handle_platform_output(&self.window, egui_output.platform_output);
        let egui_primitives = self
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        let ctx = RenderContext::new(&self.canvas, self.canvas.viewport_size)
            .with_scale_factor(self.window.scale_factor())
            .with_background(self.config.background_color)
            .with_grid(self.ui_state.grid_style)
            .with_grid_spacing(self.config.grid_spacing)
            .with_guidewires(self.canvas.settings.guidewires);
        self.polygon_renderer.build_scene(&ctx);
        let scene = self.polygon_renderer.take_scene();

        let device_handle = &render_cx.devices[self.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = self
            .surface
            .surface
            .get_current_texture()
            .map_err(|e| RendererError::Surface(e.to_string()))?;

        let width = self.surface.config.width;
        let height = self.surface.config.height;

        let params = RenderParams {
            base_color: self.config.background_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello needs a StorageBinding target, which WebGPU only allows for
        // Rgba8Unorm. The result is blitted to the (possibly Bgra8Unorm) surface.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        self.vello_renderer
            .render_to_texture(device, queue, &scene, &render_texture_view, &params)
            .map_err(|e| RendererError::RenderFailed(e.to_string()))?;

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        {
            let mut blit_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("blit encoder"),
                });
            self.texture_blitter
                .copy(device, &mut blit_encoder, &render_texture_view, &surface_view);
            queue.submit(std::iter::once(blit_encoder.finish()));
        }

        for (id, image_delta) in &egui_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        // Render egui on top
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: egui_output.pixels_per_point,
        };

        {
            let mut egui_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("egui encoder"),
                });

            self.egui_renderer.update_buffers(
                device,
                queue,
                &mut egui_encoder,
                &egui_primitives,
                &screen_descriptor,
            );

            let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: vello::wgpu::Operations {
                        load: vello::wgpu::LoadOp::Load,
                        store: vello::wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // egui-wgpu wants a 'static render pass
            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &egui_primitives, &screen_descriptor);
            drop(render_pass);

            queue.submit(std::iter::once(egui_encoder.finish()));
        }

        for id in &egui_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        surface_texture.present();
        Ok(())
    }
}

/// A surface created asynchronously, waiting to be picked up by the event loop.
#[cfg(target_arch = "wasm32")]
type PendingSurface =
    std::rc::Rc<std::cell::RefCell<Option<(vello::util::RenderContext, RenderSurface<'static>)>>>;

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// Window waiting for async surface creation (WASM only)
    pending_window: Option<Arc<Window>>,
    #[cfg(target_arch = "wasm32")]
    pending_surface: PendingSurface,
    #[cfg(target_arch = "wasm32")]
    init_in_progress: bool,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
            pending_window: None,
            #[cfg(target_arch = "wasm32")]
            pending_surface: PendingSurface::default(),
            #[cfg(target_arch = "wasm32")]
            init_in_progress: false,
        }
    }

    /// Run the application.
    pub async fn run() {
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        let app = App::new();

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(app);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = app;
            event_loop.run_app(&mut app).expect("Event loop error");
        }
    }

    /// Finish initialization after surface is created.
    fn finish_init(
        &mut self,
        window: Arc<Window>,
        surface: RenderSurface<'static>,
    ) -> RenderResult<()> {
        let render_cx = self
            .render_cx
            .as_ref()
            .ok_or_else(|| RendererError::InitFailed("render context not initialized".into()))?;
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .map_err(|e| RendererError::InitFailed(e.to_string()))?;

        let texture_blitter =
            vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let scale_factor = window.scale_factor();
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(scale_factor as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let mut canvas = Canvas::new();
        let viewport = logical_size(
            PhysicalSize::new(surface.config.width, surface.config.height),
            scale_factor,
        );
        canvas.set_viewport_size(viewport.width, viewport.height);

        let ui_state = UiState {
            grid_style: self.config.grid_style,
            ..UiState::default()
        };

        log::info!(
            "PolyDraw initialized - {}x{} @{scale_factor}x",
            surface.config.width,
            surface.config.height
        );
        ShortcutRegistry::log_all();

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            polygon_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state,
            canvas,
            events: EventHandler::new(scale_factor),
            config: self.config.clone(),
        });
        self.pending_window = None;

        window.request_redraw();
        Ok(())
    }

    /// Pick up an asynchronously created surface, or start creating one.
    #[cfg(target_arch = "wasm32")]
    fn poll_async_init(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.pending_window.clone() else {
            return;
        };

        let ready = self.pending_surface.borrow_mut().take();
        if let Some((render_cx, surface)) = ready {
            self.render_cx = Some(render_cx);
            if let Err(e) = self.finish_init(window, surface) {
                log::error!("Initialization failed: {e}");
                event_loop.exit();
            }
            return;
        }

        if !self.init_in_progress {
            self.init_in_progress = true;

            let web_window = web_sys::window().expect("No window");
            let dpr = web_window.device_pixel_ratio();
            let viewport_width = web_window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(self.config.width as f64);
            let viewport_height = web_window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(self.config.height as f64);
            let width = (viewport_width * dpr) as u32;
            let height = (viewport_height * dpr) as u32;

            let slot = self.pending_surface.clone();
            let window_clone = window.clone();
            wasm_bindgen_futures::spawn_local(async move {
                log::info!("Creating surface asynchronously...");
                let mut render_cx = vello::util::RenderContext::new();
                match render_cx
                    .create_surface(window_clone, width, height, PresentMode::AutoVsync)
                    .await
                {
                    Ok(surface) => {
                        log::info!("Surface created successfully");
                        *slot.borrow_mut() = Some((render_cx, surface));
                    }
                    Err(e) => log::error!("Failed to create surface: {e:?}"),
                }
            });
        }

        // Keep the event loop running until the surface arrives
        window.request_redraw();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.pending_window.is_some() {
            return;
        }

        log::info!("Creating window...");

        #[cfg(not(target_arch = "wasm32"))]
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        // On WASM, attach canvas to DOM and use full viewport
        #[cfg(target_arch = "wasm32")]
        let window_attrs = {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            let web_window = web_sys::window().expect("No window");
            let document = web_window.document().expect("No document");

            let viewport_width = web_window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(self.config.width as f64);
            let viewport_height = web_window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(self.config.height as f64);

            if let Some(loading) = document.get_element_by_id("loading") {
                loading.remove();
            }

            let canvas = document
                .get_element_by_id("polydraw-canvas")
                .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
                .or_else(|| {
                    let app_div = document.get_element_by_id("app")?;
                    let canvas = document.create_element("canvas").ok()?;
                    canvas.set_id("polydraw-canvas");
                    app_div.append_child(&canvas).ok()?;
                    canvas.dyn_into::<web_sys::HtmlCanvasElement>().ok()
                })
                .expect("Failed to create canvas");

            // Backing store in device pixels for sharp rendering
            let dpr = web_window.device_pixel_ratio();
            canvas.set_width((viewport_width * dpr) as u32);
            canvas.set_height((viewport_height * dpr) as u32);
            let style = canvas.style();
            let _ = style.set_property("width", "100%");
            let _ = style.set_property("height", "100%");
            let _ = style.set_property("display", "block");
            let _ = style.set_property("position", "fixed");
            let _ = style.set_property("top", "0");
            let _ = style.set_property("left", "0");
            // Keep touch drags on the canvas instead of scrolling the page
            let _ = style.set_property("touch-action", "none");

            log::info!("Canvas created: {viewport_width}x{viewport_height} (dpr: {dpr})");

            Window::default_attributes()
                .with_title(&self.config.title)
                .with_canvas(Some(canvas))
        };

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };
        log::info!("Surface size: {width}x{height}");

        // On native, block on async surface creation
        #[cfg(not(target_arch = "wasm32"))]
        {
            let render_cx = self
                .render_cx
                .get_or_insert_with(vello::util::RenderContext::new);

            let surface = match pollster::block_on(render_cx.create_surface(
                window.clone(),
                width,
                height,
                PresentMode::AutoVsync,
            )) {
                Ok(surface) => surface,
                Err(e) => {
                    log::error!("Failed to create surface: {e}");
                    event_loop.exit();
                    return;
                }
            };

            if let Err(e) = self.finish_init(window, surface) {
                log::error!("Initialization failed: {e}");
                event_loop.exit();
            }
        }

        // On WASM, store window for later async initialization
        #[cfg(target_arch = "wasm32")]
        {
            self.pending_window = Some(window);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        #[cfg(target_arch = "wasm32")]
        if self.state.is_none() {
            self.poll_async_init(event_loop);
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        let egui_wants_pointer = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input();
        let egui_wants_keyboard = state.egui_ctx.wants_keyboard_input();
        if egui_response.repaint {
            state.window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }

                let viewport = logical_size(size, state.window.scale_factor());
                state.canvas.set_viewport_size(viewport.width, viewport.height);

                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }

                state.window.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                state.events.set_scale_factor(scale_factor);
            }

            WindowEvent::RedrawRequested => {
                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };
                if let Err(e) = state.render_frame(render_cx) {
                    log::error!("Skipping frame: {e}");
                }
                state.window.request_redraw();
            }

            WindowEvent::CursorMoved { position, .. } => {
                let pointer = state.events.cursor_moved(position);
                state.handle_pointer(pointer, egui_wants_pointer);
            }

            WindowEvent::MouseInput {
                state: btn_state,
                button,
                ..
            } => {
                if let Some(pointer) = state.events.mouse_input(btn_state, button) {
                    state.handle_pointer(pointer, egui_wants_pointer);
                }
            }

            WindowEvent::Touch(touch) => {
                if let Some(pointer) = state.events.touch(touch.id, touch.phase, touch.location) {
                    state.handle_pointer(pointer, egui_wants_pointer);
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                state.events.set_modifiers(modifiers.state());
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if egui_wants_keyboard || event.state != ElementState::Pressed {
                    return;
                }
                let action = key_name(&event.logical_key)
                    .and_then(|key| ShortcutRegistry::action_for(key, state.events.modifiers()));
                if let Some(action) = action {
                    log::debug!("Shortcut {action:?}");
                    apply_shortcut(&mut state.canvas, &mut state.ui_state, action);
                    state.window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use polydraw_core::shapes::SerializableColor;

    fn canvas_with_polygon() -> Canvas {
        let mut canvas = Canvas::new();
        canvas.pointer_down(Point::new(100.0, 100.0));
        canvas.pointer_up(Point::new(160.0, 100.0));
        assert_eq!(canvas.document.len(), 1);
        canvas
    }

    #[test]
    fn test_settings_actions() {
        let mut canvas = Canvas::new();
        let mut ui_state = UiState::default();

        apply_ui_action(&mut canvas, &mut ui_state, UiAction::SetSides(5));
        apply_ui_action(&mut canvas, &mut ui_state, UiAction::SetStartAngle(45));
        apply_ui_action(&mut canvas, &mut ui_state, UiAction::SetFilled(false));
        apply_ui_action(
            &mut canvas,
            &mut ui_state,
            UiAction::SetStrokeColor(SerializableColor::new(255, 0, 0, 255)),
        );

        assert_eq!(canvas.settings.sides(), 5);
        assert_eq!(canvas.settings.start_angle_degrees, 45.0);
        assert!(!canvas.settings.filled);
        assert_eq!(ui_state.stroke_color, [255, 0, 0]);
        assert!(!ui_state.filled);
    }

    #[test]
    fn test_rejected_sides_resync_ui() {
        let mut canvas = Canvas::new();
        let mut ui_state = UiState::default();
        apply_ui_action(&mut canvas, &mut ui_state, UiAction::SetSides(1));
        assert_eq!(canvas.settings.sides(), 8);
        assert_eq!(ui_state.sides, 8);
    }

    #[test]
    fn test_opacity_clamped() {
        let mut canvas = Canvas::new();
        let mut ui_state = UiState::default();
        apply_ui_action(&mut canvas, &mut ui_state, UiAction::SetOpacity(0.0));
        assert!((canvas.settings.opacity() - 0.1).abs() < 1e-9);
        assert!((ui_state.opacity - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_erase_all_action() {
        let mut canvas = canvas_with_polygon();
        let mut ui_state = UiState::default();
        apply_ui_action(&mut canvas, &mut ui_state, UiAction::EraseAll);
        assert!(canvas.document.is_empty());
    }

    #[test]
    fn test_shortcuts() {
        let mut canvas = canvas_with_polygon();
        let mut ui_state = UiState::default();

        canvas.pointer_down(Point::new(400.0, 400.0));
        apply_shortcut(&mut canvas, &mut ui_state, ShortcutAction::Cancel);
        assert!(canvas.interaction().is_idle());

        apply_shortcut(&mut canvas, &mut ui_state, ShortcutAction::CycleGrid);
        assert_eq!(ui_state.grid_style, GridStyle::None);

        apply_shortcut(&mut canvas, &mut ui_state, ShortcutAction::ShowShortcuts);
        assert!(ui_state.shortcuts_modal_open);
        // Escape closes the modal before touching the canvas
        apply_shortcut(&mut canvas, &mut ui_state, ShortcutAction::Cancel);
        assert!(!ui_state.shortcuts_modal_open);

        apply_shortcut(&mut canvas, &mut ui_state, ShortcutAction::EraseAll);
        assert!(canvas.document.is_empty());
    }

    #[test]
    fn test_panel_press_does_not_commit_rotation() {
        let mut canvas = canvas_with_polygon();
        canvas.pointer_down(Point::new(110.0, 100.0));
        canvas.pointer_up(Point::new(110.0, 100.0));
        let rotating = canvas.interaction();
        assert!(matches!(rotating, Interaction::Rotating { .. }));

        let press = PointerEvent::Down {
            position: Point::new(20.0, 20.0),
            button: polydraw_core::input::MouseButton::Left,
        };
        let hover = PointerEvent::Move {
            position: Point::new(20.0, 20.0),
        };
        assert!(!canvas_receives(rotating, press, true));
        assert!(canvas_receives(rotating, hover, true));
        assert!(canvas_receives(rotating, press, false));

        // Nothing under way: the panel keeps the pointer
        assert!(!canvas_receives(Interaction::Idle, hover, true));
        assert!(canvas_receives(Interaction::Idle, hover, false));
    }

    #[test]
    fn test_key_names() {
        assert_eq!(key_name(&Key::Named(NamedKey::Escape)), Some("Escape"));
        assert_eq!(key_name(&Key::Character("g".into())), Some("g"));
        assert_eq!(key_name(&Key::Named(NamedKey::Enter)), None);
    }

    #[test]
    fn test_logical_size() {
        let size = logical_size(PhysicalSize::new(2048, 1536), 2.0);
        assert_eq!(size, Size::new(1024.0, 768.0));
    }
}
