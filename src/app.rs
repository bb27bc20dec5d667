//! Windowed application: event loop, input routing and the frame loop
//!
//! Window events go to the UI first. Whatever the panel does not capture is
//! routed to the pointer tracker (clicks and drag target) and the orbit camera
//! controller (rotate, zoom, pan).

use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::{
    config::{SandboxConfig, WindowConfig},
    error::{Result, SandboxError},
    gfx::rendering::render_engine::RenderEngine,
    sandbox::SandboxState,
    ui::{sandbox_panel, EventLog, PanelAction, PanelSnapshot, UiManager},
};

pub struct SandboxApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    window_config: WindowConfig,
    shadow_map_size: u32,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    sandbox: SandboxState,
    event_log: EventLog,
    error: Option<SandboxError>,
}

impl SandboxApp {
    /// Builds the scene and starts the model import; the window opens in `run`
    pub fn new(config: SandboxConfig) -> Result<Self> {
        let event_loop = EventLoop::new()?;

        let window_config = config.window.clone();
        let shadow_map_size = config.lighting.directional.shadow_map_size;
        let sandbox = SandboxState::new(config);

        Ok(Self {
            event_loop,
            app_state: AppState {
                window_config,
                shadow_map_size,
                window: None,
                render_engine: None,
                ui_manager: None,
                sandbox,
                event_log: EventLog::new(),
                error: None,
            },
        })
    }

    /// Runs until the window closes; fatal GPU errors are returned
    pub fn run(mut self) -> Result<()> {
        self.event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop.run_app(&mut self.app_state)?;

        match self.app_state.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: SandboxError) {
        log::error!("{error}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn create_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = WindowAttributes::default()
            .with_title(self.window_config.title.clone())
            .with_inner_size(LogicalSize::new(
                self.window_config.width,
                self.window_config.height,
            ));
        let window_handle = Arc::new(event_loop.create_window(attributes)?);
        self.window = Some(window_handle.clone());

        let (width, height) = window_handle.inner_size().into();

        let window_clone = window_handle.clone();
        let shadow_map_size = self.shadow_map_size;
        let renderer = pollster::block_on(async move {
            RenderEngine::new(window_clone, width, height, shadow_map_size).await
        })?;

        let mut ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window_handle,
        );
        ui_manager.update_display_size(width, height);

        // The actual window size may differ from the requested one
        self.sandbox.resize(width, height);

        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(position) = self.sandbox.tick() {
            log::trace!("Held object at {:?}", position);
        }
        for event in self.sandbox.drain_events() {
            self.event_log.record(&event);
        }
        self.sandbox.scene.update();

        let (Some(window), Some(render_engine), Some(ui_manager)) = (
            self.window.as_ref(),
            self.render_engine.as_mut(),
            self.ui_manager.as_mut(),
        ) else {
            return;
        };

        render_engine.prepare(&mut self.sandbox.scene);

        let snapshot = PanelSnapshot::capture(&self.sandbox, &self.event_log);
        let mut actions = Vec::new();
        let result = render_engine.render_frame_with_ui(
            &self.sandbox.scene,
            |device, queue, encoder, color_attachment| {
                ui_manager.draw(device, queue, encoder, window, color_attachment, |ui| {
                    actions = sandbox_panel(ui, &snapshot);
                });
            },
        );

        if let Err(e) = result {
            self.fail(event_loop, e.into());
            return;
        }

        for action in actions {
            self.apply(action);
        }
    }

    fn apply(&mut self, action: PanelAction) {
        match action {
            PanelAction::SetHelper(kind, visible) => {
                self.sandbox.set_helper_visible(kind, visible);
                log::debug!("{} helper {}", kind.label(), if visible { "on" } else { "off" });
            }
            PanelAction::ResetCamera => {
                self.sandbox.scene.camera_manager.camera.reset_to_default();
                log::info!("Camera reset");
            }
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(error) = self.create_graphics(event_loop) {
            self.fail(event_loop, error);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // A button released over the panel must still stop an orbit drag
        if let WindowEvent::MouseInput {
            state: ElementState::Released,
            button: MouseButton::Left,
            ..
        } = event
        {
            self.sandbox
                .scene
                .camera_manager
                .process_left_button(ElementState::Released);
        }

        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(&window, &ui_event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.sandbox.pointer_moved(position.x, position.y);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.sandbox.scene.camera_manager.process_left_button(state);
                match state {
                    ElementState::Pressed => self.sandbox.pointer_pressed(),
                    ElementState::Released => {
                        self.sandbox.pointer_released();
                    }
                }
            }
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if key_event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                    && key_event.state == ElementState::Pressed
                {
                    event_loop.exit();
                    return;
                }
                self.sandbox
                    .scene
                    .camera_manager
                    .process_keyboard_event(&key_event);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if !self.sandbox.resize(width, height) {
                    return; // minimized
                }
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        if let Some(ui_manager) = self.ui_manager.as_ref() {
            if ui_manager.wants_input() {
                return;
            }
        }

        self.sandbox.scene.camera_manager.process_event(&event, window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
