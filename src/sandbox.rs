//! GPU-free interaction state of a running sandbox
//!
//! [`SandboxState`] owns the scene, the pointer tracker, the drag controller
//! and the pending model import. The window layer forwards input to it and
//! calls [`SandboxState::tick`] once per frame before rendering.

use std::{fmt, path::PathBuf};

use cgmath::{Vector2, Vector3};

use crate::{
    bootstrap::{Bootstrap, ModelLoad, SceneBootstrapper},
    config::{ModelPlacement, SandboxConfig},
    error::SandboxError,
    gfx::{
        helpers::{HelperKind, HelperOverlays},
        scene::{ObjectId, Scene},
    },
    interaction::{ClickOutcome, DragController, DragState, PointerTracker, Viewport},
};

/// Things worth telling the user about, drained once per frame
#[derive(Debug)]
pub enum SandboxEvent {
    ObjectGrabbed { id: ObjectId, name: String },
    ObjectReleased { id: ObjectId, name: String },
    ModelLoaded { id: ObjectId, name: String },
    ModelLoadFailed { path: PathBuf, error: SandboxError },
}

impl fmt::Display for SandboxEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SandboxEvent::ObjectGrabbed { name, .. } => write!(f, "Picked up {name}"),
            SandboxEvent::ObjectReleased { name, .. } => write!(f, "Dropped {name}"),
            SandboxEvent::ModelLoaded { name, .. } => write!(f, "Loaded {name}"),
            SandboxEvent::ModelLoadFailed { error, .. } => write!(f, "Load failed: {error}"),
        }
    }
}

pub struct SandboxState {
    pub scene: Scene,
    helpers: HelperOverlays,
    pointer: PointerTracker,
    drag: DragController,
    pending_model: Option<ModelLoad>,
    placement: ModelPlacement,
    events: Vec<SandboxEvent>,
}

impl SandboxState {
    pub fn new(config: SandboxConfig) -> Self {
        let viewport = Viewport::new(config.window.width, config.window.height);
        let click_slop = config.controls.click_slop;
        let placement = config.assets.placement.clone();
        let Bootstrap {
            scene,
            helpers,
            pending_model,
        } = SceneBootstrapper::new(config).build();

        Self {
            scene,
            helpers,
            pointer: PointerTracker::new(viewport, click_slop),
            drag: DragController::new(),
            pending_model,
            placement,
            events: Vec::new(),
        }
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    pub fn is_loading_model(&self) -> bool {
        self.pending_model.is_some()
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.pointer.moved(x, y);
    }

    pub fn pointer_pressed(&mut self) {
        self.pointer.pressed();
    }

    /// Completes a press; a release within the click slop counts as a click
    pub fn pointer_released(&mut self) -> Option<ClickOutcome> {
        let ndc = self.pointer.released()?;
        Some(self.click_at(ndc))
    }

    pub fn click_at(&mut self, ndc: Vector2<f32>) -> ClickOutcome {
        let outcome = self.drag.on_click(ndc, &self.scene);
        match outcome {
            ClickOutcome::Grabbed(id) => {
                let name = self.object_name(id);
                log::info!("Holding {name}");
                self.events.push(SandboxEvent::ObjectGrabbed { id, name });
            }
            ClickOutcome::Released(id) => {
                let name = self.object_name(id);
                log::info!("Released {name}");
                self.events.push(SandboxEvent::ObjectReleased { id, name });
            }
            ClickOutcome::Ignored => {}
        }
        outcome
    }

    /// Updates camera aspect and pointer mapping; zero sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.scene
            .camera_manager
            .camera
            .resize_projection(width, height);
        self.pointer.resize(width, height);
        true
    }

    /// Per-frame work: model import bookkeeping, then the drag update
    pub fn tick(&mut self) -> Option<Vector3<f32>> {
        self.poll_model();
        self.drag.update(self.pointer.ndc(), &mut self.scene)
    }

    fn poll_model(&mut self) {
        let Some(load) = self.pending_model.as_mut() else {
            return;
        };
        let Some(result) = load.poll() else {
            return;
        };
        let path = load.path().to_path_buf();
        self.pending_model = None;

        match result {
            Ok(model) => {
                let id = SceneBootstrapper::place_model(&mut self.scene, model, &self.placement);
                self.events.push(SandboxEvent::ModelLoaded {
                    id,
                    name: self.placement.name.clone(),
                });
            }
            Err(error) => {
                log::error!("{error}");
                self.events
                    .push(SandboxEvent::ModelLoadFailed { path, error });
            }
        }
    }

    pub fn set_helper_visible(&mut self, kind: HelperKind, visible: bool) -> bool {
        self.helpers.set_visible(&mut self.scene, kind, visible)
    }

    pub fn helper_visible(&self, kind: HelperKind) -> bool {
        self.helpers.is_visible(&self.scene, kind)
    }

    pub fn held_object_name(&self) -> Option<&str> {
        let id = self.drag.held()?;
        self.scene.object(id).map(|object| object.name.as_str())
    }

    pub fn drain_events(&mut self) -> Vec<SandboxEvent> {
        std::mem::take(&mut self.events)
    }

    fn object_name(&self, id: ObjectId) -> String {
        self.scene
            .object(id)
            .map(|object| object.name.clone())
            .unwrap_or_else(|| format!("{id:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::model_loader::tests::write_quad_obj;
    use std::time::{Duration, Instant};

    const WIDTH: f64 = 1200.0;
    const HEIGHT: f64 = 800.0;

    fn sandbox() -> SandboxState {
        SandboxState::new(SandboxConfig::default().without_model())
    }

    /// Pixel position of a world point in the default window
    fn pixel_of(state: &SandboxState, point: Vector3<f32>) -> (f64, f64) {
        let ndc = state.scene.camera_manager.camera.project_to_ndc(point).unwrap();
        (
            (ndc.x as f64 + 1.0) * 0.5 * WIDTH,
            (1.0 - ndc.y as f64) * 0.5 * HEIGHT,
        )
    }

    fn click(state: &mut SandboxState, (x, y): (f64, f64)) -> Option<ClickOutcome> {
        state.pointer_moved(x, y);
        state.pointer_pressed();
        state.pointer_released()
    }

    fn wait_for_load(state: &mut SandboxState) -> Vec<SandboxEvent> {
        let deadline = Instant::now() + Duration::from_secs(10);
        while state.is_loading_model() && Instant::now() < deadline {
            state.tick();
            std::thread::sleep(Duration::from_millis(5));
        }
        state.drain_events()
    }

    #[test]
    fn test_drag_box_over_ground() {
        let mut state = sandbox();
        let block = state.scene.find_by_name("BOX").unwrap();

        let box_pixel = pixel_of(&state, Vector3::new(15.0, 3.0, 15.0));
        let outcome = click(&mut state, box_pixel);
        assert_eq!(outcome, Some(ClickOutcome::Grabbed(block)));
        assert_eq!(state.drag_state(), DragState::Holding(block));
        assert_eq!(state.held_object_name(), Some("BOX"));

        let (x, y) = pixel_of(&state, Vector3::new(10.0, 0.0, 10.0));
        state.pointer_moved(x, y);
        let position = state.tick().unwrap();
        assert!((position.x - 10.0).abs() < 0.05, "{position:?}");
        assert!((position.z - 10.0).abs() < 0.05, "{position:?}");
        assert_eq!(position.y, 3.0);

        let events = state.drain_events();
        assert!(matches!(&events[..], [SandboxEvent::ObjectGrabbed { id, .. }] if *id == block));
    }

    #[test]
    fn test_release_keeps_last_position() {
        let mut state = sandbox();
        let block = state.scene.find_by_name("BOX").unwrap();
        let box_pixel = pixel_of(&state, Vector3::new(15.0, 3.0, 15.0));
        click(&mut state, box_pixel);

        let (x, y) = pixel_of(&state, Vector3::new(20.0, 0.0, 25.0));
        state.pointer_moved(x, y);
        let dropped_at = state.tick().unwrap();

        // Empty sky in the top-right corner
        assert_eq!(
            click(&mut state, (WIDTH - 1.0, 1.0)),
            Some(ClickOutcome::Released(block))
        );
        assert_eq!(state.drag_state(), DragState::Idle);
        assert!(state.tick().is_none());
        assert_eq!(state.scene.object(block).unwrap().position(), dropped_at);
    }

    #[test]
    fn test_one_object_at_a_time() {
        let mut state = sandbox();
        let block = state.scene.find_by_name("BOX").unwrap();
        let cylinder_pixel = pixel_of(&state, Vector3::new(-15.0, 3.0, 15.0));
        let box_pixel = pixel_of(&state, Vector3::new(15.0, 3.0, 15.0));

        click(&mut state, box_pixel);
        // Freeze the box before aiming at the cylinder
        assert_eq!(
            click(&mut state, cylinder_pixel),
            Some(ClickOutcome::Released(block))
        );
        let cylinder = state.scene.find_by_name("CYLINDER").unwrap();
        assert_eq!(
            click(&mut state, cylinder_pixel),
            Some(ClickOutcome::Grabbed(cylinder))
        );
        assert_eq!(state.drag_state(), DragState::Holding(cylinder));
    }

    #[test]
    fn test_orbit_drag_is_not_a_click() {
        let mut state = sandbox();
        let (x, y) = pixel_of(&state, Vector3::new(15.0, 3.0, 15.0));
        state.pointer_moved(x, y);
        state.pointer_pressed();
        state.pointer_moved(x + 40.0, y);
        assert_eq!(state.pointer_released(), None);
        assert_eq!(state.drag_state(), DragState::Idle);
    }

    #[test]
    fn test_resize_updates_camera_and_viewport() {
        let mut state = sandbox();
        assert!(state.resize(800, 600));
        let camera = &state.scene.camera_manager.camera;
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(state.pointer().viewport(), Viewport::new(800, 600));

        assert!(!state.resize(0, 0));
        assert_eq!(state.pointer().viewport(), Viewport::new(800, 600));
    }

    #[test]
    fn test_helpers_toggle_through_state() {
        let mut state = sandbox();
        assert!(!state.helper_visible(HelperKind::DirectionalLight));
        assert!(state.set_helper_visible(HelperKind::DirectionalLight, true));
        assert!(state.helper_visible(HelperKind::DirectionalLight));
    }

    #[test]
    fn test_model_load_appends_draggable() {
        let path = write_quad_obj("quad_sandbox.obj", false);
        let mut state = SandboxState::new(SandboxConfig::default().with_model_path(&path));
        let before = state.scene.object_count();

        let events = wait_for_load(&mut state);
        assert!(!state.is_loading_model());
        assert_eq!(state.scene.object_count(), before + 1);
        let castle = state.scene.find_by_name("CASTLE").unwrap();
        assert!(state.scene.object(castle).unwrap().is_draggable());
        assert!(matches!(&events[..], [SandboxEvent::ModelLoaded { id, .. }] if *id == castle));
    }

    #[test]
    fn test_model_load_failure_is_reported() {
        let path = std::env::temp_dir().join("sandbox3d-tests/missing-castle.obj");
        let mut state = SandboxState::new(SandboxConfig::default().with_model_path(&path));
        let before = state.scene.object_count();

        let events = wait_for_load(&mut state);
        assert_eq!(state.scene.object_count(), before);
        match &events[..] {
            [SandboxEvent::ModelLoadFailed { path: failed, error }] => {
                assert_eq!(failed, &path);
                assert!(matches!(error, SandboxError::ModelLoad { .. }));
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }
}
