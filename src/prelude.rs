//! # Sandbox Prelude
//!
//! Commonly used types in one import:
//!
//! ```no_run
//! use sandbox3d::prelude::*;
//!
//! let mut sandbox = SandboxState::new(SandboxConfig::default().without_model());
//! sandbox.pointer_moved(600.0, 400.0);
//! sandbox.pointer_pressed();
//! if let Some(ClickOutcome::Grabbed(id)) = sandbox.pointer_released() {
//!     println!("holding {:?}", id);
//! }
//! ```

pub use crate::app::SandboxApp;
pub use crate::bootstrap::{LoadedModel, ModelLoad, SceneBootstrapper};
pub use crate::config::{ModelPlacement, SandboxConfig};
pub use crate::error::{Result, SandboxError};
pub use crate::gfx::{
    camera::{CameraManager, OrbitCamera},
    helpers::HelperKind,
    picking::{PickFilter, PickHit, Ray},
    scene::{ObjectBuilder, ObjectId, ObjectRole, Scene, SceneObject},
};
pub use crate::interaction::{ClickOutcome, DragController, DragState, PointerTracker, Viewport};
pub use crate::sandbox::{SandboxEvent, SandboxState};

pub use cgmath::{Vector2, Vector3};
