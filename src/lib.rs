// src/lib.rs
//! Sandbox3D
//!
//! A 3D drag-and-drop sandbox built on wgpu and winit. Click a draggable
//! object to pick it up, move the pointer to slide it across the ground, and
//! click again to put it down. The orbit camera, lighting with a shadowed sun,
//! helper overlays and an imported OBJ model round out the scene.
//!
//! Everything except [`app`] and the GPU side of [`gfx`] runs headless, so the
//! interaction logic can be driven directly through [`sandbox::SandboxState`].

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod gfx;
pub mod interaction;
pub mod prelude;
pub mod sandbox;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::SandboxApp;
pub use error::{Result, SandboxError};
