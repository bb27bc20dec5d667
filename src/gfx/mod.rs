//! # Graphics Module
//!
//! Camera, geometry, lighting, picking and rendering for the sandbox.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Y-up orbit camera with rotate, zoom and pan
//! - **Geometry** ([`geometry`]) - Primitive solids and helper line geometry
//! - **Picking** ([`picking`]) - Ray casting against scene triangles
//! - **Rendering Pipeline** ([`rendering`]) - Phong shading with a directional shadow map
//! - **Scene Management** ([`scene`]) - Object registry and overlays
//! - **Resource Management** ([`resources`]) - Uniforms, depth and shadow textures
//!
//! ## Usage
//!
//! ```no_run
//! use sandbox3d::{config::SandboxConfig, gfx::scene::Scene};
//!
//! let config = SandboxConfig::default();
//! let scene = Scene::from_config(&config, 1200.0 / 800.0);
//! assert_eq!(scene.object_count(), 0);
//! ```

pub mod camera;
pub mod geometry;
pub mod helpers;
pub mod lighting;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
