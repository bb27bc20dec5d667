//! # Scene Registry
//!
//! The set of placed objects, the camera, the lights and the debug line
//! overlays. Objects are identified by [`ObjectId`] and carry an
//! [`ObjectRole`] that decides whether they act as ground, can be dragged,
//! or stay put.
//!
//! ```
//! use sandbox3d::config::SandboxConfig;
//! use sandbox3d::gfx::geometry::generate_cube;
//! use sandbox3d::gfx::scene::{Scene, SceneObject};
//!
//! let mut scene = Scene::from_config(&SandboxConfig::default(), 1.5);
//! let id = scene.add_object(
//!     SceneObject::builder("BOX")
//!         .with_geometry(&generate_cube())
//!         .at(15.0, 3.0, 15.0)
//!         .with_uniform_scale(6.0)
//!         .draggable()
//!         .build(),
//! );
//! assert!(scene.object(id).unwrap().is_draggable());
//! ```

pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use object::{
    DrawObject, Mesh, ObjectBuilder, ObjectId, ObjectRole, PhongMaterial, SceneObject,
};
pub use scene::{Scene, SceneStats};
pub use vertex::Vertex3D;
