//! # Procedural Geometry Generation
//!
//! Primitive solids for the sandbox scene and line geometry for the debug
//! helper overlays. Everything is generated in a Y-up, right-handed frame.
//!
//! ## Supported Primitives
//!
//! - **Cube**: unit cube centered at the origin
//! - **Sphere**: UV sphere with configurable radius and resolution
//! - **Cylinder / Cone**: frustum along the Y axis with capped ends
//!
//! ## Usage
//!
//! ```rust
//! use sandbox3d::gfx::geometry::{generate_cube, generate_sphere, generate_cone};
//!
//! let cube = generate_cube();
//! let sphere = generate_sphere(4.0, 32, 32);
//! let cone = generate_cone(5.0, 5.0, 35);
//! assert_eq!(cube.triangle_count(), 12);
//! assert!(sphere.vertex_count() > 0);
//! assert!(cone.triangle_count() > 0);
//! ```

pub mod lines;
pub mod primitives;

pub use lines::{LineGeometry, LineVertex};
pub use primitives::*;

/// Triangle geometry ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Smallest and largest corner over all vertices
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().skip(1).fold((first, first), |(mut min, mut max), v| {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
            (min, max)
        }))
    }
}
