//! # Ray Picking
//!
//! Casts a ray from the camera through a pointer position and reports every
//! scene object it crosses, nearest first.
//!
//! ## How it works
//!
//! 1. **Pointer to Ray**: un-project the NDC pointer position through the camera
//! 2. **Broad phase**: move the ray into each object's local space and test the
//!    local bounding box
//! 3. **Narrow phase**: test every triangle of the surviving objects and keep the
//!    nearest hit per object
//!
//! Picking never mutates the scene.

use cgmath::{ElementWise, InnerSpace, Matrix4, SquareMatrix, Vector2, Vector3, Vector4};

use crate::gfx::{
    camera::orbit_camera::OrbitCamera,
    scene::{ObjectId, Scene, SceneObject},
};

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vector3<f32>,
    /// Normalized for world-space rays; local-space copies may be scaled
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Ray from the camera eye through the NDC position (x right, y up)
    ///
    /// Returns `None` when the camera matrices are degenerate.
    pub fn from_camera(ndc: Vector2<f32>, camera: &OrbitCamera) -> Option<Self> {
        let inv_view_proj = (camera.projection_matrix() * camera.view_matrix()).invert()?;

        let unproject = |z: f32| -> Option<Vector3<f32>> {
            let world = inv_view_proj * Vector4::new(ndc.x, ndc.y, z, 1.0);
            (world.w.abs() > f32::EPSILON).then(|| world.truncate() / world.w)
        };
        let near = unproject(-1.0)?;
        let far = unproject(1.0)?;

        let direction = far - near;
        if direction.magnitude2() <= f32::EPSILON {
            return None;
        }
        Some(Ray::new(camera.eye, direction))
    }

    /// Same ray expressed in the space `inverse` maps into; `t` values are preserved
    fn transformed(&self, inverse: &Matrix4<f32>) -> Self {
        Self {
            origin: (inverse * self.origin.extend(1.0)).truncate(),
            direction: (inverse * self.direction.extend(0.0)).truncate(),
        }
    }

    /// Möller–Trumbore, double sided. Returns the ray parameter of the hit.
    pub fn intersect_triangle(&self, triangle: &[Vector3<f32>; 3]) -> Option<f32> {
        const EPSILON: f32 = 1e-7;
        let [a, b, c] = *triangle;

        let edge1 = b - a;
        let edge2 = c - a;
        let h = self.direction.cross(edge2);
        let det = edge1.dot(h);
        if det.abs() < EPSILON {
            return None; // Parallel to the triangle plane
        }

        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = inv_det * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = inv_det * self.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv_det * edge2.dot(q);
        (t > EPSILON).then_some(t)
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Box spanning -0.5..0.5 on every axis
    pub fn unit() -> Self {
        Self::new(Vector3::new(-0.5, -0.5, -0.5), Vector3::new(0.5, 0.5, 0.5))
    }

    /// Smallest box containing every vertex, `None` for an empty set
    pub fn from_vertices(vertices: impl IntoIterator<Item = [f32; 3]>) -> Option<Self> {
        let mut vertices = vertices.into_iter();
        let first: Vector3<f32> = vertices.next()?.into();

        Some(vertices.fold(Self::new(first, first), |aabb, vertex| {
            let v: Vector3<f32> = vertex.into();
            Self::new(
                Vector3::new(aabb.min.x.min(v.x), aabb.min.y.min(v.y), aabb.min.z.min(v.z)),
                Vector3::new(aabb.max.x.max(v.x), aabb.max.y.max(v.y), aabb.max.z.max(v.z)),
            )
        }))
    }

    /// Test ray-AABB intersection (slab method)
    /// Returns the ray parameter of the entry point, or of the exit point when
    /// the origin is inside
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t_near = t_min.x.min(t_max.x).max(t_min.y.min(t_max.y)).max(t_min.z.min(t_max.z));
        let t_far = t_min.x.max(t_max.x).min(t_min.y.max(t_max.y)).min(t_min.z.max(t_max.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

    /// Bounds of the eight transformed corners
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners = (0..8).map(|i| {
            let corner = Vector4::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
                1.0,
            );
            let transformed = matrix * corner;
            (transformed.truncate() / transformed.w).into()
        });

        Self::from_vertices(corners).unwrap_or(*self)
    }
}

/// Which objects a pick may report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickFilter {
    #[default]
    All,
    GroundOnly,
}

impl PickFilter {
    fn accepts(self, object: &SceneObject) -> bool {
        match self {
            PickFilter::All => true,
            PickFilter::GroundOnly => object.is_ground(),
        }
    }
}

/// One object crossed by a pick ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub object: ObjectId,
    /// World-space intersection point
    pub point: Vector3<f32>,
    /// Distance from the ray origin
    pub distance: f32,
}

/// Every visible object the ray crosses, ordered by increasing distance
pub fn pick(ray: &Ray, scene: &Scene, filter: PickFilter) -> Vec<PickHit> {
    let mut hits: Vec<PickHit> = scene
        .objects()
        .filter(|(_, object)| object.visible && filter.accepts(object))
        .filter_map(|(id, object)| {
            let distance = intersect_object(ray, object)?;
            Some(PickHit {
                object: id,
                point: ray.point_at(distance),
                distance,
            })
        })
        .collect();

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// Picks through the pointer position; an empty result for degenerate cameras
pub fn pick_at(
    ndc: Vector2<f32>,
    camera: &OrbitCamera,
    scene: &Scene,
    filter: PickFilter,
) -> Vec<PickHit> {
    match Ray::from_camera(ndc, camera) {
        Some(ray) => pick(&ray, scene, filter),
        None => Vec::new(),
    }
}

/// Nearest triangle hit on the object, as a world-space ray parameter
fn intersect_object(ray: &Ray, object: &SceneObject) -> Option<f32> {
    let inverse = object.transform().invert()?;
    let local_ray = ray.transformed(&inverse);

    object.local_bounds().intersect_ray(&local_ray)?;

    object
        .meshes()
        .iter()
        .flat_map(|mesh| mesh.triangles())
        .filter_map(|triangle| local_ray.intersect_triangle(&triangle))
        .min_by(f32::total_cmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SandboxConfig,
        gfx::{geometry::generate_cube, scene::SceneObject},
    };
    use rand::Rng;

    fn test_scene() -> Scene {
        Scene::from_config(&SandboxConfig::default(), 1.5)
    }

    fn cube(name: &str, position: Vector3<f32>, scale: f32) -> SceneObject {
        SceneObject::builder(name)
            .with_geometry(&generate_cube())
            .with_position(position)
            .with_uniform_scale(scale)
            .build()
    }

    #[test]
    fn test_aabb_creation() {
        let aabb = Aabb::from_vertices([[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [-1.0, -1.0, -1.0]])
            .unwrap();
        assert_eq!(aabb.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 1.0, 1.0));
        assert!(Aabb::from_vertices(std::iter::empty()).is_none());
    }

    #[test]
    fn test_ray_aabb_intersection() {
        let aabb = Aabb::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));

        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(aabb.intersect_ray(&ray), Some(4.0));

        let ray_miss = Ray::new(Vector3::new(5.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray_miss).is_none());
    }

    #[test]
    fn test_triangle_is_double_sided() {
        let triangle = [
            Vector3::new(-1.0, 0.0, -1.0),
            Vector3::new(1.0, 0.0, -1.0),
            Vector3::new(0.0, 0.0, 1.0),
        ];
        let down = Ray::new(Vector3::new(0.0, 5.0, 0.0), -Vector3::unit_y());
        let up = Ray::new(Vector3::new(0.0, -5.0, 0.0), Vector3::unit_y());
        assert_eq!(down.intersect_triangle(&triangle), Some(5.0));
        assert_eq!(up.intersect_triangle(&triangle), Some(5.0));

        let beside = Ray::new(Vector3::new(3.0, 5.0, 0.0), -Vector3::unit_y());
        assert!(beside.intersect_triangle(&triangle).is_none());
    }

    #[test]
    fn test_scaled_object_reports_world_distance() {
        let mut scene = test_scene();
        let id = scene.add_object(cube("BOX", Vector3::new(0.0, 0.0, 0.0), 4.0));
        let ray = Ray::new(Vector3::new(0.3, 0.2, 10.0), -Vector3::unit_z());

        let hits = pick(&ray, &scene, PickFilter::All);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].object, id);
        assert!((hits[0].distance - 8.0).abs() < 1e-4);
        assert!((hits[0].point.z - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_hits_sorted_and_filtered() {
        let mut scene = test_scene();
        let far = scene.add_object(cube("FAR", Vector3::new(0.0, 0.0, -10.0), 2.0));
        let near = scene.add_object(cube("NEAR", Vector3::new(0.0, 0.0, 0.0), 2.0));
        let floor = scene.add_object(
            SceneObject::builder("FLOOR")
                .with_geometry(&generate_cube())
                .at(0.0, 0.0, -20.0)
                .with_scale(50.0, 2.0, 2.0)
                .ground()
                .build(),
        );
        let ray = Ray::new(Vector3::new(0.3, 0.2, 10.0), -Vector3::unit_z());

        let all: Vec<ObjectId> = pick(&ray, &scene, PickFilter::All)
            .iter()
            .map(|hit| hit.object)
            .collect();
        assert_eq!(all, vec![near, far, floor]);

        let ground = pick(&ray, &scene, PickFilter::GroundOnly);
        assert_eq!(ground.len(), 1);
        assert_eq!(ground[0].object, floor);
    }

    #[test]
    fn test_hidden_objects_are_skipped() {
        let mut scene = test_scene();
        let mut object = cube("GHOST", Vector3::new(0.0, 0.0, 0.0), 2.0);
        object.visible = false;
        scene.add_object(object);
        let ray = Ray::new(Vector3::new(0.0, 0.0, 10.0), -Vector3::unit_z());
        assert!(pick(&ray, &scene, PickFilter::All).is_empty());
    }

    #[test]
    fn test_camera_ray_hits_projected_center() {
        let mut scene = test_scene();
        let center = Vector3::new(15.0, 3.0, 15.0);
        let id = scene.add_object(cube("BOX", center, 6.0));
        let camera = scene.camera_manager.camera;

        let ndc = camera.project_to_ndc(center).unwrap();
        let hits = pick_at(ndc, &camera, &scene, PickFilter::All);
        assert_eq!(hits.first().map(|hit| hit.object), Some(id));
        assert!(hits[0].distance < (camera.eye - center).magnitude());
    }

    #[test]
    fn test_pointer_outside_silhouette_picks_nothing() {
        let mut scene = test_scene();
        let object = cube("BOX", Vector3::new(5.0, 2.0, -3.0), 6.0);
        let world_bounds = object.local_bounds().transform(&object.transform());
        scene.add_object(object);
        let camera = scene.camera_manager.camera;

        // Screen rectangle enclosing the projected corners
        let projected: Vec<Vector2<f32>> = (0..8)
            .map(|i| {
                let corner = Vector3::new(
                    if i & 1 == 0 { world_bounds.min.x } else { world_bounds.max.x },
                    if i & 2 == 0 { world_bounds.min.y } else { world_bounds.max.y },
                    if i & 4 == 0 { world_bounds.min.z } else { world_bounds.max.z },
                );
                camera.project_to_ndc(corner).unwrap()
            })
            .collect();
        let min_x = projected.iter().map(|p| p.x).fold(f32::MAX, f32::min);
        let max_x = projected.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        let min_y = projected.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        let max_y = projected.iter().map(|p| p.y).fold(f32::MIN, f32::max);

        let mut rng = rand::rng();
        let mut checked = 0;
        while checked < 200 {
            let ndc = Vector2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
            let inside = ndc.x >= min_x && ndc.x <= max_x && ndc.y >= min_y && ndc.y <= max_y;
            if inside {
                continue;
            }
            assert!(pick_at(ndc, &camera, &scene, PickFilter::All).is_empty(), "{ndc:?}");
            checked += 1;
        }
    }
}
