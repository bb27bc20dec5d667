//! # Primitive Shape Generation
//!
//! All shapes are centered at the origin with outward facing normals.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a unit cube centered at the origin
///
/// Returns a cube with vertices from -0.5 to 0.5 on all axes; scale it through
/// the object transform. Each face has its own four vertices so normals stay flat.
pub fn generate_cube() -> GeometryData {
    let mut data = GeometryData::new();

    #[rustfmt::skip]
    let positions = [
        // Front face
        [-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5],
        // Back face
        [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5, -0.5, -0.5],
        // Left face
        [-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5],
        // Right face
        [ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5],
        // Top face
        [-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5],
        // Bottom face
        [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5],
    ];

    let face_normals: [[f32; 3]; 6] = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    data.vertices = positions.to_vec();
    data.normals = face_normals
        .iter()
        .flat_map(|normal| std::iter::repeat(*normal).take(4))
        .collect();

    // Two triangles per face
    data.indices = (0..6u32)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base + 2, base + 3, base]
        })
        .collect();

    data
}

/// Generate a UV sphere
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments (latitude lines)
pub fn generate_sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32; // 0 to 2*PI
            let x = sin_theta * phi.cos();
            let y = cos_theta;
            let z = sin_theta * phi.sin();

            data.vertices.push([x * radius, y * radius, z * radius]);
            data.normals.push([x, y, z]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend_from_slice(&[first, second, first + 1]);
            data.indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    data
}

/// Generate a cylinder along the Y axis, extending from -height/2 to height/2
pub fn generate_cylinder(radius: f32, height: f32, segments: u32) -> GeometryData {
    generate_frustum(radius, radius, height, segments)
}

/// Generate a cone along the Y axis with its apex at +height/2
pub fn generate_cone(radius: f32, height: f32, segments: u32) -> GeometryData {
    generate_frustum(0.0, radius, height, segments)
}

/// Generate a capped frustum along the Y axis
///
/// A zero radius collapses that end to a point and skips its cap.
pub fn generate_frustum(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);
    let half_height = height * 0.5;
    // Side normals tilt outward by the slope of the silhouette
    let slope = if height > 0.0 {
        (radius_bottom - radius_top) / height
    } else {
        0.0
    };

    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        let normal = normalize([cos_a, slope, sin_a]);

        data.vertices
            .push([radius_bottom * cos_a, -half_height, radius_bottom * sin_a]);
        data.normals.push(normal);

        data.vertices
            .push([radius_top * cos_a, half_height, radius_top * sin_a]);
        data.normals.push(normal);
    }

    for i in 0..segs {
        let bottom_current = i * 2;
        let top_current = bottom_current + 1;
        let bottom_next = (i + 1) * 2;
        let top_next = bottom_next + 1;

        data.indices
            .extend_from_slice(&[bottom_current, top_current, bottom_next]);
        data.indices
            .extend_from_slice(&[top_current, top_next, bottom_next]);
    }

    if radius_bottom > 0.0 {
        push_cap(&mut data, radius_bottom, -half_height, segs, false);
    }
    if radius_top > 0.0 {
        push_cap(&mut data, radius_top, half_height, segs, true);
    }

    data
}

/// Appends a flat disc with its own ring so cap normals stay axis aligned
fn push_cap(data: &mut GeometryData, radius: f32, y: f32, segs: u32, facing_up: bool) {
    let normal = if facing_up {
        [0.0, 1.0, 0.0]
    } else {
        [0.0, -1.0, 0.0]
    };

    let center = data.vertices.len() as u32;
    data.vertices.push([0.0, y, 0.0]);
    data.normals.push(normal);

    let ring_start = data.vertices.len() as u32;
    for i in 0..segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        data.vertices.push([radius * cos_a, y, radius * sin_a]);
        data.normals.push(normal);
    }

    for i in 0..segs {
        let current = ring_start + i;
        let next = ring_start + (i + 1) % segs;
        if facing_up {
            data.indices.extend_from_slice(&[center, next, current]);
        } else {
            data.indices.extend_from_slice(&[center, current, next]);
        }
    }
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let length = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if length > 0.0 {
        [v[0] / length, v[1] / length, v[2] / length]
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_generation() {
        let cube = generate_cube();
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.normals.len(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(cube.bounds(), Some(([-0.5, -0.5, -0.5], [0.5, 0.5, 0.5])));
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(4.0, 8, 6);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        assert_eq!(sphere.vertices.len(), 9 * 7);
        let (min, max) = sphere.bounds().unwrap();
        assert!((max[1] - 4.0).abs() < 1e-5);
        assert!((min[1] + 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_cylinder_spans_height_on_y() {
        let cylinder = generate_cylinder(4.0, 6.0, 32);
        let (min, max) = cylinder.bounds().unwrap();
        assert!((min[1] + 3.0).abs() < 1e-5);
        assert!((max[1] - 3.0).abs() < 1e-5);
        assert!((max[0] - 4.0).abs() < 1e-5);
        // Sides plus two capped discs
        assert_eq!(cylinder.triangle_count(), 32 * 2 + 32 * 2);
        assert!(cylinder.indices.iter().all(|&i| (i as usize) < cylinder.vertex_count()));
    }

    #[test]
    fn test_cone_has_single_cap() {
        let cone = generate_cone(5.0, 5.0, 35);
        assert_eq!(cone.triangle_count(), 35 * 2 + 35);
        let (_, max) = cone.bounds().unwrap();
        assert!((max[1] - 2.5).abs() < 1e-5);
    }
}
