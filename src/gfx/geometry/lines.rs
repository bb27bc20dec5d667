//! Line-list geometry for the debug helper overlays
//!
//! Every pair of consecutive vertices forms one segment.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Vector3};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl LineVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LineGeometry {
    pub vertices: Vec<LineVertex>,
}

impl LineGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segment_count(&self) -> usize {
        self.vertices.len() / 2
    }

    pub fn push_segment(&mut self, from: Vector3<f32>, to: Vector3<f32>, color: [f32; 3]) {
        self.vertices.push(LineVertex {
            position: from.into(),
            color,
        });
        self.vertices.push(LineVertex {
            position: to.into(),
            color,
        });
    }

    /// Square grid on the XZ plane centered at the origin
    ///
    /// The two center lines use `center_color`, the rest `line_color`.
    pub fn grid(size: f32, divisions: u32, center_color: [f32; 3], line_color: [f32; 3]) -> Self {
        let mut lines = Self::new();
        let divisions = divisions.max(1);
        let half = size * 0.5;
        let step = size / divisions as f32;
        let center = divisions / 2;
        let has_center_line = divisions % 2 == 0;

        for i in 0..=divisions {
            let offset = -half + i as f32 * step;
            let color = if has_center_line && i == center {
                center_color
            } else {
                line_color
            };
            lines.push_segment(
                Vector3::new(-half, 0.0, offset),
                Vector3::new(half, 0.0, offset),
                color,
            );
            lines.push_segment(
                Vector3::new(offset, 0.0, -half),
                Vector3::new(offset, 0.0, half),
                color,
            );
        }

        lines
    }

    /// Three orthogonal circles outlining a sphere
    pub fn wire_sphere(center: Vector3<f32>, radius: f32, segments: u32, color: [f32; 3]) -> Self {
        let mut lines = Self::new();
        let segments = segments.max(3);

        let point_on = |plane: usize, angle: f32| -> Vector3<f32> {
            let (sin_a, cos_a) = angle.sin_cos();
            let offset = match plane {
                0 => Vector3::new(cos_a, sin_a, 0.0),
                1 => Vector3::new(cos_a, 0.0, sin_a),
                _ => Vector3::new(0.0, cos_a, sin_a),
            };
            center + offset * radius
        };

        for plane in 0..3 {
            for i in 0..segments {
                let a0 = i as f32 * 2.0 * PI / segments as f32;
                let a1 = (i + 1) as f32 * 2.0 * PI / segments as f32;
                lines.push_segment(point_on(plane, a0), point_on(plane, a1), color);
            }
        }

        lines
    }

    /// Square of side `size` at `position` facing `target`, plus the aim line
    pub fn directional_marker(
        position: Vector3<f32>,
        target: Vector3<f32>,
        size: f32,
        color: [f32; 3],
    ) -> Self {
        let mut lines = Self::new();
        let to_target = target - position;
        let forward = if to_target.magnitude2() > f32::EPSILON {
            to_target.normalize()
        } else {
            -Vector3::unit_y()
        };

        // Any axis not parallel to `forward` works for building the square's frame
        let reference = if forward.y.abs() < 0.99 {
            Vector3::unit_y()
        } else {
            Vector3::unit_x()
        };
        let right = forward.cross(reference).normalize() * (size * 0.5);
        let up = right.cross(forward).normalize() * (size * 0.5);

        let corners = [
            position + right + up,
            position - right + up,
            position - right - up,
            position + right - up,
        ];
        for i in 0..4 {
            lines.push_segment(corners[i], corners[(i + 1) % 4], color);
        }
        lines.push_segment(position, target, color);

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_segment_count() {
        let grid = LineGeometry::grid(120.0, 10, [1.0; 3], [0.5; 3]);
        assert_eq!(grid.segment_count(), 22);
        let extent = grid
            .vertices
            .iter()
            .map(|v| v.position[0].abs().max(v.position[2].abs()))
            .fold(0.0f32, f32::max);
        assert!((extent - 60.0).abs() < 1e-4);
        assert!(grid.vertices.iter().all(|v| v.position[1] == 0.0));
    }

    #[test]
    fn test_wire_sphere_stays_on_radius() {
        let center = Vector3::new(0.0, 20.0, 50.0);
        let sphere = LineGeometry::wire_sphere(center, 4.0, 16, [1.0; 3]);
        assert_eq!(sphere.segment_count(), 48);
        for vertex in &sphere.vertices {
            let p: Vector3<f32> = vertex.position.into();
            assert!(((p - center).magnitude() - 4.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_directional_marker_points_at_target() {
        let position = Vector3::new(-30.0, 70.0, -30.0);
        let marker = LineGeometry::directional_marker(position, Vector3::new(0.0, 0.0, 0.0), 10.0, [1.0; 3]);
        assert_eq!(marker.segment_count(), 5);
        let last = &marker.vertices[marker.vertices.len() - 1];
        assert_eq!(last.position, [0.0, 0.0, 0.0]);
    }
}
