use cgmath::{Matrix, Matrix4, SquareMatrix, Vector3};
use wgpu::Device;

use super::vertex::Vertex3D;
use crate::{
    config::hex_rgb,
    gfx::{geometry::GeometryData, picking::Aabb},
    wgpu_utils::uniform_buffer::UniformBuffer,
};

/// Typed handle into the scene registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) usize);

/// What the interaction layer may do with an object
///
/// A single enum keeps "ground" and "draggable" mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectRole {
    #[default]
    Static,
    /// Dragged objects snap onto these surfaces
    Ground,
    /// Can be picked up by a click and moved over the ground
    Draggable,
}

impl ObjectRole {
    pub fn is_ground(self) -> bool {
        matches!(self, ObjectRole::Ground)
    }

    pub fn is_draggable(self) -> bool {
        matches!(self, ObjectRole::Draggable)
    }
}

/// Blinn-Phong surface parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongMaterial {
    pub color: [f32; 3],
    pub shininess: f32,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            shininess: 30.0,
        }
    }
}

pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
}

impl Mesh {
    /// Builds a mesh from flat `xyz` position and normal arrays
    ///
    /// Missing normals fall back to +Y.
    pub fn new(positions: Vec<f32>, normals: Vec<f32>, indices: Vec<u32>) -> Self {
        let vertices = positions
            .chunks_exact(3)
            .enumerate()
            .map(|(i, p)| Vertex3D {
                position: [p[0], p[1], p[2]],
                normal: match normals.get(i * 3..i * 3 + 3) {
                    Some(n) => [n[0], n[1], n[2]],
                    None => [0.0, 1.0, 0.0],
                },
            })
            .collect();

        Self::from_parts(vertices, indices)
    }

    pub fn from_geometry(geometry: &GeometryData) -> Self {
        let vertices = geometry
            .vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: geometry.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect();

        Self::from_parts(vertices, geometry.indices.clone())
    }

    fn from_parts(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        Self {
            index_count: indices.len() as u32,
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
        }
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Local-space triangle corners; triangles with out-of-range indices are skipped
    pub fn triangles(&self) -> impl Iterator<Item = [Vector3<f32>; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            let a = self.vertices.get(tri[0] as usize)?;
            let b = self.vertices.get(tri[1] as usize)?;
            let c = self.vertices.get(tri[2] as usize)?;
            Some([a.position.into(), b.position.into(), c.position.into()])
        })
    }

    /// Averaged per-vertex normals for models that ship without them
    pub fn calculate_face_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
        let vertex_count = positions.len() / 3;
        let mut normals = vec![0.0; positions.len()];

        let corner = |i: usize| -> Vector3<f32> {
            Vector3::new(positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2])
        };

        for triangle in indices.chunks_exact(3) {
            let [i0, i1, i2] = [
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            ];
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }

            let face_normal = (corner(i1) - corner(i0)).cross(corner(i2) - corner(i0));

            for vertex_idx in [i0, i1, i2] {
                normals[vertex_idx * 3] += face_normal.x;
                normals[vertex_idx * 3 + 1] += face_normal.y;
                normals[vertex_idx * 3 + 2] += face_normal.z;
            }
        }

        for normal in normals.chunks_exact_mut(3) {
            let length = (normal[0].powi(2) + normal[1].powi(2) + normal[2].powi(2)).sqrt();
            if length > 0.0 {
                normal.iter_mut().for_each(|c| *c /= length);
            }
        }

        normals
    }

    fn init_gpu_resources(&mut self, device: &Device) {
        use wgpu::util::DeviceExt;

        self.vertex_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.index_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }
}

/// Per-object uniform data. MUST match `ObjectData` in the shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    color: [f32; 4],
    /// x = shininess, y = receives shadow (0 or 1)
    params: [f32; 4],
}

pub struct ObjectGpuResources {
    uniform: UniformBuffer<ObjectUniform>,
    bind_group: wgpu::BindGroup,
}

/// A placed object in the sandbox
pub struct SceneObject {
    pub name: String,
    role: ObjectRole,
    position: Vector3<f32>,
    scale: Vector3<f32>,
    meshes: Vec<Mesh>,
    pub material: PhongMaterial,
    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    local_bounds: Aabb,
    gpu_resources: Option<ObjectGpuResources>,
}

impl SceneObject {
    pub fn builder(name: impl Into<String>) -> ObjectBuilder {
        ObjectBuilder::new(name)
    }

    pub fn is_ground(&self) -> bool {
        self.role.is_ground()
    }

    pub fn is_draggable(&self) -> bool {
        self.role.is_draggable()
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn scale(&self) -> Vector3<f32> {
        self.scale
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Bounding box of all meshes before the object transform
    pub fn local_bounds(&self) -> Aabb {
        self.local_bounds
    }

    /// Model matrix: translation * scale
    pub fn transform(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Moves the object on the XZ plane; height is left untouched
    pub(crate) fn set_horizontal_position(&mut self, x: f32, z: f32) {
        self.position.x = x;
        self.position.z = z;
    }

    pub fn has_gpu_resources(&self) -> bool {
        self.gpu_resources.is_some()
    }

    pub fn uniform(&self) -> ObjectUniform {
        let model = self.transform();
        let normal_matrix = model
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity);
        let [r, g, b] = self.material.color;

        ObjectUniform {
            model: model.into(),
            normal_matrix: normal_matrix.into(),
            color: [r, g, b, 1.0],
            params: [
                self.material.shininess,
                if self.receive_shadow { 1.0 } else { 0.0 },
                0.0,
                0.0,
            ],
        }
    }

    /// Creates vertex/index buffers and the per-object uniform bind group
    pub fn init_gpu_resources(&mut self, device: &Device, layout: &wgpu::BindGroupLayout) {
        for mesh in &mut self.meshes {
            mesh.init_gpu_resources(device);
        }

        let uniform = UniformBuffer::new_with_data(device, &self.uniform());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("Object Bind Group: {}", self.name)),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.binding_resource(),
            }],
        });

        self.gpu_resources = Some(ObjectGpuResources {
            uniform,
            bind_group,
        });
    }

    /// Syncs transform and material to the GPU; unchanged content is skipped
    pub fn update_gpu(&mut self, queue: &wgpu::Queue) {
        let content = self.uniform();
        if let Some(gpu) = &mut self.gpu_resources {
            gpu.uniform.update_content(queue, content);
        }
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources.as_ref().map(|gpu| &gpu.bind_group)
    }
}

/// Builder for configuring scene objects
pub struct ObjectBuilder {
    name: String,
    role: ObjectRole,
    position: Vector3<f32>,
    scale: Vector3<f32>,
    meshes: Vec<Mesh>,
    material: PhongMaterial,
    cast_shadow: bool,
    receive_shadow: bool,
}

impl ObjectBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: ObjectRole::Static,
            position: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
            meshes: Vec::new(),
            material: PhongMaterial::default(),
            cast_shadow: true,
            receive_shadow: true,
        }
    }

    pub fn with_geometry(mut self, geometry: &GeometryData) -> Self {
        self.meshes.push(Mesh::from_geometry(geometry));
        self
    }

    pub fn with_meshes(mut self, meshes: impl IntoIterator<Item = Mesh>) -> Self {
        self.meshes.extend(meshes);
        self
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vector3::new(x, y, z);
        self
    }

    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vector3::new(x, y, z);
        self
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vector3::new(scale, scale, scale);
        self
    }

    pub fn with_role(mut self, role: ObjectRole) -> Self {
        self.role = role;
        self
    }

    pub fn ground(self) -> Self {
        self.with_role(ObjectRole::Ground)
    }

    pub fn draggable(self) -> Self {
        self.with_role(ObjectRole::Draggable)
    }

    pub fn with_hex_color(mut self, hex: u32) -> Self {
        self.material.color = hex_rgb(hex);
        self
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.material.color = color;
        self
    }

    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.material.shininess = shininess;
        self
    }

    pub fn cast_shadow(mut self, enabled: bool) -> Self {
        self.cast_shadow = enabled;
        self
    }

    pub fn receive_shadow(mut self, enabled: bool) -> Self {
        self.receive_shadow = enabled;
        self
    }

    pub fn build(self) -> SceneObject {
        let local_bounds = Aabb::from_vertices(
            self.meshes
                .iter()
                .flat_map(|mesh| mesh.vertices().iter().map(|v| v.position)),
        )
        .unwrap_or_else(Aabb::unit);

        SceneObject {
            name: self.name,
            role: self.role,
            position: self.position,
            scale: self.scale,
            meshes: self.meshes,
            material: self.material,
            visible: true,
            cast_shadow: self.cast_shadow,
            receive_shadow: self.receive_shadow,
            local_bounds,
            gpu_resources: None,
        }
    }
}

pub trait DrawObject {
    fn draw_mesh(&mut self, mesh: &Mesh);
    fn draw_object(&mut self, object: &SceneObject, bind_group_index: u32);
}

impl DrawObject for wgpu::RenderPass<'_> {
    fn draw_mesh(&mut self, mesh: &Mesh) {
        let (Some(vertex_buffer), Some(index_buffer)) = (&mesh.vertex_buffer, &mesh.index_buffer)
        else {
            return; // Not uploaded yet
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, 0..1);
    }

    fn draw_object(&mut self, object: &SceneObject, bind_group_index: u32) {
        let Some(bind_group) = object.bind_group() else {
            return;
        };
        self.set_bind_group(bind_group_index, bind_group, &[]);
        for mesh in &object.meshes {
            self.draw_mesh(mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_cube;

    #[test]
    fn test_role_flags_are_exclusive() {
        for role in [ObjectRole::Static, ObjectRole::Ground, ObjectRole::Draggable] {
            assert!(!(role.is_ground() && role.is_draggable()));
        }
    }

    #[test]
    fn test_builder_bounds_and_transform() {
        let object = SceneObject::builder("BOX")
            .with_geometry(&generate_cube())
            .at(15.0, 3.0, 15.0)
            .with_uniform_scale(6.0)
            .draggable()
            .build();

        assert!(object.is_draggable());
        assert_eq!(object.local_bounds().min, Vector3::new(-0.5, -0.5, -0.5));
        let corner = object.transform() * cgmath::Vector4::new(0.5, 0.5, 0.5, 1.0);
        assert_eq!(corner.truncate(), Vector3::new(18.0, 6.0, 18.0));
    }

    #[test]
    fn test_horizontal_move_keeps_height() {
        let mut object = SceneObject::builder("BOX")
            .with_geometry(&generate_cube())
            .at(1.0, 3.0, 1.0)
            .build();
        object.set_horizontal_position(-4.0, 7.5);
        assert_eq!(object.position(), Vector3::new(-4.0, 3.0, 7.5));
    }

    #[test]
    fn test_face_normals_for_flat_triangle() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, -1.0];
        let normals = Mesh::calculate_face_normals(&positions, &[0, 1, 2]);
        for n in normals.chunks_exact(3) {
            assert!((n[1] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_mesh_skips_bad_indices() {
        let mesh = Mesh::new(vec![0.0; 9], vec![], vec![0, 1, 2, 0, 1, 9]);
        assert_eq!(mesh.triangles().count(), 1);
        assert_eq!(mesh.vertices()[0].normal, [0.0, 1.0, 0.0]);
    }
}
