//! Global uniform bindings for camera and lighting
//!
//! One uniform buffer per frame, bound to slot 0 in every pipeline, plus the
//! layouts for the per-object uniform and the shadow map.

use cgmath::Vector3;

use crate::{
    gfx::{camera::camera_utils::CameraUniform, lighting::SceneLights},
    wgpu_utils::uniform_buffer::UniformBuffer,
};

use super::texture_resource::TextureResource;

/// Per-frame data shared by all shaders. MUST match `Globals` in the shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    light_view_proj: [[f32; 4]; 4],
    /// rgb premultiplied by intensity
    ambient: [f32; 4],
    sun_direction: [f32; 4],
    sun_color: [f32; 4],
    /// w holds the range
    point_position: [f32; 4],
    point_color: [f32; 4],
}

fn scaled(color: [f32; 3], intensity: f32) -> [f32; 4] {
    [
        color[0] * intensity,
        color[1] * intensity,
        color[2] * intensity,
        1.0,
    ]
}

fn with_w(v: Vector3<f32>, w: f32) -> [f32; 4] {
    [v.x, v.y, v.z, w]
}

impl GlobalUniform {
    pub fn new(camera: &CameraUniform, lights: &SceneLights) -> Self {
        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            light_view_proj: lights.shadow_view_proj().into(),
            ambient: scaled(lights.ambient.color, lights.ambient.intensity),
            sun_direction: with_w(lights.sun_direction(), 0.0),
            sun_color: scaled(lights.directional.color, lights.directional.intensity),
            point_position: with_w(lights.point.position, lights.point.range),
            point_color: scaled(lights.point.color, lights.point.intensity),
        }
    }
}

pub type GlobalUbo = UniformBuffer<GlobalUniform>;

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Layout of the per-object uniform (slot 1)
pub fn object_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Object Bind Group Layout"),
        entries: &[uniform_entry(0)],
    })
}

/// Global uniform buffer with its bind group
pub struct GlobalBindings {
    ubo: GlobalUbo,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let ubo = GlobalUbo::new(device);
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Bind Group Layout"),
            entries: &[uniform_entry(0)],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Global Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });

        Self {
            ubo,
            bind_group_layout,
            bind_group,
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, camera: &CameraUniform, lights: &SceneLights) {
        self.ubo
            .update_content(queue, GlobalUniform::new(camera, lights));
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Shadow map plus comparison sampler bound to slot 2 of the lit pass
pub struct ShadowBindings {
    pub shadow_map: TextureResource,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl ShadowBindings {
    pub fn new(device: &wgpu::Device, size: u32) -> Self {
        let shadow_map = TextureResource::create_shadow_map(device, size);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Shadow Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Depth,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shadow Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&shadow_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&shadow_map.sampler),
                },
            ],
        });

        Self {
            shadow_map,
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LightingConfig;

    #[test]
    fn test_uniform_layout_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<GlobalUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<GlobalUniform>(), 224);
    }

    #[test]
    fn test_light_terms_are_premultiplied() {
        let lights = SceneLights::from_config(&LightingConfig::default());
        let uniform = GlobalUniform::new(&CameraUniform::default(), &lights);
        assert!((uniform.ambient[0] - 0.2).abs() < 1e-6);
        assert!((uniform.sun_color[1] - 0.85).abs() < 1e-6);
        assert_eq!(uniform.point_position, [0.0, 20.0, 50.0, 130.0]);
    }
}
