//! WGPU-based rendering engine for the sandbox
//!
//! Each frame runs three passes into one encoder: a depth-only shadow pass
//! from the directional light, the lit Phong pass for solid objects, and the
//! line pass for visible helper overlays. The UI callback records last.

use std::sync::Arc;
use wgpu::{Device, TextureFormat};

use crate::{
    error::{Result, SandboxError},
    gfx::{
        resources::{
            global_bindings::{object_bind_group_layout, GlobalBindings, ShadowBindings},
            texture_resource::TextureResource,
        },
        scene::{object::DrawObject, scene::Scene},
    },
};

use super::pipeline_manager::{DepthConfig, PipelineConfig, PipelineManager, VertexLayout};

const SHADOW_PIPELINE: &str = "Shadow";
const PHONG_PIPELINE: &str = "Phong";
const LINES_PIPELINE: &str = "Lines";

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    global_bindings: GlobalBindings,
    object_layout: wgpu::BindGroupLayout,
    shadow_bindings: ShadowBindings,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `shadow_map_size` - Edge length of the square directional shadow map
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        shadow_map_size: u32,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(SandboxError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let shadow_size = shadow_map_size.clamp(256, 4096);
        let shadow_bindings = ShadowBindings::new(&device, shadow_size);
        let global_bindings = GlobalBindings::new(&device);
        let object_layout = object_bind_group_layout(&device);

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("phong", include_str!("phong.wgsl"));
        pipeline_manager.load_shader("shadow", include_str!("shadow.wgsl"));
        pipeline_manager.load_shader("lines", include_str!("lines.wgsl"));

        // No culling in either solid pass: walls and the imported model are viewed from both sides
        pipeline_manager.register_pipeline(
            SHADOW_PIPELINE,
            PipelineConfig::default()
                .with_label("SHADOW")
                .with_shader("shadow")
                .with_vertex_only()
                .with_cull_mode(None)
                .with_depth(DepthConfig::new(TextureResource::DEPTH_FORMAT))
                .with_depth_bias(2, 2.0)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    object_layout.clone(),
                ]),
        );

        pipeline_manager.register_pipeline(
            PHONG_PIPELINE,
            PipelineConfig::default()
                .with_label("PHONG")
                .with_shader("phong")
                .with_cull_mode(None)
                .with_depth(DepthConfig::new(TextureResource::DEPTH_FORMAT))
                .with_color_target(format, wgpu::BlendState::REPLACE)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    object_layout.clone(),
                    shadow_bindings.bind_group_layout().clone(),
                ]),
        );

        pipeline_manager.register_pipeline(
            LINES_PIPELINE,
            PipelineConfig::default()
                .with_label("LINES")
                .with_shader("lines")
                .with_vertex_layout(VertexLayout::Lines)
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList)
                .with_cull_mode(None)
                .with_depth(DepthConfig::read_only(TextureResource::DEPTH_FORMAT))
                .with_color_target(format, wgpu::BlendState::ALPHA_BLENDING)
                .with_bind_group_layouts(vec![global_bindings.bind_group_layout().clone()]),
        );

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for error in errors {
                log::error!("{}", error);
            }
        }
        let stats = pipeline_manager.get_stats();
        log::info!(
            "{} pipelines ready from {} shaders ({} pending)",
            stats.total_pipelines,
            stats.loaded_shaders,
            stats.pending_pipelines
        );

        Ok(RenderEngine {
            device: device_handle,
            config,
            format,
            surface,
            queue: queue_handle,
            depth_texture,
            pipeline_manager,
            global_bindings,
            object_layout,
            shadow_bindings,
        })
    }

    /// Uploads anything new in the scene and syncs camera, lights and transforms
    pub fn prepare(&mut self, scene: &mut Scene) {
        scene.init_gpu_resources(&self.device, &self.object_layout);
        scene.update_all_transforms(&self.queue);
        self.global_bindings.update(
            &self.queue,
            &scene.camera_manager.camera.uniform,
            &scene.lights,
        );
    }

    /// Renders one frame, then lets `ui_callback` record on top of it
    ///
    /// Lost or outdated surfaces are reconfigured and the frame is skipped.
    /// Only out-of-memory is returned to the caller.
    pub fn render_frame<F>(&mut self, scene: &Scene, ui_callback: Option<F>) -> Result<(), wgpu::SurfaceError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(wgpu::SurfaceError::OutOfMemory),
            Err(e) => {
                log::warn!("Skipping frame: {}", e);
                return Ok(());
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Depth Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_bindings.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            shadow_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            if let Some(shadow_pipeline) = self.pipeline_manager.pipeline(SHADOW_PIPELINE) {
                shadow_pass.set_pipeline(shadow_pipeline);
                for (_, object) in scene.objects() {
                    if object.visible && object.cast_shadow {
                        shadow_pass.draw_object(object, 1);
                    }
                }
            }
        }

        {
            let [r, g, b] = scene.background;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            if let Some(pipeline) = self.pipeline_manager.pipeline(PHONG_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(2, self.shadow_bindings.bind_group(), &[]);
                for (_, object) in scene.objects() {
                    if object.visible {
                        render_pass.draw_object(object, 1);
                    }
                }
            }

            if let Some(pipeline) = self.pipeline_manager.pipeline(LINES_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                for overlay in scene.overlays().filter(|o| o.visible) {
                    if let Some(buffer) = overlay.vertex_buffer() {
                        render_pass.set_vertex_buffer(0, buffer.slice(..));
                        render_pass.draw(0..overlay.vertex_count(), 0..1);
                    }
                }
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    pub fn render_frame_with_ui<F>(&mut self, scene: &Scene, ui_callback: F) -> Result<(), wgpu::SurfaceError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        self.render_frame(scene, Some(ui_callback))
    }

    /// Reconfigures the surface and depth buffer; zero sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;

        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}
