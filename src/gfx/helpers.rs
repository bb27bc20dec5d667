//! Debug helper overlays: ground grid and light markers
//!
//! Each helper is a [`LineOverlay`] stored in the scene. [`HelperOverlays`]
//! maps the typed [`HelperKind`] to the overlay it created, so toggling never
//! goes through a name lookup.

use std::collections::HashMap;

use crate::gfx::{
    geometry::{LineGeometry, LineVertex},
    lighting::SceneLights,
    scene::Scene,
};

const GRID_SIZE: f32 = 120.0;
const GRID_DIVISIONS: u32 = 10;
const GRID_CENTER_COLOR: [f32; 3] = [0.27, 0.27, 0.27];
const GRID_LINE_COLOR: [f32; 3] = [0.53, 0.53, 0.53];
const POINT_MARKER_RADIUS: f32 = 4.0;
const POINT_MARKER_SEGMENTS: u32 = 24;
const DIRECTIONAL_MARKER_SIZE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelperKind {
    Grid,
    PointLight,
    DirectionalLight,
}

impl HelperKind {
    pub const ALL: [HelperKind; 3] = [
        HelperKind::Grid,
        HelperKind::PointLight,
        HelperKind::DirectionalLight,
    ];

    pub fn label(self) -> &'static str {
        match self {
            HelperKind::Grid => "Grid",
            HelperKind::PointLight => "Point light",
            HelperKind::DirectionalLight => "Directional light",
        }
    }

    fn geometry(self, lights: &SceneLights) -> LineGeometry {
        match self {
            HelperKind::Grid => LineGeometry::grid(
                GRID_SIZE,
                GRID_DIVISIONS,
                GRID_CENTER_COLOR,
                GRID_LINE_COLOR,
            ),
            HelperKind::PointLight => LineGeometry::wire_sphere(
                lights.point.position,
                POINT_MARKER_RADIUS,
                POINT_MARKER_SEGMENTS,
                lights.point.color,
            ),
            HelperKind::DirectionalLight => LineGeometry::directional_marker(
                lights.directional.position,
                lights.directional.target,
                DIRECTIONAL_MARKER_SIZE,
                lights.directional.color,
            ),
        }
    }
}

/// Handle of a line overlay in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(pub(crate) usize);

/// World-space line list drawn on top of the lit scene
pub struct LineOverlay {
    pub name: String,
    pub visible: bool,
    geometry: LineGeometry,
    vertex_buffer: Option<wgpu::Buffer>,
}

impl LineOverlay {
    pub fn new(name: impl Into<String>, geometry: LineGeometry) -> Self {
        Self {
            name: name.into(),
            visible: false,
            geometry,
            vertex_buffer: None,
        }
    }

    pub fn geometry(&self) -> &LineGeometry {
        &self.geometry
    }

    pub fn vertex_count(&self) -> u32 {
        self.geometry.vertices.len() as u32
    }

    pub fn has_gpu_resources(&self) -> bool {
        self.vertex_buffer.is_some()
    }

    pub fn init_gpu_resources(&mut self, device: &wgpu::Device) {
        use wgpu::util::DeviceExt;

        self.vertex_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Line Overlay: {}", self.name)),
            contents: bytemuck::cast_slice::<LineVertex, u8>(&self.geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
    }

    pub fn vertex_buffer(&self) -> Option<&wgpu::Buffer> {
        self.vertex_buffer.as_ref()
    }
}

/// Typed lookup from helper kind to its overlay
#[derive(Debug, Clone, Default)]
pub struct HelperOverlays {
    overlays: HashMap<HelperKind, OverlayId>,
}

impl HelperOverlays {
    /// Adds one hidden overlay per helper kind to the scene
    pub fn install(scene: &mut Scene) -> Self {
        let lights = scene.lights;
        let overlays = HelperKind::ALL
            .into_iter()
            .map(|kind| {
                let id = scene.add_overlay(LineOverlay::new(kind.label(), kind.geometry(&lights)));
                (kind, id)
            })
            .collect();

        Self { overlays }
    }

    pub fn overlay(&self, kind: HelperKind) -> Option<OverlayId> {
        self.overlays.get(&kind).copied()
    }

    /// Shows or hides a helper; returns `false` if it was never installed
    pub fn set_visible(&self, scene: &mut Scene, kind: HelperKind, visible: bool) -> bool {
        match self.overlay(kind) {
            Some(id) => scene.set_overlay_visible(id, visible),
            None => false,
        }
    }

    pub fn is_visible(&self, scene: &Scene, kind: HelperKind) -> bool {
        self.overlay(kind)
            .and_then(|id| scene.overlay(id))
            .is_some_and(|overlay| overlay.visible)
    }

    pub fn toggle(&self, scene: &mut Scene, kind: HelperKind) -> bool {
        let visible = !self.is_visible(scene, kind);
        self.set_visible(scene, kind, visible);
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SandboxConfig;

    #[test]
    fn test_helpers_start_hidden_and_toggle() {
        let mut scene = Scene::from_config(&SandboxConfig::default(), 1.5);
        let helpers = HelperOverlays::install(&mut scene);

        assert_eq!(scene.overlays().count(), 3);
        for kind in HelperKind::ALL {
            assert!(!helpers.is_visible(&scene, kind));
        }

        assert!(helpers.set_visible(&mut scene, HelperKind::Grid, true));
        assert!(helpers.is_visible(&scene, HelperKind::Grid));
        assert!(!helpers.is_visible(&scene, HelperKind::PointLight));

        assert!(!helpers.toggle(&mut scene, HelperKind::Grid));
        assert!(!helpers.is_visible(&scene, HelperKind::Grid));
    }

    #[test]
    fn test_missing_helper_reports_false() {
        let mut scene = Scene::from_config(&SandboxConfig::default(), 1.5);
        let helpers = HelperOverlays::default();
        assert!(!helpers.set_visible(&mut scene, HelperKind::Grid, true));
    }

    #[test]
    fn test_point_marker_follows_light() {
        let mut scene = Scene::from_config(&SandboxConfig::default(), 1.5);
        let helpers = HelperOverlays::install(&mut scene);
        let id = helpers.overlay(HelperKind::PointLight).unwrap();
        let overlay = scene.overlay(id).unwrap();
        let light = scene.lights.point.position;
        let near_light = overlay.geometry().vertices.iter().all(|v| {
            let p: cgmath::Vector3<f32> = v.position.into();
            cgmath::InnerSpace::magnitude(p - light) < POINT_MARKER_RADIUS + 1e-3
        });
        assert!(near_light);
    }
}
