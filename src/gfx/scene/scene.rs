use cgmath::Vector3;
use wgpu::Device;

use super::object::{ObjectId, SceneObject};
use crate::{
    config::SandboxConfig,
    gfx::{
        camera::camera_utils::CameraManager,
        helpers::{LineOverlay, OverlayId},
        lighting::SceneLights,
    },
};

/// Object registry plus the camera, lights and helper overlays
///
/// Objects are only ever appended, so an [`ObjectId`] stays valid for the
/// whole session.
pub struct Scene {
    pub camera_manager: CameraManager,
    pub lights: SceneLights,
    pub background: [f32; 3],
    objects: Vec<SceneObject>,
    overlays: Vec<LineOverlay>,
}

impl Scene {
    pub fn new(camera_manager: CameraManager, lights: SceneLights, background: [f32; 3]) -> Self {
        Self {
            camera_manager,
            lights,
            background,
            objects: Vec::new(),
            overlays: Vec::new(),
        }
    }

    /// Empty scene with the configured camera and lights
    pub fn from_config(config: &SandboxConfig, aspect: f32) -> Self {
        Self::new(
            CameraManager::from_config(&config.camera, &config.controls, aspect),
            SceneLights::from_config(&config.lighting),
            config.lighting.background,
        )
    }

    /// Updates the scene (camera matrices, etc.)
    pub fn update(&mut self) {
        self.camera_manager.camera.update_view_proj();
    }

    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        let id = ObjectId(self.objects.len());
        log::debug!("Added object {} as {:?}", object.name, id);
        self.objects.push(object);
        id
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0)
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> + '_ {
        self.objects
            .iter()
            .enumerate()
            .map(|(index, object)| (ObjectId(index), object))
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    /// Moves a draggable object to `(x, z)`, keeping its height
    ///
    /// Returns the new position, or `None` if the object is missing or not
    /// draggable.
    pub fn drag_to(&mut self, id: ObjectId, x: f32, z: f32) -> Option<Vector3<f32>> {
        let object = self.objects.get_mut(id.0)?;
        if !object.is_draggable() {
            return None;
        }
        object.set_horizontal_position(x, z);
        Some(object.position())
    }

    pub fn add_overlay(&mut self, overlay: LineOverlay) -> OverlayId {
        self.overlays.push(overlay);
        OverlayId(self.overlays.len() - 1)
    }

    pub fn overlay(&self, id: OverlayId) -> Option<&LineOverlay> {
        self.overlays.get(id.0)
    }

    pub fn overlays(&self) -> impl Iterator<Item = &LineOverlay> + '_ {
        self.overlays.iter()
    }

    pub fn set_overlay_visible(&mut self, id: OverlayId, visible: bool) -> bool {
        match self.overlays.get_mut(id.0) {
            Some(overlay) => {
                overlay.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Creates GPU resources for anything added since the last call
    pub fn init_gpu_resources(&mut self, device: &Device, object_layout: &wgpu::BindGroupLayout) {
        for object in self.objects.iter_mut().filter(|o| !o.has_gpu_resources()) {
            log::debug!("Uploading {}", object.name);
            object.init_gpu_resources(device, object_layout);
        }
        for overlay in self.overlays.iter_mut().filter(|o| !o.has_gpu_resources()) {
            overlay.init_gpu_resources(device);
        }
    }

    /// Syncs every object's uniform to the GPU
    pub fn update_all_transforms(&mut self, queue: &wgpu::Queue) {
        for object in self.objects.iter_mut() {
            object.update_gpu(queue);
        }
    }

    /// Returns scene statistics for the debug panel
    pub fn get_stats(&self) -> SceneStats {
        SceneStats {
            object_count: self.objects.len(),
            visible_objects: self.objects.iter().filter(|o| o.visible).count(),
            total_triangles: self
                .objects
                .iter()
                .flat_map(|o| o.meshes())
                .map(|mesh| mesh.triangle_count())
                .sum(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStats {
    pub object_count: usize,
    pub visible_objects: usize,
    pub total_triangles: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_cube;

    fn scene() -> Scene {
        Scene::from_config(&SandboxConfig::default(), 1.5)
    }

    #[test]
    fn test_ids_are_sequential_and_stable() {
        let mut scene = scene();
        let a = scene.add_object(SceneObject::builder("A").with_geometry(&generate_cube()).build());
        let b = scene.add_object(SceneObject::builder("B").with_geometry(&generate_cube()).build());
        assert_ne!(a, b);
        assert_eq!(scene.object(a).map(|o| o.name.as_str()), Some("A"));
        assert_eq!(scene.find_by_name("B"), Some(b));
        assert_eq!(scene.find_by_name("C"), None);
        assert_eq!(scene.get_stats().total_triangles, 24);
    }

    #[test]
    fn test_drag_to_refuses_static_and_ground() {
        let mut scene = scene();
        let floor = scene.add_object(
            SceneObject::builder("FLOOR")
                .with_geometry(&generate_cube())
                .ground()
                .build(),
        );
        let wall = scene.add_object(SceneObject::builder("WALL").with_geometry(&generate_cube()).build());
        let block = scene.add_object(
            SceneObject::builder("BOX")
                .with_geometry(&generate_cube())
                .at(15.0, 3.0, 15.0)
                .draggable()
                .build(),
        );

        assert!(scene.drag_to(floor, 1.0, 1.0).is_none());
        assert!(scene.drag_to(wall, 1.0, 1.0).is_none());
        assert_eq!(scene.drag_to(block, 10.0, 10.0), Some(Vector3::new(10.0, 3.0, 10.0)));
        assert_eq!(scene.object(floor).unwrap().position(), Vector3::new(0.0, 0.0, 0.0));
    }
}
