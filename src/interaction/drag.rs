//! Click-to-grab, move-to-drag state machine

use cgmath::{Vector2, Vector3};

use crate::gfx::{
    picking::{pick_at, PickFilter},
    scene::{ObjectId, Scene},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Holding(ObjectId),
}

/// What a click did to the drag state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Grabbed(ObjectId),
    Released(ObjectId),
    /// Idle click on nothing draggable
    Ignored,
}

/// Owns the held object, if any
///
/// At most one object is held; grabbing another one requires a releasing
/// click first.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn held(&self) -> Option<ObjectId> {
        match self.state {
            DragState::Holding(id) => Some(id),
            DragState::Idle => None,
        }
    }

    /// Toggles the held object
    ///
    /// While holding, any click releases without picking. While idle, the
    /// nearest object under the pointer is grabbed if it is draggable.
    pub fn on_click(&mut self, ndc: Vector2<f32>, scene: &Scene) -> ClickOutcome {
        if let DragState::Holding(id) = self.state {
            self.state = DragState::Idle;
            log::debug!("Released {:?}", id);
            return ClickOutcome::Released(id);
        }

        let camera = &scene.camera_manager.camera;
        let nearest = pick_at(ndc, camera, scene, PickFilter::All).into_iter().next();
        let Some(hit) = nearest else {
            log::debug!("Click at {:?} hit nothing", ndc);
            return ClickOutcome::Ignored;
        };

        match scene.object(hit.object) {
            Some(object) if object.is_draggable() => {
                log::debug!("Grabbed {} at {:?}", object.name, hit.point);
                self.state = DragState::Holding(hit.object);
                ClickOutcome::Grabbed(hit.object)
            }
            Some(object) => {
                log::debug!("Nearest hit {} is not draggable", object.name);
                ClickOutcome::Ignored
            }
            None => ClickOutcome::Ignored,
        }
    }

    /// Per-frame update: snaps the held object onto the nearest ground hit
    ///
    /// Returns the new position, or `None` when idle or the pointer is not
    /// over any ground object.
    pub fn update(&self, ndc: Vector2<f32>, scene: &mut Scene) -> Option<Vector3<f32>> {
        let id = self.held()?;
        let camera = scene.camera_manager.camera;
        let ground = pick_at(ndc, &camera, scene, PickFilter::GroundOnly)
            .into_iter()
            .next()?;
        scene.drag_to(id, ground.point.x, ground.point.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SandboxConfig,
        gfx::{geometry::generate_cube, scene::SceneObject},
    };

    struct Fixture {
        scene: Scene,
        floor: ObjectId,
        wall: ObjectId,
        block: ObjectId,
        other: ObjectId,
    }

    fn fixture() -> Fixture {
        let mut scene = Scene::from_config(&SandboxConfig::default(), 1.5);
        let floor = scene.add_object(
            SceneObject::builder("FLOOR")
                .with_geometry(&generate_cube())
                .at(0.0, -1.0, 3.0)
                .with_scale(100.0, 2.0, 100.0)
                .ground()
                .build(),
        );
        let wall = scene.add_object(
            SceneObject::builder("WALL")
                .with_geometry(&generate_cube())
                .at(0.0, 25.0, -46.0)
                .with_scale(100.0, 50.0, 2.0)
                .build(),
        );
        let block = scene.add_object(
            SceneObject::builder("BOX")
                .with_geometry(&generate_cube())
                .at(15.0, 3.0, 15.0)
                .with_uniform_scale(6.0)
                .draggable()
                .build(),
        );
        let other = scene.add_object(
            SceneObject::builder("OTHER")
                .with_geometry(&generate_cube())
                .at(-15.0, 3.0, 15.0)
                .with_uniform_scale(6.0)
                .draggable()
                .build(),
        );
        Fixture {
            scene,
            floor,
            wall,
            block,
            other,
        }
    }

    fn ndc_of(scene: &Scene, point: Vector3<f32>) -> Vector2<f32> {
        scene.camera_manager.camera.project_to_ndc(point).unwrap()
    }

    #[test]
    fn test_click_draggable_then_release() {
        let Fixture { mut scene, block, .. } = fixture();
        let mut drag = DragController::new();

        let on_box = ndc_of(&scene, Vector3::new(15.0, 3.0, 15.0));
        assert_eq!(drag.on_click(on_box, &scene), ClickOutcome::Grabbed(block));
        assert_eq!(drag.state(), DragState::Holding(block));

        let ground = ndc_of(&scene, Vector3::new(10.0, 0.0, 10.0));
        let moved = drag.update(ground, &mut scene).unwrap();
        assert!((moved.x - 10.0).abs() < 1e-2, "{moved:?}");
        assert!((moved.z - 10.0).abs() < 1e-2, "{moved:?}");
        assert_eq!(moved.y, 3.0);

        // Releasing click far away from anything
        assert_eq!(
            drag.on_click(Vector2::new(0.99, 0.99), &scene),
            ClickOutcome::Released(block)
        );
        assert_eq!(drag.state(), DragState::Idle);
        assert_eq!(scene.object(block).unwrap().position(), moved);
        assert!(drag.update(ground, &mut scene).is_none());
    }

    #[test]
    fn test_static_and_ground_clicks_stay_idle() {
        let Fixture { scene, floor, wall, .. } = fixture();
        let mut drag = DragController::new();

        let on_wall = ndc_of(&scene, Vector3::new(0.0, 40.0, -45.0));
        assert_eq!(drag.on_click(on_wall, &scene), ClickOutcome::Ignored);
        let on_floor = ndc_of(&scene, Vector3::new(-30.0, 0.0, 30.0));
        assert_eq!(drag.on_click(on_floor, &scene), ClickOutcome::Ignored);
        assert_eq!(drag.on_click(Vector2::new(0.99, 0.99), &scene), ClickOutcome::Ignored);
        assert_eq!(drag.state(), DragState::Idle);
        assert!(scene.object(floor).is_some() && scene.object(wall).is_some());
    }

    #[test]
    fn test_click_while_holding_releases_even_over_other_draggable() {
        let Fixture { scene, block, other, .. } = fixture();
        let mut drag = DragController::new();

        drag.on_click(ndc_of(&scene, Vector3::new(15.0, 3.0, 15.0)), &scene);
        let on_other = ndc_of(&scene, Vector3::new(-15.0, 3.0, 15.0));
        assert_eq!(drag.on_click(on_other, &scene), ClickOutcome::Released(block));
        assert_eq!(drag.on_click(on_other, &scene), ClickOutcome::Grabbed(other));
        assert_eq!(drag.held(), Some(other));
    }

    #[test]
    fn test_pointer_off_ground_keeps_position() {
        let Fixture { mut scene, block, .. } = fixture();
        let mut drag = DragController::new();
        drag.on_click(ndc_of(&scene, Vector3::new(15.0, 3.0, 15.0)), &scene);

        // Top-right corner looks over the floor into the sky
        assert!(drag.update(Vector2::new(1.0, 1.0), &mut scene).is_none());
        assert_eq!(
            scene.object(block).unwrap().position(),
            Vector3::new(15.0, 3.0, 15.0)
        );
    }
}
