//! # Scene Bootstrapper
//!
//! One-time construction of the sandbox: camera, lights, the fixed set of
//! primitives and the helper overlays, plus the background import of the
//! configured model. The loaded model is placed with
//! [`SceneBootstrapper::place_model`] once its [`ModelLoad`] reports back.

pub mod model_loader;

use crate::{
    config::{hex_rgb, ModelPlacement, SandboxConfig},
    gfx::{
        geometry::{generate_cone, generate_cube, generate_cylinder, generate_sphere},
        helpers::HelperOverlays,
        scene::{ObjectId, Scene, SceneObject},
    },
};

pub use model_loader::{load_model, LoadedModel, ModelLoad};

const SPHERE_SEGMENTS: u32 = 32;
const ROUND_SEGMENTS: u32 = 32;
const CONE_SEGMENTS: u32 = 35;
const FLOOR_COLOR: u32 = 0xf9c834;
const GOLD: u32 = 0xffd700;
const BLOCK_COLOR: u32 = 0xfafafa;

/// Everything the bootstrapper hands to the running sandbox
pub struct Bootstrap {
    pub scene: Scene,
    pub helpers: HelperOverlays,
    pub pending_model: Option<ModelLoad>,
}

pub struct SceneBootstrapper {
    config: SandboxConfig,
}

impl SceneBootstrapper {
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }

    /// Builds the starting scene and kicks off the model import, if configured
    pub fn build(self) -> Bootstrap {
        let aspect = self.config.window.width as f32 / self.config.window.height.max(1) as f32;
        let mut scene = Scene::from_config(&self.config, aspect);

        for object in default_objects() {
            scene.add_object(object);
        }
        let helpers = HelperOverlays::install(&mut scene);
        log::info!(
            "Scene ready: {} objects, {} helper overlays",
            scene.object_count(),
            scene.overlays().count()
        );

        let pending_model = self.config.assets.model_path.clone().map(ModelLoad::spawn);

        Bootstrap {
            scene,
            helpers,
            pending_model,
        }
    }

    /// Appends a finished import to the scene
    pub fn place_model(scene: &mut Scene, model: LoadedModel, placement: &ModelPlacement) -> ObjectId {
        let mut builder = SceneObject::builder(placement.name.clone())
            .with_meshes(model.meshes)
            .with_position(placement.position)
            .with_uniform_scale(placement.scale)
            .with_role(placement.role);
        if let Some(color) = model.color {
            builder = builder.with_color(color);
        }

        log::info!("Placing {} ({}) at {:?}", placement.name, model.name, placement.position);
        scene.add_object(builder.build())
    }
}

/// The fixed primitives of the sandbox
fn default_objects() -> Vec<SceneObject> {
    let cube = generate_cube();

    let mut objects = vec![
        SceneObject::builder("FLOOR")
            .with_geometry(&cube)
            .at(0.0, -1.0, 3.0)
            .with_scale(100.0, 2.0, 100.0)
            .with_hex_color(FLOOR_COLOR)
            .ground()
            .build(),
        SceneObject::builder("WALL")
            .with_geometry(&cube)
            .at(0.0, 25.0, -46.0)
            .with_scale(100.0, 50.0, 2.0)
            .with_hex_color(FLOOR_COLOR)
            .receive_shadow(false)
            .build(),
        SceneObject::builder("BOX")
            .with_geometry(&cube)
            .at(15.0, 3.0, 15.0)
            .with_uniform_scale(6.0)
            .with_hex_color(0xdc143c)
            .draggable()
            .build(),
        SceneObject::builder("SPHERE")
            .with_geometry(&generate_sphere(4.0, SPHERE_SEGMENTS, SPHERE_SEGMENTS))
            .at(15.0, 4.0, -15.0)
            .with_hex_color(0x43a1f4)
            .draggable()
            .build(),
        SceneObject::builder("CYLINDER")
            .with_geometry(&generate_cylinder(4.0, 6.0, ROUND_SEGMENTS))
            .at(-15.0, 3.0, 15.0)
            .with_hex_color(0x90ee90)
            .draggable()
            .build(),
        SceneObject::builder("CONE")
            .with_geometry(&generate_cone(5.0, 5.0, CONE_SEGMENTS))
            .at(35.0, 2.5, -10.0)
            .with_hex_color(0x00ffff)
            .build(),
        SceneObject::builder("GOLD CUBE")
            .with_geometry(&cube)
            .at(35.0, 2.5, 25.0)
            .with_uniform_scale(5.0)
            .with_color(hex_rgb(GOLD))
            .with_shininess(200.0)
            .build(),
    ];

    for x in [-2.0, 0.0, 2.0] {
        for z in [-2.0, 0.0, 2.0] {
            objects.push(
                SceneObject::builder(format!("BLOCK {x},{z}"))
                    .with_geometry(&cube)
                    .at(x, 2.0, z)
                    .with_hex_color(BLOCK_COLOR)
                    .build(),
            );
        }
    }

    objects
}
