//! Sandbox configuration
//!
//! Plain data with `Default` values describing the starting scene: window,
//! camera, orbit controls, lights and the model to import. Builder-style
//! `with_*` methods adjust individual settings.

use std::path::PathBuf;

use cgmath::Vector3;

use crate::gfx::scene::ObjectRole;

/// Environment variable overriding the model path
pub const MODEL_PATH_ENV: &str = "SANDBOX_MODEL";
/// Environment variable disabling the model import when set
pub const NO_MODEL_ENV: &str = "SANDBOX_NO_MODEL";

/// Converts a `0xRRGGBB` color into linear-ish RGB floats
pub fn hex_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Super SandBox".to_string(),
            width: 1200,
            height: 800,
        }
    }
}

/// Perspective camera placement and orbit limits
#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    /// Vertical field of view in degrees
    pub fovy_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vector3::new(-70.0, 60.0, 200.0),
            target: Vector3::new(0.0, 0.0, 0.0),
            fovy_degrees: 30.0,
            znear: 1.0,
            zfar: 1500.0,
            min_distance: 1.0,
            max_distance: 1000.0,
        }
    }
}

/// Orbit control sensitivities
#[derive(Debug, Clone, Copy)]
pub struct ControlsConfig {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Pointer travel in pixels under which a press/release counts as a click
    pub click_slop: f64,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            rotate_speed: 0.005,
            zoom_speed: 5.0,
            pan_speed: 0.01,
            click_slop: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AmbientLightConfig {
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct DirectionalLightConfig {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Vector3<f32>,
    pub target: Vector3<f32>,
    pub shadow_map_size: u32,
    /// Half width of the orthographic shadow frustum
    pub shadow_extent: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct PointLightConfig {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Vector3<f32>,
    /// Distance at which the light contribution reaches zero
    pub range: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct LightingConfig {
    pub background: [f32; 3],
    pub ambient: AmbientLightConfig,
    pub directional: DirectionalLightConfig,
    pub point: PointLightConfig,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            background: hex_rgb(0xbfd1e5),
            ambient: AmbientLightConfig {
                color: hex_rgb(0xffffff),
                intensity: 0.20,
            },
            directional: DirectionalLightConfig {
                color: hex_rgb(0xffffff),
                intensity: 0.85,
                position: Vector3::new(-30.0, 70.0, -30.0),
                target: Vector3::new(0.0, 0.0, 0.0),
                shadow_map_size: 2048,
                shadow_extent: 70.0,
            },
            point: PointLightConfig {
                color: hex_rgb(0xff15ff),
                intensity: 1.0,
                position: Vector3::new(0.0, 20.0, 50.0),
                range: 130.0,
            },
        }
    }
}

/// Where and how the imported model is placed once loaded
#[derive(Debug, Clone)]
pub struct ModelPlacement {
    pub name: String,
    pub position: Vector3<f32>,
    pub scale: f32,
    pub role: ObjectRole,
}

#[derive(Debug, Clone)]
pub struct AssetConfig {
    /// OBJ file to import; `None` skips the import
    pub model_path: Option<PathBuf>,
    pub placement: ModelPlacement,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            model_path: Some(PathBuf::from("assets/models/castle/castle.obj")),
            placement: ModelPlacement {
                name: "CASTLE".to_string(),
                position: Vector3::new(-15.0, 0.0, -15.0),
                scale: 5.0,
                role: ObjectRole::Draggable,
            },
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default)]
pub struct SandboxConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub lighting: LightingConfig,
    pub assets: AssetConfig,
}

impl SandboxConfig {
    /// Default configuration with environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if std::env::var_os(NO_MODEL_ENV).is_some() {
            config.assets.model_path = None;
        } else if let Some(path) = std::env::var_os(MODEL_PATH_ENV) {
            config.assets.model_path = Some(PathBuf::from(path));
        }
        config
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.assets.model_path = Some(path.into());
        self
    }

    pub fn without_model(mut self) -> Self {
        self.assets.model_path = None;
        self
    }

    pub fn with_model_placement(mut self, placement: ModelPlacement) -> Self {
        self.assets.placement = placement;
        self
    }

    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }
}
