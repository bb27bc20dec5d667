//! Light setup shared by the renderer and the helper overlays

use cgmath::{ortho, EuclideanSpace, InnerSpace, Matrix4, Point3, Vector3};

use crate::{
    config::{AmbientLightConfig, DirectionalLightConfig, LightingConfig, PointLightConfig},
    gfx::camera::orbit_camera::OPENGL_TO_WGPU_MATRIX,
};

/// Near and far planes of the directional shadow frustum
const SHADOW_NEAR: f32 = 1.0;
const SHADOW_FAR: f32 = 200.0;

#[derive(Debug, Clone, Copy)]
pub struct SceneLights {
    pub ambient: AmbientLightConfig,
    pub directional: DirectionalLightConfig,
    pub point: PointLightConfig,
}

impl SceneLights {
    pub fn from_config(config: &LightingConfig) -> Self {
        Self {
            ambient: config.ambient,
            directional: config.directional,
            point: config.point,
        }
    }

    /// Unit vector the directional light travels along
    pub fn sun_direction(&self) -> Vector3<f32> {
        let direction = self.directional.target - self.directional.position;
        if direction.magnitude2() > f32::EPSILON {
            direction.normalize()
        } else {
            -Vector3::unit_y()
        }
    }

    /// Orthographic light-space matrix used by the shadow pass (wgpu depth range)
    pub fn shadow_view_proj(&self) -> Matrix4<f32> {
        let up = if self.sun_direction().y.abs() > 0.99 {
            Vector3::unit_z()
        } else {
            Vector3::unit_y()
        };
        let view = Matrix4::look_at_rh(
            Point3::from_vec(self.directional.position),
            Point3::from_vec(self.directional.target),
            up,
        );
        let extent = self.directional.shadow_extent;
        let proj = ortho(-extent, extent, -extent, extent, SHADOW_NEAR, SHADOW_FAR);

        OPENGL_TO_WGPU_MATRIX * proj * view
    }
}
