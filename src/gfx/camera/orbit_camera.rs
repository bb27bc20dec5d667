use super::camera_utils::{Camera, CameraUniform};
use crate::config::CameraConfig;
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Spherical coordinates the camera returns to on reset
#[derive(Debug, Clone, Copy)]
struct OrbitHome {
    distance: f32,
    pitch: f32,
    yaw: f32,
    target: Vector3<f32>,
}

/// Perspective camera orbiting a target point, Y up
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
    home: OrbitHome,
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * self.projection_matrix() * self.view_matrix()
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // Will be auto-calculated in `update()` nevertheless.
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: Rad(std::f32::consts::PI / 4.0),
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
            home: OrbitHome {
                distance,
                pitch,
                yaw,
                target,
            },
        };
        camera.update();
        camera
    }

    /// Places the camera at `config.eye` looking at `config.target`
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let offset = config.eye - config.target;
        let distance = offset.magnitude().max(f32::EPSILON);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);

        let mut camera = Self::new(distance, pitch, yaw, config.target, aspect);
        camera.fovy = Deg(config.fovy_degrees).into();
        camera.znear = config.znear;
        camera.zfar = config.zfar;
        camera.bounds.min_distance = Some(config.min_distance);
        camera.bounds.max_distance = Some(config.max_distance);
        camera.set_distance(distance);
        camera.home.distance = camera.distance;
        camera
    }

    pub fn reset_to_default(&mut self) {
        self.distance = self.home.distance;
        self.pitch = self.home.pitch;
        self.yaw = self.home.yaw;
        self.target = self.home.target;

        self.update();
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    pub fn add_distance(&mut self, delta: f32) {
        let corrected_zoom = f32::log10(self.distance.max(1.1)) * delta;
        self.set_distance(self.distance + corrected_zoom);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        let mut bounded_yaw = yaw;
        if let Some(min_yaw) = self.bounds.min_yaw {
            bounded_yaw = bounded_yaw.max(min_yaw);
        }
        if let Some(max_yaw) = self.bounds.max_yaw {
            bounded_yaw = bounded_yaw.min(max_yaw);
        }
        self.yaw = bounded_yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Pans the camera relative to the current view direction
    /// delta.0 = horizontal pan (left/right relative to camera view)
    /// delta.1 = vertical pan (up/down relative to camera view)
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // Scale by distance for a consistent feel at all zoom levels
        let pan_scale = self.distance * 0.1;
        let movement = right * delta.0 * pan_scale + up * delta.1 * pan_scale;

        self.eye += movement;
        self.target += movement;
    }

    /// Updates the camera after changing `distance`, `pitch` or `yaw`.
    fn update(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(
            Point3::from_vec(self.eye),
            Point3::from_vec(self.target),
            self.up,
        )
    }

    /// OpenGL-convention projection (clip z in [-w, w])
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    /// Normalized device coordinates of a world point, `None` behind the eye
    pub fn project_to_ndc(&self, point: Vector3<f32>) -> Option<Vector2<f32>> {
        let clip = self.projection_matrix() * self.view_matrix() * point.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        Some(Vector2::new(clip.x / clip.w, clip.y / clip.w))
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = self.build_view_projection_matrix().into();
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_yaw: Option<f32>,
    pub max_yaw: Option<f32>,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: None,
            max_distance: None,
            min_pitch: -std::f32::consts::FRAC_PI_2 + 0.01,
            max_pitch: std::f32::consts::FRAC_PI_2 - 0.01,
            min_yaw: None,
            max_yaw: None,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-3, "{a:?} != {b:?}");
    }

    #[test]
    fn test_from_config_keeps_eye() {
        let config = CameraConfig::default();
        let camera = OrbitCamera::from_config(&config, 1.5);
        assert_close(camera.eye, config.eye);
        assert_eq!(camera.up, Vector3::unit_y());
        assert!((camera.fovy.0 - 30f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_distance_is_clamped() {
        let mut camera = OrbitCamera::from_config(&CameraConfig::default(), 1.5);
        camera.set_distance(5000.0);
        assert_eq!(camera.distance, 1000.0);
        camera.set_distance(0.0);
        assert_eq!(camera.distance, 1.0);
    }

    #[test]
    fn test_reset_restores_start_view() {
        let config = CameraConfig::default();
        let mut camera = OrbitCamera::from_config(&config, 1.5);
        camera.add_yaw(1.0);
        camera.add_pitch(-0.3);
        camera.pan((2.0, 1.0));
        camera.reset_to_default();
        assert_close(camera.eye, config.eye);
        assert_close(camera.target, config.target);
    }

    #[test]
    fn test_target_projects_to_center() {
        let camera = OrbitCamera::from_config(&CameraConfig::default(), 4.0 / 3.0);
        let ndc = camera.project_to_ndc(Vector3::zero()).unwrap();
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        // Behind the eye
        let behind = camera.eye * 2.0;
        assert!(camera.project_to_ndc(behind).is_none());
    }

    #[test]
    fn test_render_matrix_matches_picking_projection() {
        let camera = OrbitCamera::from_config(&CameraConfig::default(), 1200.0 / 800.0);
        let view_proj = camera.build_view_projection_matrix();
        for point in [
            Vector3::new(15.0, 3.0, 15.0),
            Vector3::new(-15.0, 0.0, -15.0),
            Vector3::new(-50.0, 0.0, -47.0),
        ] {
            let clip = view_proj * point.extend(1.0);
            let rendered = Vector2::new(clip.x / clip.w, clip.y / clip.w);
            let picked = camera.project_to_ndc(point).unwrap();
            assert!((rendered - picked).magnitude() < 1e-5, "{rendered:?} != {picked:?}");
            // wgpu clip depth
            assert!((0.0..=1.0).contains(&(clip.z / clip.w)));
        }
    }

    #[test]
    fn test_wgpu_matrix_remaps_depth_only() {
        let near = OPENGL_TO_WGPU_MATRIX * Vector4::new(0.3, -0.2, -1.0, 1.0);
        let far = OPENGL_TO_WGPU_MATRIX * Vector4::new(0.3, -0.2, 1.0, 1.0);
        assert_eq!(near, Vector4::new(0.3, -0.2, 0.0, 1.0));
        assert_eq!(far, Vector4::new(0.3, -0.2, 1.0, 1.0));
    }

    #[test]
    fn test_resize_ignores_zero_size() {
        let mut camera = OrbitCamera::from_config(&CameraConfig::default(), 1.5);
        camera.resize_projection(800, 600);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        camera.resize_projection(0, 600);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }
}
