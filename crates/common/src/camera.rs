use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::types::Viewport;

/// Perspective camera that eases toward pointer-derived targets and always
/// faces a look-at point.
///
/// The projection matrix is cached; call `update_projection` after changing
/// `fov`, `aspect`, `near` or `far` directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraRig {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    projection: Mat4,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(60.0, 1.0, 0.1, 1000.0, Vec3::new(0.0, 0.0, 5.0))
    }
}

impl CameraRig {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32, position: Vec3) -> Self {
        let mut camera = Self {
            position,
            target: Vec3::ZERO,
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    pub fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
    }

    /// Match the aspect ratio of a resized surface.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect();
        self.update_projection();
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Exponential smoothing of the x/y position toward `goal`.
    pub fn drift_toward(&mut self, goal: Vec2, blend: f32) {
        self.position.x += (goal.x - self.position.x) * blend;
        self.position.y += (goal.y - self.position.y) * blend;
    }

    /// Distance from the camera to its look-at point.
    pub fn working_distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Map a normalized device coordinate back into world space.
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        self.view_projection().inverse().project_point3(ndc)
    }

    /// World-space ray through a normalized pointer position.
    pub fn ray(&self, ndc: Vec2) -> (Vec3, Vec3) {
        let through = self.unproject(ndc.extend(0.5));
        (self.position, (through - self.position).normalize_or_zero())
    }

    /// Point under the pointer on the plane `z = plane_z`.
    ///
    /// Rays that never reach the plane land at the camera's working distance
    /// instead.
    pub fn pointer_on_plane(&self, ndc: Vec2, plane_z: f32) -> Vec3 {
        let (origin, dir) = self.ray(ndc);
        if dir.z.abs() > 1e-6 {
            let t = (plane_z - origin.z) / dir.z;
            if t > 0.0 {
                return origin + dir * t;
            }
        }
        origin + dir * self.working_distance()
    }
}
