use glam::{Mat4, Vec3};

use crate::scene::Transform;

/// Perspective camera.
///
/// `fov_y` is the vertical field of view in degrees. The projection is
/// right-handed with a `[0, 1]` depth range, matching wgpu.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub transform: Transform,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(50.0, 1.0, 0.1, 2000.0)
    }
}

impl PerspectiveCamera {
    pub fn new(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        debug_assert!(near > 0.0 && far > near);
        Self {
            fov_y,
            aspect,
            near,
            far,
            transform: Transform::default(),
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }

    /// World-to-view transform (inverse of the camera's own transform).
    pub fn view_matrix(&self) -> Mat4 {
        self.transform.matrix().inverse()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn default_camera_produces_finite_matrices() {
        let cam = PerspectiveCamera::default().with_position(Vec3::new(0.0, 6.0, 0.0));
        let vp = cam.view_projection();
        assert!(vp.is_finite());
    }

    #[test]
    fn view_matrix_moves_world_opposite_to_camera() {
        let cam = PerspectiveCamera::default().with_position(Vec3::new(0.0, 6.0, 0.0));
        let p = cam.view_matrix() * Vec4::new(0.0, 6.0, -10.0, 1.0);
        assert!((p.y).abs() < 1e-5);
        assert!((p.z + 10.0).abs() < 1e-5);
    }

    #[test]
    fn point_in_front_lands_inside_clip_volume() {
        let cam = PerspectiveCamera::new(60.0, 16.0 / 9.0, 1.0, 1000.0);
        let clip = cam.view_projection() * Vec4::new(0.0, 0.0, -50.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
    }

    #[test]
    fn wider_aspect_narrows_horizontal_projection() {
        let narrow = PerspectiveCamera::new(60.0, 1.0, 1.0, 1000.0).projection_matrix();
        let wide = PerspectiveCamera::new(60.0, 2.0, 1.0, 1000.0).projection_matrix();
        assert!(wide.x_axis.x < narrow.x_axis.x);
        assert_eq!(wide.y_axis.y, narrow.y_axis.y);
    }
}
