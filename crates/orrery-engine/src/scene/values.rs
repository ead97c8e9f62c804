use glam::Vec3;

use super::transform::Transform;

/// Animated values for a container node, as produced by a timeline.
///
/// Rotation is in degrees (how timelines author it); the scene stores radians.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ContainerValues {
    pub position: Vec3,
    pub rotation_degrees: Vec3,
}

impl ContainerValues {
    /// Writes position and rotation into `transform`. Scale is untouched.
    pub fn apply_to(&self, transform: &mut Transform) {
        transform.position = self.position;
        transform.rotation = Vec3::new(
            self.rotation_degrees.x.to_radians(),
            self.rotation_degrees.y.to_radians(),
            self.rotation_degrees.z.to_radians(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn degrees_become_radians() {
        let mut t = Transform::default();
        ContainerValues {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation_degrees: Vec3::new(90.0, -180.0, 0.0),
        }
        .apply_to(&mut t);

        assert_eq!(t.position, Vec3::new(1.0, 2.0, 3.0));
        assert!((t.rotation.x - FRAC_PI_2).abs() < 1e-6);
        assert!((t.rotation.y + PI).abs() < 1e-6);
        assert_eq!(t.rotation.z, 0.0);
    }

    #[test]
    fn scale_is_preserved() {
        let mut t = Transform { scale: Vec3::splat(2.0), ..Transform::default() };
        ContainerValues::default().apply_to(&mut t);
        assert_eq!(t.scale, Vec3::splat(2.0));
    }
}
