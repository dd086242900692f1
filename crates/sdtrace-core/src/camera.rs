//! Pinhole camera used to turn pixel coordinates into rays

use glam::Vec3;

/// A pinhole camera looking along `direction`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Camera position in world space (ray origin)
    pub position: Vec3,
    /// Viewing direction (need not be normalized)
    pub direction: Vec3,
    /// Up hint (usually Y-up)
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            direction: Vec3::Z,
            up: Vec3::Y,
            // Image plane spans [-1/2, 1/2] vertically at unit distance
            fov: 2.0 * 0.5_f32.atan(),
        }
    }
}

impl Camera {
    /// Create a new camera with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera looking at a target from a position
    pub fn look_at(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            direction: target - position,
            ..Default::default()
        }
    }

    /// Get the forward direction (normalized, zero if degenerate)
    pub fn forward(&self) -> Vec3 {
        self.direction.normalize_or_zero()
    }

    /// Get the right direction (normalized, zero if degenerate)
    pub fn right(&self) -> Vec3 {
        self.up.cross(self.forward()).normalize_or_zero()
    }

    /// Get the actual up direction (may differ from self.up due to camera orientation)
    pub fn actual_up(&self) -> Vec3 {
        self.forward().cross(self.right())
    }

    /// Half height of the image plane at unit distance
    pub fn half_height(&self) -> f32 {
        (self.fov * 0.5).tan()
    }

    /// Ray direction through normalized image coordinates.
    ///
    /// `u` runs left to right and `v` top to bottom, both in `[0, 1]`.
    /// A degenerate basis yields a zero vector; tracing such a ray never
    /// leaves its origin and ends as a miss.
    pub fn ray_direction(&self, u: f32, v: f32, aspect: f32) -> Vec3 {
        let half_h = self.half_height();
        let x = (2.0 * u - 1.0) * half_h * aspect;
        let y = (1.0 - 2.0 * v) * half_h;
        (self.forward() + self.right() * x + self.actual_up() * y).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_camera_center_ray_is_forward() {
        let camera = Camera::default();
        let dir = camera.ray_direction(0.5, 0.5, 1.0);
        assert_relative_eq!(dir.x, 0.0);
        assert_relative_eq!(dir.y, 0.0);
        assert_relative_eq!(dir.z, 1.0);
    }

    #[test]
    fn default_camera_image_plane_spans_half_units() {
        let camera = Camera::default();
        let aspect = 2.0;
        // Top-left corner maps to (-aspect/2, 1/2, 1) before normalization
        let dir = camera.ray_direction(0.0, 0.0, aspect);
        let expected = Vec3::new(-1.0, 0.5, 1.0).normalize();
        assert_relative_eq!(dir.x, expected.x, epsilon = 1e-6);
        assert_relative_eq!(dir.y, expected.y, epsilon = 1e-6);
        assert_relative_eq!(dir.z, expected.z, epsilon = 1e-6);
    }

    #[test]
    fn basis_is_orthonormal() {
        let camera = Camera::look_at(Vec3::new(3.0, 2.0, -4.0), Vec3::ZERO);
        let (f, r, u) = (camera.forward(), camera.right(), camera.actual_up());
        assert_relative_eq!(f.dot(r), 0.0, epsilon = 1e-6);
        assert_relative_eq!(f.dot(u), 0.0, epsilon = 1e-6);
        assert_relative_eq!(r.dot(u), 0.0, epsilon = 1e-6);
        assert_relative_eq!(u.length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn degenerate_direction_gives_zero_rays() {
        let camera = Camera {
            direction: Vec3::ZERO,
            ..Camera::default()
        };
        assert_eq!(camera.ray_direction(0.5, 0.5, 1.0), Vec3::ZERO);
    }
}
