//! Camera and light state read once per frame

use glam::{Mat4, Vec3};

/// The camera parameters a frame needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Camera position in world space
    pub position: Vec3,
    /// Camera-to-world transform (inverse view matrix)
    pub camera_to_world: Mat4,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
}

impl CameraState {
    /// Build from a world-to-camera view matrix
    pub fn from_view(view: Mat4, fov_degrees: f32, aspect: f32) -> Self {
        let camera_to_world = view.inverse();
        Self {
            position: camera_to_world.w_axis.truncate(),
            camera_to_world,
            fov_degrees,
            aspect,
        }
    }

    /// Whether these parameters cannot produce a valid frustum
    ///
    /// Degenerate cameras are not clamped; the renderer skips raymarching
    /// for that frame instead.
    pub fn is_degenerate(&self) -> bool {
        !self.fov_degrees.is_finite()
            || self.fov_degrees <= 0.0
            || self.fov_degrees >= 180.0
            || !self.aspect.is_finite()
            || self.aspect <= 0.0
            || !self.position.is_finite()
            || !self.camera_to_world.is_finite()
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::from_view(
            Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y),
            60.0,
            16.0 / 9.0,
        )
    }
}

/// A directional light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels (will be normalized)
    pub direction: Vec3,
}

impl DirectionalLight {
    pub fn new(direction: Vec3) -> Self {
        Self { direction }
    }

    /// Normalized direction, or `None` for a zero or non-finite vector
    pub fn normalized_direction(&self) -> Option<Vec3> {
        self.direction.try_normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_view_recovers_position() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        let state = CameraState::from_view(Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y), 60.0, 1.5);

        assert_relative_eq!(state.position.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(state.position.y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(state.position.z, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_degenerate_cameras() {
        let good = CameraState::default();
        assert!(!good.is_degenerate());

        assert!(CameraState { aspect: 0.0, ..good }.is_degenerate());
        assert!(CameraState { aspect: -1.0, ..good }.is_degenerate());
        assert!(CameraState { fov_degrees: 0.0, ..good }.is_degenerate());
        assert!(CameraState { fov_degrees: 180.0, ..good }.is_degenerate());
        assert!(CameraState { fov_degrees: f32::NAN, ..good }.is_degenerate());
    }

    #[test]
    fn test_zero_light_has_no_direction() {
        assert!(DirectionalLight::new(Vec3::ZERO).normalized_direction().is_none());
        assert_eq!(
            DirectionalLight::new(Vec3::new(0.0, -3.0, 0.0)).normalized_direction(),
            Some(Vec3::NEG_Y)
        );
    }
}
