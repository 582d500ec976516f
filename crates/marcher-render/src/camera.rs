//! Orbit camera that feeds the per-frame camera state

use glam::{Mat4, Vec3};
use marcher_scene::CameraState;

/// A simple orbital camera that orbits around a target point
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,
    /// Point the camera is looking at
    pub target: Vec3,
    /// Up vector (usually Y-up)
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.5, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_degrees: 60.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Camera {
    /// Create a camera looking at a target from a position
    pub fn look_at(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            ..Default::default()
        }
    }

    /// Get the view matrix (world to camera transform)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get distance from camera to target
    pub fn distance(&self) -> f32 {
        (self.position - self.target).length()
    }

    /// Orbit around the target point
    ///
    /// - `delta_x`: Horizontal rotation in radians (positive = rotate right)
    /// - `delta_y`: Vertical rotation in radians (positive = rotate up)
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        let radius = self.distance();

        // Get spherical coordinates
        let offset = self.position - self.target;
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-0.999, 0.999).acos();

        theta -= delta_x;
        phi = (phi - delta_y).clamp(0.01, std::f32::consts::PI - 0.01);

        // Convert back to cartesian
        self.position = self.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
    }

    /// Camera parameters for one frame
    pub fn state(&self) -> CameraState {
        CameraState::from_view(self.view_matrix(), self.fov_degrees, self.aspect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_orbit() {
        let mut camera = Camera::default();
        let initial_distance = camera.distance();

        camera.orbit(0.1, 0.0);

        // Distance should remain the same
        assert!((camera.distance() - initial_distance).abs() < 0.001);
    }

    #[test]
    fn test_state_forward_points_at_target() {
        let camera = Camera::look_at(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO);
        let state = camera.state();

        // Camera space looks down -Z
        let forward = state.camera_to_world.transform_vector3(Vec3::NEG_Z);
        assert_relative_eq!(forward.z, -1.0, epsilon = 1e-5);
        assert_relative_eq!(state.position.z, 4.0, epsilon = 1e-5);
        assert_eq!(state.fov_degrees, camera.fov_degrees);
    }
}
