use std::f32::consts::PI;

use glam::{EulerRot, Mat3, Mat4, Vec3};

/// Orbit camera looking at the world origin.
///
/// `r`, `theta` and `phi` place the eye on a sphere around the origin;
/// `roll`, `pitch` and `yaw` then rotate the view in place.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub r: f32,
    pub theta: f32,
    pub phi: f32,
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            r: Self::DEFAULT_DISTANCE,
            theta: 0.0,
            phi: 0.0,
            roll: 0.0,
            pitch: 0.0,
            yaw: 0.0,
        }
    }
}

impl Camera {
    pub const DEFAULT_DISTANCE: f32 = 20.0;
    pub const MIN_DISTANCE: f32 = 1.0;
    pub const MAX_DISTANCE: f32 = 80.0;
    /// Elevation stays short of the poles so the up vector stays valid.
    pub const MAX_ELEVATION: f32 = 89.0 * PI / 180.0;

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Eye position in world space.
    pub fn position(&self) -> Vec3 {
        Mat3::from_euler(EulerRot::YXZ, -self.theta, self.phi, 0.0) * Vec3::new(0.0, 0.0, -self.r)
    }

    /// World-to-view matrix (left-handed).
    pub fn matrix(&self) -> Mat4 {
        let look = Mat4::look_at_lh(self.position(), Vec3::ZERO, Vec3::Y);
        Mat4::from_euler(EulerRot::YXZ, -self.yaw, self.pitch, self.roll) * look
    }

    pub fn set_distance(&mut self, r: f32) {
        self.r = r.clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }

    pub fn set_orbit(&mut self, theta: f32, phi: f32) {
        self.theta = theta.clamp(-PI, PI);
        self.phi = phi.clamp(-Self::MAX_ELEVATION, Self::MAX_ELEVATION);
    }

    pub fn set_orientation(&mut self, roll: f32, pitch: f32, yaw: f32) {
        self.roll = roll.clamp(-PI, PI);
        self.pitch = pitch.clamp(-PI, PI);
        self.yaw = yaw.clamp(-PI, PI);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn default_eye_sits_behind_the_origin() {
        let camera = Camera::default();
        assert!(close(camera.position(), Vec3::new(0.0, 0.0, -20.0)));
        // the origin lies straight ahead, 20 units down +Z in view space
        let origin = camera.matrix().transform_point3(Vec3::ZERO);
        assert!(close(origin, Vec3::new(0.0, 0.0, 20.0)));
    }

    #[test]
    fn orbit_keeps_distance_and_target() {
        let mut camera = Camera::default();
        camera.set_orbit(0.7, -0.4);
        assert!((camera.position().length() - 20.0).abs() < 1e-4);
        let origin = camera.matrix().transform_point3(Vec3::ZERO);
        assert!(close(origin, Vec3::new(0.0, 0.0, 20.0)));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut camera = Camera::default();
        camera.set_distance(300.0);
        camera.set_orientation(0.1, 0.2, 0.3);
        assert_eq!(camera.r, Camera::MAX_DISTANCE);
        camera.reset();
        assert_eq!(camera, Camera::default());
    }
}
