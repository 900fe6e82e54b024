use std::f32::consts::PI;

use glam::{EulerRot, Mat4};

use crate::math::{wrap_angle, SeededRandom, Uniform};

/// Distributions a [`Motion`] is drawn from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MotionRanges {
    /// Initial orbit angles.
    pub angle: Uniform,
    /// Spin rates about the object's own center, radians per second.
    pub spin: Uniform,
    /// Orbit rates about the world origin, radians per second.
    pub orbit: Uniform,
    /// Orbit radius.
    pub radius: Uniform,
}

impl Default for MotionRanges {
    fn default() -> Self {
        Self {
            angle: Uniform::new(0.0, 2.0 * PI),
            spin: Uniform::new(0.0, 0.5 * PI),
            orbit: Uniform::new(0.0, 0.08 * PI),
            radius: Uniform::new(6.0, 20.0),
        }
    }
}

/// Orbit and spin state of a procedural test object.
///
/// The object spins by `(roll, pitch, yaw)` about its own center, sits at
/// distance `r` from the origin, and orbits by `(theta, phi, chi)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Motion {
    pub r: f32,
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub theta: f32,
    pub phi: f32,
    pub chi: f32,
    pub droll: f32,
    pub dpitch: f32,
    pub dyaw: f32,
    pub dtheta: f32,
    pub dphi: f32,
    pub dchi: f32,
}

impl Motion {
    pub fn random(rng: &mut SeededRandom, ranges: &MotionRanges) -> Self {
        let r = ranges.radius.sample(rng);
        let droll = ranges.spin.sample(rng);
        let dpitch = ranges.spin.sample(rng);
        let dyaw = ranges.spin.sample(rng);
        let dphi = ranges.orbit.sample(rng);
        let dtheta = ranges.orbit.sample(rng);
        let dchi = ranges.orbit.sample(rng);
        let chi = ranges.angle.sample(rng);
        let theta = ranges.angle.sample(rng);
        let phi = ranges.angle.sample(rng);
        Self {
            r,
            roll: 0.0,
            pitch: 0.0,
            yaw: 0.0,
            theta,
            phi,
            chi,
            droll,
            dpitch,
            dyaw,
            dtheta,
            dphi,
            dchi,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.roll = wrap_angle(self.roll + self.droll * dt);
        self.pitch = wrap_angle(self.pitch + self.dpitch * dt);
        self.yaw = wrap_angle(self.yaw + self.dyaw * dt);
        self.theta = wrap_angle(self.theta + self.dtheta * dt);
        self.phi = wrap_angle(self.phi + self.dphi * dt);
        self.chi = wrap_angle(self.chi + self.dchi * dt);
    }

    /// Spin, then move out by `r`, then orbit.
    pub fn transform(&self) -> Mat4 {
        let spin = Mat4::from_euler(EulerRot::YXZ, self.yaw, self.pitch, self.roll);
        let orbit = Mat4::from_euler(EulerRot::YXZ, self.phi, self.theta, self.chi);
        orbit * Mat4::from_translation(glam::Vec3::new(self.r, 0.0, 0.0)) * spin
    }
}
