//! Angle helpers and a small deterministic RNG for spawning scene objects.

use std::f32::consts::PI;

/// Maps `theta` into `[-PI, PI)`.
pub fn wrap_angle(theta: f32) -> f32 {
    let two_pi = 2.0 * PI;
    let wrapped = (theta + PI).rem_euclid(two_pi) - PI;
    // rem_euclid may round up to exactly 2*PI for tiny negative inputs.
    if wrapped >= PI { wrapped - two_pi } else { wrapped }
}

/// Seeded xorshift32 generator. The same seed always yields the same scene.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    /// Seed 0 is mapped to 1; xorshift never leaves the all-zero state.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Float in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Float in `[min, max)`.
    pub fn next_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Integer in `[min, max]`.
    pub fn next_int_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = (max - min) as u64 + 1;
        min + ((self.next_u32() as u64 * span) >> 32) as u32
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Uniform float distribution over `[min, max)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Uniform {
    pub min: f32,
    pub max: f32,
}

impl Uniform {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut SeededRandom) -> f32 {
        rng.next_range(self.min, self.max)
    }
}

/// Uniform integer distribution over `[min, max]`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformInt {
    pub min: u32,
    pub max: u32,
}

impl UniformInt {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut SeededRandom) -> u32 {
        rng.next_int_inclusive(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_angle_stays_in_range() {
        for i in -100..100 {
            let theta = i as f32 * 0.37;
            let w = wrap_angle(theta);
            assert!((-PI..PI).contains(&w), "{theta} -> {w}");
            assert!((theta.sin() - w.sin()).abs() < 1e-4);
            assert!((theta.cos() - w.cos()).abs() < 1e-4);
        }
    }

    #[test]
    fn wrap_angle_keeps_small_angles() {
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-6);
        assert!((wrap_angle(-1.0) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededRandom::new(7);
        let mut b = SeededRandom::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn float_range_is_half_open() {
        let mut rng = SeededRandom::new(42);
        for _ in 0..10_000 {
            let v = rng.next_range(2.0, 3.0);
            assert!((2.0..3.0).contains(&v));
        }
    }

    #[test]
    fn int_range_is_inclusive() {
        let mut rng = SeededRandom::new(42);
        let dist = UniformInt::new(3, 5);
        let mut seen = [false; 3];
        for _ in 0..1000 {
            let v = dist.sample(&mut rng);
            assert!((3..=5).contains(&v));
            seen[(v - 3) as usize] = true;
        }
        assert_eq!(seen, [true; 3]);
    }
}
