/// Scales real frame time for animation.
///
/// A paused timeline yields zero; otherwise real time times the speed factor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Timeline {
    speed: f32,
    paused: bool,
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            speed: 1.0,
            paused: false,
        }
    }
}

impl Timeline {
    pub const MAX_SPEED: f32 = 6.0;

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Sets the speed factor, clamped to `[0, MAX_SPEED]`.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.clamp(0.0, Self::MAX_SPEED);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Animation time for a frame that took `dt` real seconds.
    pub fn advance(&self, dt: f32) -> f32 {
        if self.paused {
            0.0
        } else {
            dt * self.speed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_scales_and_pause_stops() {
        let mut timeline = Timeline::default();
        timeline.set_speed(2.5);
        assert_eq!(timeline.advance(0.1), 0.25);

        timeline.toggle_pause();
        assert_eq!(timeline.advance(0.1), 0.0);
        timeline.toggle_pause();
        assert!(!timeline.is_paused());
    }

    #[test]
    fn speed_is_clamped() {
        let mut timeline = Timeline::default();
        timeline.set_speed(-1.0);
        assert_eq!(timeline.speed(), 0.0);
        timeline.set_speed(100.0);
        assert_eq!(timeline.speed(), Timeline::MAX_SPEED);
    }
}
