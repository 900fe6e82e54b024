use std::time::{Duration, Instant};

/// Timing of one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous frame, clamped to the clock's range.
    pub dt: f32,
    /// Seconds since the clock started.
    pub elapsed: f32,
    pub frame: u64,
}

/// Wall clock ticked once per presented frame.
///
/// A frame that took longer than `max_step` reports `max_step`, so objects do
/// not jump after the window was dragged or the process was paused.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame: u64,
    min_step: Duration,
    max_step: Duration,
}

impl FrameClock {
    pub const DEFAULT_MAX_STEP: Duration = Duration::from_millis(250);

    pub fn new() -> Self {
        Self::with_steps(Duration::ZERO, Self::DEFAULT_MAX_STEP)
    }

    pub fn with_steps(min_step: Duration, max_step: Duration) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame: 0,
            min_step: min_step.min(max_step),
            max_step,
        }
    }

    /// Starts the next delta from now, e.g. after a resume.
    pub fn restart_step(&mut self) {
        self.last = Instant::now();
    }

    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let step = now
            .saturating_duration_since(self.last)
            .clamp(self.min_step, self.max_step);
        self.last = now;

        let time = FrameTime {
            dt: step.as_secs_f32(),
            elapsed: now.duration_since(self.start).as_secs_f32(),
            frame: self.frame,
        };
        self.frame += 1;
        time
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_stay_in_range_and_frames_count_up() {
        let mut clock = FrameClock::with_steps(Duration::from_millis(5), Duration::from_millis(10));
        let first = clock.tick();
        std::thread::sleep(Duration::from_millis(20));
        let second = clock.tick();

        assert_eq!((first.frame, second.frame), (0, 1));
        assert!(first.dt >= 0.005 - 1e-6);
        assert!((second.dt - 0.010).abs() < 1e-6);
        assert!(second.elapsed >= first.elapsed);
    }
}
