//! Frame timing.
//!
//! - one [`FrameClock`] per window, ticked once per frame for real time
//! - a [`Timeline`] scaling that time for animation (speed factor and pause)

mod frame_clock;
mod timeline;

pub use frame_clock::{FrameClock, FrameTime};
pub use timeline::Timeline;
