use std::collections::HashSet;

use super::types::{Key, MouseButton};

/// Transitions recorded during one frame.
///
/// [`InputState`](super::InputState) holds what is down right now; this holds
/// what changed since the last frame and is cleared by the runtime after
/// every frame callback.
#[derive(Debug, Default)]
pub struct InputFrame {
    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,
    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,

    /// Accumulated wheel motion, in lines.
    pub wheel: f32,

    /// Accumulated pointer motion, in logical pixels.
    pub pointer_delta: (f32, f32),
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.wheel = 0.0;
        self.pointer_delta = (0.0, 0.0);
    }

    /// True if `key` went down this frame.
    pub fn pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }
}
