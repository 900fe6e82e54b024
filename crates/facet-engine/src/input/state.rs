use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{ButtonState, InputEvent, Key, Modifiers, MouseButton};

/// Current input state for a single window.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies one event and records the resulting transitions in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = m,

            InputEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    // releases are not delivered while unfocused
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved { x, y } => {
                if let Some((px, py)) = self.pointer_pos {
                    frame.pointer_delta.0 += x - px;
                    frame.pointer_delta.1 += y - py;
                }
                self.pointer_pos = Some((x, y));
            }

            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, state, .. } => match state {
                ButtonState::Pressed => {
                    if self.keys_down.insert(key) {
                        frame.keys_pressed.insert(key);
                    }
                }
                ButtonState::Released => {
                    if self.keys_down.remove(&key) {
                        frame.keys_released.insert(key);
                    }
                }
            },

            InputEvent::PointerButton { button, state } => match state {
                ButtonState::Pressed => {
                    if self.buttons_down.insert(button) {
                        frame.buttons_pressed.insert(button);
                    }
                }
                ButtonState::Released => {
                    if self.buttons_down.remove(&button) {
                        frame.buttons_released.insert(button);
                    }
                }
            },

            InputEvent::Wheel { lines } => frame.wheel += lines,
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// -1, 0 or 1 depending on which of the two keys is held.
    pub fn axis(&self, negative: Key, positive: Key) -> f32 {
        let mut value = 0.0;
        if self.key_down(negative) {
            value -= 1.0;
        }
        if self.key_down(positive) {
            value += 1.0;
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: ButtonState) -> InputEvent {
        InputEvent::Key {
            key,
            state,
            repeat: false,
        }
    }

    #[test]
    fn repeat_press_is_not_a_new_transition() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::W, ButtonState::Pressed));
        frame.clear();
        state.apply_event(&mut frame, key(Key::W, ButtonState::Pressed));

        assert!(state.key_down(Key::W));
        assert!(!frame.pressed(Key::W));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::A, ButtonState::Pressed));
        state.apply_event(
            &mut frame,
            InputEvent::PointerButton {
                button: MouseButton::Right,
                state: ButtonState::Pressed,
            },
        );
        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert!(!state.key_down(Key::A));
        assert!(!state.button_down(MouseButton::Right));
    }

    #[test]
    fn pointer_and_wheel_accumulate_per_frame() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, InputEvent::PointerMoved { x: 10.0, y: 10.0 });
        state.apply_event(&mut frame, InputEvent::PointerMoved { x: 15.0, y: 8.0 });
        state.apply_event(&mut frame, InputEvent::PointerMoved { x: 20.0, y: 9.0 });
        state.apply_event(&mut frame, InputEvent::Wheel { lines: 1.0 });
        state.apply_event(&mut frame, InputEvent::Wheel { lines: 0.5 });

        assert_eq!(frame.pointer_delta, (10.0, -1.0));
        assert_eq!(frame.wheel, 1.5);
        frame.clear();
        assert_eq!(frame.wheel, 0.0);
    }

    #[test]
    fn axis_cancels_when_both_held() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::Q, ButtonState::Pressed));
        assert_eq!(state.axis(Key::Q, Key::E), -1.0);
        state.apply_event(&mut frame, key(Key::E, ButtonState::Pressed));
        assert_eq!(state.axis(Key::Q, Key::E), 0.0);
    }
}
