/// Keys the studio binds. Everything else arrives as `Unknown` carrying the
/// platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[rustfmt::skip]
pub enum Key {
    Escape, Tab, Backspace, Space,
    ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Minus, Equal,
    F1, F2, F3, F4,
    Unknown(u32),
}

/// Press state shared by keys and mouse buttons.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Held modifier keys, tracked separately from `Key` presses.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

/// Window input translated out of winit types.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),
    Key {
        key: Key,
        state: ButtonState,
        repeat: bool,
    },
    /// Logical pixels.
    PointerMoved { x: f32, y: f32 },
    PointerButton {
        button: MouseButton,
        state: ButtonState,
    },
    /// Lines; positive scrolls away from the user.
    Wheel { lines: f32 },
    PointerLeft,
    Focused(bool),
}
