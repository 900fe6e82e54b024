//! Keyboard inspectors for the camera, the light, the model and the test
//! objects. One inspector is active at a time; F1 to F4 switch between them.

use std::f32::consts::PI;
use std::fmt;

use facet_engine::camera::Camera;
use facet_engine::input::{InputFrame, InputState, Key};
use facet_engine::light::LightParams;
use facet_engine::objects::ColorMaterial;
use facet_engine::scene::{ModelInspector, NodeRow};
use facet_engine::time::Timeline;

/// Radians per second while an angle key is held.
const TURN_RATE: f32 = 0.5 * PI;
/// Units per second while a move key is held.
const MOVE_RATE: f32 = 8.0;
/// Camera distance change per wheel line.
const ZOOM_PER_LINE: f32 = 1.5;
const LIGHT_LIMIT: f32 = 60.0;
const SPEED_STEP: f32 = 0.25;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Mode {
    Camera,
    Light,
    Model,
    Objects,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Camera => "camera",
            Mode::Light => "light",
            Mode::Model => "model",
            Mode::Objects => "objects",
        };
        f.write_str(name)
    }
}

impl Mode {
    pub fn from_keys(frame: &InputFrame) -> Option<Mode> {
        [
            (Key::F1, Mode::Camera),
            (Key::F2, Mode::Light),
            (Key::F3, Mode::Model),
            (Key::F4, Mode::Objects),
        ]
        .into_iter()
        .find(|(key, _)| frame.pressed(*key))
        .map(|(_, mode)| mode)
    }
}

/// Space pauses, `-` and `=` change the speed factor.
pub fn drive_timeline(timeline: &mut Timeline, frame: &InputFrame) -> bool {
    let mut changed = false;
    if frame.pressed(Key::Space) {
        timeline.toggle_pause();
        changed = true;
    }
    if frame.pressed(Key::Minus) {
        timeline.set_speed(timeline.speed() - SPEED_STEP);
        changed = true;
    }
    if frame.pressed(Key::Equal) {
        timeline.set_speed(timeline.speed() + SPEED_STEP);
        changed = true;
    }
    changed
}

/// A/D orbit, W/S elevate, arrows turn the view, Q/E roll, wheel zooms,
/// R resets.
pub fn drive_camera(camera: &mut Camera, input: &InputState, frame: &InputFrame, dt: f32) {
    if frame.pressed(Key::R) {
        camera.reset();
        return;
    }
    let turn = TURN_RATE * dt;
    camera.set_orbit(
        camera.theta + input.axis(Key::A, Key::D) * turn,
        camera.phi + input.axis(Key::S, Key::W) * turn,
    );
    camera.set_orientation(
        camera.roll + input.axis(Key::Q, Key::E) * turn,
        camera.pitch + input.axis(Key::ArrowDown, Key::ArrowUp) * turn,
        camera.yaw + input.axis(Key::ArrowLeft, Key::ArrowRight) * turn,
    );
    camera.set_distance(camera.r - frame.wheel * ZOOM_PER_LINE);
}

/// Outcome of the light inspector for one frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LightAction {
    None,
    Reset,
}

/// A/D, Q/E and W/S move the light along x, y and z; arrows change the
/// diffuse intensity; R resets.
pub fn drive_light(params: &mut LightParams, input: &InputState, frame: &InputFrame, dt: f32) -> LightAction {
    if frame.pressed(Key::R) {
        return LightAction::Reset;
    }
    let step = MOVE_RATE * dt;
    let delta = [
        input.axis(Key::A, Key::D),
        input.axis(Key::Q, Key::E),
        input.axis(Key::S, Key::W),
    ];
    for (p, d) in params.position.iter_mut().zip(delta) {
        *p = (*p + d * step).clamp(-LIGHT_LIMIT, LIGHT_LIMIT);
    }
    let intensity = params.diffuse_intensity + input.axis(Key::ArrowDown, Key::ArrowUp) * dt;
    params.diffuse_intensity = intensity.clamp(0.01, 2.0);
    LightAction::None
}

/// Tab walks the node tree, Backspace clears the selection; the selected
/// node moves with A/D, Q/E, W/S and turns with the arrows and Z/C.
pub fn drive_model(inspector: &mut ModelInspector, rows: &[NodeRow], input: &InputState, frame: &InputFrame, dt: f32) {
    if frame.pressed(Key::Backspace) {
        inspector.clear_selection();
    }
    if frame.pressed(Key::Tab) && !rows.is_empty() {
        let next = inspector
            .selected()
            .and_then(|id| rows.iter().position(|row| row.id == id))
            .map_or(0, |i| (i + 1) % rows.len());
        inspector.select(rows[next].id);
    }

    let Some(params) = inspector.selected_parameters_mut() else {
        return;
    };
    let step = MOVE_RATE * dt;
    let turn = TURN_RATE * dt;
    params.x += input.axis(Key::A, Key::D) * step;
    params.y += input.axis(Key::Q, Key::E) * step;
    params.z += input.axis(Key::S, Key::W) * step;
    params.yaw += input.axis(Key::ArrowLeft, Key::ArrowRight) * turn;
    params.pitch += input.axis(Key::ArrowDown, Key::ArrowUp) * turn;
    params.roll += input.axis(Key::Z, Key::C) * turn;
    params.clamp();
}

/// Tab selects the next object. On a material the arrows change the
/// specular terms; returns true when the material changed.
pub fn drive_material(material: Option<&mut ColorMaterial>, input: &InputState, dt: f32) -> bool {
    let Some(material) = material else {
        return false;
    };
    let intensity = input.axis(Key::ArrowDown, Key::ArrowUp);
    let power = input.axis(Key::ArrowLeft, Key::ArrowRight);
    if intensity == 0.0 && power == 0.0 {
        return false;
    }
    material.specular_intensity = (material.specular_intensity + intensity * dt).clamp(0.0, 1.0);
    material.specular_power = (material.specular_power + power * 20.0 * dt).clamp(1.0, 150.0);
    true
}

/// Index after `current` when Tab went down, wrapping at `len`.
pub fn cycle_selection(current: usize, len: usize, frame: &InputFrame) -> usize {
    if len == 0 {
        return 0;
    }
    if frame.pressed(Key::Tab) {
        (current + 1) % len
    } else {
        current.min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(keys: &[Key]) -> InputState {
        let mut input = InputState::default();
        input.keys_down.extend(keys.iter().copied());
        input
    }

    fn pressed(keys: &[Key]) -> InputFrame {
        let mut frame = InputFrame::default();
        frame.keys_pressed.extend(keys.iter().copied());
        frame
    }

    fn row(id: usize) -> NodeRow {
        NodeRow {
            id,
            name: format!("node{id}"),
            depth: 0,
            is_leaf: true,
            selected: false,
        }
    }

    #[test]
    fn function_keys_pick_modes() {
        assert_eq!(Mode::from_keys(&pressed(&[Key::F3])), Some(Mode::Model));
        assert_eq!(Mode::from_keys(&pressed(&[Key::A])), None);
    }

    #[test]
    fn camera_orbits_and_zooms() {
        let mut camera = Camera::default();
        let mut frame = InputFrame::default();
        frame.wheel = 2.0;
        drive_camera(&mut camera, &held(&[Key::D]), &frame, 0.5);

        assert!((camera.theta - 0.25 * PI).abs() < 1e-6);
        assert_eq!(camera.r, Camera::DEFAULT_DISTANCE - 3.0);
    }

    #[test]
    fn camera_reset_key() {
        let mut camera = Camera::default();
        camera.set_orbit(1.0, 0.5);
        drive_camera(&mut camera, &held(&[Key::D]), &pressed(&[Key::R]), 0.5);
        assert_eq!(camera, Camera::default());
    }

    #[test]
    fn light_moves_within_limits() {
        let mut params = LightParams::default();
        let action = drive_light(&mut params, &held(&[Key::D, Key::W]), &InputFrame::default(), 100.0);
        assert_eq!(action, LightAction::None);
        assert_eq!(params.position[0], LIGHT_LIMIT);
        assert_eq!(params.position[2], LIGHT_LIMIT);
        assert_eq!(params.position[1], LightParams::default().position[1]);
    }

    #[test]
    fn tab_walks_nodes_in_row_order() {
        let rows = [row(0), row(1), row(2)];
        let mut inspector = ModelInspector::default();
        let tab = pressed(&[Key::Tab]);
        let none = InputState::default();

        drive_model(&mut inspector, &rows, &none, &tab, 0.0);
        assert_eq!(inspector.selected(), Some(0));
        drive_model(&mut inspector, &rows, &none, &tab, 0.0);
        drive_model(&mut inspector, &rows, &none, &tab, 0.0);
        drive_model(&mut inspector, &rows, &none, &tab, 0.0);
        assert_eq!(inspector.selected(), Some(0));
    }

    #[test]
    fn selected_node_moves() {
        let rows = [row(0), row(1)];
        let mut inspector = ModelInspector::default();
        inspector.select(1);
        drive_model(&mut inspector, &rows, &held(&[Key::E]), &InputFrame::default(), 0.25);
        assert_eq!(inspector.parameters(1).unwrap().y, 2.0);
    }

    #[test]
    fn material_changes_only_with_keys() {
        let mut material = ColorMaterial::new([1.0, 0.0, 0.0]);
        assert!(!drive_material(Some(&mut material), &InputState::default(), 0.1));
        assert!(drive_material(Some(&mut material), &held(&[Key::ArrowRight]), 0.1));
        assert_eq!(material.specular_power, 32.0);
        assert!(!drive_material(None, &held(&[Key::ArrowRight]), 0.1));
    }

    #[test]
    fn pause_and_speed_keys() {
        let mut timeline = Timeline::default();
        assert!(drive_timeline(&mut timeline, &pressed(&[Key::Space, Key::Equal])));
        assert!(timeline.is_paused());
        assert_eq!(timeline.speed(), 1.25);
        assert!(!drive_timeline(&mut timeline, &InputFrame::default()));
    }

    #[test]
    fn selection_wraps() {
        assert_eq!(cycle_selection(2, 3, &pressed(&[Key::Tab])), 0);
        assert_eq!(cycle_selection(5, 3, &InputFrame::default()), 2);
        assert_eq!(cycle_selection(0, 0, &pressed(&[Key::Tab])), 0);
    }
}
