use std::collections::HashMap;
use std::f32::consts::PI;

use glam::{EulerRot, Mat4, Vec3};

/// Editable orientation and offset of one node.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct TransformParameters {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl TransformParameters {
    pub const POSITION_LIMIT: f32 = 20.0;

    /// Rotation first, then translation.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(self.x, self.y, self.z))
            * Mat4::from_euler(EulerRot::YXZ, self.yaw, self.pitch, self.roll)
    }

    /// Keeps angles in `[-PI, PI]` and offsets within the position limit.
    pub fn clamp(&mut self) {
        for angle in [&mut self.roll, &mut self.pitch, &mut self.yaw] {
            *angle = angle.clamp(-PI, PI);
        }
        let limit = Self::POSITION_LIMIT;
        for offset in [&mut self.x, &mut self.y, &mut self.z] {
            *offset = offset.clamp(-limit, limit);
        }
    }
}

/// Node selection plus one parameter set per node that was ever selected.
#[derive(Debug, Default)]
pub struct ModelInspector {
    selected: Option<usize>,
    transforms: HashMap<usize, TransformParameters>,
}

impl ModelInspector {
    pub fn select(&mut self, node_id: usize) {
        self.selected = Some(node_id);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn parameters(&self, node_id: usize) -> Option<&TransformParameters> {
        self.transforms.get(&node_id)
    }

    /// Parameters of the selected node, created on first access.
    pub fn selected_parameters_mut(&mut self) -> Option<&mut TransformParameters> {
        let id = self.selected?;
        Some(self.transforms.entry(id).or_default())
    }

    /// Applied transform for the selected node.
    pub fn applied(&self) -> Option<(usize, Mat4)> {
        let id = self.selected?;
        let params = self.transforms.get(&id).copied().unwrap_or_default();
        Some((id, params.matrix()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_are_kept_per_node() {
        let mut inspector = ModelInspector::default();
        inspector.select(2);
        inspector.selected_parameters_mut().unwrap().x = 3.0;
        inspector.select(5);
        inspector.selected_parameters_mut().unwrap().x = -1.0;
        inspector.select(2);

        assert_eq!(inspector.parameters(2).unwrap().x, 3.0);
        assert_eq!(inspector.parameters(5).unwrap().x, -1.0);
        let (id, m) = inspector.applied().unwrap();
        assert_eq!(id, 2);
        assert_eq!(m.transform_point3(Vec3::ZERO), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn nothing_applied_without_selection() {
        let mut inspector = ModelInspector::default();
        assert!(inspector.applied().is_none());
        assert!(inspector.selected_parameters_mut().is_none());
    }

    #[test]
    fn clamp_limits_offsets_and_angles() {
        let mut params = TransformParameters {
            yaw: 7.0,
            z: -40.0,
            ..Default::default()
        };
        params.clamp();
        assert_eq!(params.yaw, PI);
        assert_eq!(params.z, -20.0);
    }
}
