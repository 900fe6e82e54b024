use std::f32::consts::PI;

use glam::{Mat3, Vec3};

use super::IndexedTriangleList;

/// Most segments whose `6 * n` vertices still fit `u16` indices.
pub const MAX_DIV: u16 = u16::MAX / 6;

/// Cone with its tip at +Z and a unit-radius base at z = -1.
///
/// Every triangle has its own three vertices. The side faces come first and
/// each starts with the tip, so vertex `3 * i` is the tip of side `i`.
/// `long_div` is clamped to `3..=MAX_DIV`.
pub fn make_tesselated_independent_faces(long_div: u16) -> IndexedTriangleList {
    let long_div = long_div.clamp(3, MAX_DIV);
    let step = 2.0 * PI / long_div as f32;
    let base = Vec3::new(1.0, 0.0, -1.0);
    let rim = |i: u16| Mat3::from_rotation_z(step * (i % long_div) as f32) * base;

    let mut positions = Vec::with_capacity(long_div as usize * 6);
    for i in 0..long_div {
        positions.extend_from_slice(&[Vec3::Z, rim(i), rim(i + 1)]);
    }
    let center = Vec3::new(0.0, 0.0, -1.0);
    for i in 0..long_div {
        positions.extend_from_slice(&[center, rim(i + 1), rim(i)]);
    }

    let indices = (0..positions.len() as u16).collect();
    IndexedTriangleList::new(positions, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_faces_start_at_the_tip() {
        let cone = make_tesselated_independent_faces(4);
        assert_eq!(cone.vertex_count(), 24);
        for i in 0..4 {
            assert_eq!(cone.positions[i * 3], Vec3::Z);
        }
    }

    #[test]
    fn segment_count_is_capped_to_indexable_vertices() {
        let cone = make_tesselated_independent_faces(u16::MAX);
        assert_eq!(cone.vertex_count(), 6 * MAX_DIV as usize);
        assert_eq!(cone.indices.len(), cone.vertex_count());
        assert_eq!(cone.indices.last().copied(), Some((cone.vertex_count() - 1) as u16));
    }

    #[test]
    fn base_faces_point_down() {
        let mut cone = make_tesselated_independent_faces(5);
        cone.set_normals_independent_flat();
        let base_normals = &cone.normals[15..];
        assert!(base_normals.iter().all(|n| (n.z + 1.0).abs() < 1e-5));
    }
}
