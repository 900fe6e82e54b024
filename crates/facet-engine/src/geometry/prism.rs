use std::f32::consts::PI;

use glam::{Mat3, Vec3};

use super::IndexedTriangleList;

/// Most segments whose `2 + 4 * n` vertices still fit `u16` indices.
pub const MAX_DIV: u16 = (u16::MAX - 2) / 4;

/// Unit-radius prism along Z from -1 to 1, with normals filled in.
///
/// Caps get their own rings so they shade flat; the side shares one pair of
/// vertices per segment edge with radial normals, so it shades smooth.
/// `long_div` is clamped to `3..=MAX_DIV`.
pub fn make_tesselated_independent_cap_normals(long_div: u16) -> IndexedTriangleList {
    let long_div = long_div.clamp(3, MAX_DIV);
    let step = 2.0 * PI / long_div as f32;
    let base = Vec3::new(1.0, 0.0, -1.0);
    let offset = Vec3::new(0.0, 0.0, 2.0);
    let rim = |i: u16| Mat3::from_rotation_z(step * i as f32) * base;

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut push = |p: Vec3, n: Vec3| {
        positions.push(p);
        normals.push(n);
    };

    let near_center = 0u16;
    push(Vec3::new(0.0, 0.0, -1.0), -Vec3::Z);
    let far_center = 1u16;
    push(Vec3::new(0.0, 0.0, 1.0), Vec3::Z);

    let near_ring = 2u16;
    for i in 0..long_div {
        push(rim(i), -Vec3::Z);
    }
    let far_ring = near_ring + long_div;
    for i in 0..long_div {
        push(rim(i) + offset, Vec3::Z);
    }

    let side = far_ring + long_div;
    for i in 0..long_div {
        let p = rim(i);
        let n = Vec3::new(p.x, p.y, 0.0).normalize();
        push(p, n);
        push(p + offset, n);
    }

    let mut indices = Vec::with_capacity(long_div as usize * 12);
    for i in 0..long_div {
        let next = (i + 1) % long_div;
        indices.extend_from_slice(&[near_center, near_ring + next, near_ring + i]);
        indices.extend_from_slice(&[far_center, far_ring + i, far_ring + next]);

        let (near_a, far_a) = (side + 2 * i, side + 2 * i + 1);
        let (near_b, far_b) = (side + 2 * next, side + 2 * next + 1);
        indices.extend_from_slice(&[near_a, near_b, far_a, near_b, far_b, far_a]);
    }

    IndexedTriangleList {
        positions,
        normals,
        tex_coords: Vec::new(),
        colors: Vec::new(),
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_scale_with_segments() {
        let prism = make_tesselated_independent_cap_normals(8);
        assert_eq!(prism.vertex_count(), 2 + 8 * 4);
        assert_eq!(prism.triangle_count(), 8 * 4);
        assert_eq!(prism.normals.len(), prism.vertex_count());
    }

    #[test]
    fn segment_count_is_capped_to_indexable_vertices() {
        let prism = make_tesselated_independent_cap_normals(u16::MAX);
        assert_eq!(prism.vertex_count(), 2 + 4 * MAX_DIV as usize);
        assert!(prism.vertex_count() <= u16::MAX as usize + 1);
        assert!(prism.indices.iter().all(|&i| (i as usize) < prism.vertex_count()));
    }

    #[test]
    fn side_normals_are_radial() {
        let prism = make_tesselated_independent_cap_normals(6);
        let side = 2 + 2 * 6;
        for (p, n) in prism.positions[side..].iter().zip(&prism.normals[side..]) {
            assert_eq!(n.z, 0.0);
            assert!(Vec3::new(p.x, p.y, 0.0).normalize().abs_diff_eq(*n, 1e-6));
        }
    }
}
