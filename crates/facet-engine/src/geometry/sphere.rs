use std::f32::consts::PI;

use glam::{Mat3, Vec3};

use super::IndexedTriangleList;

pub const DEFAULT_LAT_DIV: u16 = 12;
pub const DEFAULT_LONG_DIV: u16 = 24;

/// Unit sphere around the Z axis, split into latitude rings and longitude
/// segments. Both poles are single vertices joined to their ring by a fan.
pub fn make_tesselated(lat_div: u16, long_div: u16) -> IndexedTriangleList {
    let lat_div = lat_div.max(3);
    let long_div = long_div.max(3);

    let base = Vec3::Z;
    let lat_step = PI / lat_div as f32;
    let long_step = 2.0 * PI / long_div as f32;

    let mut positions = Vec::with_capacity((lat_div as usize - 1) * long_div as usize + 2);
    for lat in 1..lat_div {
        let ring = Mat3::from_rotation_x(lat_step * lat as f32) * base;
        for long in 0..long_div {
            positions.push(Mat3::from_rotation_z(long_step * long as f32) * ring);
        }
    }

    let north = positions.len() as u16;
    positions.push(base);
    let south = positions.len() as u16;
    positions.push(-base);

    let idx = |lat: u16, long: u16| lat * long_div + long % long_div;
    let last_ring = lat_div - 2;

    let mut indices = Vec::new();
    for lat in 0..last_ring {
        for long in 0..long_div {
            indices.extend_from_slice(&[
                idx(lat, long),
                idx(lat + 1, long),
                idx(lat, long + 1),
                idx(lat, long + 1),
                idx(lat + 1, long),
                idx(lat + 1, long + 1),
            ]);
        }
    }
    for long in 0..long_div {
        indices.extend_from_slice(&[north, idx(0, long), idx(0, long + 1)]);
        indices.extend_from_slice(&[idx(last_ring, long + 1), idx(last_ring, long), south]);
    }

    IndexedTriangleList::new(positions, indices)
}

pub fn make() -> IndexedTriangleList {
    make_tesselated(DEFAULT_LAT_DIV, DEFAULT_LONG_DIV)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sphere_counts() {
        let sphere = make();
        assert_eq!(sphere.vertex_count(), 11 * 24 + 2);
        assert_eq!(sphere.indices.len(), 10 * 24 * 6 + 2 * 24 * 3);
        assert!(sphere.indices.iter().all(|&i| (i as usize) < sphere.vertex_count()));
    }

    #[test]
    fn vertices_lie_on_unit_sphere() {
        let sphere = make_tesselated(6, 8);
        for p in &sphere.positions {
            assert!((p.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn poles_are_opposite() {
        let sphere = make_tesselated(4, 4);
        let n = sphere.vertex_count();
        assert_eq!(sphere.positions[n - 2], Vec3::Z);
        assert_eq!(sphere.positions[n - 1], -Vec3::Z);
    }
}
