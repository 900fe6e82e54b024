use glam::{Vec2, Vec3};

use super::IndexedTriangleList;

const SIDE: f32 = 0.5;

/// Unit cube with the eight corners shared between faces.
pub fn make() -> IndexedTriangleList {
    let s = SIDE;
    let positions = vec![
        Vec3::new(-s, -s, -s),
        Vec3::new(s, -s, -s),
        Vec3::new(-s, s, -s),
        Vec3::new(s, s, -s),
        Vec3::new(-s, -s, s),
        Vec3::new(s, -s, s),
        Vec3::new(-s, s, s),
        Vec3::new(s, s, s),
    ];
    let indices = vec![
        0, 2, 1, 2, 3, 1, //
        1, 3, 5, 3, 7, 5, //
        2, 6, 3, 3, 6, 7, //
        4, 5, 7, 4, 7, 6, //
        0, 4, 2, 2, 4, 6, //
        0, 1, 4, 1, 5, 4,
    ];
    IndexedTriangleList::new(positions, indices)
}

/// Unit cube with four vertices per face, so each face can carry its own
/// normal and texture coordinates.
pub fn make_independent() -> IndexedTriangleList {
    let s = SIDE;
    let positions = vec![
        // near
        Vec3::new(-s, -s, -s),
        Vec3::new(s, -s, -s),
        Vec3::new(-s, s, -s),
        Vec3::new(s, s, -s),
        // far
        Vec3::new(-s, -s, s),
        Vec3::new(s, -s, s),
        Vec3::new(-s, s, s),
        Vec3::new(s, s, s),
        // left
        Vec3::new(-s, -s, -s),
        Vec3::new(-s, s, -s),
        Vec3::new(-s, -s, s),
        Vec3::new(-s, s, s),
        // right
        Vec3::new(s, -s, -s),
        Vec3::new(s, s, -s),
        Vec3::new(s, -s, s),
        Vec3::new(s, s, s),
        // bottom
        Vec3::new(-s, -s, -s),
        Vec3::new(s, -s, -s),
        Vec3::new(-s, -s, s),
        Vec3::new(s, -s, s),
        // top
        Vec3::new(-s, s, -s),
        Vec3::new(s, s, -s),
        Vec3::new(-s, s, s),
        Vec3::new(s, s, s),
    ];
    let indices = vec![
        0, 2, 1, 2, 3, 1, //
        4, 5, 7, 4, 7, 6, //
        8, 10, 9, 10, 11, 9, //
        12, 13, 15, 12, 15, 14, //
        16, 17, 18, 18, 17, 19, //
        20, 23, 21, 20, 22, 23,
    ];
    IndexedTriangleList::new(positions, indices)
}

/// [`make_independent`] with the full texture mapped onto every face.
pub fn make_independent_textured() -> IndexedTriangleList {
    let mut cube = make_independent();
    let face = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 1.0),
    ];
    cube.tex_coords = face.iter().copied().cycle().take(cube.positions.len()).collect();
    cube
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_cube_has_eight_corners() {
        let cube = make();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.indices.len(), 36);
    }

    #[test]
    fn independent_faces_get_axis_normals() {
        let mut cube = make_independent();
        cube.set_normals_independent_flat();
        assert_eq!(cube.vertex_count(), 24);
        for n in &cube.normals {
            assert!((n.length() - 1.0).abs() < 1e-6);
            let axes = [n.x, n.y, n.z].iter().filter(|c| c.abs() > 0.5).count();
            assert_eq!(axes, 1);
        }
    }

    #[test]
    fn textured_cube_has_one_uv_per_vertex() {
        let cube = make_independent_textured();
        assert_eq!(cube.tex_coords.len(), cube.positions.len());
        assert_eq!(cube.tex_coords[7], Vec2::new(1.0, 1.0));
    }
}
