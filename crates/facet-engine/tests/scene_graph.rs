use std::f32::consts::FRAC_PI_2;

use facet_engine::geometry::cube;
use facet_engine::gfx::Graphics;
use facet_engine::scene::{ImportedMesh, ImportedNode, ImportedScene, Model};
use glam::{Mat4, Vec2, Vec3};

fn textured_cube() -> ImportedMesh {
    let mut geometry = cube::make();
    geometry.set_normals_smooth();
    geometry.tex_coords = vec![Vec2::ZERO; geometry.vertex_count()];
    ImportedMesh {
        name: "cube".into(),
        geometry,
        material: None,
    }
}

/// root = translate(0, 0, 5), child = rotateY(90deg), each holding the cube.
fn two_level_scene() -> ImportedScene {
    let child = ImportedNode::new("child", Mat4::from_rotation_y(FRAC_PI_2)).with_meshes(vec![0]);
    let root = ImportedNode::new("root", Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0)))
        .with_meshes(vec![0])
        .with_child(child);
    ImportedScene {
        meshes: vec![textured_cube()],
        materials: Vec::new(),
        root,
    }
}

fn assert_mat_eq(actual: &[f32], expected: Mat4) {
    for (a, e) in actual.iter().zip(expected.to_cols_array()) {
        assert!((a - e).abs() < 1e-5, "{actual:?} != {expected:?}");
    }
}

#[test]
fn meshes_are_drawn_with_accumulated_transforms() {
    let (mut gfx, probe) = Graphics::headless();
    let mut model = Model::new(&mut gfx, &two_level_scene()).unwrap();

    gfx.begin_frame();
    model.draw(&mut gfx).unwrap();

    let draws = probe.draws();
    assert_eq!(draws.len(), 2);
    assert!(draws.iter().all(|d| d.index_count == 36));
    // identity camera: model_view is the world transform
    let root = Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0));
    assert_mat_eq(&draws[0].vertex_floats(0).unwrap()[..16], root);
    assert_mat_eq(&draws[1].vertex_floats(0).unwrap()[..16], root * Mat4::from_rotation_y(FRAC_PI_2));
}

#[test]
fn nodes_are_numbered_in_pre_order() {
    let (mut gfx, _probe) = Graphics::headless();
    let model = Model::new(&mut gfx, &two_level_scene()).unwrap();

    let rows = model.tree_rows();
    let summary: Vec<_> = rows.iter().map(|r| (r.id, r.name.as_str(), r.depth, r.is_leaf)).collect();
    assert_eq!(summary, vec![(0, "root", 0, false), (1, "child", 1, true)]);
}

#[test]
fn inspector_offsets_the_selected_node_and_its_subtree() {
    let (mut gfx, probe) = Graphics::headless();
    let mut model = Model::new(&mut gfx, &two_level_scene()).unwrap();

    model.inspector_mut().select(0);
    model.inspector_mut().selected_parameters_mut().unwrap().y = 2.0;
    gfx.begin_frame();
    model.draw(&mut gfx).unwrap();

    let root = Mat4::from_translation(Vec3::new(0.0, 2.0, 5.0));
    let expected = root * Mat4::from_rotation_y(FRAC_PI_2);
    let draws = probe.draws();
    assert_mat_eq(&draws[0].vertex_floats(0).unwrap()[..16], root);
    assert_mat_eq(&draws[1].vertex_floats(0).unwrap()[..16], expected);

    let world = model.world_transforms();
    assert_eq!(world.len(), 2);
    assert!(world[1].1.abs_diff_eq(expected, 1e-5));
}

#[test]
fn camera_is_applied_before_upload() {
    let (mut gfx, probe) = Graphics::headless();
    let mut model = Model::new(&mut gfx, &two_level_scene()).unwrap();
    let view = Mat4::from_translation(Vec3::new(0.0, 0.0, 10.0));
    gfx.set_camera(view);

    gfx.begin_frame();
    model.draw(&mut gfx).unwrap();

    let world = Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0)) * Mat4::from_rotation_y(FRAC_PI_2);
    assert_mat_eq(&probe.draws()[1].vertex_floats(0).unwrap()[..16], view * world);
}
