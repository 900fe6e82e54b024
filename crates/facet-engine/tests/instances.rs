use facet_engine::bind::gpu_layout;
use facet_engine::drawable::Drawable;
use facet_engine::gfx::Graphics;
use facet_engine::math::{SeededRandom, Uniform};
use facet_engine::objects::{Cuboid, MotionRanges, SolidSphere};
use glam::{Mat4, Vec3};

#[test]
fn randomized_instances_move_independently_and_share_geometry() {
    let (mut gfx, probe) = Graphics::headless();
    let mut rng = SeededRandom::new(77);
    let ranges = MotionRanges::default();
    let mut boxes: Vec<Cuboid> = (0..50)
        .map(|_| Cuboid::new(&mut gfx, &mut rng, &ranges, Uniform::new(0.4, 3.0), Vec3::ONE).unwrap())
        .collect();

    for _ in 0..10 {
        gfx.begin_frame();
        for b in &mut boxes {
            b.update(1.0 / 60.0);
            b.draw(&mut gfx).unwrap();
        }
        gfx.end_frame().unwrap();
    }

    let transforms: Vec<Mat4> = boxes.iter().map(|b| b.transform()).collect();
    for i in 0..transforms.len() {
        for j in i + 1..transforms.len() {
            assert_ne!(transforms[i], transforms[j], "instances {i} and {j} coincide");
        }
    }
    let counts: Vec<u32> = boxes.iter().filter_map(|b| b.base().index_count()).collect();
    assert_eq!(counts.len(), 50);
    assert!(counts.iter().all(|&c| c == counts[0]));
    assert_eq!(probe.draw_count(), 500);
}

#[test]
fn matrices_are_uploaded_column_major() {
    let (mut gfx, probe) = Graphics::headless();
    gfx.set_projection(Mat4::IDENTITY);
    let mut sphere = SolidSphere::new(&mut gfx, 1.0).unwrap();
    sphere.set_position(Vec3::new(1.0, 2.0, 3.0));

    gfx.begin_frame();
    sphere.draw(&mut gfx).unwrap();

    let floats = probe.draws()[0].vertex_floats(0).unwrap();
    // translation occupies the fourth column
    assert_eq!(&floats[12..15], &[1.0, 2.0, 3.0]);
    assert_eq!(floats[15], 1.0);
    let mvp: Vec<f32> = gpu_layout(sphere.transform()).concat();
    assert_eq!(&floats[16..32], mvp.as_slice());
}
