use std::rc::Rc;

use facet_engine::bind::{
    ConstantBuffer, DrawContext, ElementType, IndexBuffer, InputLayout, PixelShader,
    PrimitiveTopology, VertexBuffer, VertexLayout, VertexShader,
};
use facet_engine::drawable::{Drawable, DrawableBase, DrawableKind};
use facet_engine::error::{BindError, Error};
use facet_engine::geometry::cube;
use facet_engine::gfx::{Graphics, ResourceKind, Topology};
use facet_engine::math::{SeededRandom, Uniform};
use facet_engine::objects::{Cuboid, MotionRanges};
use glam::{Mat4, Vec3};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Tint {
    rgba: [f32; 4],
}

/// Minimal complete pipeline around a unit cube, all per instance.
fn plain_cube(gfx: &mut Graphics, kind: DrawableKind) -> DrawableBase {
    let layout = VertexLayout::new().append(ElementType::Position3D);
    let model = cube::make();
    let mut base = DrawableBase::new(gfx, kind);

    let vs = VertexShader::new(gfx, "solid_vs").unwrap();
    let input_layout = InputLayout::new(gfx, &layout, &vs).unwrap();
    base.add_bind(Rc::new(VertexBuffer::from_data(gfx, &model.vertex_data(&layout).unwrap()).unwrap()))
        .unwrap();
    base.add_index_buffer(IndexBuffer::new(gfx, &model.indices).unwrap()).unwrap();
    base.add_bind(Rc::new(vs)).unwrap();
    base.add_bind(Rc::new(PixelShader::new(gfx, "solid_ps").unwrap())).unwrap();
    base.add_bind(Rc::new(input_layout)).unwrap();
    base.add_bind(Rc::new(PrimitiveTopology::new(Topology::TriangleList))).unwrap();
    base
}

fn cuboids(gfx: &mut Graphics, count: usize, seed: u32) -> Vec<Cuboid> {
    let mut rng = SeededRandom::new(seed);
    let ranges = MotionRanges::default();
    (0..count)
        .map(|_| Cuboid::new(gfx, &mut rng, &ranges, Uniform::new(0.4, 3.0), Vec3::ONE).unwrap())
        .collect()
}

#[test]
fn static_resources_are_created_once_per_kind() {
    let (mut gfx, probe) = Graphics::headless();
    let boxes = cuboids(&mut gfx, 5, 1);

    assert_eq!(probe.created(ResourceKind::VertexBuffer), 1);
    assert_eq!(probe.created(ResourceKind::IndexBuffer), 1);
    assert_eq!(probe.created(ResourceKind::VertexShader), 1);
    assert_eq!(probe.created(ResourceKind::PixelShader), 1);
    assert_eq!(probe.created(ResourceKind::InputLayout), 1);
    // transform + material per instance
    assert_eq!(probe.created(ResourceKind::ConstantBuffer), 2 * boxes.len());
    assert!(gfx.statics().is_initialized(DrawableKind::Cuboid));
    assert!(!gfx.statics().is_initialized(DrawableKind::Cylinder));
}

#[test]
fn second_index_buffer_is_rejected() {
    let (mut gfx, _probe) = Graphics::headless();
    let mut base = plain_cube(&mut gfx, DrawableKind::Custom("double-index"));
    let extra = IndexBuffer::new(&mut gfx, &[0, 1, 2]).unwrap();

    assert_eq!(base.add_index_buffer(extra), Err(BindError::DuplicateIndexBuffer));
    assert_eq!(base.index_count(), Some(36));
}

#[test]
fn index_buffer_through_add_bind_is_rejected() {
    let (mut gfx, _probe) = Graphics::headless();
    let mut base = DrawableBase::new(&mut gfx, DrawableKind::Custom("sneaky"));
    let ib = IndexBuffer::new(&mut gfx, &[0, 1, 2]).unwrap();

    assert_eq!(base.add_bind(Rc::new(ib)), Err(BindError::IndexBufferViaAddBind));
}

#[test]
fn each_draw_issues_one_call_with_the_resolved_count() {
    let (mut gfx, probe) = Graphics::headless();
    let boxes = cuboids(&mut gfx, 2, 2);

    for frame in 1..=3 {
        gfx.begin_frame();
        boxes[1].draw(&mut gfx).unwrap();
        gfx.end_frame().unwrap();
        assert_eq!(probe.draw_count(), frame);
    }
    assert!(probe.draws().iter().all(|d| d.index_count == 36));
    assert_eq!(probe.frames_presented(), 3);
}

#[test]
fn constant_buffer_keeps_only_the_last_write() {
    let (mut gfx, probe) = Graphics::headless();
    let mut base = plain_cube(&mut gfx, DrawableKind::Custom("tinted"));
    let tint = Rc::new(ConstantBuffer::pixel(&mut gfx, 0, &Tint { rgba: [0.0; 4] }).unwrap());
    base.add_bind(tint.clone()).unwrap();

    tint.update(&mut gfx, &Tint { rgba: [1.0, 0.0, 0.0, 1.0] });
    tint.update(&mut gfx, &Tint { rgba: [0.0, 1.0, 0.0, 1.0] });
    gfx.begin_frame();
    base.draw(&mut gfx, &DrawContext::new(Mat4::IDENTITY)).unwrap();

    assert_eq!(probe.draws()[0].pixel_floats(0).unwrap(), vec![0.0, 1.0, 0.0, 1.0]);
}

#[test]
fn drawable_without_bindables_fails_to_draw() {
    let (mut gfx, probe) = Graphics::headless();
    let kind = DrawableKind::Custom("empty");
    let base = DrawableBase::new(&mut gfx, kind);

    gfx.begin_frame();
    let err = base.draw(&mut gfx, &DrawContext::new(Mat4::IDENTITY)).unwrap_err();
    assert!(matches!(err, Error::Bind(BindError::MissingIndexBuffer(k)) if k == kind));
    assert_eq!(probe.draw_count(), 0);
}

#[test]
fn static_list_has_a_single_owner() {
    let (mut gfx, _probe) = Graphics::headless();
    let kind = DrawableKind::Custom("shared");
    let mut first = DrawableBase::new(&mut gfx, kind);
    let mut second = DrawableBase::new(&mut gfx, kind);

    first
        .add_static_bind(Rc::new(PrimitiveTopology::new(Topology::TriangleList)))
        .unwrap();
    let err = second
        .add_static_bind(Rc::new(PrimitiveTopology::new(Topology::LineList)))
        .unwrap_err();
    assert_eq!(err, BindError::StaticAlreadyInitialized(kind));
    assert_eq!(gfx.statics().bind_count(kind), 1);
}

#[test]
fn failed_creation_surfaces_as_graphics_error() {
    let (mut gfx, probe) = Graphics::headless();
    probe.fail_next_creation();
    let result = VertexShader::new(&mut gfx, "solid_vs");
    assert!(matches!(result, Err(Error::Graphics(_))));
}
