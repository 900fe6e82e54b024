use std::path::PathBuf;

use facet_engine::drawable::{Drawable, DrawableBase};
use facet_engine::gfx::{Graphics, ImageData};
use facet_engine::math::{SeededRandom, Uniform, UniformInt};
use facet_engine::objects::{
    AssetMesh, ColorMaterial, Cuboid, Cylinder, MotionRanges, Pyramid, SkinnedBox,
};
use facet_engine::scene::ImportedMesh;
use facet_engine::Result;
use glam::{Mat4, Vec3};

/// One procedural object of the test scene.
pub enum TestObject {
    Cuboid(Cuboid),
    Cylinder(Cylinder),
    Pyramid(Pyramid),
    SkinnedBox(SkinnedBox),
    Asset(AssetMesh),
}

impl TestObject {
    pub fn label(&self) -> &'static str {
        match self {
            TestObject::Cuboid(_) => "box",
            TestObject::Cylinder(_) => "cylinder",
            TestObject::Pyramid(_) => "pyramid",
            TestObject::SkinnedBox(_) => "skinned box",
            TestObject::Asset(_) => "asset",
        }
    }

    /// Per-instance material, for objects that have one.
    pub fn material_mut(&mut self) -> Option<&mut ColorMaterial> {
        match self {
            TestObject::Cuboid(o) => Some(o.material_mut()),
            TestObject::Cylinder(o) => Some(o.material_mut()),
            TestObject::Asset(o) => Some(o.material_mut()),
            TestObject::Pyramid(_) | TestObject::SkinnedBox(_) => None,
        }
    }

    /// Pushes the material to the GPU; a no-op for shared materials.
    pub fn sync_material(&self, gfx: &mut Graphics) -> Result<()> {
        match self {
            TestObject::Cuboid(o) => o.sync_material(gfx),
            TestObject::Cylinder(o) => o.sync_material(gfx),
            TestObject::Asset(o) => o.sync_material(gfx),
            TestObject::Pyramid(_) | TestObject::SkinnedBox(_) => Ok(()),
        }
    }

    fn drawable(&self) -> &dyn Drawable {
        match self {
            TestObject::Cuboid(o) => o,
            TestObject::Cylinder(o) => o,
            TestObject::Pyramid(o) => o,
            TestObject::SkinnedBox(o) => o,
            TestObject::Asset(o) => o,
        }
    }

    fn drawable_mut(&mut self) -> &mut dyn Drawable {
        match self {
            TestObject::Cuboid(o) => o,
            TestObject::Cylinder(o) => o,
            TestObject::Pyramid(o) => o,
            TestObject::SkinnedBox(o) => o,
            TestObject::Asset(o) => o,
        }
    }
}

impl Drawable for TestObject {
    fn base(&self) -> &DrawableBase {
        self.drawable().base()
    }

    fn transform(&self) -> Mat4 {
        self.drawable().transform()
    }

    fn update(&mut self, dt: f32) {
        self.drawable_mut().update(dt);
    }
}

/// Where textured boxes get their image from.
pub enum Skin {
    File(PathBuf),
    Image(ImageData),
}

impl Skin {
    /// 8x8 checkerboard in two colours.
    pub fn checkerboard() -> Self {
        const SIZE: u32 = 8;
        let mut rgba = Vec::with_capacity((SIZE * SIZE * 4) as usize);
        for y in 0..SIZE {
            for x in 0..SIZE {
                let texel = if (x + y) % 2 == 0 {
                    [230, 230, 230, 255]
                } else {
                    [200, 40, 60, 255]
                };
                rgba.extend_from_slice(&texel);
            }
        }
        Skin::Image(ImageData {
            width: SIZE,
            height: SIZE,
            rgba,
        })
    }
}

/// Spawns randomized test objects from one seeded generator.
pub struct ObjectFactory {
    rng: SeededRandom,
    ranges: MotionRanges,
    kind: UniformInt,
    color: Uniform,
    stretch: Uniform,
    cylinder_segments: UniformInt,
    pyramid_segments: UniformInt,
    skin: Skin,
    asset: Option<ImportedMesh>,
}

impl ObjectFactory {
    pub fn new(seed: u32, skin: Skin, asset: Option<ImportedMesh>) -> Self {
        let kinds = if asset.is_some() { 5 } else { 4 };
        Self {
            rng: SeededRandom::new(seed),
            ranges: MotionRanges::default(),
            kind: UniformInt::new(0, kinds - 1),
            color: Uniform::new(0.0, 1.0),
            stretch: Uniform::new(0.4, 3.0),
            cylinder_segments: UniformInt::new(3, 30),
            pyramid_segments: UniformInt::new(3, 30),
            skin,
            asset,
        }
    }

    pub fn spawn(&mut self, gfx: &mut Graphics) -> Result<TestObject> {
        let object = match self.kind.sample(&mut self.rng) {
            0 => {
                let color = self.random_color();
                TestObject::Cuboid(Cuboid::new(gfx, &mut self.rng, &self.ranges, self.stretch, color)?)
            }
            1 => {
                let color = self.random_color();
                TestObject::Cylinder(Cylinder::new(
                    gfx,
                    &mut self.rng,
                    &self.ranges,
                    self.cylinder_segments,
                    color,
                )?)
            }
            2 => TestObject::Pyramid(Pyramid::new(
                gfx,
                &mut self.rng,
                &self.ranges,
                self.pyramid_segments,
            )?),
            3 => TestObject::SkinnedBox(match &self.skin {
                Skin::File(path) => SkinnedBox::new(gfx, &mut self.rng, &self.ranges, path)?,
                Skin::Image(image) => SkinnedBox::from_image(gfx, &mut self.rng, &self.ranges, image)?,
            }),
            _ => {
                let color = self.random_color();
                match &self.asset {
                    Some(mesh) => TestObject::Asset(AssetMesh::new(
                        gfx,
                        &mut self.rng,
                        &self.ranges,
                        mesh,
                        color,
                        1.5,
                    )?),
                    None => TestObject::Cuboid(Cuboid::new(
                        gfx,
                        &mut self.rng,
                        &self.ranges,
                        self.stretch,
                        color,
                    )?),
                }
            }
        };
        Ok(object)
    }

    pub fn spawn_many(&mut self, gfx: &mut Graphics, count: usize) -> Result<Vec<TestObject>> {
        (0..count).map(|_| self.spawn(gfx)).collect()
    }

    fn random_color(&mut self) -> Vec3 {
        Vec3::new(
            self.color.sample(&mut self.rng),
            self.color.sample(&mut self.rng),
            self.color.sample(&mut self.rng),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_engine::gfx::ResourceKind;

    #[test]
    fn spawns_every_kind_with_shared_shaders() {
        let (mut gfx, probe) = Graphics::headless();
        let mut factory = ObjectFactory::new(42, Skin::checkerboard(), None);
        let objects = factory.spawn_many(&mut gfx, 40).unwrap();

        let labels: std::collections::HashSet<_> = objects.iter().map(|o| o.label()).collect();
        assert_eq!(labels.len(), 4);
        // one texture no matter how many skinned boxes exist
        assert_eq!(probe.created(ResourceKind::Texture), 1);
    }

    #[test]
    fn same_seed_spawns_same_scene() {
        let (mut gfx, _probe) = Graphics::headless();
        let a = ObjectFactory::new(9, Skin::checkerboard(), None)
            .spawn_many(&mut gfx, 10)
            .unwrap();
        let b = ObjectFactory::new(9, Skin::checkerboard(), None)
            .spawn_many(&mut gfx, 10)
            .unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.label(), y.label());
            assert_eq!(x.transform(), y.transform());
        }
    }

    #[test]
    fn every_object_draws() {
        let (mut gfx, probe) = Graphics::headless();
        let mut objects = ObjectFactory::new(3, Skin::checkerboard(), None)
            .spawn_many(&mut gfx, 12)
            .unwrap();

        gfx.begin_frame();
        for object in &mut objects {
            object.update(0.016);
            object.draw(&mut gfx).unwrap();
        }
        assert_eq!(probe.draw_count(), 12);
    }
}
