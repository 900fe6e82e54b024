use anyhow::Context;
use facet_engine::camera::Camera;
use facet_engine::core::{App, AppControl, FrameCtx};
use facet_engine::drawable::Drawable;
use facet_engine::gfx::Graphics;
use facet_engine::input::Key;
use facet_engine::light::PointLight;
use facet_engine::scene::{ImportedScene, Model};
use facet_engine::time::Timeline;
use facet_engine::Result;

use crate::config::StudioConfig;
use crate::controls::{self, LightAction, Mode};
use crate::factory::{ObjectFactory, Skin, TestObject};

/// Everything created once the graphics context exists.
pub struct Scene {
    pub light: PointLight,
    pub objects: Vec<TestObject>,
    pub model: Option<Model>,
}

impl Scene {
    pub fn build(gfx: &mut Graphics, config: &StudioConfig) -> anyhow::Result<Self> {
        let imported = match &config.model_path {
            Some(path) => Some(
                ImportedScene::load(path)
                    .with_context(|| format!("failed to load model {}", path.display()))?,
            ),
            None => None,
        };

        let skin = match &config.texture_path {
            Some(path) => Skin::File(path.clone()),
            None => Skin::checkerboard(),
        };
        let asset = imported.as_ref().and_then(|scene| scene.meshes.first().cloned());
        let mut factory = ObjectFactory::new(config.seed, skin, asset);
        let objects = factory
            .spawn_many(gfx, config.object_count)
            .context("failed to spawn test objects")?;

        let model = imported
            .as_ref()
            .map(|scene| Model::new(gfx, scene))
            .transpose()
            .context("failed to build model")?;

        let light = PointLight::new(gfx).context("failed to create light")?;
        log::info!(
            "scene: {} objects, model {}",
            objects.len(),
            if model.is_some() { "loaded" } else { "none" }
        );
        Ok(Self {
            light,
            objects,
            model,
        })
    }

    /// Lit geometry first, the light marker last.
    pub fn draw(&mut self, gfx: &mut Graphics, view: glam::Mat4) -> Result<()> {
        self.light.bind(gfx, view);
        for object in &self.objects {
            object.draw(gfx)?;
        }
        if let Some(model) = &mut self.model {
            model.draw(gfx)?;
        }
        self.light.draw(gfx)
    }

    pub fn update(&mut self, dt: f32) {
        for object in &mut self.objects {
            object.update(dt);
        }
    }
}

pub struct Studio {
    config: StudioConfig,
    camera: Camera,
    timeline: Timeline,
    mode: Mode,
    selected_object: usize,
    scene: Option<Scene>,
    title_dirty: bool,
}

impl Studio {
    pub fn new(config: StudioConfig) -> Self {
        Self {
            config,
            camera: Camera::default(),
            timeline: Timeline::default(),
            mode: Mode::Camera,
            selected_object: 0,
            scene: None,
            title_dirty: true,
        }
    }

    fn title(&self) -> String {
        let pause = if self.timeline.is_paused() { " [paused]" } else { "" };
        let mut title = format!("facet studio | {} | speed {:.2}{pause}", self.mode, self.timeline.speed());
        if self.mode == Mode::Objects {
            if let Some(object) = self.scene.as_ref().and_then(|s| s.objects.get(self.selected_object)) {
                title.push_str(&format!(" | #{} {}", self.selected_object, object.label()));
            }
        }
        title
    }

    fn inspect(&mut self, ctx: &mut FrameCtx<'_>) -> Result<()> {
        let Some(scene) = self.scene.as_mut() else {
            return Ok(());
        };
        let (input, frame, dt) = (ctx.input, ctx.input_frame, ctx.time.dt);

        match self.mode {
            Mode::Camera => controls::drive_camera(&mut self.camera, input, frame, dt),
            Mode::Light => {
                if controls::drive_light(scene.light.params_mut(), input, frame, dt) == LightAction::Reset {
                    scene.light.reset();
                }
            }
            Mode::Model => {
                if let Some(model) = &mut scene.model {
                    let rows = model.tree_rows();
                    controls::drive_model(model.inspector_mut(), &rows, input, frame, dt);
                }
            }
            Mode::Objects => {
                let next = controls::cycle_selection(self.selected_object, scene.objects.len(), frame);
                if next != self.selected_object {
                    self.selected_object = next;
                    self.title_dirty = true;
                }
                if let Some(object) = scene.objects.get_mut(self.selected_object) {
                    if controls::drive_material(object.material_mut(), input, dt) {
                        object.sync_material(ctx.gfx)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl App for Studio {
    fn on_start(&mut self, gfx: &mut Graphics) -> anyhow::Result<()> {
        self.scene = Some(Scene::build(gfx, &self.config)?);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        if ctx.input_frame.pressed(Key::Escape) {
            return AppControl::Exit;
        }
        if let Some(mode) = Mode::from_keys(ctx.input_frame) {
            self.mode = mode;
            self.title_dirty = true;
        }
        if controls::drive_timeline(&mut self.timeline, ctx.input_frame) {
            self.title_dirty = true;
        }
        if let Err(err) = self.inspect(ctx) {
            log::error!("inspector failed: {err}");
            return AppControl::Exit;
        }
        if self.title_dirty {
            ctx.window.set_title(&self.title());
            self.title_dirty = false;
        }

        let Some(scene) = self.scene.as_mut() else {
            return AppControl::Continue;
        };
        scene.update(self.timeline.advance(ctx.time.dt));

        let view = self.camera.matrix();
        ctx.gfx.set_camera(view);
        ctx.render(|gfx| scene.draw(gfx, view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_draws_objects_then_marker() {
        let (mut gfx, probe) = Graphics::headless();
        let config = StudioConfig {
            object_count: 6,
            ..StudioConfig::default()
        };
        let mut scene = Scene::build(&mut gfx, &config).unwrap();
        gfx.begin_frame();
        scene.draw(&mut gfx, Camera::default().matrix()).unwrap();

        let draws = probe.draws();
        assert_eq!(draws.len(), 7);
        let marker = draws.last().unwrap();
        // the marker's own colour replaced the light in pixel slot 0
        assert_eq!(marker.pixel_floats(0).unwrap().len(), 4);
        assert_eq!(draws[0].pixel_floats(0).unwrap().len(), 16);
    }

    #[test]
    fn paused_scene_stands_still() {
        let (mut gfx, _probe) = Graphics::headless();
        let config = StudioConfig {
            object_count: 3,
            ..StudioConfig::default()
        };
        let mut scene = Scene::build(&mut gfx, &config).unwrap();
        let before: Vec<_> = scene.objects.iter().map(|o| o.transform()).collect();

        let mut timeline = Timeline::default();
        timeline.set_paused(true);
        scene.update(timeline.advance(0.5));
        let after: Vec<_> = scene.objects.iter().map(|o| o.transform()).collect();
        assert_eq!(before, after);
    }
}
