//! Facet engine crate.
//!
//! Drawables are composed from bindables: every drawable owns an ordered list
//! of per-instance bindables plus a list shared by all drawables of its kind,
//! and issues one indexed draw per frame. The scene graph arranges imported
//! meshes in a node tree; the procedural objects in [`objects`] are the test
//! scene.
//!
//! Rendering goes through [`gfx::Graphics`], which forwards to a wgpu backend
//! for windows or a headless recording backend for tests.

pub mod bind;
pub mod camera;
pub mod core;
pub mod device;
pub mod drawable;
pub mod error;
pub mod geometry;
pub mod gfx;
pub mod input;
pub mod light;
pub mod logging;
pub mod math;
pub mod objects;
pub mod scene;
pub mod time;
pub mod window;

pub use camera::Camera;
pub use error::{Error, Result};
pub use light::PointLight;
