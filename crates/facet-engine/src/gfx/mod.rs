//! Graphics context and device backends.
//!
//! [`Graphics`] is what bindables and drawables see. It forwards resource
//! creation and pipeline state to a [`Backend`]: [`WgpuBackend`] renders to a
//! window, [`HeadlessBackend`] records everything for inspection.

mod backend;
mod graphics;
mod headless;
mod shaders;
mod state;
mod wgpu_backend;

pub use backend::{
    AddressMode, Backend, BufferId, Filter, FrameStatus, ImageData, LayoutId, SamplerDesc,
    SamplerId, ShaderId, ShaderSource, ShaderStage, TextureId, Topology, VertexElement,
    VertexFormat,
};
pub use graphics::{Graphics, GraphicsConfig};
pub use headless::{DrawRecord, HeadlessBackend, HeadlessProbe, ResourceKind};
pub use shaders::ShaderLibrary;
pub use state::{DrawTargets, PipelineState};
pub use wgpu_backend::WgpuBackend;
