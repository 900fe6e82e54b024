//! Recording backend without a device.
//!
//! Every creation, upload and draw is recorded into a shared log that tests
//! inspect through [`HeadlessProbe`]. Pipeline validation is identical to the
//! wgpu backend, so composition bugs surface here too.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::error::{ErrorCode, GraphicsError};

use super::backend::{
    Backend, BufferId, FrameStatus, ImageData, LayoutId, SamplerDesc, SamplerId, ShaderId,
    ShaderSource, ShaderStage, TextureId, Topology, VertexElement,
};
use super::state::PipelineState;

/// Resource classes counted by the probe.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResourceKind {
    VertexBuffer,
    IndexBuffer,
    ConstantBuffer,
    VertexShader,
    PixelShader,
    InputLayout,
    Texture,
    Sampler,
}

/// Snapshot of the pipeline taken when a draw was issued.
#[derive(Debug, Clone)]
pub struct DrawRecord {
    pub index_count: u32,
    pub index_buffer: BufferId,
    pub vertex_buffer: BufferId,
    pub vertex_shader: ShaderId,
    pub pixel_shader: ShaderId,
    pub topology: Topology,
    /// Constant buffer contents per slot, as they were at draw time.
    pub vertex_constants: BTreeMap<u32, Vec<u8>>,
    pub pixel_constants: BTreeMap<u32, Vec<u8>>,
    pub textures: BTreeMap<u32, TextureId>,
    pub samplers: BTreeMap<u32, SamplerId>,
}

impl DrawRecord {
    /// Reads a constant buffer snapshot as `f32`s.
    pub fn vertex_floats(&self, slot: u32) -> Option<Vec<f32>> {
        self.vertex_constants.get(&slot).map(|b| to_floats(b))
    }

    pub fn pixel_floats(&self, slot: u32) -> Option<Vec<f32>> {
        self.pixel_constants.get(&slot).map(|b| to_floats(b))
    }
}

fn to_floats(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

#[derive(Debug, Default)]
struct Recording {
    next_id: u32,
    created: HashMap<ResourceKind, usize>,
    buffers: HashMap<BufferId, Vec<u8>>,
    shaders: HashMap<ShaderId, ShaderStage>,
    layouts: HashMap<LayoutId, ShaderId>,
    constant_writes: usize,
    draws: Vec<DrawRecord>,
    frames_presented: u32,
    fail_next: bool,
}

impl Recording {
    fn allocate(&mut self, kind: ResourceKind) -> u32 {
        *self.created.entry(kind).or_default() += 1;
        self.next_id += 1;
        self.next_id
    }

    fn check_failure(&mut self, what: &'static str) -> Result<(), GraphicsError> {
        if std::mem::take(&mut self.fail_next) {
            return Err(GraphicsError::ResourceCreation {
                what,
                code: ErrorCode::OutOfMemory,
                info: vec![format!("headless backend refused to create {what}")],
            });
        }
        Ok(())
    }
}

/// Read access to what a [`HeadlessBackend`] recorded.
#[derive(Debug, Clone)]
pub struct HeadlessProbe(Rc<RefCell<Recording>>);

impl HeadlessProbe {
    /// Number of resources of `kind` created so far.
    pub fn created(&self, kind: ResourceKind) -> usize {
        self.0.borrow().created.get(&kind).copied().unwrap_or(0)
    }

    pub fn draws(&self) -> Vec<DrawRecord> {
        self.0.borrow().draws.clone()
    }

    pub fn draw_count(&self) -> usize {
        self.0.borrow().draws.len()
    }

    pub fn buffer_contents(&self, id: BufferId) -> Option<Vec<u8>> {
        self.0.borrow().buffers.get(&id).cloned()
    }

    pub fn constant_writes(&self) -> usize {
        self.0.borrow().constant_writes
    }

    pub fn frames_presented(&self) -> u32 {
        self.0.borrow().frames_presented
    }

    /// Makes the next resource creation fail with an out-of-memory error.
    pub fn fail_next_creation(&self) {
        self.0.borrow_mut().fail_next = true;
    }
}

pub struct HeadlessBackend {
    state: PipelineState,
    recording: Rc<RefCell<Recording>>,
    size: (u32, u32),
}

impl HeadlessBackend {
    pub fn new(width: u32, height: u32) -> (Self, HeadlessProbe) {
        let recording = Rc::new(RefCell::new(Recording::default()));
        let backend = Self {
            state: PipelineState::default(),
            recording: Rc::clone(&recording),
            size: (width, height),
        };
        (backend, HeadlessProbe(recording))
    }

    fn store_buffer(&mut self, kind: ResourceKind, what: &'static str, bytes: Vec<u8>) -> Result<BufferId, GraphicsError> {
        let mut rec = self.recording.borrow_mut();
        rec.check_failure(what)?;
        let id = BufferId(rec.allocate(kind));
        rec.buffers.insert(id, bytes);
        log::trace!("headless: created {what} {id:?}");
        Ok(id)
    }

    fn snapshot(rec: &Recording, slots: &BTreeMap<u32, BufferId>) -> BTreeMap<u32, Vec<u8>> {
        slots
            .iter()
            .map(|(slot, id)| (*slot, rec.buffers.get(id).cloned().unwrap_or_default()))
            .collect()
    }
}

impl Backend for HeadlessBackend {
    fn create_vertex_buffer(&mut self, data: &[u8], _stride: u32) -> Result<BufferId, GraphicsError> {
        self.store_buffer(ResourceKind::VertexBuffer, "vertex buffer", data.to_vec())
    }

    fn create_index_buffer(&mut self, indices: &[u16]) -> Result<BufferId, GraphicsError> {
        self.store_buffer(
            ResourceKind::IndexBuffer,
            "index buffer",
            bytemuck::cast_slice(indices).to_vec(),
        )
    }

    fn create_constant_buffer(&mut self, initial: &[u8]) -> Result<BufferId, GraphicsError> {
        self.store_buffer(ResourceKind::ConstantBuffer, "constant buffer", initial.to_vec())
    }

    fn update_constant_buffer(&mut self, id: BufferId, data: &[u8]) {
        let mut rec = self.recording.borrow_mut();
        rec.constant_writes += 1;
        match rec.buffers.get_mut(&id) {
            Some(buf) => {
                debug_assert!(
                    data.len() <= buf.len(),
                    "constant buffer {id:?} written with {} bytes, holds {}",
                    data.len(),
                    buf.len()
                );
                buf.clear();
                buf.extend_from_slice(data);
            }
            None => log::warn!("headless: write to unknown constant buffer {id:?}"),
        }
    }

    fn create_shader(&mut self, source: &ShaderSource) -> Result<ShaderId, GraphicsError> {
        let mut rec = self.recording.borrow_mut();
        rec.check_failure("shader")?;
        let kind = match source.stage {
            ShaderStage::Vertex => ResourceKind::VertexShader,
            ShaderStage::Pixel => ResourceKind::PixelShader,
        };
        let id = ShaderId(rec.allocate(kind));
        rec.shaders.insert(id, source.stage);
        Ok(id)
    }

    fn create_input_layout(
        &mut self,
        _elements: &[VertexElement],
        _stride: u32,
        vertex_shader: ShaderId,
    ) -> Result<LayoutId, GraphicsError> {
        let mut rec = self.recording.borrow_mut();
        if rec.shaders.get(&vertex_shader) != Some(&ShaderStage::Vertex) {
            return Err(GraphicsError::ResourceCreation {
                what: "input layout",
                code: ErrorCode::Validation,
                info: vec![format!("{vertex_shader:?} is not a vertex shader")],
            });
        }
        rec.check_failure("input layout")?;
        let id = LayoutId(rec.allocate(ResourceKind::InputLayout));
        rec.layouts.insert(id, vertex_shader);
        Ok(id)
    }

    fn create_texture(&mut self, image: &ImageData) -> Result<TextureId, GraphicsError> {
        let mut rec = self.recording.borrow_mut();
        rec.check_failure("texture")?;
        log::trace!("headless: texture {}x{}", image.width, image.height);
        Ok(TextureId(rec.allocate(ResourceKind::Texture)))
    }

    fn create_sampler(&mut self, _desc: &SamplerDesc) -> Result<SamplerId, GraphicsError> {
        let mut rec = self.recording.borrow_mut();
        rec.check_failure("sampler")?;
        Ok(SamplerId(rec.allocate(ResourceKind::Sampler)))
    }

    fn state_mut(&mut self) -> &mut PipelineState {
        &mut self.state
    }

    fn draw_indexed(&mut self, count: u32) -> Result<(), GraphicsError> {
        let mut rec = self.recording.borrow_mut();
        let targets = self.state.resolve(|layout| rec.layouts.get(&layout).copied())?;

        let record = DrawRecord {
            index_count: count,
            index_buffer: targets.index_buffer,
            vertex_buffer: targets.vertex_buffer,
            vertex_shader: targets.vertex_shader,
            pixel_shader: targets.pixel_shader,
            topology: self.state.topology,
            vertex_constants: Self::snapshot(&rec, &self.state.vertex_constants),
            pixel_constants: Self::snapshot(&rec, &self.state.pixel_constants),
            textures: self.state.textures.clone(),
            samplers: self.state.samplers.clone(),
        };
        rec.draws.push(record);
        Ok(())
    }

    fn begin_frame(&mut self, _clear: [f32; 4]) {
        self.state.reset();
    }

    fn end_frame(&mut self) -> Result<FrameStatus, GraphicsError> {
        self.recording.borrow_mut().frames_presented += 1;
        Ok(FrameStatus::Presented)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_writes_replace_contents() {
        let (mut backend, probe) = HeadlessBackend::new(64, 64);
        let id = backend.create_constant_buffer(&[0; 16]).unwrap();
        backend.update_constant_buffer(id, &[7; 16]);
        assert_eq!(probe.buffer_contents(id), Some(vec![7; 16]));
        assert_eq!(probe.constant_writes(), 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "written with 32 bytes, holds 16")]
    fn oversized_constant_write_is_caught() {
        let (mut backend, _probe) = HeadlessBackend::new(64, 64);
        let id = backend.create_constant_buffer(&[0; 16]).unwrap();
        backend.update_constant_buffer(id, &[0; 32]);
    }
}
