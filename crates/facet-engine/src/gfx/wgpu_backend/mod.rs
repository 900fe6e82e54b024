//! wgpu implementation of [`Backend`].
//!
//! Draws are recorded as packets while the frame is built and encoded into a
//! single render pass in `end_frame`. Because encoding is deferred, constant
//! buffers are renamed when they are rewritten after a draw already captured
//! them; each packet keeps reading the contents that were current when it was
//! issued.

mod binding;
mod pipeline;
mod scope;

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::device::{Gpu, SurfaceRecovery, SwapFrame};
use crate::error::{ErrorCode, GraphicsError};

use super::backend::{
    AddressMode, Backend, BufferId, Filter, FrameStatus, ImageData, LayoutId, SamplerDesc,
    SamplerId, ShaderId, ShaderSource, ShaderStage, TextureId, VertexElement,
};
use super::state::PipelineState;

use binding::{
    sampler_binding, texture_binding, GroupKey, GroupSignature, SlotResource, GROUP_COUNT,
    PIXEL_CONSTANTS_GROUP, TEXTURES_GROUP, VERTEX_CONSTANTS_GROUP,
};
use pipeline::{InputLayout, PipelineInputs, PipelineKey};

struct ConstantBuffer {
    versions: Vec<wgpu::Buffer>,
    current: usize,
    /// A recorded draw reads `versions[current]`.
    referenced: bool,
    /// Latest contents, used to seed version 0 each frame.
    shadow: Vec<u8>,
}

struct CompiledShader {
    stage: ShaderStage,
    module: wgpu::ShaderModule,
}

struct DrawPacket {
    pipeline: wgpu::RenderPipeline,
    groups: [wgpu::BindGroup; GROUP_COUNT],
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    count: u32,
}

pub struct WgpuBackend {
    gpu: Gpu,
    state: PipelineState,
    next_id: u32,

    buffers: HashMap<BufferId, wgpu::Buffer>,
    constants: HashMap<BufferId, ConstantBuffer>,
    shaders: HashMap<ShaderId, CompiledShader>,
    layouts: HashMap<LayoutId, InputLayout>,
    textures: HashMap<TextureId, wgpu::TextureView>,
    samplers: HashMap<SamplerId, wgpu::Sampler>,

    group_layouts: HashMap<GroupSignature, wgpu::BindGroupLayout>,
    bind_groups: HashMap<GroupKey, wgpu::BindGroup>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,

    packets: Vec<DrawPacket>,
    clear: wgpu::Color,
}

impl WgpuBackend {
    pub fn new(gpu: Gpu) -> Self {
        Self {
            gpu,
            state: PipelineState::default(),
            next_id: 0,
            buffers: HashMap::new(),
            constants: HashMap::new(),
            shaders: HashMap::new(),
            layouts: HashMap::new(),
            textures: HashMap::new(),
            samplers: HashMap::new(),
            group_layouts: HashMap::new(),
            bind_groups: HashMap::new(),
            pipelines: HashMap::new(),
            packets: Vec::new(),
            clear: wgpu::Color::BLACK,
        }
    }

    fn allocate_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn check_device(&self) -> Result<(), GraphicsError> {
        match self.gpu.lost_reason() {
            Some(reason) => Err(GraphicsError::DeviceLost { reason }),
            None => Ok(()),
        }
    }

    fn create_buffer(
        &mut self,
        what: &'static str,
        contents: &[u8],
        usage: wgpu::BufferUsages,
    ) -> Result<wgpu::Buffer, GraphicsError> {
        self.check_device()?;
        let device = self.gpu.device();
        scope::capture(device, what, || {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(what),
                contents,
                usage,
            })
        })
    }

    fn constant_key(&mut self, stage: ShaderStage, slot: u32, id: BufferId) -> Result<(u32, SlotResource), GraphicsError> {
        let cb = self
            .constants
            .get_mut(&id)
            .ok_or(GraphicsError::UnknownHandle { kind: "constant buffer", id: id.raw() })?;
        cb.referenced = true;
        Ok((
            slot,
            SlotResource::Uniform {
                buffer: id,
                version: cb.current,
                stage,
            },
        ))
    }

    fn group_keys(&mut self) -> Result<[GroupKey; GROUP_COUNT], GraphicsError> {
        let mut keys: [GroupKey; GROUP_COUNT] = Default::default();

        let vertex: Vec<_> = self.state.vertex_constants.iter().map(|(s, id)| (*s, *id)).collect();
        for (slot, id) in vertex {
            let entry = self.constant_key(ShaderStage::Vertex, slot, id)?;
            keys[VERTEX_CONSTANTS_GROUP].0.push(entry);
        }

        let pixel: Vec<_> = self.state.pixel_constants.iter().map(|(s, id)| (*s, *id)).collect();
        for (slot, id) in pixel {
            let entry = self.constant_key(ShaderStage::Pixel, slot, id)?;
            keys[PIXEL_CONSTANTS_GROUP].0.push(entry);
        }

        let textures = &mut keys[TEXTURES_GROUP].0;
        for (slot, id) in &self.state.textures {
            textures.push((texture_binding(*slot), SlotResource::Texture(*id)));
        }
        for (slot, id) in &self.state.samplers {
            textures.push((sampler_binding(*slot), SlotResource::Sampler(*id)));
        }
        textures.sort_by_key(|(binding, _)| *binding);

        Ok(keys)
    }

    fn group_layout(&mut self, signature: &GroupSignature) -> wgpu::BindGroupLayout {
        if let Some(layout) = self.group_layouts.get(signature) {
            return layout.clone();
        }
        let entries = signature.layout_entries();
        let layout = self
            .gpu
            .device()
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("facet bind group layout"),
                entries: &entries,
            });
        self.group_layouts.insert(signature.clone(), layout.clone());
        layout
    }

    fn bind_group(&mut self, key: &GroupKey) -> Result<wgpu::BindGroup, GraphicsError> {
        if let Some(group) = self.bind_groups.get(key) {
            return Ok(group.clone());
        }

        let layout = self.group_layout(&key.signature());
        let mut entries = Vec::with_capacity(key.0.len());
        for (binding, resource) in &key.0 {
            let resource = match resource {
                SlotResource::Uniform { buffer, version, .. } => self
                    .constants
                    .get(buffer)
                    .and_then(|cb| cb.versions.get(*version))
                    .ok_or(GraphicsError::UnknownHandle { kind: "constant buffer", id: buffer.raw() })?
                    .as_entire_binding(),
                SlotResource::Texture(id) => wgpu::BindingResource::TextureView(
                    self.textures
                        .get(id)
                        .ok_or(GraphicsError::UnknownHandle { kind: "texture", id: id.raw() })?,
                ),
                SlotResource::Sampler(id) => wgpu::BindingResource::Sampler(
                    self.samplers
                        .get(id)
                        .ok_or(GraphicsError::UnknownHandle { kind: "sampler", id: id.raw() })?,
                ),
            };
            entries.push(wgpu::BindGroupEntry {
                binding: *binding,
                resource,
            });
        }

        let device = self.gpu.device();
        let group = scope::capture(device, "bind group", || {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("facet bind group"),
                layout: &layout,
                entries: &entries,
            })
        })?;
        self.bind_groups.insert(key.clone(), group.clone());
        Ok(group)
    }

    fn pipeline(&mut self, key: &PipelineKey) -> Result<wgpu::RenderPipeline, GraphicsError> {
        if let Some(pipeline) = self.pipelines.get(key) {
            return Ok(pipeline.clone());
        }

        let group_layouts = [
            self.group_layout(&key.groups[0]),
            self.group_layout(&key.groups[1]),
            self.group_layout(&key.groups[2]),
        ];
        let vertex = self
            .shaders
            .get(&key.vertex_shader)
            .ok_or(GraphicsError::UnknownHandle { kind: "shader", id: key.vertex_shader.raw() })?;
        let pixel = self
            .shaders
            .get(&key.pixel_shader)
            .ok_or(GraphicsError::UnknownHandle { kind: "shader", id: key.pixel_shader.raw() })?;
        let input_layout = self
            .layouts
            .get(&key.input_layout)
            .ok_or(GraphicsError::UnknownHandle { kind: "input layout", id: key.input_layout.raw() })?;

        let device = self.gpu.device();
        let pipeline = scope::capture(device, "render pipeline", || {
            pipeline::create_pipeline(
                device,
                PipelineInputs {
                    vertex_module: &vertex.module,
                    pixel_module: &pixel.module,
                    input_layout,
                    group_layouts: [&group_layouts[0], &group_layouts[1], &group_layouts[2]],
                    topology: key.topology,
                    color_format: self.gpu.surface_format(),
                    depth_format: self.gpu.depth_format(),
                },
            )
        })?;

        log::debug!(
            "created pipeline #{} ({:?} + {:?}, {:?})",
            self.pipelines.len() + 1,
            key.vertex_shader,
            key.pixel_shader,
            key.topology
        );
        self.pipelines.insert(key.clone(), pipeline.clone());
        Ok(pipeline)
    }

    fn encode(&mut self, frame: &mut SwapFrame) {
        let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("facet scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: self.gpu.depth_view(),
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        for packet in self.packets.drain(..) {
            rpass.set_pipeline(&packet.pipeline);
            for (index, group) in packet.groups.iter().enumerate() {
                rpass.set_bind_group(index as u32, group, &[]);
            }
            rpass.set_vertex_buffer(0, packet.vertex_buffer.slice(..));
            rpass.set_index_buffer(packet.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..packet.count, 0, 0..1);
        }
    }
}

impl Backend for WgpuBackend {
    fn create_vertex_buffer(&mut self, data: &[u8], _stride: u32) -> Result<BufferId, GraphicsError> {
        let buffer = self.create_buffer("facet vertex buffer", data, wgpu::BufferUsages::VERTEX)?;
        let id = BufferId(self.allocate_id());
        self.buffers.insert(id, buffer);
        Ok(id)
    }

    fn create_index_buffer(&mut self, indices: &[u16]) -> Result<BufferId, GraphicsError> {
        let buffer = self.create_buffer(
            "facet index buffer",
            bytemuck::cast_slice(indices),
            wgpu::BufferUsages::INDEX,
        )?;
        let id = BufferId(self.allocate_id());
        self.buffers.insert(id, buffer);
        Ok(id)
    }

    fn create_constant_buffer(&mut self, initial: &[u8]) -> Result<BufferId, GraphicsError> {
        let mut contents = initial.to_vec();
        contents.resize(contents.len().next_multiple_of(16).max(16), 0);
        let buffer = self.create_buffer(
            "facet constant buffer",
            &contents,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        )?;
        let id = BufferId(self.allocate_id());
        self.constants.insert(
            id,
            ConstantBuffer {
                versions: vec![buffer],
                current: 0,
                referenced: false,
                shadow: contents,
            },
        );
        Ok(id)
    }

    fn update_constant_buffer(&mut self, id: BufferId, data: &[u8]) {
        let Some(cb) = self.constants.get_mut(&id) else {
            log::warn!("write to unknown constant buffer {id:?}");
            return;
        };

        debug_assert!(
            data.len() <= cb.shadow.len(),
            "constant buffer {id:?} written with {} bytes, holds {}",
            data.len(),
            cb.shadow.len()
        );
        let n = data.len().min(cb.shadow.len());
        cb.shadow[..n].copy_from_slice(&data[..n]);

        if cb.referenced {
            cb.current += 1;
            cb.referenced = false;
            if cb.current == cb.versions.len() {
                let device = self.gpu.device();
                let version = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("facet constant buffer version"),
                    size: cb.shadow.len() as u64,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                cb.versions.push(version);
            }
        }

        self.gpu.queue().write_buffer(&cb.versions[cb.current], 0, &cb.shadow);
    }

    fn create_shader(&mut self, source: &ShaderSource) -> Result<ShaderId, GraphicsError> {
        self.check_device()?;
        let device = self.gpu.device();
        let module = scope::capture(device, "shader module", || {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(source.name.as_str()),
                source: wgpu::ShaderSource::Wgsl(source.code.as_ref().into()),
            })
        })?;
        log::debug!("compiled shader `{}` ({:?})", source.name, source.stage);

        let id = ShaderId(self.allocate_id());
        self.shaders.insert(
            id,
            CompiledShader {
                stage: source.stage,
                module,
            },
        );
        Ok(id)
    }

    fn create_input_layout(
        &mut self,
        elements: &[VertexElement],
        stride: u32,
        vertex_shader: ShaderId,
    ) -> Result<LayoutId, GraphicsError> {
        match self.shaders.get(&vertex_shader) {
            Some(shader) if shader.stage == ShaderStage::Vertex => {}
            _ => {
                return Err(GraphicsError::ResourceCreation {
                    what: "input layout",
                    code: ErrorCode::Validation,
                    info: vec![format!("{vertex_shader:?} is not a vertex shader")],
                });
            }
        }

        let attributes = elements
            .iter()
            .map(|e| wgpu::VertexAttribute {
                format: pipeline::map_vertex_format(e.format),
                offset: e.offset as u64,
                shader_location: e.location,
            })
            .collect();

        let id = LayoutId(self.allocate_id());
        self.layouts.insert(
            id,
            InputLayout {
                vertex_shader,
                stride,
                attributes,
            },
        );
        Ok(id)
    }

    fn create_texture(&mut self, image: &ImageData) -> Result<TextureId, GraphicsError> {
        self.check_device()?;
        let device = self.gpu.device();
        let queue = self.gpu.queue();
        let texture = scope::capture(device, "texture", || {
            device.create_texture_with_data(
                queue,
                &wgpu::TextureDescriptor {
                    label: Some("facet texture"),
                    size: wgpu::Extent3d {
                        width: image.width,
                        height: image.height,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: wgpu::TextureFormat::Rgba8UnormSrgb,
                    usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                    view_formats: &[],
                },
                wgpu::util::TextureDataOrder::LayerMajor,
                &image.rgba,
            )
        })?;

        let id = TextureId(self.allocate_id());
        self.textures
            .insert(id, texture.create_view(&wgpu::TextureViewDescriptor::default()));
        Ok(id)
    }

    fn create_sampler(&mut self, desc: &SamplerDesc) -> Result<SamplerId, GraphicsError> {
        self.check_device()?;
        let (filter, mipmap_filter) = match desc.filter {
            Filter::Nearest => (wgpu::FilterMode::Nearest, wgpu::MipmapFilterMode::Nearest),
            Filter::Linear => (wgpu::FilterMode::Linear, wgpu::MipmapFilterMode::Linear),
        };
        let address = match desc.address {
            AddressMode::Wrap => wgpu::AddressMode::Repeat,
            AddressMode::Clamp => wgpu::AddressMode::ClampToEdge,
            AddressMode::Mirror => wgpu::AddressMode::MirrorRepeat,
        };

        let device = self.gpu.device();
        let sampler = scope::capture(device, "sampler", || {
            device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("facet sampler"),
                address_mode_u: address,
                address_mode_v: address,
                address_mode_w: address,
                mag_filter: filter,
                min_filter: filter,
                mipmap_filter,
                ..Default::default()
            })
        })?;

        let id = SamplerId(self.allocate_id());
        self.samplers.insert(id, sampler);
        Ok(id)
    }

    fn state_mut(&mut self) -> &mut PipelineState {
        &mut self.state
    }

    fn draw_indexed(&mut self, count: u32) -> Result<(), GraphicsError> {
        self.check_device()?;
        let layouts = &self.layouts;
        let targets = self
            .state
            .resolve(|layout| layouts.get(&layout).map(|l| l.vertex_shader))?;

        let keys = self.group_keys()?;
        let key = PipelineKey {
            vertex_shader: targets.vertex_shader,
            pixel_shader: targets.pixel_shader,
            input_layout: targets.input_layout,
            topology: self.state.topology,
            groups: [keys[0].signature(), keys[1].signature(), keys[2].signature()],
        };
        let pipeline = self.pipeline(&key)?;
        let groups = [
            self.bind_group(&keys[0])?,
            self.bind_group(&keys[1])?,
            self.bind_group(&keys[2])?,
        ];

        let vertex_buffer = self
            .buffers
            .get(&targets.vertex_buffer)
            .ok_or(GraphicsError::UnknownHandle { kind: "vertex buffer", id: targets.vertex_buffer.raw() })?
            .clone();
        let index_buffer = self
            .buffers
            .get(&targets.index_buffer)
            .ok_or(GraphicsError::UnknownHandle { kind: "index buffer", id: targets.index_buffer.raw() })?
            .clone();

        self.packets.push(DrawPacket {
            pipeline,
            groups,
            vertex_buffer,
            index_buffer,
            count,
        });
        Ok(())
    }

    fn begin_frame(&mut self, clear: [f32; 4]) {
        self.state.reset();
        self.packets.clear();
        self.clear = wgpu::Color {
            r: clear[0] as f64,
            g: clear[1] as f64,
            b: clear[2] as f64,
            a: clear[3] as f64,
        };

        let queue = self.gpu.queue();
        for cb in self.constants.values_mut() {
            cb.referenced = false;
            if cb.current != 0 {
                cb.current = 0;
                queue.write_buffer(&cb.versions[0], 0, &cb.shadow);
            }
        }
    }

    fn end_frame(&mut self) -> Result<FrameStatus, GraphicsError> {
        self.check_device()?;

        let mut frame = match self.gpu.acquire_frame() {
            Ok(frame) => frame,
            Err(err) => {
                self.packets.clear();
                return match self.gpu.recover(err) {
                    SurfaceRecovery::Abort => {
                        Err(GraphicsError::Surface("out of memory while acquiring a frame".into()))
                    }
                    SurfaceRecovery::Reconfigure | SurfaceRecovery::Skip => Ok(FrameStatus::Skipped),
                };
            }
        };

        self.encode(&mut frame);
        self.gpu.present(frame);
        Ok(FrameStatus::Presented)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(winit::dpi::PhysicalSize::new(width, height));
    }

    fn size(&self) -> (u32, u32) {
        let size = self.gpu.size();
        (size.width, size.height)
    }
}
