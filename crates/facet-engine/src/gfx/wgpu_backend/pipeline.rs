use crate::gfx::backend::{LayoutId, ShaderId, Topology, VertexFormat};

use super::binding::{GroupSignature, GROUP_COUNT};

/// Everything that makes two draws need different pipelines.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub(super) struct PipelineKey {
    pub vertex_shader: ShaderId,
    pub pixel_shader: ShaderId,
    pub input_layout: LayoutId,
    pub topology: Topology,
    pub groups: [GroupSignature; GROUP_COUNT],
}

/// Backend-side input layout.
pub(super) struct InputLayout {
    pub vertex_shader: ShaderId,
    pub stride: u32,
    pub attributes: Vec<wgpu::VertexAttribute>,
}

pub(super) struct PipelineInputs<'a> {
    pub vertex_module: &'a wgpu::ShaderModule,
    pub pixel_module: &'a wgpu::ShaderModule,
    pub input_layout: &'a InputLayout,
    pub group_layouts: [&'a wgpu::BindGroupLayout; GROUP_COUNT],
    pub topology: Topology,
    pub color_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
}

pub(super) fn create_pipeline(device: &wgpu::Device, inputs: PipelineInputs<'_>) -> wgpu::RenderPipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("facet pipeline layout"),
        bind_group_layouts: &inputs.group_layouts,
        immediate_size: 0,
    });

    let buffers = [wgpu::VertexBufferLayout {
        array_stride: inputs.input_layout.stride as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &inputs.input_layout.attributes,
    }];

    let (topology, strip_index_format) = map_topology(inputs.topology);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("facet pipeline"),
        layout: Some(&pipeline_layout),

        vertex: wgpu::VertexState {
            module: inputs.vertex_module,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &buffers,
        },

        fragment: Some(wgpu::FragmentState {
            module: inputs.pixel_module,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: inputs.color_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format,
            front_face: wgpu::FrontFace::Cw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: Some(wgpu::DepthStencilState {
            format: inputs.depth_format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),

        multiview_mask: None,
        cache: None,
    })
}

fn map_topology(topology: Topology) -> (wgpu::PrimitiveTopology, Option<wgpu::IndexFormat>) {
    match topology {
        Topology::PointList => (wgpu::PrimitiveTopology::PointList, None),
        Topology::LineList => (wgpu::PrimitiveTopology::LineList, None),
        Topology::LineStrip => (wgpu::PrimitiveTopology::LineStrip, Some(wgpu::IndexFormat::Uint16)),
        Topology::TriangleList => (wgpu::PrimitiveTopology::TriangleList, None),
        Topology::TriangleStrip => (
            wgpu::PrimitiveTopology::TriangleStrip,
            Some(wgpu::IndexFormat::Uint16),
        ),
    }
}

pub(super) fn map_vertex_format(format: VertexFormat) -> wgpu::VertexFormat {
    match format {
        VertexFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
        VertexFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
        VertexFormat::Float32x4 => wgpu::VertexFormat::Float32x4,
        VertexFormat::Unorm8x4 => wgpu::VertexFormat::Unorm8x4,
    }
}
