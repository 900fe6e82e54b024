use crate::gfx::backend::{BufferId, SamplerId, ShaderStage, TextureId};

/// Bind group index per resource class: vertex constants, pixel constants,
/// textures + samplers. Texture slot `n` sits at binding `2n`, its sampler at
/// `2n + 1`.
pub(super) const VERTEX_CONSTANTS_GROUP: usize = 0;
pub(super) const PIXEL_CONSTANTS_GROUP: usize = 1;
pub(super) const TEXTURES_GROUP: usize = 2;
pub(super) const GROUP_COUNT: usize = 3;

pub(super) fn texture_binding(slot: u32) -> u32 {
    slot * 2
}

pub(super) fn sampler_binding(slot: u32) -> u32 {
    slot * 2 + 1
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub(super) enum SlotKind {
    Uniform(ShaderStage),
    Texture,
    Sampler,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub(super) enum SlotResource {
    Uniform {
        buffer: BufferId,
        version: usize,
        stage: ShaderStage,
    },
    Texture(TextureId),
    Sampler(SamplerId),
}

impl SlotResource {
    fn kind(&self) -> SlotKind {
        match self {
            SlotResource::Uniform { stage, .. } => SlotKind::Uniform(*stage),
            SlotResource::Texture(_) => SlotKind::Texture,
            SlotResource::Sampler(_) => SlotKind::Sampler,
        }
    }
}

/// Concrete resources of one bind group, sorted by binding.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub(super) struct GroupKey(pub Vec<(u32, SlotResource)>);

/// Shape of one bind group; decides which layout a pipeline is built with.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub(super) struct GroupSignature(pub Vec<(u32, SlotKind)>);

impl GroupKey {
    pub fn signature(&self) -> GroupSignature {
        GroupSignature(self.0.iter().map(|(b, r)| (*b, r.kind())).collect())
    }
}

impl GroupSignature {
    pub fn layout_entries(&self) -> Vec<wgpu::BindGroupLayoutEntry> {
        self.0
            .iter()
            .map(|(binding, kind)| {
                let (visibility, ty) = match kind {
                    SlotKind::Uniform(stage) => (
                        stage_visibility(*stage),
                        wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                    ),
                    SlotKind::Texture => (
                        wgpu::ShaderStages::FRAGMENT,
                        wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                    ),
                    SlotKind::Sampler => (
                        wgpu::ShaderStages::FRAGMENT,
                        wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    ),
                };
                wgpu::BindGroupLayoutEntry {
                    binding: *binding,
                    visibility,
                    ty,
                    count: None,
                }
            })
            .collect()
    }
}

fn stage_visibility(stage: ShaderStage) -> wgpu::ShaderStages {
    match stage {
        ShaderStage::Vertex => wgpu::ShaderStages::VERTEX,
        ShaderStage::Pixel => wgpu::ShaderStages::FRAGMENT,
    }
}
