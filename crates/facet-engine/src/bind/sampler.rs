use crate::error::Result;
use crate::gfx::{Graphics, SamplerDesc, SamplerId};

use super::{Bindable, BindableKind, DrawContext};

pub struct Sampler {
    id: SamplerId,
    slot: u32,
}

impl Sampler {
    pub fn new(gfx: &mut Graphics, desc: SamplerDesc, slot: u32) -> Result<Self> {
        let id = gfx.backend_mut().create_sampler(&desc)?;
        Ok(Self { id, slot })
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }
}

impl Bindable for Sampler {
    fn bind(&self, gfx: &mut Graphics, _ctx: &DrawContext) {
        gfx.backend_mut().set_sampler(self.slot, self.id);
    }

    fn kind(&self) -> BindableKind {
        BindableKind::Sampler
    }
}
