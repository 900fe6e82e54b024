use crate::gfx::{Graphics, Topology};

use super::{Bindable, BindableKind, DrawContext};

pub struct PrimitiveTopology {
    topology: Topology,
}

impl PrimitiveTopology {
    pub fn new(topology: Topology) -> Self {
        Self { topology }
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }
}

impl Bindable for PrimitiveTopology {
    fn bind(&self, gfx: &mut Graphics, _ctx: &DrawContext) {
        gfx.backend_mut().set_topology(self.topology);
    }

    fn kind(&self) -> BindableKind {
        BindableKind::Topology
    }
}
