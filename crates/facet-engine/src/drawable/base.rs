use std::rc::Rc;

use crate::bind::{Bindable, BindableKind, DrawContext, IndexBuffer};
use crate::error::{BindError, Result};
use crate::gfx::Graphics;

use super::registry::StaticSlot;
use super::DrawableKind;

/// Bindable composition shared by every drawable.
///
/// Holds the per-instance bind list, a handle to the static list of its
/// kind, and the one index buffer the draw call counts from. The index buffer
/// is either an instance bind or the first one found in the static list.
pub struct DrawableBase {
    kind: DrawableKind,
    binds: Vec<Rc<dyn Bindable>>,
    index_buffer: Option<Rc<dyn Bindable>>,
    statics: Rc<StaticSlot>,
    static_owner: bool,
}

impl DrawableBase {
    pub fn new(gfx: &mut Graphics, kind: DrawableKind) -> Self {
        Self {
            kind,
            binds: Vec::new(),
            index_buffer: None,
            statics: gfx.statics_mut().slot(kind),
            static_owner: false,
        }
    }

    pub fn kind(&self) -> DrawableKind {
        self.kind
    }

    /// Adds a per-instance bindable. Index buffers go through
    /// [`add_index_buffer`](Self::add_index_buffer).
    pub fn add_bind(&mut self, bind: Rc<dyn Bindable>) -> Result<(), BindError> {
        if bind.kind() == BindableKind::IndexBuffer {
            return Err(BindError::IndexBufferViaAddBind);
        }
        self.binds.push(bind);
        Ok(())
    }

    pub fn add_index_buffer(&mut self, index_buffer: IndexBuffer) -> Result<(), BindError> {
        if self.index_buffer.is_some() {
            return Err(BindError::DuplicateIndexBuffer);
        }
        let bind: Rc<dyn Bindable> = Rc::new(index_buffer);
        self.index_buffer = Some(Rc::clone(&bind));
        self.binds.push(bind);
        Ok(())
    }

    /// Adds a bindable shared by every instance of this kind.
    ///
    /// The first instance to call this owns the static list; any other
    /// instance is rejected.
    pub fn add_static_bind(&mut self, bind: Rc<dyn Bindable>) -> Result<(), BindError> {
        if bind.kind() == BindableKind::IndexBuffer {
            return Err(BindError::IndexBufferViaAddBind);
        }
        self.claim_statics()?;
        self.statics.push(bind);
        Ok(())
    }

    /// Registers the shared index buffer and resolves it for this instance.
    pub fn add_static_index_buffer(&mut self, index_buffer: IndexBuffer) -> Result<(), BindError> {
        if self.index_buffer.is_some() {
            return Err(BindError::DuplicateIndexBuffer);
        }
        self.claim_statics()?;
        let bind: Rc<dyn Bindable> = Rc::new(index_buffer);
        self.index_buffer = Some(Rc::clone(&bind));
        self.statics.push(bind);
        Ok(())
    }

    /// Picks up the index buffer a previous instance put in the static list.
    pub fn set_index_from_static(&mut self) -> Result<(), BindError> {
        if self.index_buffer.is_some() {
            return Err(BindError::DuplicateIndexBuffer);
        }
        let index_buffer = self
            .statics
            .index_buffer()
            .ok_or(BindError::MissingStaticIndexBuffer(self.kind))?;
        self.index_buffer = Some(index_buffer);
        Ok(())
    }

    pub fn is_static_initialized(&self) -> bool {
        !self.statics.is_empty()
    }

    /// Runs `init` if no instance of this kind has populated the static list
    /// yet; otherwise reuses the shared index buffer when there is one.
    ///
    /// Returns whether this call did the initialization. A failed `init`
    /// leaves the list empty for the next instance.
    pub fn initialize_static<F>(&mut self, gfx: &mut Graphics, init: F) -> Result<bool>
    where
        F: FnOnce(&mut Graphics, &mut Self) -> Result<()>,
    {
        if self.is_static_initialized() {
            if self.index_buffer.is_none() && self.statics.index_buffer().is_some() {
                self.set_index_from_static()?;
            }
            return Ok(false);
        }

        log::debug!("initializing static binds for {:?}", self.kind);
        if let Err(err) = init(gfx, self) {
            self.statics.reset();
            self.static_owner = false;
            self.index_buffer = None;
            return Err(err);
        }
        log::debug!("{:?}: {} static binds", self.kind, self.statics.len());
        Ok(true)
    }

    /// First per-instance bindable with the given capability.
    pub fn query_bindable(&self, kind: BindableKind) -> Option<&Rc<dyn Bindable>> {
        self.binds.iter().find(|b| b.kind() == kind)
    }

    /// Index count of the resolved index buffer.
    pub fn index_count(&self) -> Option<u32> {
        self.index_buffer
            .as_ref()
            .and_then(|b| b.as_index_buffer())
            .map(IndexBuffer::count)
    }

    pub fn instance_binds(&self) -> &[Rc<dyn Bindable>] {
        &self.binds
    }

    /// Binds instance then static bindables and issues one indexed draw.
    pub fn draw(&self, gfx: &mut Graphics, ctx: &DrawContext) -> Result<()> {
        let count = self
            .index_count()
            .ok_or(BindError::MissingIndexBuffer(self.kind))?;

        for bind in &self.binds {
            bind.bind(gfx, ctx);
        }
        for bind in self.statics.binds() {
            bind.bind(gfx, ctx);
        }

        gfx.draw_indexed(count)?;
        Ok(())
    }

    fn claim_statics(&mut self) -> Result<(), BindError> {
        if self.static_owner {
            return Ok(());
        }
        if self.statics.is_claimed() {
            return Err(BindError::StaticAlreadyInitialized(self.kind));
        }
        self.statics.claim();
        self.static_owner = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::{PrimitiveTopology, TransformCbuf};
    use crate::gfx::Topology;

    const KIND: DrawableKind = DrawableKind::Custom("base-test");

    #[test]
    fn add_bind_rejects_index_buffers() {
        let (mut gfx, _probe) = Graphics::headless();
        let mut base = DrawableBase::new(&mut gfx, KIND);
        let ib = IndexBuffer::new(&mut gfx, &[0, 1, 2]).unwrap();
        let err = base.add_bind(Rc::new(ib)).unwrap_err();
        assert_eq!(err, BindError::IndexBufferViaAddBind);
    }

    #[test]
    fn second_index_buffer_is_rejected() {
        let (mut gfx, _probe) = Graphics::headless();
        let mut base = DrawableBase::new(&mut gfx, KIND);
        base.add_index_buffer(IndexBuffer::new(&mut gfx, &[0, 1, 2]).unwrap())
            .unwrap();
        let err = base
            .add_index_buffer(IndexBuffer::new(&mut gfx, &[0, 2, 1]).unwrap())
            .unwrap_err();
        assert_eq!(err, BindError::DuplicateIndexBuffer);
        assert_eq!(base.index_count(), Some(3));
    }

    #[test]
    fn set_index_from_static_needs_a_static_index_buffer() {
        let (mut gfx, _probe) = Graphics::headless();
        let mut first = DrawableBase::new(&mut gfx, KIND);
        first
            .add_static_bind(Rc::new(PrimitiveTopology::new(Topology::TriangleList)))
            .unwrap();

        let mut second = DrawableBase::new(&mut gfx, KIND);
        assert!(second.is_static_initialized());
        assert_eq!(
            second.set_index_from_static().unwrap_err(),
            BindError::MissingStaticIndexBuffer(KIND)
        );
    }

    #[test]
    fn only_the_owner_writes_statics() {
        let (mut gfx, _probe) = Graphics::headless();
        let mut first = DrawableBase::new(&mut gfx, KIND);
        first
            .add_static_bind(Rc::new(PrimitiveTopology::new(Topology::TriangleList)))
            .unwrap();
        first
            .add_static_bind(Rc::new(PrimitiveTopology::new(Topology::LineList)))
            .unwrap();

        let mut second = DrawableBase::new(&mut gfx, KIND);
        let err = second
            .add_static_bind(Rc::new(PrimitiveTopology::new(Topology::PointList)))
            .unwrap_err();
        assert_eq!(err, BindError::StaticAlreadyInitialized(KIND));
        assert_eq!(gfx.statics().bind_count(KIND), 2);
    }

    #[test]
    fn failed_initialization_can_be_retried() {
        let (mut gfx, probe) = Graphics::headless();
        let mut first = DrawableBase::new(&mut gfx, KIND);
        let result = first.initialize_static(&mut gfx, |gfx, base| {
            base.add_static_bind(Rc::new(PrimitiveTopology::new(Topology::TriangleList)))?;
            probe.fail_next_creation();
            base.add_static_index_buffer(IndexBuffer::new(gfx, &[0, 1, 2])?)?;
            Ok(())
        });
        assert!(result.is_err());
        assert!(!gfx.statics().is_initialized(KIND));

        let mut second = DrawableBase::new(&mut gfx, KIND);
        let initialized = second
            .initialize_static(&mut gfx, |gfx, base| {
                base.add_static_index_buffer(IndexBuffer::new(gfx, &[0, 1, 2])?)?;
                Ok(())
            })
            .unwrap();
        assert!(initialized);
        assert_eq!(second.index_count(), Some(3));
    }

    #[test]
    fn query_finds_first_instance_bind_of_kind() {
        let (mut gfx, _probe) = Graphics::headless();
        let mut base = DrawableBase::new(&mut gfx, KIND);
        base.add_bind(Rc::new(TransformCbuf::new(&mut gfx).unwrap()))
            .unwrap();
        assert!(base.query_bindable(BindableKind::TransformBuffer).is_some());
        assert!(base.query_bindable(BindableKind::PixelConstantBuffer).is_none());
        assert_eq!(base.instance_binds().len(), 1);
    }
}
