//! Window-bound wgpu context.
//!
//! [`Gpu`] owns the device, queue, configured surface and depth buffer of one
//! window. Frames are acquired as [`SwapFrame`]s and presented back through it.

mod frame;
mod gpu;
mod init;
mod surface;

pub use frame::SwapFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use surface::SurfaceRecovery;
