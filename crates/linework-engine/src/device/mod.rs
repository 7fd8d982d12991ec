//! GPU device + surface management.
//!
//! Each window owns one [`Gpu`]: its own wgpu Instance/Adapter/Device/Queue
//! and a configured Surface. Views never share devices.

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::Drawable;
pub use gpu::Gpu;
pub use init::GpuInit;
