//! Two-vertex line rendering.
//!
//! A [`LineView`] pairs a [`GpuContext`] (device-side objects built once per
//! view) with optional [`AnimationState`]. Each frame request runs the fixed
//! sequence in [`render_frame`]: record one pass, write the uniforms, bind
//! slot 0 (payload) and slot 1 (angle), set a viewport covering the drawable's
//! pixels, draw a 2-vertex line strip, submit, present.
//!
//! GPU access goes through [`LineBackend`]; [`WgpuBackend`] is the production
//! implementation.

mod animation;
mod backend;
mod binding;
mod context;
mod frame;
mod shader;
mod variant;
mod vertex;
mod view;
mod wgpu_backend;

#[cfg(test)]
pub(crate) mod mock;

pub use animation::{AnimationConfig, AnimationMode, AnimationState};
pub use backend::{BackendError, DrawCall, LineBackend, PassDesc, PipelineDesc};
pub use binding::{BindingError, BindingTable, BufferRole, MAX_BINDING_SLOTS};
pub use context::{DegradedReason, GpuContext, LineResources};
pub use frame::{render_frame, FrameOutcome, SkipReason};
pub use shader::{ShaderLibrary, ShaderLookupError, ShaderModuleSource, ShaderPair, ShaderStage};
pub use variant::LineVariant;
pub use vertex::{AngleUniform, LinePayload, LineVertex, ROTATING_LINE, STATIC_LINE};
pub use view::LineView;
pub use wgpu_backend::{WgpuBackend, WgpuPipeline};
