use std::fmt;
use std::ops::Range;

use winit::dpi::PhysicalSize;

use crate::coords::{ColorRgba, Viewport};

use super::binding::BufferRole;
use super::shader::ShaderPair;

/// Failure reported by a backend while creating an object or opening a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for BackendError {}

/// Everything a backend needs to build a line pipeline.
#[derive(Debug, Clone, Copy)]
pub struct PipelineDesc<'a> {
    pub label: &'a str,
    pub shaders: ShaderPair<'a>,
    /// Buffers bound to the vertex stage, in slot order.
    pub slots: &'a [BufferRole],
    pub topology: wgpu::PrimitiveTopology,
}

/// Render-pass description supplied by the drawing surface each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassDesc {
    pub clear_color: ColorRgba,
}

impl Default for PassDesc {
    fn default() -> Self {
        Self {
            clear_color: ColorRgba::black(),
        }
    }
}

/// A non-indexed draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub topology: wgpu::PrimitiveTopology,
    pub vertices: Range<u32>,
}

impl DrawCall {
    /// Two vertices as a line strip: exactly one segment, start to end.
    pub const LINE_SEGMENT: DrawCall = DrawCall {
        topology: wgpu::PrimitiveTopology::LineStrip,
        vertices: 0..2,
    };
}

/// GPU operations the line renderer is written against.
///
/// Construction methods run once per view; the rest run in strict order once
/// per frame:
/// `begin_commands` → `begin_pass` → `write_buffer`* → `set_viewport` →
/// `bind` → `draw` → `end_pass` → `submit_and_present`.
///
/// A frame that fails before `submit_and_present` drops its encoder without
/// submitting anything.
pub trait LineBackend {
    type Buffer;
    type Pipeline;
    type Encoder;
    type Pass;
    type Drawable;

    /// Allocates a CPU-writable, GPU-readable buffer of `size` bytes.
    fn create_buffer(&mut self, label: &str, size: u64) -> Result<Self::Buffer, BackendError>;

    fn create_pipeline(&mut self, desc: &PipelineDesc<'_>) -> Result<Self::Pipeline, BackendError>;

    /// Pixel dimensions of the drawable's backing texture.
    fn drawable_size(&self, drawable: &Self::Drawable) -> PhysicalSize<u32>;

    /// Overwrites `buffer` from offset 0. Visible to the next submission.
    fn write_buffer(&mut self, buffer: &Self::Buffer, bytes: &[u8]);

    /// Reclaims recording memory from the previous frame and starts recording.
    fn begin_commands(&mut self) -> Self::Encoder;

    fn begin_pass(
        &mut self,
        encoder: &mut Self::Encoder,
        drawable: &Self::Drawable,
        pass: &PassDesc,
    ) -> Result<Self::Pass, BackendError>;

    fn set_viewport(&mut self, pass: &mut Self::Pass, viewport: Viewport);

    /// Binds the pipeline and the buffers at the given slots to the vertex stage.
    fn bind(
        &mut self,
        pass: &mut Self::Pass,
        pipeline: &Self::Pipeline,
        buffers: &[(u32, &Self::Buffer)],
    );

    fn draw(&mut self, pass: &mut Self::Pass, call: &DrawCall);

    fn end_pass(&mut self, pass: Self::Pass);

    /// Finalizes and submits the commands, then presents the drawable as soon
    /// as the GPU work targeting it completes.
    fn submit_and_present(&mut self, encoder: Self::Encoder, drawable: Self::Drawable);
}
