use std::fmt;

use crate::coords::Viewport;

use super::backend::{BackendError, DrawCall, LineBackend, PassDesc};
use super::binding::{BindingError, BufferRole};
use super::context::{DegradedReason, LineResources};
use super::vertex::AngleUniform;

/// Why a frame produced no submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoDrawable,
    NoPassDescription,
    /// The drawable has no pixels to cover (minimized or collapsed view).
    EmptyDrawable,
    Degraded(DegradedReason),
    /// The render-pass encoder could not be created.
    Encoder(BackendError),
    /// A buffer could not be placed in the binding table.
    ///
    /// Tables built by `GpuContext` always have one slot per buffer the
    /// variant binds, so this only fires on a mismatched table.
    Binding(BindingError),
}

impl SkipReason {
    /// Whether the frame got far enough that animation state should advance.
    pub fn reached_encoding(&self) -> bool {
        matches!(self, SkipReason::Binding(_))
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoDrawable => f.write_str("failed to obtain a drawable from the surface"),
            SkipReason::NoPassDescription => {
                f.write_str("failed to obtain a render pass description from the surface")
            }
            SkipReason::EmptyDrawable => f.write_str("drawable has zero area"),
            SkipReason::Degraded(reason) => write!(f, "context unusable: {reason}"),
            SkipReason::Encoder(e) => write!(f, "failed to create render encoder: {e}"),
            SkipReason::Binding(e) => write!(f, "failed to bind buffers: {e}"),
        }
    }
}

/// Result of one frame request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    Skipped(SkipReason),
}

impl FrameOutcome {
    pub fn is_presented(&self) -> bool {
        matches!(self, FrameOutcome::Presented)
    }

    /// Whether the attempt passed the point where animation should advance.
    pub fn reached_encoding(&self) -> bool {
        match self {
            FrameOutcome::Presented => true,
            FrameOutcome::Skipped(reason) => reason.reached_encoding(),
        }
    }
}

/// Records, submits and presents one line frame.
///
/// `angle` is the rotation to upload; it is ignored by contexts without an
/// angle buffer. Nothing is submitted unless every step succeeds.
pub fn render_frame<B: LineBackend>(
    resources: &mut LineResources<B>,
    drawable: B::Drawable,
    pass: &PassDesc,
    angle: Option<f32>,
) -> FrameOutcome {
    let LineResources {
        backend,
        variant,
        line,
        payload,
        angle: angle_buffer,
        pipeline,
        table,
    } = resources;

    let viewport = Viewport::covering(backend.drawable_size(&drawable));
    if !viewport.is_valid() {
        return FrameOutcome::Skipped(SkipReason::EmptyDrawable);
    }

    let mut encoder = backend.begin_commands();

    let mut rpass = match backend.begin_pass(&mut encoder, &drawable, pass) {
        Ok(p) => p,
        Err(e) => return FrameOutcome::Skipped(SkipReason::Encoder(e)),
    };

    if variant.uploads_payload_per_frame() {
        backend.write_buffer(payload, line.as_bytes());
    }

    if let Some(buffer) = angle_buffer.as_ref() {
        let uniform = AngleUniform::new(angle.unwrap_or(0.0));
        backend.write_buffer(buffer, bytemuck::bytes_of(&uniform));
    }

    table.clear();
    let bound = variant
        .slots()
        .iter()
        .try_for_each(|role| table.set(role.slot(), *role));
    if let Err(e) = bound {
        backend.end_pass(rpass);
        return FrameOutcome::Skipped(SkipReason::Binding(e));
    }

    backend.set_viewport(&mut rpass, viewport);

    let buffers: Vec<(u32, &B::Buffer)> = table
        .entries()
        .filter_map(|(slot, role)| {
            let buffer = match role {
                BufferRole::Payload => Some(&*payload),
                BufferRole::Angle => angle_buffer.as_ref(),
            };
            buffer.map(|b| (slot, b))
        })
        .collect();
    backend.bind(&mut rpass, pipeline, &buffers);

    backend.draw(&mut rpass, &DrawCall::LINE_SEGMENT);
    backend.end_pass(rpass);

    backend.submit_and_present(encoder, drawable);

    log::trace!(
        "{}: presented {}x{}",
        variant.name(),
        viewport.width,
        viewport.height
    );
    FrameOutcome::Presented
}
