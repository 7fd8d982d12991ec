use std::fmt;

use super::backend::{BackendError, LineBackend, PipelineDesc};
use super::binding::{BindingError, BindingTable, BufferRole};
use super::shader::{ShaderLibrary, ShaderLookupError};
use super::variant::LineVariant;
use super::vertex::LinePayload;

/// Why a context could not be made ready.
///
/// A degraded context renders nothing, ever; each draw attempt logs the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradedReason {
    /// No compatible GPU was available for this view.
    NoDevice,
    Buffer { role: BufferRole, error: BackendError },
    BindingTable(BindingError),
    Shader(ShaderLookupError),
    Pipeline(BackendError),
}

impl fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradedReason::NoDevice => f.write_str("no GPU device available"),
            DegradedReason::Buffer { role, error } => {
                write!(f, "failed to create {} buffer: {error}", role.label())
            }
            DegradedReason::BindingTable(e) => write!(f, "failed to create binding table: {e}"),
            DegradedReason::Shader(e) => write!(f, "failed to resolve shaders: {e}"),
            DegradedReason::Pipeline(e) => write!(f, "failed to create pipeline state: {e}"),
        }
    }
}

impl std::error::Error for DegradedReason {}

/// Long-lived GPU objects for one line view.
pub struct LineResources<B: LineBackend> {
    pub(crate) backend: B,
    pub(crate) variant: LineVariant,
    pub(crate) line: LinePayload,
    pub(crate) payload: B::Buffer,
    pub(crate) angle: Option<B::Buffer>,
    pub(crate) pipeline: B::Pipeline,
    pub(crate) table: BindingTable,
}

/// The GPU side of a line view: either every object exists, or none is used.
pub enum GpuContext<B: LineBackend> {
    Ready(LineResources<B>),
    Degraded(DegradedReason),
}

impl<B: LineBackend> GpuContext<B> {
    /// Builds all objects for `variant`. Never fails: any missing piece yields
    /// `Degraded`, which is logged here and again on every draw.
    pub fn new(backend: Option<B>, variant: LineVariant, library: &ShaderLibrary) -> Self {
        let Some(backend) = backend else {
            log::error!("{}: {}", variant.name(), DegradedReason::NoDevice);
            return GpuContext::Degraded(DegradedReason::NoDevice);
        };

        match build(backend, variant, library) {
            Ok(resources) => {
                log::debug!(
                    "{}: context ready ({} binding slots)",
                    variant.name(),
                    resources.table.capacity()
                );
                GpuContext::Ready(resources)
            }
            Err(reason) => {
                log::error!("{}: {reason}", variant.name());
                GpuContext::Degraded(reason)
            }
        }
    }

    pub fn degraded_reason(&self) -> Option<&DegradedReason> {
        match self {
            GpuContext::Ready(_) => None,
            GpuContext::Degraded(reason) => Some(reason),
        }
    }

}

fn build<B: LineBackend>(
    mut backend: B,
    variant: LineVariant,
    library: &ShaderLibrary,
) -> Result<LineResources<B>, DegradedReason> {
    let line = variant.line();
    let mut create = |role: BufferRole| {
        backend
            .create_buffer(role.label(), role.size())
            .map_err(|error| DegradedReason::Buffer { role, error })
    };

    let payload = create(BufferRole::Payload)?;
    let angle = match variant {
        LineVariant::Static => None,
        LineVariant::Animated => Some(create(BufferRole::Angle)?),
    };

    let table =
        BindingTable::with_capacity(variant.binding_count()).map_err(DegradedReason::BindingTable)?;

    let shaders = library
        .resolve(variant.vertex_entry(), variant.fragment_entry())
        .map_err(DegradedReason::Shader)?;

    let pipeline = backend
        .create_pipeline(&PipelineDesc {
            label: variant.name(),
            shaders,
            slots: variant.slots(),
            topology: wgpu::PrimitiveTopology::LineStrip,
        })
        .map_err(DegradedReason::Pipeline)?;

    if !variant.uploads_payload_per_frame() {
        backend.write_buffer(&payload, line.as_bytes());
    }

    Ok(LineResources {
        backend,
        variant,
        line,
        payload,
        angle,
        pipeline,
        table,
    })
}
