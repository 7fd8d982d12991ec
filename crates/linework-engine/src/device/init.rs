/// Initialization parameters for the GPU layer.
///
/// One `GpuInit` is cloned into every window; each window builds its own
/// device from it.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Surface format to use when the surface supports it.
    ///
    /// Line pipelines are compiled against the surface format, so this also
    /// fixes the pipeline's color target.
    pub preferred_format: Option<wgpu::TextureFormat>,

    /// Fall back to an sRGB format when `preferred_format` is unavailable.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    ///
    /// Frame recording assumes a single frame in flight, so the default is 1.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            preferred_format: Some(wgpu::TextureFormat::Bgra8Unorm),
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 1,
        }
    }
}
