use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

/// Picks the surface format: the preferred one if supported, then an sRGB
/// format if requested, then whatever the surface lists first.
pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    preferred: Option<wgpu::TextureFormat>,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if formats.is_empty() {
        return None;
    }

    if let Some(p) = preferred.filter(|p| formats.contains(p)) {
        return Some(p);
    }

    if prefer_srgb {
        let srgb = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = srgb.into_iter().find(|f| formats.contains(f)) {
            return Some(f);
        }
    }

    Some(formats[0])
}

pub(crate) fn choose_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| supported.contains(m))
        .or_else(|| supported.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Whether a surface of `size` can be configured and drawn to.
pub(crate) fn is_renderable(size: PhysicalSize<u32>) -> bool {
    size.width > 0 && size.height > 0
}

/// wgpu cannot configure a 0x0 surface; in that case only `size` is updated
/// and configuration is deferred until the next non-zero resize.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) {
    *size = new_size;
    if !is_renderable(new_size) {
        return;
    }

    config.width = new_size.width;
    config.height = new_size.height;
    surface.configure(device, config);
}

pub(crate) fn classify_surface_error(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}
