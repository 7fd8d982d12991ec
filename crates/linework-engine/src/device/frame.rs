use winit::dpi::PhysicalSize;

/// The renderable target for one frame.
///
/// Holding a drawable blocks acquisition of the next one, so it must be
/// presented (or dropped) before the frame callback returns.
pub struct Drawable {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}

impl Drawable {
    /// Size of the backing texture in physical pixels.
    ///
    /// This is the size a viewport must cover; it differs from the window's
    /// logical size by the display scale factor.
    pub fn pixel_size(&self) -> PhysicalSize<u32> {
        let size = self.surface_texture.texture.size();
        PhysicalSize::new(size.width, size.height)
    }

    /// Queues the drawable for presentation.
    ///
    /// Must be called after the commands targeting it have been submitted.
    pub fn present(self) {
        let Drawable { surface_texture, view } = self;
        drop(view);
        surface_texture.present();
    }
}
