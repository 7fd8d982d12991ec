use winit::window::{Window, WindowId};

use crate::device::{Drawable, Gpu, SurfaceErrorAction};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
    /// Name given in the window's `RuntimeConfig`.
    pub name: &'a str,
}

impl<'a> WindowCtx<'a> {
    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    /// `None` when the window has no usable GPU.
    pub gpu: Option<&'a mut Gpu<'w>>,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
    pub(crate) presented: bool,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Reports that this frame reached the screen.
    ///
    /// A continuous window whose frame is not marked presented waits one
    /// display refresh before its next redraw.
    pub fn mark_presented(&mut self) {
        self.presented = true;
    }

    /// Acquires this frame's drawable from the window surface.
    ///
    /// Returns `None` when there is no GPU, the window has zero area, or the
    /// surface reported an error. Lost/outdated surfaces are reconfigured for
    /// the next frame; an out-of-memory surface requests exit.
    pub fn acquire_drawable(&mut self) -> Option<Drawable> {
        let gpu = self.gpu.as_deref_mut()?;

        match gpu.acquire_drawable() {
            Ok(Some(drawable)) => {
                self.window.window.pre_present_notify();
                Some(drawable)
            }
            Ok(None) => None,
            Err(err) => {
                if gpu.handle_surface_error(err) == SurfaceErrorAction::Fatal {
                    log::error!("window '{}': fatal surface error, exiting", self.window.name);
                    self.runtime.exit();
                }
                None
            }
        }
    }
}
