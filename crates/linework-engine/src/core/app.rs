use winit::event::WindowEvent;
use winit::window::WindowId;

use crate::device::Gpu;
use crate::window::RuntimeCtx;

use super::ctx::{FrameCtx, WindowCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called once per window, right after the window and its GPU are created.
    ///
    /// `gpu` is `None` when no compatible device could be acquired; the window
    /// stays open and the app decides how to degrade.
    fn on_window_created(
        &mut self,
        window: &WindowCtx<'_>,
        gpu: Option<&Gpu<'_>>,
        runtime: &mut RuntimeCtx,
    );

    /// Called for every window event before the runtime's own handling.
    fn on_window_event(
        &mut self,
        window: &WindowCtx<'_>,
        event: &WindowEvent,
        runtime: &mut RuntimeCtx,
    ) -> AppControl {
        let _ = (window, event, runtime);
        AppControl::Continue
    }

    /// Called once per redraw of a window.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called after a window is destroyed.
    fn on_window_closed(&mut self, window_id: WindowId) {
        let _ = window_id;
    }
}
