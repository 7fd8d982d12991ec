use std::collections::HashMap;

use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::window::WindowId;

use linework_engine::core::{App, AppControl, FrameCtx, WindowCtx};
use linework_engine::device::Gpu;
use linework_engine::render::line::{
    AnimationConfig, AnimationState, LineBackend, LineView, PassDesc, ShaderLibrary, WgpuBackend,
};
use linework_engine::time::RedrawMode;
use linework_engine::window::{RuntimeConfig, RuntimeCtx};

use crate::controls::{ControlAction, SpeedControl};

pub const BASIC_VIEW: &str = "basic";
pub const ANIMATED_VIEW: &str = "animated";

const BASIC_TITLE: &str = "Basic";
const ANIMATED_TITLE: &str = "With Animation + Control";

/// The two demo windows: a static line drawn on demand, and the rotating line
/// drawn continuously.
pub fn window_configs() -> Vec<RuntimeConfig> {
    vec![
        RuntimeConfig {
            title: BASIC_TITLE.to_string(),
            initial_size: LogicalSize::new(300.0, 300.0),
            name: BASIC_VIEW.to_string(),
            redraw_mode: RedrawMode::OnDemand,
            resizable: true,
        },
        RuntimeConfig {
            title: ANIMATED_TITLE.to_string(),
            initial_size: LogicalSize::new(300.0, 300.0),
            name: ANIMATED_VIEW.to_string(),
            redraw_mode: RedrawMode::Continuous,
            resizable: true,
        },
    ]
}

pub struct LineViewerApp {
    library: ShaderLibrary,
    pass: PassDesc,
    speed: SpeedControl,
    views: HashMap<WindowId, LineView<WgpuBackend>>,
}

impl LineViewerApp {
    pub fn new() -> Self {
        Self {
            library: ShaderLibrary::default_library(),
            pass: PassDesc::default(),
            speed: SpeedControl::new().value(AnimationConfig::default().speed),
            views: HashMap::new(),
        }
    }
}

impl App for LineViewerApp {
    fn on_window_created(
        &mut self,
        window: &WindowCtx<'_>,
        gpu: Option<&Gpu<'_>>,
        runtime: &mut RuntimeCtx,
    ) {
        if let Some(gpu) = gpu {
            let info = gpu.adapter_info();
            log::info!("{}: using {} ({:?})", window.name, info.name, info.backend);
        }

        let backend = gpu.map(WgpuBackend::for_gpu);
        let view = match window.name {
            ANIMATED_VIEW => LineView::new_animated(
                backend,
                &self.library,
                AnimationConfig {
                    speed: self.speed.get(),
                    ..AnimationConfig::default()
                },
            ),
            _ => LineView::new_static(backend, &self.library),
        };

        if let Some(reason) = view.context().degraded_reason() {
            log::warn!("{}: line view will draw nothing: {reason}", window.name);
        }

        if let Some(animation) = view.animation() {
            runtime.set_redraw_mode(window.id, animation.mode().redraw_mode());
            window.set_title(&animated_title(animation));
        }

        self.views.insert(window.id, view);
    }

    fn on_window_event(
        &mut self,
        window: &WindowCtx<'_>,
        event: &WindowEvent,
        runtime: &mut RuntimeCtx,
    ) -> AppControl {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return AppControl::Continue;
        };
        if event.state != ElementState::Pressed {
            return AppControl::Continue;
        }
        let Some(action) = ControlAction::from_key(event.physical_key) else {
            return AppControl::Continue;
        };
        if action == ControlAction::Exit {
            return AppControl::Exit;
        }
        // Holding space would flip the state on every repeat.
        if action == ControlAction::ToggleAnimation && event.repeat {
            return AppControl::Continue;
        }

        let Some(view) = self.views.get_mut(&window.id) else {
            return AppControl::Continue;
        };
        let effect = apply_control(view, &mut self.speed, action);

        if let Some(mode) = effect.redraw_mode {
            runtime.set_redraw_mode(window.id, mode);
        }
        if effect.changed {
            if let Some(animation) = view.animation() {
                window.set_title(&animated_title(animation));
            }
        }

        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(view) = self.views.get_mut(&ctx.window.id) else {
            return AppControl::Continue;
        };

        let drawable = ctx.acquire_drawable();
        let outcome = view.draw(drawable, Some(&self.pass));
        if !outcome.is_presented() {
            return AppControl::Continue;
        }
        ctx.mark_presented();

        if ctx.time.frame_index % 600 == 0 {
            log::debug!(
                "{}: frame {} at {:.1} fps",
                ctx.window.name,
                ctx.time.frame_index,
                ctx.time.fps
            );
        }

        AppControl::Continue
    }

    fn on_window_closed(&mut self, window_id: WindowId) {
        self.views.remove(&window_id);
    }
}

/// What a control did to a view.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct ControlEffect {
    /// New redraw mode when the animation was toggled.
    redraw_mode: Option<RedrawMode>,
    changed: bool,
}

/// Applies a control to `view`. Views without animation ignore every control.
///
/// A speed change while paused is stored but does not request a frame; the
/// next running frame picks it up.
fn apply_control<B: LineBackend>(
    view: &mut LineView<B>,
    speed: &mut SpeedControl,
    action: ControlAction,
) -> ControlEffect {
    let Some(animation) = view.animation_mut() else {
        return ControlEffect::default();
    };

    match action {
        ControlAction::ToggleAnimation => {
            let mode = animation.set_animating(!animation.is_animating());
            if let Some(mode) = mode {
                log::info!("animation {mode:?}");
            }
            ControlEffect {
                redraw_mode: mode.map(|m| m.redraw_mode()),
                changed: mode.is_some(),
            }
        }
        ControlAction::SpeedUp | ControlAction::SpeedDown => {
            let changed = if action == ControlAction::SpeedUp {
                speed.increase()
            } else {
                speed.decrease()
            };
            if changed {
                animation.set_speed(speed.get());
                log::info!("animation speed {:.1}", speed.get());
            }
            ControlEffect {
                redraw_mode: None,
                changed,
            }
        }
        ControlAction::Exit => ControlEffect::default(),
    }
}

fn animated_title(animation: &AnimationState) -> String {
    let state = if animation.is_animating() { "running" } else { "paused" };
    format!("{ANIMATED_TITLE} · speed {:.1} · {state}", animation.speed())
}
