use anyhow::{Context, Result};
use ouroboros::self_referencing;
use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::time::{frame_interval, FrameClock, FramePacer, FrameTime, RedrawMode};

/// Per-window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Stable name handed back to the app in `WindowCtx::name`.
    pub name: String,
    pub redraw_mode: RedrawMode,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "linework".to_string(),
            initial_size: LogicalSize::new(300.0, 300.0),
            name: "main".to_string(),
            redraw_mode: RedrawMode::Continuous,
            resizable: true,
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    pub fn create_window(&mut self, config: RuntimeConfig) {
        self.commands.push(Command::CreateWindow(config));
    }

    /// Switches a window between continuous and on-demand redraw.
    pub fn set_redraw_mode(&mut self, id: WindowId, mode: RedrawMode) {
        self.commands.push(Command::SetRedrawMode(id, mode));
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }
}

#[derive(Debug)]
enum Command {
    CreateWindow(RuntimeConfig),
    SetRedrawMode(WindowId, RedrawMode),
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens every window in `initial` and runs the event loop until the last
    /// window closes or the app requests exit.
    pub fn run<A>(initial: Vec<RuntimeConfig>, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(initial, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    name: String,
    clock: FrameClock,
    pacer: FramePacer,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Option<Gpu<'this>>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    initial: Vec<RuntimeConfig>,
    gpu_init: GpuInit,
    app: A,

    windows: HashMap<WindowId, WindowEntry>,
    started: bool,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(initial: Vec<RuntimeConfig>, gpu_init: GpuInit, app: A) -> Self {
        Self {
            initial,
            gpu_init,
            app,
            windows: HashMap::new(),
            started: false,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    /// Creates the window and its GPU, then notifies the app. Commands issued
    /// by the app during the notification are appended to `follow_up`.
    fn create_window_entry(
        &mut self,
        event_loop: &ActiveEventLoop,
        config: RuntimeConfig,
        follow_up: &mut RuntimeCtx,
    ) -> Result<WindowId> {
        let attrs = Window::default_attributes()
            .with_title(config.title.as_str())
            .with_inner_size(config.initial_size)
            .with_resizable(config.resizable);

        let window = event_loop
            .create_window(attrs)
            .with_context(|| format!("failed to create window '{}'", config.name))?;

        let id = window.id();
        let gpu_init = self.gpu_init.clone();
        let name = config.name.clone();

        let entry = WindowEntryBuilder {
            name: config.name,
            clock: FrameClock::default(),
            pacer: FramePacer::new(config.redraw_mode),
            window,
            gpu_builder: |w| match pollster::block_on(Gpu::new(w, gpu_init)) {
                Ok(gpu) => Some(gpu),
                Err(e) => {
                    log::error!("window '{name}': GPU initialization failed: {e:#}");
                    None
                }
            },
        }
        .build();

        log::info!(
            "window '{name}' created ({:?}, gpu: {})",
            config.redraw_mode,
            entry.with_gpu(|gpu| gpu.is_some())
        );

        let (app, windows) = (&mut self.app, &mut self.windows);
        let entry = windows.entry(id).or_insert(entry);
        entry.with(|fields| {
            let window = WindowCtx {
                id,
                window: fields.window,
                name: fields.name,
            };
            app.on_window_created(&window, fields.gpu.as_ref(), follow_up);
        });

        Ok(id)
    }

    fn destroy_window_entry(&mut self, id: WindowId) {
        if self.windows.remove(&id).is_some() {
            self.app.on_window_closed(id);
        }
    }

    fn set_redraw_mode(&mut self, id: WindowId, mode: RedrawMode) {
        let Some(entry) = self.windows.get_mut(&id) else {
            log::debug!("ignoring redraw mode for unknown window {id:?}");
            return;
        };

        entry.with_mut(|fields| {
            if fields.pacer.mode() != mode {
                log::debug!("window '{}': redraw mode {mode:?}", fields.name);
            }
            // Frames resume after a pause; keep the pause out of the next dt.
            if mode == RedrawMode::Continuous && fields.pacer.mode() == RedrawMode::OnDemand {
                fields.clock.reset();
            }
            fields.pacer.set_mode(mode);
        });
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, ctx: RuntimeCtx) {
        let mut pending: VecDeque<Command> = ctx.commands.into();

        while let Some(cmd) = pending.pop_front() {
            match cmd {
                Command::CreateWindow(cfg) => {
                    let mut follow_up = RuntimeCtx::default();
                    if let Err(e) = self.create_window_entry(event_loop, cfg, &mut follow_up) {
                        log::error!("{e:#}");
                        self.request_exit();
                    }
                    pending.extend(follow_up.commands);
                }
                Command::SetRedrawMode(id, mode) => self.set_redraw_mode(id, mode),
                Command::Exit => self.request_exit(),
            }
        }

        if self.started && self.windows.is_empty() {
            self.request_exit();
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }

    fn resize(&mut self, id: WindowId, size: Option<winit::dpi::PhysicalSize<u32>>) {
        let Some(entry) = self.windows.get_mut(&id) else {
            return;
        };

        entry.with_mut(|fields| {
            let size = size.unwrap_or_else(|| fields.window.inner_size());
            log::debug!("window '{}': drawable size now {}x{}", fields.name, size.width, size.height);
            if let Some(gpu) = fields.gpu.as_mut() {
                gpu.resize(size);
            }
            fields.pacer.invalidate();
        });
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop, id: WindowId) {
        let mut runtime_ctx = RuntimeCtx::default();
        let mut app_control = AppControl::Continue;

        let (app, windows) = (&mut self.app, &mut self.windows);
        if let Some(entry) = windows.get_mut(&id) {
            entry.with_mut(|fields| {
                let time: FrameTime = fields.clock.tick();

                let mut ctx = FrameCtx {
                    window: WindowCtx {
                        id,
                        window: fields.window,
                        name: fields.name,
                    },
                    gpu: fields.gpu.as_mut(),
                    time,
                    runtime: &mut runtime_ctx,
                    presented: false,
                };

                app_control = app.on_frame(&mut ctx);

                if !ctx.presented {
                    let refresh = fields
                        .window
                        .current_monitor()
                        .and_then(|m| m.refresh_rate_millihertz());
                    fields.pacer.throttle(Instant::now() + frame_interval(refresh));
                }
            });
        }

        if app_control == AppControl::Exit {
            runtime_ctx.exit();
        }

        self.apply_commands(event_loop, runtime_ctx);
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        let mut ctx = RuntimeCtx::default();
        for config in std::mem::take(&mut self.initial) {
            ctx.create_window(config);
        }
        self.apply_commands(event_loop, ctx);

        if self.windows.is_empty() {
            log::error!("no window could be created");
            self.request_exit();
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let now = Instant::now();
        let mut wake_at: Option<Instant> = None;

        for entry in self.windows.values_mut() {
            entry.with_mut(|fields| {
                if fields.pacer.poll_at(now) {
                    fields.window.request_redraw();
                }
                if let Some(deadline) = fields.pacer.deadline() {
                    wake_at = Some(wake_at.map_or(deadline, |w| w.min(deadline)));
                }
            });
        }

        event_loop.set_control_flow(match wake_at {
            Some(deadline) => ControlFlow::WaitUntil(deadline),
            None => ControlFlow::Wait,
        });
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, windows) = (&mut self.app, &mut self.windows);

        let Some(entry) = windows.get_mut(&window_id) else {
            return;
        };

        let mut runtime_ctx = RuntimeCtx::default();
        let mut app_control = AppControl::Continue;

        entry.with(|fields| {
            let window = WindowCtx {
                id: window_id,
                window: fields.window,
                name: fields.name,
            };
            app_control = app.on_window_event(&window, &event, &mut runtime_ctx);
        });

        if app_control == AppControl::Exit {
            runtime_ctx.exit();
        }
        self.apply_commands(event_loop, runtime_ctx);
        if self.exit_requested {
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.destroy_window_entry(window_id);
                if self.windows.is_empty() {
                    self.request_exit();
                    event_loop.exit();
                }
            }

            WindowEvent::Resized(new_size) => self.resize(window_id, Some(*new_size)),

            WindowEvent::ScaleFactorChanged { .. } => self.resize(window_id, None),

            WindowEvent::RedrawRequested => self.redraw(event_loop, window_id),

            _ => {}
        }
    }
}
