use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, InitCtx};
use crate::device::{Gpu, GpuInit};
use crate::time::{FrameClock, FrameTimer};

use super::host::WindowHost;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "orrery".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

impl RuntimeConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.initial_size = LogicalSize::new(width, height);
        self
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and runs the event loop until the app exits.
    ///
    /// A failure raised by the app (init, resize or a frame tick) stops the
    /// loop and is returned here.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Per-window platform objects. The app holds its own clones of the clock
/// and window; these are the runtime's handles.
struct Session {
    window: Arc<Window>,
    host: Rc<WindowHost>,
    clock: Rc<FrameClock>,
    timer: FrameTimer,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    session: Option<Session>,
    failure: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            session: None,
            failure: None,
        }
    }

    fn start_session(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let gpu = pollster::block_on(Gpu::new(Arc::clone(&window), self.gpu_init.clone()))
            .context("GPU initialization failed")?;

        let host = Rc::new(WindowHost::new(Arc::clone(&window)));
        let clock = Rc::new(FrameClock::new(host.clone()));

        self.session = Some(Session {
            window: Arc::clone(&window),
            host,
            clock: Rc::clone(&clock),
            timer: FrameTimer::new(),
        });

        self.app
            .init(InitCtx {
                window: Arc::clone(&window),
                gpu,
                clock,
            })
            .context("app init failed")?;

        self.app
            .resize(window.as_ref())
            .context("initial resize failed")
    }

    fn end_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.clock.stop();
            self.app.dispose();
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.end_session();
        self.failure.get_or_insert(err);
        event_loop.exit();
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() || self.failure.is_some() {
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        if let Err(e) = self.start_session(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.window.id() != window_id {
            return;
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.end_session();
            event_loop.exit();
            return;
        }

        let result = match &event {
            WindowEvent::CloseRequested => {
                self.end_session();
                event_loop.exit();
                return;
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                let window = Arc::clone(&session.window);
                self.app.resize(window.as_ref())
            }

            // A long occlusion would otherwise show up as one huge dt.
            WindowEvent::Occluded(false) => {
                if let Some(session) = self.session.as_mut() {
                    session.timer.reset();
                }
                Ok(())
            }

            WindowEvent::RedrawRequested => {
                let Some(session) = self.session.as_mut() else {
                    return;
                };
                session.host.delivered();
                let time = session.timer.tick();
                session
                    .clock
                    .tick(time)
                    .map(|ticked| {
                        if !ticked {
                            log::trace!("redraw without a registered tick");
                        }
                    })
                    .context("frame tick failed")
            }

            _ => Ok(()),
        };

        if let Err(e) = result {
            self.fail(event_loop, e);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.end_session();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builders_override_defaults() {
        let config = RuntimeConfig::default()
            .with_title("knot")
            .with_size(800.0, 600.0);
        assert_eq!(config.title, "knot");
        assert_eq!(config.initial_size, LogicalSize::new(800.0, 600.0));
    }

    #[test]
    fn default_config_opens_a_landscape_window() {
        let config = RuntimeConfig::default();
        assert!(config.initial_size.width > config.initial_size.height);
    }
}
