use anyhow::Result;
use winit::event::WindowEvent;

use crate::viewport::ViewportSource;

use super::ctx::InitCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application lifecycle implemented by higher layers.
///
/// Frames are not pushed through this trait: the app registers its own tick
/// callbacks with the `FrameClock` it receives in [`init`](App::init).
pub trait App {
    /// Called once the window, GPU and frame clock exist.
    ///
    /// Typical work: build the scene, take ownership of the GPU, start the loop.
    fn init(&mut self, ctx: InitCtx) -> Result<()>;

    /// Called right after `init` and on every host resize.
    fn resize(&mut self, viewport: &dyn ViewportSource) -> Result<()>;

    /// Called for every window event before the runtime handles it.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once before the window goes away.
    fn dispose(&mut self) {}
}
