use std::cell::Cell;
use std::sync::Arc;

use winit::window::Window;

use crate::time::RefreshHost;
use crate::viewport::{Viewport, ViewportSource};

/// Refresh host backed by `Window::request_redraw`.
///
/// winit cannot withdraw a redraw request, so cancellation only clears the
/// pending flag; a stopped `FrameClock` ignores the stray redraw.
pub struct WindowHost {
    window: Arc<Window>,
    pending: Cell<bool>,
}

impl WindowHost {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            pending: Cell::new(false),
        }
    }

    /// Marks the outstanding request as delivered.
    pub(crate) fn delivered(&self) -> bool {
        self.pending.replace(false)
    }
}

impl RefreshHost for WindowHost {
    fn request_refresh(&self) {
        if !self.pending.replace(true) {
            self.window.request_redraw();
        }
    }

    fn cancel_refresh(&self) {
        self.pending.set(false);
    }
}

impl ViewportSource for Window {
    fn viewport(&self) -> Viewport {
        let size = self.inner_size();
        Viewport::from_extent(size.width, size.height)
    }
}
