//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, wires them to the GPU layer and
//! turns redraw requests into `FrameClock` ticks.

mod host;
mod runtime;

pub use host::WindowHost;
pub use runtime::{Runtime, RuntimeConfig};
