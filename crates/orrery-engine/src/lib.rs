//! Orrery engine crate.
//!
//! Frame scheduling, loop coordination, viewport tracking and the wgpu
//! scene renderer used by the demo. Everything runs on the thread that owns
//! the window.

pub mod core;
pub mod device;
pub mod driver;
pub mod logging;
pub mod render;
pub mod scene;
pub mod time;
pub mod viewport;
pub mod window;

mod error;

pub use error::LoopError;
