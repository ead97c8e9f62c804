//! Viewport handling: size, camera projection, and resize propagation.
//!
//! The viewport manager is decoupled from the frame loop; the host calls
//! `ViewportManager::on_resize` whenever its window changes size, and the draw
//! step reads the camera it maintains.

mod camera;
mod manager;
mod size;

pub use camera::PerspectiveCamera;
pub use manager::{ViewportManager, ViewportSource};
pub use size::Viewport;
