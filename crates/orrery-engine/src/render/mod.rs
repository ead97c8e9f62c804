//! Rendering.
//!
//! The frame loop only needs two capabilities from a renderer: draw the scene
//! from a camera, and follow the output size. `GpuRenderer` provides both on
//! top of wgpu.

mod gpu_renderer;

use anyhow::Result;

use crate::scene::Scene;
use crate::viewport::PerspectiveCamera;

pub use gpu_renderer::GpuRenderer;

/// Resizable render target.
pub trait RenderOutput {
    /// Resizes the output to `width` x `height` physical pixels.
    ///
    /// A zero extent suspends presentation until the next non-zero size.
    fn set_output_size(&mut self, width: u32, height: u32) -> Result<()>;
}

/// Draws a scene as seen from a camera.
pub trait Renderer: RenderOutput {
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()>;
}
