use anyhow::Result;

use crate::render::RenderOutput;

use super::camera::PerspectiveCamera;
use super::size::Viewport;

/// Output size used while the viewport cannot be rendered.
const SUSPENDED: (u32, u32) = (0, 0);

/// Anything that can report the current host viewport size.
pub trait ViewportSource {
    fn viewport(&self) -> Viewport;
}

impl ViewportSource for Viewport {
    fn viewport(&self) -> Viewport {
        *self
    }
}

/// Keeps the camera projection and the render output in step with the host viewport.
///
/// Invoke [`on_resize`](Self::on_resize) once at startup and on every host
/// resize notification. Sizes with a zero or non-finite side keep the previous
/// projection and suspend the output until a usable size arrives.
#[derive(Debug, Clone)]
pub struct ViewportManager {
    camera: PerspectiveCamera,
    output_size: Option<(u32, u32)>,
}

impl ViewportManager {
    pub fn new(camera: PerspectiveCamera) -> Self {
        Self {
            camera,
            output_size: None,
        }
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        &mut self.camera
    }

    /// Last size pushed to the render output.
    pub fn output_size(&self) -> Option<(u32, u32)> {
        self.output_size
    }

    /// Re-reads the viewport and applies it.
    ///
    /// An unrenderable viewport (zero or negative extent, e.g. a minimized
    /// window) keeps the camera as it was and suspends the output with a
    /// `0x0` size. Camera and output change together or not at all.
    ///
    /// Returns `true` when the camera or output changed.
    pub fn on_resize(
        &mut self,
        source: &dyn ViewportSource,
        output: &mut dyn RenderOutput,
    ) -> Result<bool> {
        let viewport = source.viewport();
        if !viewport.is_valid() {
            if self.output_size == Some(SUSPENDED) {
                return Ok(false);
            }
            output.set_output_size(SUSPENDED.0, SUSPENDED.1)?;
            self.output_size = Some(SUSPENDED);
            log::debug!(
                "viewport {}x{} is not renderable; output suspended",
                viewport.width,
                viewport.height
            );
            return Ok(true);
        }

        let extent = viewport.extent();
        let aspect = viewport.aspect_ratio();
        if self.output_size == Some(extent) && self.camera.aspect == aspect {
            return Ok(false);
        }

        output.set_output_size(extent.0, extent.1)?;
        self.camera.aspect = aspect;
        self.output_size = Some(extent);

        log::debug!("viewport resized to {}x{} (aspect {aspect:.4})", extent.0, extent.1);
        Ok(true)
    }
}
