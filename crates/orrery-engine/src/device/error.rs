use anyhow::Result;
use wgpu::SurfaceError;

use crate::error::LoopError;

/// What the frame loop does after the surface refused a frame.
///
/// Produced by `Gpu::handle_surface_error`. Only `Fatal` escapes the tick;
/// the other two cost one frame at most.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Lost/outdated surface was configured again; the next tick draws.
    Reconfigured,
    /// Timeout or driver hiccup; this tick presents nothing.
    SkipFrame,
    /// Out of memory. Ends the loop as `LoopError::EnvironmentUnavailable`.
    Fatal,
}

impl SurfaceErrorAction {
    /// Outcome of the tick that hit `err`.
    pub fn frame_result(self, err: &SurfaceError) -> Result<()> {
        match self {
            SurfaceErrorAction::Fatal => {
                Err(LoopError::unavailable(format!("surface error: {err}")).into())
            }
            action => {
                log::debug!("frame skipped after surface error: {err} ({action:?})");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_surface_errors_end_the_loop() {
        let err = SurfaceErrorAction::Fatal
            .frame_result(&SurfaceError::OutOfMemory)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoopError>(),
            Some(LoopError::EnvironmentUnavailable(_))
        ));
    }

    #[test]
    fn recoverable_surface_errors_skip_one_frame() {
        assert!(SurfaceErrorAction::Reconfigured
            .frame_result(&SurfaceError::Outdated)
            .is_ok());
        assert!(SurfaceErrorAction::SkipFrame
            .frame_result(&SurfaceError::Timeout)
            .is_ok());
    }
}
