use std::fmt;

/// Failures raised by the frame loop itself.
///
/// Errors from application callbacks (timeline `advance`, scene `update`/`draw`)
/// are not wrapped; they travel through `anyhow::Error` unchanged. `LoopError`
/// values also travel as `anyhow::Error` and can be recovered with
/// `downcast_ref::<LoopError>()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopError {
    /// The host offers no refresh primitive or rendering context.
    EnvironmentUnavailable(String),
    /// The frame clock was dropped while a coordinator still referred to it.
    ClockReleased,
    /// The timeline driver was dropped while still registered for ticks.
    DriverReleased,
    /// A tick was delivered while the previous one was still running.
    ReentrantTick,
}

impl LoopError {
    pub(crate) fn unavailable(what: impl Into<String>) -> Self {
        LoopError::EnvironmentUnavailable(what.into())
    }
}

impl fmt::Display for LoopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopError::EnvironmentUnavailable(what) => {
                write!(f, "environment unavailable: {what}")
            }
            LoopError::ClockReleased => f.write_str("frame clock has been released"),
            LoopError::DriverReleased => f.write_str("timeline driver has been released"),
            LoopError::ReentrantTick => f.write_str("tick delivered while another tick is running"),
        }
    }
}

impl std::error::Error for LoopError {}
