//! Time subsystem.
//!
//! - `FrameTimer` turns wall-clock time into `FrameTime` snapshots.
//! - `FrameClock` is the single per-frame tick source: it owns at most one
//!   registered callback and schedules itself on a `RefreshHost`.
//!
//! Hosts call `FrameClock::tick` once per refresh with a `FrameTime`
//! obtained from their `FrameTimer` (or their own time source).

mod frame_clock;
mod frame_timer;
mod host;

pub use frame_clock::{FrameClock, TickFn};
pub use frame_timer::{FrameTime, FrameTimer};
pub use host::{ManualHost, RefreshHost};
