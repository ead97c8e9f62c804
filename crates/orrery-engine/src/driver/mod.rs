//! Loop coordination.
//!
//! `LoopCoordinator` decides, per tick, whether an external timeline is advanced
//! before the scene cycle (driven mode) or the scene cycle runs alone
//! (standalone mode). It only ever talks to the `FrameClock` through
//! `start`/`stop`, so the clock stays the single authority over ticks.

mod coordinator;

pub use coordinator::{LoopCoordinator, LoopMode, SceneCycle, TimelineDriver};
