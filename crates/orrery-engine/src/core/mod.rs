//! Core engine-facing contracts.
//!
//! Defines the interface between the runtime (platform loop) and the
//! application: lifecycle hooks and the context handed over at startup.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::InitCtx;
