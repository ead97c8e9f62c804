//! Torus knot demo: a grid floor and a knot inside an animated container.
//!
//! Keys: `P` standalone loop, `S` stop, `D` timeline-driven loop, `Esc` quit.

mod animation;
mod app_runner;
mod stage;

use orrery_engine::device::GpuInit;
use orrery_engine::logging::{init_logging, LoggingConfig};
use orrery_engine::render::GpuRenderer;
use orrery_engine::window::{Runtime, RuntimeConfig};

use app_runner::AppRunner;

fn main() {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig::default()
        .with_title("orrery: torus knot")
        .with_size(1280.0, 720.0);

    let result = AppRunner::<GpuRenderer>::new()
        .and_then(|app| Runtime::run(config, GpuInit::default(), app));

    if let Err(e) = result {
        log::error!("orrery runtime error: {e:#}");
        std::process::exit(1);
    }
}
