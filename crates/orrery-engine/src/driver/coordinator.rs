use std::cell::RefCell;
use std::rc::{Rc, Weak};

use anyhow::Result;

use crate::error::LoopError;
use crate::time::{FrameClock, FrameTime};

/// External timeline advanced once per tick in driven mode.
///
/// Implementations must treat `advance` as idempotent for a repeated timestamp
/// and must tolerate timestamps that never decrease. Neither is checked here.
pub trait TimelineDriver {
    fn advance(&mut self, timestamp: f64) -> Result<()>;
}

/// Application-side per-frame work: `update` then `draw`.
pub trait SceneCycle {
    /// Per-frame mutation hook. Does nothing unless overridden.
    fn update(&mut self, time: &FrameTime) -> Result<()> {
        let _ = time;
        Ok(())
    }

    /// Renders the current scene state.
    fn draw(&mut self) -> Result<()>;
}

/// Which callback the coordinator last registered with the clock.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopMode {
    Halted,
    Standalone,
    Driven,
}

/// Multiplexes a `FrameClock` between a standalone scene cycle and a
/// timeline-driven one.
///
/// The coordinator never owns the clock or the driver. Switching mode
/// re-registers with the clock, which replaces the previous callback.
pub struct LoopCoordinator {
    clock: Weak<FrameClock>,
    cycle: Rc<RefCell<dyn SceneCycle>>,
    mode: LoopMode,
    registration: Option<u64>,
}

impl LoopCoordinator {
    pub fn new<C>(clock: &Rc<FrameClock>, cycle: Rc<RefCell<C>>) -> Self
    where
        C: SceneCycle + 'static,
    {
        let cycle: Rc<RefCell<dyn SceneCycle>> = cycle;
        Self {
            clock: Rc::downgrade(clock),
            cycle,
            mode: LoopMode::Halted,
            registration: None,
        }
    }

    /// Current mode, as seen by the clock.
    ///
    /// Reports `Halted` when the clock was stopped or re-registered by
    /// someone else since this coordinator last started it.
    pub fn mode(&self) -> LoopMode {
        let Some(clock) = self.clock.upgrade() else {
            return LoopMode::Halted;
        };
        match self.registration {
            Some(generation) if clock.is_running() && clock.generation() == generation => {
                self.mode
            }
            _ => LoopMode::Halted,
        }
    }

    /// Ticks advance `driver` with the tick timestamp, then run the scene cycle.
    pub fn run_driven<D>(&mut self, driver: &Rc<RefCell<D>>) -> Result<(), LoopError>
    where
        D: TimelineDriver + 'static,
    {
        let driver = Rc::downgrade(driver);
        let cycle = Rc::clone(&self.cycle);

        self.register(
            LoopMode::Driven,
            Box::new(move |time| {
                let driver = driver.upgrade().ok_or(LoopError::DriverReleased)?;
                driver.borrow_mut().advance(time.timestamp)?;
                run_cycle(&cycle, &time)
            }),
        )
    }

    /// Ticks run the scene cycle only.
    pub fn run_standalone(&mut self) -> Result<(), LoopError> {
        let cycle = Rc::clone(&self.cycle);
        self.register(
            LoopMode::Standalone,
            Box::new(move |time| run_cycle(&cycle, &time)),
        )
    }

    /// Stops the clock. Calling it again is a no-op.
    pub fn halt(&mut self) {
        if let Some(clock) = self.clock.upgrade() {
            if clock.stop() {
                log::debug!("loop halted (was {:?})", self.mode);
            }
        }
        self.mode = LoopMode::Halted;
        self.registration = None;
    }

    /// Runs one `update` + `draw` pair outside of any tick.
    pub fn scene_cycle(&self, time: &FrameTime) -> Result<()> {
        run_cycle(&self.cycle, time)
    }

    fn register(
        &mut self,
        mode: LoopMode,
        callback: crate::time::TickFn,
    ) -> Result<(), LoopError> {
        let clock = self.clock.upgrade().ok_or(LoopError::ClockReleased)?;
        let previous = self.mode();
        let generation = clock.start(callback)?;

        log::debug!("loop mode {previous:?} -> {mode:?}");
        self.mode = mode;
        self.registration = Some(generation);
        Ok(())
    }
}

fn run_cycle(cycle: &Rc<RefCell<dyn SceneCycle>>, time: &FrameTime) -> Result<()> {
    let mut cycle = cycle.borrow_mut();
    cycle.update(time)?;
    cycle.draw()
}
