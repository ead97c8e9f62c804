use std::cell::RefCell;
use std::rc::Rc;

use crate::error::LoopError;

use super::frame_timer::FrameTime;
use super::host::RefreshHost;

/// Per-frame callback registered with a `FrameClock`.
pub type TickFn = Box<dyn FnMut(FrameTime) -> anyhow::Result<()>>;

/// Single source of per-frame ticks.
///
/// Invariants:
/// - at most one callback is registered at any time
/// - `start` while running replaces the callback; the old one never sees another tick
/// - timestamps handed to callbacks never decrease
/// - ticks never overlap; a tick delivered from inside a callback is rejected
///
/// The clock is shared as `Rc<FrameClock>`; all methods take `&self` so callbacks
/// may stop or restart the clock while they run.
pub struct FrameClock {
    host: Option<Rc<dyn RefreshHost>>,
    state: RefCell<ClockState>,
}

#[derive(Default)]
struct ClockState {
    running: bool,
    generation: u64,
    callback: Option<TickFn>,
    in_flight: bool,
    last_timestamp: Option<f64>,
}

impl FrameClock {
    /// Creates a clock scheduled on `host`.
    pub fn new(host: Rc<dyn RefreshHost>) -> Self {
        Self {
            host: Some(host),
            state: RefCell::new(ClockState::default()),
        }
    }

    /// Creates a clock with no refresh primitive. `start` always fails.
    pub fn detached() -> Self {
        Self {
            host: None,
            state: RefCell::new(ClockState::default()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    /// Registration counter; bumped on every successful `start`.
    pub fn generation(&self) -> u64 {
        self.state.borrow().generation
    }

    /// Registers `callback`, replacing any active one.
    ///
    /// Returns the registration generation.
    pub fn start(&self, callback: TickFn) -> Result<u64, LoopError> {
        let Some(host) = self.host.as_ref() else {
            return Err(LoopError::unavailable("frame clock has no refresh primitive"));
        };

        let mut state = self.state.borrow_mut();
        let was_running = state.running;
        state.running = true;
        state.generation = state.generation.wrapping_add(1);
        let generation = state.generation;
        let replaced = state.callback.replace(callback);
        drop(state);

        // Drop the old closure outside the borrow; its captures may touch the clock.
        drop(replaced);

        if was_running {
            log::debug!("frame clock: callback replaced (generation {generation})");
        } else {
            log::debug!("frame clock: started (generation {generation})");
            host.request_refresh();
        }

        Ok(generation)
    }

    /// Deregisters the active callback.
    ///
    /// Returns `false` when the clock was already stopped.
    pub fn stop(&self) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.running {
            return false;
        }
        state.running = false;
        let removed = state.callback.take();
        drop(state);
        drop(removed);

        if let Some(host) = self.host.as_ref() {
            host.cancel_refresh();
        }
        log::debug!("frame clock: stopped");
        true
    }

    /// Delivers one refresh to the registered callback.
    ///
    /// Returns `Ok(false)` when nothing is registered. Callback errors are returned
    /// unchanged; the registration survives them.
    pub fn tick(&self, time: FrameTime) -> anyhow::Result<bool> {
        let (mut callback, generation, time) = {
            let mut state = self.state.borrow_mut();
            if state.in_flight {
                return Err(LoopError::ReentrantTick.into());
            }
            if !state.running {
                return Ok(false);
            }
            let Some(callback) = state.callback.take() else {
                return Ok(false);
            };

            let timestamp = match state.last_timestamp {
                Some(last) if time.timestamp < last => last,
                _ => time.timestamp,
            };
            state.last_timestamp = Some(timestamp);
            state.in_flight = true;

            (callback, state.generation, FrameTime { timestamp, ..time })
        };

        let result = callback(time);

        let still_running = {
            let mut state = self.state.borrow_mut();
            state.in_flight = false;
            // Restarted or stopped from inside the callback: the taken closure is stale.
            if state.running && state.generation == generation {
                state.callback = Some(callback);
            }
            state.running
        };

        if still_running {
            if let Some(host) = self.host.as_ref() {
                host.request_refresh();
            }
        }

        result.map(|()| true)
    }
}
