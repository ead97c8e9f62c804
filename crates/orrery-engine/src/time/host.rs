use std::cell::Cell;

/// Host refresh primitive a `FrameClock` schedules itself on.
///
/// Implementations wrap whatever the platform offers for "call me on the next
/// display frame": a window redraw request, a vsync callback, a paced thread.
pub trait RefreshHost {
    /// Asks the host to deliver one more refresh.
    ///
    /// Requests do not accumulate; one pending request yields one tick.
    fn request_refresh(&self);

    /// Withdraws a pending refresh request, if the host supports it.
    fn cancel_refresh(&self) {}
}

/// Refresh host driven by hand.
///
/// Suitable for headless embedding and tests: the owner polls
/// [`take_pending`](Self::take_pending) and calls `FrameClock::tick` itself.
#[derive(Debug, Default)]
pub struct ManualHost {
    pending: Cell<bool>,
    requests: Cell<u64>,
    cancels: Cell<u64>,
}

impl ManualHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a refresh was requested, clearing the request.
    pub fn take_pending(&self) -> bool {
        self.pending.replace(false)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Total number of refresh requests received.
    pub fn requests(&self) -> u64 {
        self.requests.get()
    }

    /// Total number of cancellations received.
    pub fn cancels(&self) -> u64 {
        self.cancels.get()
    }
}

impl RefreshHost for ManualHost {
    fn request_refresh(&self) {
        self.pending.set(true);
        self.requests.set(self.requests.get() + 1);
    }

    fn cancel_refresh(&self) {
        self.pending.set(false);
        self.cancels.set(self.cancels.get() + 1);
    }
}
