//! Frame scheduling state machine
//!
//! The engine never calls a host scheduling primitive directly. It flags that
//! it wants another frame; the host polls `take_request`, queues one callback
//! with whatever primitive it has (requestAnimationFrame, a timer, a loop),
//! and gates the callback body on `begin_frame`. Cancelling guarantees that
//! an already-queued callback runs nothing.

/// Cancelable one-frame-at-a-time scheduler
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: bool,
    cancelled: bool,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for one more frame; ignored after cancellation
    pub fn request(&mut self) {
        if !self.cancelled {
            self.pending = true;
        }
    }

    /// Host poll: returns true exactly once per request
    pub fn take_request(&mut self) -> bool {
        let take = self.pending && !self.cancelled;
        self.pending = false;
        take
    }

    /// Gate for a queued callback body; false once cancelled
    pub fn begin_frame(&self) -> bool {
        !self.cancelled
    }

    /// Drop any pending request and refuse future frames. Idempotent.
    pub fn cancel(&mut self) {
        self.pending = false;
        self.cancelled = true;
    }

    /// Re-arm after a cancel (start/restart)
    pub fn resume(&mut self) {
        self.cancelled = false;
    }
}
