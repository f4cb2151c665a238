#![forbid(unsafe_code)]

//! Host-driven time and single-handle timers.
//!
//! Nothing in the engine reads the wall clock on its own. The host owns one
//! platform timer, asks each component for [`next_deadline`] and calls
//! `poll(now_ms)` when it fires. Host harnesses and tests keep time with a
//! [`DeterministicClock`].
//!
//! [`next_deadline`]: TimerSlot::deadline

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now_ms: u64,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self { now_ms: 0 }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
    }

    /// Advance monotonic time by `dt_ms`.
    pub fn advance(&mut self, dt_ms: u64) {
        self.now_ms = self.now_ms.saturating_add(dt_ms);
    }

    /// Current monotonic time in milliseconds.
    #[inline]
    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

/// A cancellable timer with at most one pending deadline.
///
/// Arming replaces any pending deadline. Clearing is idempotent. An expired
/// deadline is reported by [`take_expired`](Self::take_expired) exactly once.
#[derive(Debug, Clone, Default)]
pub struct TimerSlot {
    deadline_ms: Option<u64>,
}

impl TimerSlot {
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline_ms: None }
    }

    /// Arm the slot to fire at `now_ms + delay_ms`.
    pub fn arm(&mut self, now_ms: u64, delay_ms: u64) {
        self.deadline_ms = Some(now_ms.saturating_add(delay_ms));
    }

    /// Drop any pending deadline.
    pub fn clear(&mut self) {
        self.deadline_ms = None;
    }

    /// Whether a deadline is pending.
    #[inline]
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// Pending deadline, if any.
    #[inline]
    #[must_use]
    pub const fn deadline(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// Disarm and return the expired deadline if it has been reached.
    pub fn take_expired(&mut self, now_ms: u64) -> Option<u64> {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                Some(deadline)
            }
            _ => None,
        }
    }
}
