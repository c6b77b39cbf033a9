//! Counting wake primitive bridging the free list's contents
//!
//! One credit per idle buffer in the free list. `signal` is called once
//! per successful `push`, `consume` once per successful `try_pop`; `wait`
//! blocks until a credit is available without consuming it (consumption
//! happens only after a successful pop). The deactivation path also issues
//! a `signal` so blocked waiters observe `flushing` becoming true.
//!
//! Built on `parking_lot::{Mutex, Condvar}` rather than `std::sync`, for
//! the lower-overhead, non-poisoning lock and the combined
//! mutex/condvar-friendly API.

use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// A counting semaphore-like primitive: `signal` adds a credit and wakes
/// one waiter, `wait` blocks while credits are zero, `consume` removes a
/// credit.
#[derive(Default)]
pub struct Waker {
    credits: Mutex<u64>,
    condvar: Condvar,
}

impl Waker {
    /// Create a waker with zero credits.
    #[must_use]
    pub fn new() -> Self {
        Self {
            credits: Mutex::new(0),
            condvar: Condvar::new(),
        }
    }

    /// Add one credit and wake at most one waiter.
    pub fn signal(&self) {
        let mut credits = self.credits.lock();
        *credits += 1;
        self.condvar.notify_one();
    }

    /// Remove one credit. Call exactly once per successful `try_pop` on
    /// the free list to keep credits synchronized with its contents.
    ///
    /// # Panics
    ///
    /// Panics (debug builds only, via `debug_assert`) if called with zero
    /// credits outstanding — that would indicate a caller consumed without
    /// a matching successful pop.
    pub fn consume(&self) {
        let mut credits = self.credits.lock();
        debug_assert!(*credits > 0, "consume() called with no outstanding credit");
        *credits = credits.saturating_sub(1);
    }

    /// Block until credits are positive, or `timeout` elapses. Does not
    /// consume a credit. Returns `true` if a credit was observed, `false`
    /// on timeout.
    ///
    /// `timeout = None` waits indefinitely.
    pub fn wait(&self, timeout: Option<Duration>) -> bool {
        let mut credits = self.credits.lock();
        if *credits > 0 {
            return true;
        }
        match timeout {
            None => {
                self.condvar.wait(&mut credits);
                true
            }
            Some(duration) => {
                let result = self.condvar.wait_for(&mut credits, duration);
                !result.timed_out() || *credits > 0
            }
        }
    }

    /// Current credit count, for tests and diagnostics.
    #[must_use]
    pub fn credits(&self) -> u64 {
        *self.credits.lock()
    }
}
