//! Multi-producer/multi-consumer queue of idle buffers
//!
//! Wraps `crossbeam_queue::SegQueue` (a lock-free MPMC queue) and keeps its
//! paired `Waker` credit count in lock-step: every successful `push` issues
//! exactly one `signal`, every successful `try_pop` issues exactly one
//! `consume`. A caller cannot observe the queue without going through these
//! two methods, so the credit count can never drift from the queue's
//! actual contents.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crossbeam_queue::SegQueue;

use crate::buffer::Buffer;
use crate::waker::Waker;

/// Idle-buffer queue with an associated wake primitive.
#[derive(Default)]
pub struct FreeList {
    queue: SegQueue<Buffer>,
    waker: Waker,
    len: AtomicUsize,
}

impl FreeList {
    /// Create an empty free list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: SegQueue::new(),
            waker: Waker::new(),
            len: AtomicUsize::new(0),
        }
    }

    /// Push an idle buffer and signal one credit. Never blocks.
    pub fn push(&self, buffer: Buffer) {
        self.queue.push(buffer);
        self.len.fetch_add(1, Ordering::AcqRel);
        self.waker.signal();
    }

    /// Try to pop an idle buffer, consuming its credit on success. Never
    /// blocks.
    pub fn try_pop(&self) -> Option<Buffer> {
        let buffer = self.queue.pop();
        if buffer.is_some() {
            self.len.fetch_sub(1, Ordering::AcqRel);
            self.waker.consume();
        }
        buffer
    }

    /// Block until a buffer is likely available (a credit exists) or
    /// `timeout` elapses. Does not itself pop — callers loop back to
    /// `try_pop`, since another thread may win the race for the credit.
    pub fn wait(&self, timeout: Option<Duration>) -> bool {
        self.waker.wait(timeout)
    }

    /// Issue a signal with no accompanying push, used by the deactivation
    /// path so blocked waiters wake up and re-check `flushing`.
    pub fn signal_flushing(&self) {
        self.waker.signal();
    }

    /// Current number of idle buffers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Whether the free list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain every idle buffer, calling `f` on each. Used by `flush_all`
    /// with the subclass's `free_buffer` hook.
    pub fn drain(&self, mut f: impl FnMut(Buffer)) {
        while let Some(buffer) = self.try_pop() {
            f(buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::alloc_buffer;
    use crate::config::PoolConfig;

    fn sample_buffer() -> Buffer {
        alloc_buffer(&PoolConfig::default().with_size(16)).expect("alloc")
    }

    #[test]
    fn push_then_pop_round_trips() {
        let list = FreeList::new();
        list.push(sample_buffer());
        assert_eq!(list.len(), 1);
        assert!(list.try_pop().is_some());
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn try_pop_on_empty_list_returns_none() {
        let list = FreeList::new();
        assert!(list.try_pop().is_none());
    }

    #[test]
    fn push_signals_a_credit_pop_consumes_it() {
        let list = FreeList::new();
        list.push(sample_buffer());
        assert!(list.wait(Some(Duration::from_millis(1))));
        list.try_pop();
        assert!(!list.wait(Some(Duration::from_millis(1))));
    }

    #[test]
    fn drain_empties_the_list_and_visits_every_buffer() {
        let list = FreeList::new();
        for _ in 0..5 {
            list.push(sample_buffer());
        }
        let mut seen = 0;
        list.drain(|_| seen += 1);
        assert_eq!(seen, 5);
        assert_eq!(list.len(), 0);
    }
}
