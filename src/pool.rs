//! The pool dispatcher: ties configuration, lifecycle, the free list, and
//! subclass hooks into the public `acquire_buffer`/`release_buffer` API.
//!
//! The acquire/release algorithm is split between `Pool::acquire_buffer`
//! (the part every hook implementation shares — `outstanding` bookkeeping,
//! which a subclass cannot opt out of) and `Pool::default_acquire`/
//! `default_release` (the `DefaultHooks` behavior, callable by name from a
//! subclass that wants to fall back to it for part of its own override).
//!
//! The lock is reentrant because a `set_active(false)` call that drains
//! outstanding buffers ends up calling back into `release_buffer`'s
//! bookkeeping on the same thread while the lock is already held.

use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::ReentrantMutex;
use tracing::{debug, trace, warn};

use crate::buffer::Buffer;
use crate::config::PoolConfig;
use crate::error::{PoolError, Result};
use crate::free_list::FreeList;
use crate::lifecycle::{LifecycleFlags, LifecycleState};
use crate::subclass::{DefaultHooks, PoolHooks};

/// Flags accepted by `acquire_buffer`. The one recognized flag today is
/// `WAIT`; this is a struct rather than a bare `bool` to stay
/// source-compatible with future additions.
#[derive(Debug, Clone, Copy)]
pub struct AcquireParams {
    wait: bool,
}

impl Default for AcquireParams {
    /// Absent params means "wait" — `Pool::acquire_buffer` treats `None`
    /// and `AcquireParams::default()` identically.
    fn default() -> Self {
        Self { wait: true }
    }
}

impl AcquireParams {
    /// Params that permit blocking until a buffer becomes available.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Params that return `PoolError::WouldBlock` instead of blocking when
    /// the pool is saturated.
    #[must_use]
    pub fn without_wait() -> Self {
        Self { wait: false }
    }

    /// Whether this set of params permits blocking.
    #[must_use]
    pub fn wait(&self) -> bool {
        self.wait
    }
}

/// Guarded mutable state: the configuration and the two lifecycle flags
/// travel together since `set_config`/`set_active` both need to observe and
/// mutate them atomically with respect to each other.
struct Guarded {
    config: PoolConfig,
    flags: LifecycleFlags,
}

struct PoolInner<H> {
    guarded: ReentrantMutex<RefCell<Guarded>>,
    flushing: AtomicBool,
    outstanding: AtomicUsize,
    free_list: FreeList,
    hooks: H,
}

/// A bounded-capacity pool of pre-allocated, alignment-aware byte buffers.
///
/// Generic over `H: PoolHooks` so a specialized pool can override
/// allocation, acquisition, or release without runtime dispatch; the base
/// pool is `Pool<DefaultHooks>`, aliased as `Pool` via the default type
/// parameter.
pub struct Pool<H: PoolHooks = DefaultHooks> {
    inner: Arc<PoolInner<H>>,
}

impl<H: PoolHooks> Clone for Pool<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H: PoolHooks + fmt::Debug> fmt::Debug for Pool<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.inner.guarded.lock();
        let state = guard.borrow();
        f.debug_struct("Pool")
            .field("config", &state.config)
            .field("state", &state.flags.state(self.is_flushing()))
            .field("outstanding", &self.outstanding())
            .field("idle", &self.inner.free_list.len())
            .finish()
    }
}

impl Pool<DefaultHooks> {
    /// Construct a base pool using every default hook.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hooks(DefaultHooks)
    }
}

impl Default for Pool<DefaultHooks> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: PoolHooks> Pool<H> {
    /// Construct a pool driven by a custom hook set.
    #[must_use]
    pub fn with_hooks(hooks: H) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                guarded: ReentrantMutex::new(RefCell::new(Guarded {
                    config: PoolConfig::default(),
                    flags: LifecycleFlags::default(),
                })),
                flushing: AtomicBool::new(false),
                outstanding: AtomicUsize::new(0),
                free_list: FreeList::new(),
                hooks,
            }),
        }
    }

    /// Adopt a new configuration.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::ConfigRejected` if the pool is active, has
    /// outstanding buffers, or the hook's `set_config` returns `false`.
    pub fn set_config(&self, config: PoolConfig) -> Result<()> {
        let guard = self.inner.guarded.lock();
        let mut state = guard.borrow_mut();

        if !state.flags.can_configure(self.outstanding()) {
            warn!("set_config rejected: pool active or has outstanding buffers");
            return Err(PoolError::ConfigRejected(
                "pool must be inactive with no outstanding buffers",
            ));
        }

        if !self.inner.hooks.set_config(&config) {
            return Err(PoolError::ConfigRejected("rejected by subclass hook"));
        }

        debug!(?config, "pool configured");
        state.config = config;
        state.flags.configured = true;
        Ok(())
    }

    /// Read back the current configuration.
    #[must_use]
    pub fn get_config(&self) -> PoolConfig {
        self.config_snapshot()
    }

    /// Crate-internal config read, used by `PoolHooks` default
    /// implementations that need it without going through the public name.
    #[must_use]
    pub(crate) fn config_snapshot(&self) -> PoolConfig {
        let guard = self.inner.guarded.lock();
        guard.borrow().config
    }

    /// Activate or deactivate the pool.
    ///
    /// Activating preallocates `min_buffers` (via the hook's
    /// `set_active`/`alloc_buffer`). Deactivating marks the pool flushing;
    /// if no buffers are outstanding it drains the free list immediately,
    /// otherwise the last `release_buffer` call does so. Calling either
    /// with the pool already in the requested state is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::ConfigRejected` if activating before any
    /// successful `set_config` call.
    pub fn set_active(&self, active: bool) -> Result<()> {
        let guard = self.inner.guarded.lock();
        {
            let mut state = guard.borrow_mut();
            if state.flags.active == active {
                return Ok(());
            }
            if active {
                if !state.flags.can_activate() {
                    return Err(PoolError::ConfigRejected(
                        "pool must be configured before activation",
                    ));
                }
                self.inner.flushing.store(false, Ordering::Release);
                state.flags.active = true;
            } else {
                state.flags.active = false;
                self.inner.flushing.store(true, Ordering::Release);
                self.inner.free_list.signal_flushing();
            }
        }

        // Hook runs with the lock held (reentrant: it may call
        // `push_idle`/`config_snapshot`, which re-take it) but never
        // `acquire_buffer`, matching `PoolHooks::set_active`'s contract.
        self.inner.hooks.set_active(self, active)?;

        if !active && self.outstanding() == 0 {
            self.flush_all();
        }

        debug!(active, "pool activation changed");
        Ok(())
    }

    /// Whether the pool is currently active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        let guard = self.inner.guarded.lock();
        guard.borrow().flags.active
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        let guard = self.inner.guarded.lock();
        guard.borrow().flags.state(self.is_flushing())
    }

    /// Number of buffers currently held by callers (not in the free list).
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.inner.outstanding.load(Ordering::Acquire)
    }

    /// Whether the pool is deactivating or inactive and refusing new
    /// acquisitions.
    #[must_use]
    pub fn is_flushing(&self) -> bool {
        self.inner.flushing.load(Ordering::Acquire)
    }

    /// Acquire a buffer, dispatching to the hook set and then applying the
    /// `outstanding` bookkeeping every pool shares regardless of hook
    /// behavior — a hook override cannot skip this accounting.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Flushing` if the pool is inactive or draining,
    /// `PoolError::WouldBlock` if `params` disallows waiting and the pool
    /// is saturated, or whatever error the hook's allocation path produces.
    pub fn acquire_buffer(&self, params: Option<AcquireParams>) -> Result<Buffer> {
        let buffer = self.inner.hooks.acquire_buffer(self, params.as_ref())?;
        self.inner.outstanding.fetch_add(1, Ordering::AcqRel);
        trace!(outstanding = self.outstanding(), "buffer acquired");
        Ok(buffer)
    }

    /// Release a buffer back to the pool, dispatching to the hook set and
    /// then applying the shared `outstanding` bookkeeping. If this was the
    /// last outstanding buffer and the pool is draining, triggers the
    /// deferred flush.
    pub fn release_buffer(&self, buffer: Buffer) {
        self.inner.hooks.release_buffer(self, buffer);

        let prev = self.inner.outstanding.fetch_sub(1, Ordering::AcqRel);
        trace!(outstanding = prev - 1, "buffer released");

        if self.is_flushing() && prev == 1 {
            self.flush_all();
        }
    }

    /// Push a buffer directly into the free list. Used by `PoolHooks`
    /// default implementations (e.g. preallocation on activation).
    pub(crate) fn push_idle(&self, buffer: Buffer) {
        self.inner.free_list.push(buffer);
    }

    /// The default `acquire_buffer` algorithm: try the free list; if empty
    /// and the pool is unbounded (`max_buffers == 0`), allocate a fresh
    /// buffer; otherwise wait for a credit and retry, unless `flushing` or
    /// the caller disallowed waiting. With a finite `max_buffers`, the pool
    /// never allocates beyond what activation preallocated — it only
    /// waits for a release.
    pub(crate) fn default_acquire(
        &self,
        hooks: &H,
        params: Option<&AcquireParams>,
    ) -> Result<Buffer> {
        let wait = params.map_or(true, AcquireParams::wait);

        loop {
            if self.is_flushing() {
                return Err(PoolError::Flushing);
            }

            if let Some(buffer) = self.inner.free_list.try_pop() {
                return Ok(buffer);
            }

            let cfg = self.config_snapshot();
            if cfg.max_buffers == 0 {
                return hooks.alloc_buffer(&cfg, params);
            }

            if !wait {
                return Err(PoolError::WouldBlock);
            }

            self.inner.free_list.wait(Some(std::time::Duration::from_millis(50)));
        }
    }

    /// The default `release_buffer` algorithm: push back into the free
    /// list so the next waiter (or `try_pop`) can reuse it. Draining is
    /// handled by the caller (`release_buffer`), since whether to free
    /// instead of recycle depends on `flushing`, which this method does
    /// not itself decide for a subclass that wants different behavior
    /// while draining.
    pub(crate) fn default_release(&self, buffer: Buffer) {
        if self.is_flushing() {
            self.inner.hooks.free_buffer(buffer);
        } else {
            self.inner.free_list.push(buffer);
        }
    }

    /// Drain every idle buffer through the hook's `free_buffer`. Called
    /// once deactivation has no outstanding buffers left to wait for.
    fn flush_all(&self) {
        debug!(idle = self.inner.free_list.len(), "flushing free list");
        let hooks = &self.inner.hooks;
        self.inner.free_list.drain(|buffer| hooks.free_buffer(buffer));
        self.inner.flushing.store(false, Ordering::Release);
    }
}
