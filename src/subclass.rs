//! Subclass dispatch contract
//!
//! `PoolHooks` is the six-operation overridable contract a specialized
//! buffer pool supplies instead of a runtime vtable: a specialized pool
//! implements this trait and instantiates `Pool<MyHooks>` — dispatch is
//! monomorphized at compile time, and `outstanding` bookkeeping lives in
//! `Pool::acquire_buffer`/`release_buffer` themselves so no implementation
//! of this trait can accidentally skip it.
//!
//! `DefaultHooks` implements every method with the base pool's default
//! behavior.

use crate::buffer::Buffer;
use crate::config::PoolConfig;
use crate::error::Result;
use crate::pool::{AcquireParams, Pool};

/// Overridable hooks a specialized buffer pool supplies.
///
/// Every method has a default behavior; a subclass overrides only the
/// hooks it needs to change.
pub trait PoolHooks: Send + Sync + 'static {
    /// Validate/adopt a configuration. Returning `false` rejects it — the
    /// caller's `PoolConfig` is not adopted.
    ///
    /// Default: accept any configuration (the base pool performs no
    /// cross-field validation beyond what `Pool::set_config`'s guard
    /// already enforces).
    fn set_config(&self, _cfg: &PoolConfig) -> bool {
        true
    }

    /// Called when the pool transitions active/inactive. Must not call
    /// back into `pool.acquire_buffer` — doing so would deadlock against
    /// the reentrant lock held by the caller.
    ///
    /// Default: on activation, preallocate `min_buffers` via
    /// `alloc_buffer` and push each into the free list; on deactivation,
    /// do nothing (the dispatcher already flips `flushing` and drains via
    /// `free_buffer` once buffers stop being outstanding).
    fn set_active(&self, pool: &Pool<Self>, active: bool) -> Result<()>
    where
        Self: Sized,
    {
        if active {
            let cfg = pool.config_snapshot();
            for _ in 0..cfg.min_buffers {
                let buffer = self.alloc_buffer(&cfg, None)?;
                pool.push_idle(buffer);
            }
        }
        Ok(())
    }

    /// Allocate a fresh buffer honoring the pool's current configuration.
    ///
    /// Default: the aligned raw allocation in `allocator::alloc_buffer`.
    fn alloc_buffer(&self, cfg: &PoolConfig, _params: Option<&AcquireParams>) -> Result<Buffer> {
        crate::allocator::alloc_buffer(cfg)
    }

    /// Free a buffer during a flush. Must not reinsert it into the free
    /// list.
    ///
    /// Default: drop the outer reference (`allocator::free_buffer`).
    fn free_buffer(&self, buffer: Buffer) {
        crate::allocator::free_buffer(buffer);
    }

    /// Acquire a buffer. An override takes full responsibility for
    /// `flushing`/wait semantics but still has `outstanding` bookkeeping
    /// applied by the caller (`Pool::acquire_buffer`) regardless of what
    /// this method does.
    ///
    /// Default: `Pool::default_acquire`.
    fn acquire_buffer(&self, pool: &Pool<Self>, params: Option<&AcquireParams>) -> Result<Buffer>
    where
        Self: Sized,
    {
        pool.default_acquire(self, params)
    }

    /// Release a buffer. An override may drop/recycle differently but
    /// must leave the buffer usable by a subsequent acquire, or ensure it
    /// is freed.
    ///
    /// Default: push into the free list and signal (`Pool::default_release`).
    fn release_buffer(&self, pool: &Pool<Self>, buffer: Buffer)
    where
        Self: Sized,
    {
        pool.default_release(buffer);
    }
}

/// The base pool's hook set: every method uses its documented default.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHooks;

impl PoolHooks for DefaultHooks {}
