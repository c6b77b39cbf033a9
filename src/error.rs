//! Error taxonomy for the buffer pool
//!
//! Mirrors the error kinds a pool can return: `Flushing`, `WouldBlock`,
//! `NotSupported`, `AllocFailed`, `ConfigRejected`. Every acquire/configure
//! path in this crate returns `Result<T>` rather than panicking; release is
//! infallible by contract and never returns this type.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PoolError>;

/// Errors a pool can surface to callers.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The pool is inactive or draining; acquire cannot proceed.
    #[error("pool is flushing or inactive")]
    Flushing,

    /// The caller asked not to wait (`WAIT` unset) and the pool is
    /// saturated (`max_buffers` reached, free list empty).
    #[error("pool saturated and caller requested non-blocking acquire")]
    WouldBlock,

    /// The requested operation has no implementation (e.g. a `PoolHooks`
    /// that declines to allocate).
    #[error("operation not supported by this pool")]
    NotSupported,

    /// The underlying allocator failed (e.g. out of memory).
    #[error("buffer allocation failed: {0}")]
    AllocFailed(String),

    /// `set_config` was rejected: the pool was active, had outstanding
    /// buffers, or the hook itself rejected the configuration.
    #[error("configuration rejected: {0}")]
    ConfigRejected(&'static str),

    /// An I/O error from a `PoolHooks` implementation that performs real
    /// I/O (e.g. a DMA- or shared-memory-backed pool). The base allocator
    /// in this crate never returns this variant.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
