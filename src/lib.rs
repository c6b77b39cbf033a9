//! A bounded-capacity pool of pre-allocated, alignment-aware byte buffers
//! for streaming pipelines.
//!
//! Acquire buffers from a configured, activated [`Pool`] and release them
//! back when done; the pool recycles released buffers instead of
//! reallocating, and blocks (or errors, with [`AcquireParams::without_wait`])
//! when saturated. Deactivating the pool waits for outstanding buffers to
//! come back before freeing the idle ones.
//!
//! ```
//! use bufferpool::{Pool, PoolConfig};
//!
//! let pool = Pool::new();
//! pool.set_config(PoolConfig::default().with_size(4096).with_min_buffers(2))
//!     .expect("valid configuration");
//! pool.set_active(true).expect("configured before activation");
//!
//! let buffer = pool.acquire_buffer(None).expect("pool is active");
//! assert_eq!(buffer.size(), 4096);
//! pool.release_buffer(buffer);
//!
//! pool.set_active(false).expect("deactivate");
//! ```
//!
//! Specialized pools implement [`PoolHooks`] and instantiate
//! [`Pool<MyHooks>`](Pool) instead of relying on [`DefaultHooks`]; dispatch
//! is monomorphized, not virtual.

mod allocator;
mod buffer;
mod config;
mod error;
mod free_list;
mod lifecycle;
mod pool;
mod subclass;
mod waker;

pub use buffer::Buffer;
pub use config::PoolConfig;
pub use error::{PoolError, Result};
pub use lifecycle::LifecycleState;
pub use pool::{AcquireParams, Pool};
pub use subclass::{DefaultHooks, PoolHooks};
