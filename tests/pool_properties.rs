//! Property-based tests for the pool's conservation and cap invariants:
//! every buffer handed out is eventually accounted for, and `outstanding`
//! never exceeds a configured `max_buffers`.

use std::sync::Arc;
use std::thread;

use proptest::prelude::*;

use bufferpool::{AcquireParams, Pool, PoolConfig};

/// A legal operation a property-test run replays against a shared pool.
#[derive(Debug, Clone, Copy)]
enum Op {
    Acquire,
    ReleaseOldest,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![Just(Op::Acquire), Just(Op::ReleaseOldest)]
}

proptest! {
    /// Conservation: whatever interleaving of acquire/release a single
    /// thread replays, every buffer handed out is eventually released, and
    /// at the end `outstanding == 0` once every acquired buffer has a
    /// matching release.
    #[test]
    fn conservation_holds_for_arbitrary_operation_sequences(ops in prop::collection::vec(op_strategy(), 1..200)) {
        let pool = Pool::new();
        pool.set_config(PoolConfig::default().with_size(32).with_max_buffers(0))
            .expect("set_config");
        pool.set_active(true).expect("set_active");

        let mut held = Vec::new();
        for op in ops {
            match op {
                Op::Acquire => {
                    let buffer = pool
                        .acquire_buffer(Some(AcquireParams::without_wait()))
                        .expect("unbounded pool never blocks");
                    held.push(buffer);
                }
                Op::ReleaseOldest => {
                    if let Some(buffer) = held.pop() {
                        pool.release_buffer(buffer);
                    }
                }
            }
        }

        for buffer in held.drain(..) {
            pool.release_buffer(buffer);
        }

        prop_assert_eq!(pool.outstanding(), 0);
    }

    /// Cap: with `max_buffers = M`, concurrent acquirers across several
    /// threads never observe more than `M` buffers outstanding at once.
    #[test]
    fn cap_is_never_exceeded_under_concurrent_acquisition(max_buffers in 1usize..8, thread_count in 1usize..6) {
        let pool = Arc::new(Pool::new());
        pool.set_config(
            PoolConfig::default()
                .with_size(32)
                .with_max_buffers(max_buffers),
        )
        .expect("set_config");
        pool.set_active(true).expect("set_active");

        let handles: Vec<_> = (0..thread_count)
            .map(|_| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    for _ in 0..20 {
                        if let Ok(buffer) =
                            pool.acquire_buffer(Some(AcquireParams::without_wait()))
                        {
                            assert!(pool.outstanding() <= max_buffers);
                            pool.release_buffer(buffer);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("worker thread panicked");
        }

        prop_assert_eq!(pool.outstanding(), 0);
    }
}
