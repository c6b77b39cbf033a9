//! Criterion benchmarks for the acquire/release hot path, the same cycle
//! `bench-harness` stresses at larger scale.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use bufferpool::{Pool, PoolConfig};

fn configured_pool(max_buffers: usize) -> Pool {
    let pool = Pool::new();
    pool.set_config(
        PoolConfig::default()
            .with_size(4096)
            .with_min_buffers(max_buffers.min(4))
            .with_max_buffers(max_buffers),
    )
    .expect("valid configuration");
    pool.set_active(true).expect("configured before activation");
    pool
}

fn bench_acquire_release(c: &mut Criterion) {
    let mut group = c.benchmark_group("acquire_release");

    for max_buffers in [1usize, 4, 16, 64] {
        let pool = configured_pool(max_buffers);
        group.bench_with_input(
            BenchmarkId::from_parameter(max_buffers),
            &max_buffers,
            |b, _| {
                b.iter(|| {
                    let buffer = pool.acquire_buffer(None).expect("pool is active");
                    black_box(buffer.size());
                    pool.release_buffer(buffer);
                });
            },
        );
    }

    group.finish();
}

fn bench_bare_allocation(c: &mut Criterion) {
    c.bench_function("bare_allocation_4096", |b| {
        b.iter(|| {
            let buf = vec![0u8; 4096];
            black_box(&buf);
        });
    });
}

criterion_group!(benches, bench_acquire_release, bench_bare_allocation);
criterion_main!(benches);
