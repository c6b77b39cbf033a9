//! Stress-test harness comparing pooled buffer reuse against bare
//! allocation, grounded in the stress driver shipped alongside the original
//! buffer pool implementation (`gstpoolstress.c`): run `nbuffers`
//! acquire/release cycles through a configured, activated pool and report
//! elapsed time, then do the same number of bare allocations for
//! comparison.

use std::time::Instant;

use clap::Parser;
use tracing::info;

use bufferpool::{Pool, PoolConfig};

/// Compare pooled buffer reuse against bare allocation.
#[derive(Parser, Debug)]
#[command(name = "bench-harness", version, about)]
struct Args {
    /// Number of acquire/release (or alloc/free) cycles to run.
    #[arg(short = 'n', long, default_value_t = 1_000_000)]
    nbuffers: u64,

    /// Payload size per buffer, in bytes.
    #[arg(short = 's', long, default_value_t = 4096)]
    size: usize,

    /// Number of buffers preallocated and capped at (0 = unbounded).
    #[arg(short = 'm', long, default_value_t = 16)]
    max_buffers: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    info!(?args, "starting buffer pool stress run");

    let pooled = run_pooled(&args);
    info!(elapsed_ms = pooled.as_millis(), "pooled acquire/release run complete");

    let bare = run_bare_allocation(&args);
    info!(elapsed_ms = bare.as_millis(), "bare allocation run complete");

    println!("cycles:        {}", args.nbuffers);
    println!("pooled run:    {:?} ({:.1} ns/cycle)", pooled, ns_per_cycle(pooled, args.nbuffers));
    println!("bare-alloc run:{:?} ({:.1} ns/cycle)", bare, ns_per_cycle(bare, args.nbuffers));
}

fn ns_per_cycle(elapsed: std::time::Duration, cycles: u64) -> f64 {
    elapsed.as_nanos() as f64 / cycles.max(1) as f64
}

fn run_pooled(args: &Args) -> std::time::Duration {
    let pool = Pool::new();
    pool.set_config(
        PoolConfig::default()
            .with_size(args.size)
            .with_min_buffers(args.max_buffers.min(4))
            .with_max_buffers(args.max_buffers),
    )
    .expect("valid configuration");
    pool.set_active(true).expect("configured before activation");

    let start = Instant::now();
    for _ in 0..args.nbuffers {
        let buffer = pool.acquire_buffer(None).expect("pool is active");
        pool.release_buffer(buffer);
    }
    let elapsed = start.elapsed();

    pool.set_active(false).expect("deactivate");
    elapsed
}

fn run_bare_allocation(args: &Args) -> std::time::Duration {
    let start = Instant::now();
    for _ in 0..args.nbuffers {
        let buffer = vec![0u8; args.size];
        std::hint::black_box(&buffer);
    }
    start.elapsed()
}
