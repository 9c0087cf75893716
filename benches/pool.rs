//! Buffer pool benchmarks.
//!
//! Measures the acquire/release cycle (the hot path of a protocol stack's
//! receive loop) and the cursor operations on an already-held buffer.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use pktpool::{BufferPool, PoolConfig};

/// Benchmark a full acquire/release cycle through each acquisition path.
fn bench_acquire_release(c: &mut Criterion) {
    let pool = BufferPool::new(PoolConfig::new(16, 256)).unwrap();
    let mut group = c.benchmark_group("acquire_release");

    group.bench_function("guard_cycle", |b| {
        b.iter(|| {
            let guard = pool.acquire().unwrap();
            black_box(guard.tail_room());
            // guard drops: slot back to the free queue
        });
    });

    group.bench_function("guard_cycle_with_headroom", |b| {
        b.iter(|| {
            let guard = pool.acquire_with_headroom(8).unwrap();
            black_box(guard.head_room());
        });
    });

    group.bench_function("token_cycle", |b| {
        b.iter(|| {
            let token = pool.try_acquire_token(0).unwrap();
            pool.release(token).unwrap();
        });
    });

    group.finish();
}

/// Benchmark building and stripping a framed packet on a held buffer.
fn bench_cursor_ops(c: &mut Criterion) {
    let payload = [0xA5u8; 64];
    let header = [0x02u8, 0x00, 0x40, 0x00];

    let mut group = c.benchmark_group("cursor_ops");
    group.throughput(Throughput::Bytes(
        (payload.len() + header.len()) as u64,
    ));

    let pool = BufferPool::new(PoolConfig::new(4, 256)).unwrap();

    group.bench_function("frame_build_and_strip", |b| {
        b.iter(|| {
            // Build from the inside out, then strip like a receiver would.
            let mut buf = pool.acquire_with_headroom(header.len()).unwrap();
            buf.append_slice(&payload).unwrap();
            buf.prepend_slice(&header).unwrap();
            black_box(buf.consume(header.len()).unwrap());
            black_box(buf.window());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_acquire_release, bench_cursor_ops);
criterion_main!(benches);
