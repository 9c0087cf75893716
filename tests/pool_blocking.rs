//! Integration tests for blocking acquire and cross-thread handoff.
//!
//! These tests verify the concurrency behavior that unit tests don't cover:
//! suspension on an empty free queue, wakeup on release, and release from a
//! different thread than the acquirer.

use std::sync::mpsc;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use pktpool::{BufGuard, BufferPool, PoolConfig};

fn create_pool(pool_size: usize, buf_capacity: usize) -> BufferPool {
    BufferPool::new(PoolConfig::new(pool_size, buf_capacity)).unwrap()
}

/// Pool of 5: five acquires succeed, a sixth blocks until one release, and
/// the unblocked waiter sees a reset window.
#[test]
fn test_sixth_acquire_blocks_until_release() {
    let pool = Arc::new(create_pool(5, 64));

    let mut guards = Vec::new();
    for _ in 0..5 {
        guards.push(pool.acquire().unwrap());
    }
    assert_eq!(pool.free_count(), 0);

    let (tx, rx) = mpsc::channel();
    let waiter_pool = Arc::clone(&pool);
    let waiter = thread::spawn(move || {
        let guard = waiter_pool.acquire().unwrap();
        tx.send((guard.len(), guard.head_room())).unwrap();
    });

    // Give the waiter time to block; it must not complete yet.
    thread::sleep(Duration::from_millis(50));
    assert!(rx.try_recv().is_err());

    // Releasing one slot unblocks exactly one waiter.
    drop(guards.pop());

    let (len, head_room) = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(len, 0);
    assert_eq!(head_room, 0);

    waiter.join().unwrap();
}

/// A producer fills a buffer and hands the guard to a consumer thread,
/// which reads it and releases by dropping.
#[test]
fn test_guard_handoff_across_threads() {
    let pool = create_pool(2, 64);

    thread::scope(|s| {
        let (tx, rx) = mpsc::channel::<BufGuard>();

        s.spawn(move || {
            let mut guard = rx.recv().unwrap();
            assert_eq!(guard.window(), b"\x02\x00payload");

            // Consumer strips the header the producer prepended.
            let header = guard.consume(2).unwrap();
            assert_eq!(header, b"\x02\x00");
            assert_eq!(guard.window(), b"payload");
            // guard drops here, on a different thread than the acquirer
        });

        let mut guard = pool.acquire_with_headroom(2).unwrap();
        guard.append_slice(b"payload").unwrap();
        guard.prepend_slice(b"\x02\x00").unwrap();
        tx.send(guard).unwrap();
    });

    assert_eq!(pool.free_count(), 2);
    assert_eq!(pool.in_use_count(), 0);
}

/// Tokens are plain Copy data, so they cross threads trivially; the release
/// on the consumer side must wake a producer blocked on an empty pool.
#[test]
fn test_token_handoff_release_wakes_producer() {
    let pool = Arc::new(create_pool(1, 64));

    let token = pool.acquire_token(0).unwrap();
    pool.buf(&token).unwrap().append_slice(b"frame").unwrap();

    let consumer_pool = Arc::clone(&pool);
    let consumer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        assert_eq!(consumer_pool.buf(&token).unwrap().window(), b"frame");
        consumer_pool.release(token).unwrap();
    });

    // Blocks until the consumer releases.
    let guard = pool.acquire().unwrap();
    assert_eq!(guard.len(), 0);

    consumer.join().unwrap();
}

/// Every waiter on a contended pool is eventually served, and each release
/// admits at most one of them.
#[test]
fn test_contended_pool_serves_all_waiters() {
    let pool = Arc::new(create_pool(2, 32));
    let mut handles = Vec::new();

    for i in 0..8u8 {
        let pool = Arc::clone(&pool);
        handles.push(thread::spawn(move || {
            for _ in 0..25 {
                let mut guard = pool.acquire().unwrap();
                assert!(guard.is_empty());
                guard.append_slice(&[i; 4]).unwrap();
                assert_eq!(guard.window(), &[i; 4]);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(pool.free_count(), 2);
    let snap = pool.stats().snapshot();
    assert_eq!(snap.acquires, 200);
    assert_eq!(snap.releases, 200);
}

/// Concurrent try_acquire traffic never hands out more buffers than exist.
#[test]
fn test_in_use_never_exceeds_pool_size() {
    let pool = Arc::new(create_pool(3, 32));
    let mut handles = Vec::new();

    for _ in 0..4 {
        let pool = Arc::clone(&pool);
        handles.push(thread::spawn(move || {
            for _ in 0..100 {
                if let Ok(token) = pool.try_acquire_token(0) {
                    assert!(pool.in_use_count() <= 3);
                    pool.release(token).unwrap();
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(pool.free_count(), 3);
    assert_eq!(pool.in_use_count(), 0);
}

/// Two threads racing to release copies of the same token: exactly one
/// wins, the loser gets an error, and the slot index enters the free queue
/// exactly once.
#[test]
fn test_racing_releases_admit_one_winner() {
    for _ in 0..200 {
        let pool = Arc::new(create_pool(1, 32));
        let token = pool.acquire_token(0).unwrap();
        let barrier = Arc::new(Barrier::new(2));

        let racers: Vec<_> = (0..2)
            .map(|_| {
                let pool = Arc::clone(&pool);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    pool.release(token).is_ok()
                })
            })
            .collect();

        let wins = racers
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|&won| won)
            .count();
        assert_eq!(wins, 1);

        // The slot must be acquirable exactly once afterwards.
        assert_eq!(pool.free_count(), 1);
        let reacquired = pool.try_acquire_token(0).unwrap();
        assert!(matches!(
            pool.try_acquire_token(0),
            Err(pktpool::Error::Exhausted)
        ));
        pool.release(reacquired).unwrap();
    }
}

/// A timed-out waiter does not consume the wakeup meant for another.
#[test]
fn test_timeout_waiter_leaves_pool_consistent() {
    let pool = Arc::new(create_pool(1, 64));

    let held = pool.acquire().unwrap();
    assert!(pool.acquire_timeout(0, Duration::from_millis(20)).is_err());

    drop(held);
    let guard = pool.acquire_timeout(0, Duration::from_millis(20)).unwrap();
    assert_eq!(guard.tail_room(), 64);
}
