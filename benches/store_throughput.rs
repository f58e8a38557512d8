// SPDX-License-Identifier: MPL-2.0
//! Benchmarks for notification store operations.
//!
//! Measures the performance of:
//! - Enqueue at capacity (insert + eviction + broadcast)
//! - Broadcast fan-out to many subscribers
//! - Timer processing for a full list

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::time::Duration;
use toastline::notifications::{
    Capacity, NotificationStore, Payload, RemovalDelay, StoreConfig, ToastDuration,
};

fn config(capacity: usize) -> StoreConfig {
    StoreConfig {
        capacity: Capacity::new(capacity),
        removal_delay: RemovalDelay::from_millis(0),
        default_duration: ToastDuration::from_millis(5_000),
    }
}

/// Benchmark enqueueing into a store that is already full.
fn bench_enqueue(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_enqueue");

    for capacity in [5, 50, 100] {
        let store = NotificationStore::new(config(capacity));
        for i in 0..capacity {
            store.enqueue(Payload::info(format!("warmup {i}")), None);
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, _| {
                b.iter(|| black_box(store.enqueue(Payload::info("Saved"), None)));
            },
        );
    }

    group.finish();
}

/// Benchmark a single mutation delivered to many subscribers.
fn bench_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_broadcast");

    for subscribers in [1, 10, 100] {
        let store = NotificationStore::new(config(5));
        let subscriptions: Vec<_> = (0..subscribers)
            .map(|_| {
                store.subscribe(|snapshot| {
                    black_box(snapshot.len());
                })
            })
            .collect();
        let id = store.enqueue(Payload::info("Uploading"), Some(ToastDuration::Infinite));

        group.bench_with_input(
            BenchmarkId::from_parameter(subscribers),
            &subscribers,
            |b, _| {
                b.iter(|| {
                    black_box(store.update(
                        id,
                        toastline::notifications::PayloadPatch::new().description("50%"),
                    ))
                });
            },
        );

        drop(subscriptions);
    }

    group.finish();
}

/// Benchmark expiring and removing a full list in one tick.
fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_tick");

    group.bench_function("expire_and_remove_100", |b| {
        b.iter(|| {
            let store = NotificationStore::new(config(100));
            let start = tokio::time::Instant::now();
            for i in 0..100 {
                store.enqueue_at(Payload::info(format!("toast {i}")), None, start);
            }
            black_box(store.tick_at(start + Duration::from_secs(5)));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_enqueue, bench_broadcast, bench_tick);
criterion_main!(benches);
