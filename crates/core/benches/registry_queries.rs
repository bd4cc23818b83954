//! Registry query and notification fan-out benchmarks
//!
//! Run with: `cargo bench --bench registry_queries -p lazycache-core`

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lazycache_core::{
    CacheRegistry, LoadContext, LoadStatusHandler, NotificationAction, Payload, Selector,
    WorkerPool,
};
use lazycache_domain::WorkerConfig;

#[derive(Default)]
struct BenchPayload {
    key: String,
    cached: bool,
}

impl Payload for BenchPayload {
    fn key(&self) -> &str {
        &self.key
    }

    fn is_cached(&self) -> bool {
        self.cached
    }

    fn set_cached(&mut self, cached: bool) {
        self.cached = cached;
    }

    fn load(&mut self, _ctx: &LoadContext<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    fn clear(&mut self) {}
}

#[derive(Default)]
struct OtherPayload {
    cached: bool,
}

impl Payload for OtherPayload {
    fn key(&self) -> &str {
        "other"
    }

    fn is_cached(&self) -> bool {
        self.cached
    }

    fn set_cached(&mut self, cached: bool) {
        self.cached = cached;
    }

    fn load(&mut self, _ctx: &LoadContext<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    fn clear(&mut self) {}
}

fn populated(size: usize) -> CacheRegistry {
    let pool = WorkerPool::new(&WorkerConfig::default()).expect("worker pool");
    let registry = CacheRegistry::new(pool);
    for i in 0..size {
        if i % 2 == 0 {
            registry.insert(BenchPayload { key: format!("key_{}", i % 16), cached: false });
        } else {
            registry.insert(OtherPayload::default());
        }
    }
    registry
}

// ============================================================================
// Query Benchmarks
// ============================================================================

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_query");

    for size in [100, 1000, 10_000] {
        let registry = populated(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("by_type", size), &registry, |b, registry| {
            b.iter(|| black_box(registry.by_type::<BenchPayload>()));
        });
        group.bench_with_input(BenchmarkId::new("by_key", size), &registry, |b, registry| {
            b.iter(|| black_box(registry.by_key(black_box("key_4"))));
        });
        group.bench_with_input(BenchmarkId::new("empty_by_type", size), &registry, |b, registry| {
            b.iter(|| black_box(registry.empty_by_type::<BenchPayload>()));
        });
    }

    group.finish();
}

// ============================================================================
// Notification Benchmarks
// ============================================================================

fn bench_notification_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_notification");

    for subscribers in [1, 10, 100] {
        group.throughput(Throughput::Elements(subscribers as u64));
        group.bench_with_input(
            BenchmarkId::new("load_invalidate_cycle", subscribers),
            &subscribers,
            |b, &subscribers| {
                let registry = populated(0);
                let entry = registry.insert(BenchPayload { key: "hot".to_string(), cached: false });
                let hits = Arc::new(AtomicU64::new(0));
                for _ in 0..subscribers {
                    let hits = Arc::clone(&hits);
                    let handler = LoadStatusHandler::new(move |_, _, _| {
                        hits.fetch_add(1, Ordering::Relaxed);
                    });
                    registry.setup_load_notification(
                        &Selector::key("hot"),
                        NotificationAction::Add,
                        &handler,
                    );
                }

                b.iter(|| {
                    black_box(entry.load().expect("load"));
                    entry.clear();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_queries, bench_notification_fan_out);
criterion_main!(benches);
