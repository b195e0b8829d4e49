use coffer::{BlobStore, InMemory, SecretId, SecretStore, StaticIdentity, Version};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

/// A service whose blob has `writes` versions spread across a few keys.
fn populated_store(writes: usize) -> BlobStore {
    let store = BlobStore::new(InMemory::new(), StaticIdentity::new("bench"));
    for n in 0..writes {
        let id = SecretId::new("bench", format!("KEY_{}", n % 4));
        store.write(&id, &format!("value-{}", n)).unwrap();
    }
    store
}

/// Benchmark historical reads, which scan every snapshot.
fn bench_read_version(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_version");
    group.sample_size(30);
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    for writes in [8, 64, 256] {
        let store = populated_store(writes);
        let id = SecretId::new("bench", "KEY_0");

        group.bench_with_input(BenchmarkId::new("first", writes), &store, |b, store| {
            b.iter(|| {
                let secret = store.read(black_box(&id), Version::Number(1)).unwrap();
                black_box(secret);
            });
        });
    }

    group.finish();
}

/// Benchmark history reconstruction.
fn bench_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("history");
    group.sample_size(30);
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    for writes in [8, 64, 256] {
        let store = populated_store(writes);
        let id = SecretId::new("bench", "KEY_1");

        group.bench_with_input(BenchmarkId::new("key", writes), &store, |b, store| {
            b.iter(|| black_box(store.history(black_box(&id)).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark a write against a large blob.
fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");
    group.sample_size(30);

    let store = populated_store(64);
    let id = SecretId::new("bench", "KEY_2");
    group.bench_function("latest", |b| {
        b.iter(|| store.write(black_box(&id), black_box("fresh")).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_read_version, bench_history, bench_write);
criterion_main!(benches);
