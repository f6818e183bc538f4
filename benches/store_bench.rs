// Copyright (c) 2026 Bountyy Oy. All rights reserved.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use loggie::{LogRecord, LogStore, LogStoreConfig, RequestInfo, ResponseInfo};

fn record(id: u64) -> LogRecord {
    let request = RequestInfo::new("GET", format!("https://api.example.com/items/{}", id))
        .with_header("accept", "application/json");
    let response = ResponseInfo::new(200, format!("https://api.example.com/items/{}", id))
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":1,"name":"cup","tags":["kitchen","blue"]}"#);
    LogRecord::new(id, request).with_response(response)
}

fn append_benchmark(c: &mut Criterion) {
    let store = LogStore::new(LogStoreConfig::new().max_records(10_000)).unwrap();

    c.bench_function("append_1000_then_snapshot", |b| {
        b.iter(|| {
            for id in 0..1000 {
                store.append(record(id));
            }
            black_box(store.snapshot().len())
        })
    });
}

fn snapshot_benchmark(c: &mut Criterion) {
    let store = LogStore::with_defaults().unwrap();
    for id in 0..5000 {
        store.append(record(id));
    }

    c.bench_function("snapshot_5000", |b| b.iter(|| black_box(store.snapshot())));

    c.bench_function("snapshot_filtered_5000", |b| {
        b.iter(|| {
            let snapshot = store.snapshot();
            black_box(snapshot.filtered(|r| r.id % 2 == 0).len())
        })
    });
}

criterion_group!(benches, append_benchmark, snapshot_benchmark);
criterion_main!(benches);
