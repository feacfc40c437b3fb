//! Criterion benchmarks for plugin_logger

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use plugin_logger::core::join_fragments;
use plugin_logger::prelude::*;
use std::sync::Arc;

/// Accepts every record and does nothing with it
struct Discard;

impl Plugin for Discard {
    fn name(&self) -> &str {
        "discard"
    }

    fn emit(&self, _level: LogLevel, message: &str, _timestamp: Timestamp) -> Completion {
        black_box(message);
        Completion::delivered()
    }

    fn handle_error(&self, _error: &LoggerError) {}
}

fn logger_with(plugins: usize, level: LogLevel) -> Logger {
    let mut builder = Logger::builder().min_level(level);
    for _ in 0..plugins {
        builder = builder.plugin(Discard);
    }
    builder.build().expect("valid configuration")
}

// ============================================================================
// Dispatch Benchmarks
// ============================================================================

fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_out");
    group.throughput(Throughput::Elements(1));

    for plugins in [0usize, 1, 4, 16] {
        let logger = logger_with(plugins, LogLevel::All);
        group.bench_with_input(BenchmarkId::from_parameter(plugins), &logger, |b, logger| {
            b.iter(|| black_box(logger.info(black_box(["request", "handled"]))));
        });
    }

    group.finish();
}

fn bench_concurrent_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_dispatch");
    group.throughput(Throughput::Elements(4 * 100));

    let logger = Arc::new(logger_with(2, LogLevel::Info));

    group.bench_function("4_threads_100_calls", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let logger = Arc::clone(&logger);
                    std::thread::spawn(move || {
                        for _ in 0..100 {
                            black_box(logger.warn(["concurrent", "call"]));
                        }
                    })
                })
                .collect();
            for handle in handles {
                let _ = handle.join();
            }
        });
    });

    group.finish();
}

// ============================================================================
// Filtering Benchmarks
// ============================================================================

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let logger = logger_with(4, LogLevel::Warn);

    group.bench_function("below_threshold", |b| {
        b.iter(|| black_box(logger.debug(black_box(["This", "should", "be", "filtered"]))));
    });

    group.bench_function("above_threshold", |b| {
        b.iter(|| black_box(logger.error(black_box(["This", "should", "be", "logged"]))));
    });

    group.finish();
}

// ============================================================================
// Message Benchmarks
// ============================================================================

fn bench_message_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("message_join");
    group.throughput(Throughput::Elements(1));

    group.bench_function("two_str", |b| {
        b.iter(|| black_box(join_fragments(black_box(["Hello", "World"]))));
    });

    let values: Vec<u64> = (0..16).collect();
    group.bench_function("sixteen_numbers", |b| {
        b.iter(|| black_box(join_fragments(black_box(&values))));
    });

    group.finish();
}

fn bench_record_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialization");
    group.throughput(Throughput::Elements(1));

    let record = LogRecord::now(LogLevel::Info, "Test message");

    group.bench_function("to_json", |b| {
        b.iter(|| black_box(serde_json::to_string(&record).unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_fan_out,
    bench_concurrent_dispatch,
    bench_level_filtering,
    bench_message_join,
    bench_record_serialization,
);

criterion_main!(benches);
