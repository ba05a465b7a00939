//! Criterion benchmarks for tempmail_logging

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use tempmail_logging::formatters::StructuredFormatter;
use tempmail_logging::prelude::*;

/// Handler that accepts everything and keeps nothing
struct NullHandler;

impl Handler for NullHandler {
    fn handle(&self, entry: &LogEntry) -> Result<()> {
        black_box(entry);
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

fn logger_with(configuration: LoggerConfiguration) -> Logger {
    Logger::new("Telegram.Core", configuration.with_handler(NullHandler).shared())
}

fn sample_entry() -> LogEntry {
    LogEntry::new("Telegram.Core", LogLevel::Warning, "Chat 42 over quota")
        .with_property("ChatId", 42)
        .with_property("Address", "a1b2@tmp.io")
        .with_property("Used", 11)
}

// ============================================================================
// Factory Benchmarks
// ============================================================================

fn bench_factory(c: &mut Criterion) {
    let mut group = c.benchmark_group("factory");
    group.throughput(Throughput::Elements(1));

    let factory = LoggerFactory::new(LoggerConfiguration::new().shared());
    factory.create_logger("Telegram.Core");

    group.bench_function("cached_lookup", |b| {
        b.iter(|| black_box(factory.create_logger(black_box("Telegram.Core"))));
    });

    group.bench_function("fresh_factory_create", |b| {
        b.iter(|| {
            let factory = LoggerFactory::new(LoggerConfiguration::new().shared());
            black_box(factory.create_logger("Client.Data"))
        });
    });

    group.finish();
}

// ============================================================================
// Dispatch Benchmarks
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    let logger = logger_with(LoggerConfiguration::new());

    group.bench_function("below_threshold", |b| {
        b.iter(|| logger.debug(black_box("Debug message")));
    });

    group.bench_function("plain", |b| {
        b.iter(|| logger.info(black_box("Info message")));
    });

    group.bench_function("template", |b| {
        let args = [FieldValue::from(42), FieldValue::from("a1b2@tmp.io")];
        b.iter(|| logger.info_template(black_box("Chat {ChatId} created {Address}"), &args));
    });

    let scoped = logger_with(LoggerConfiguration::new());
    let _scope = scoped.begin_scope("chat 42");
    group.bench_function("with_scope", |b| {
        b.iter(|| scoped.info(black_box("Info message")));
    });

    group.finish();
}

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters");
    group.throughput(Throughput::Elements(1));

    for count in [0usize, 1, 4] {
        let configuration = LoggerConfiguration::new();
        for _ in 0..count {
            let filter = CategoryFilter::include("^Telegram").expect("valid pattern");
            configuration.add_filter(Arc::new(filter));
        }
        let logger = logger_with(configuration);
        group.bench_with_input(BenchmarkId::new("category", count), &logger, |b, logger| {
            b.iter(|| logger.info(black_box("Info message")));
        });
    }

    group.finish();
}

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");

    for threads in [2usize, 4] {
        group.throughput(Throughput::Elements((threads * 100) as u64));
        let logger = Arc::new(logger_with(LoggerConfiguration::new()));
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let logger = Arc::clone(&logger);
                        std::thread::spawn(move || {
                            for _ in 0..100 {
                                logger.info("Concurrent message");
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().expect("thread panicked");
                }
            });
        });
    }

    group.finish();
}

// ============================================================================
// Formatter Benchmarks
// ============================================================================

fn bench_formatters(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatters");
    group.throughput(Throughput::Elements(1));

    let entry = sample_entry();
    let formatters: [(&str, Arc<dyn Formatter>); 3] = [
        ("template", Arc::new(TemplateFormatter::new())),
        ("structured", Arc::new(StructuredFormatter::new())),
        ("json", Arc::new(JsonFormatter::new())),
    ];
    for (name, formatter) in formatters {
        group.bench_function(name, |b| {
            b.iter(|| black_box(formatter.format(black_box(&entry))));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_factory,
    bench_dispatch,
    bench_filters,
    bench_concurrent_logging,
    bench_formatters,
);
criterion_main!(benches);
