//! Integration tests for the logging engine
//!
//! These tests verify:
//! - Level threshold and handler ordering across real handlers
//! - Filter composition (category, level)
//! - Scope and ambient context propagation
//! - Factory caching under concurrency
//! - File rotation, database storage and JSON output
//! - Building a configuration from the JSON settings section

use parking_lot::Mutex;
use std::fs;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, OnceLock};
use tempfile::TempDir;
use tempmail_logging::core::fallback;
use tempmail_logging::core::{FallbackCollector, SCOPE_PROPERTY};
use tempmail_logging::formatters::JsonRecord;
use tempmail_logging::prelude::*;

/// Collector shared by every test in this binary; tests filter by source
fn collector() -> &'static FallbackCollector {
    static COLLECTOR: OnceLock<FallbackCollector> = OnceLock::new();
    COLLECTOR.get_or_init(|| {
        let collector = FallbackCollector::new();
        fallback::set_hook(collector.hook());
        collector
    })
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().clone()).expect("utf8 output")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Records the order handlers are invoked in, then delegates
struct Recording<H> {
    inner: H,
    calls: Arc<Mutex<Vec<String>>>,
}

impl<H: Handler> Handler for Recording<H> {
    fn handle(&self, entry: &LogEntry) -> Result<()> {
        self.calls.lock().push(self.inner.name().to_string());
        self.inner.handle(entry)
    }

    fn flush(&self) -> Result<()> {
        self.inner.flush()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[test]
fn test_threshold_and_handler_order() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let console_output = SharedBuffer::default();
    let calls = Arc::new(Mutex::new(Vec::new()));

    let configuration = LoggerConfiguration::new().with_minimum_level(LogLevel::Warning);
    configuration.add_handler(Arc::new(Recording {
        inner: ConsoleHandler::with_writer(Box::new(console_output.clone())),
        calls: calls.clone(),
    }));
    configuration.add_handler(Arc::new(Recording {
        inner: FileHandler::in_directory(temp_dir.path()).expect("Failed to create file handler"),
        calls: calls.clone(),
    }));
    let logger = Logger::new("Telegram.Core", configuration.shared());

    logger.info("x");
    assert!(calls.lock().is_empty());
    assert_eq!(logger.metrics().below_threshold(), 1);

    logger.error("y");
    assert_eq!(*calls.lock(), ["console", "file"]);

    let files: Vec<_> = fs::read_dir(temp_dir.path())
        .expect("Failed to list log directory")
        .map(|e| e.expect("dir entry").path())
        .collect();
    assert_eq!(files.len(), 1);
    let file_output = fs::read_to_string(&files[0]).expect("Failed to read log file");

    assert_eq!(console_output.contents(), file_output);
    assert!(file_output.ends_with(" [ERROR] Telegram.Core: y\n"));
}

#[test]
fn test_every_handler_invoked_once_in_order() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let configuration = LoggerConfiguration::new();
    for name in ["first", "second", "third"] {
        configuration.add_handler(Arc::new(Recording {
            inner: MemoryHandler::named(name),
            calls: calls.clone(),
        }));
    }
    let logger = Logger::new("Client.Data", configuration.shared());

    for level in LogLevel::ALL {
        logger.log(level, "level check");
    }

    // Info, Warning, Error, Critical pass the default threshold
    let expected: Vec<&str> =
        std::iter::repeat(["first", "second", "third"]).take(4).flatten().collect();
    assert_eq!(*calls.lock(), expected);
}

#[test]
fn test_category_filter_exclusive() {
    let filter = CategoryFilter::new("^Telegram", false).expect("valid pattern");
    assert!(!filter.is_enabled(&LogEntry::new("Telegram.Core", LogLevel::Info, "m")));
    assert!(filter.is_enabled(&LogEntry::new("Client.Data", LogLevel::Info, "m")));
}

#[test]
fn test_level_filter_wins_regardless_of_other_filters() {
    let memory = Arc::new(MemoryHandler::new());
    let configuration = LoggerConfiguration::new()
        .with_minimum_level(LogLevel::Trace)
        .with_filter(CategoryFilter::include(".*").expect("valid pattern"))
        .with_filter(LevelFilter::new(LogLevel::Warning));
    configuration.add_handler(memory.clone());
    let logger = Logger::new("Telegram.Core", configuration.shared());

    logger.info("dropped");
    logger.error("kept");

    assert_eq!(memory.messages(), ["kept"]);
    assert_eq!(logger.metrics().filtered(), 1);
    assert_eq!(logger.metrics().dispatched(), 1);
}

#[test]
fn test_invalid_category_pattern_fails_fast() {
    assert!(matches!(
        CategoryFilter::new("(unclosed", true),
        Err(LoggerError::InvalidPattern { .. })
    ));
}

#[test]
fn test_failing_handler_is_isolated() {
    struct Broken;
    impl Handler for Broken {
        fn handle(&self, _entry: &LogEntry) -> Result<()> {
            Err(LoggerError::other("smtp relay down"))
        }
        fn name(&self) -> &str {
            "broken-integration"
        }
    }

    let collector = collector();
    let memory = Arc::new(MemoryHandler::new());
    let configuration = LoggerConfiguration::new().with_handler(Broken);
    configuration.add_handler(memory.clone());
    let logger = Logger::new("Telegram.Core", configuration.shared());

    logger.warning("still delivered");

    assert_eq!(memory.messages(), ["still delivered"]);
    assert_eq!(logger.metrics().handler_failures(), 1);
    let reports = collector.reports_from("broken-integration");
    assert_eq!(reports.len(), 1);
    assert!(reports[0].message.contains("smtp relay down"));
}

#[test]
fn test_scope_round_trip_under_concurrency() {
    let memory = Arc::new(MemoryHandler::new());
    let configuration = LoggerConfiguration::new();
    configuration.add_handler(memory.clone());
    let logger = Arc::new(Logger::new("Telegram.Core", configuration.shared()));

    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let logger = Arc::clone(&logger);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                let scope =
                    logger.begin_scope(properties([("Worker", FieldValue::from(t as i64))]));
                logger.info(format!("inside-{}", t));
                assert!(logger.active_scopes() >= 1);
                drop(scope);
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker panicked");
    }

    assert_eq!(logger.active_scopes(), 0);
    logger.info("after");

    let entries = memory.entries();
    for t in 0..threads {
        let entry = entries
            .iter()
            .find(|e| e.message == format!("inside-{}", t))
            .expect("entry logged inside scope");
        assert!(entry.properties.contains_key("Worker"));
    }
    let after = entries.iter().find(|e| e.message == "after").expect("entry after scopes");
    assert!(!after.properties.contains_key("Worker"));
    assert!(!after.properties.contains_key(SCOPE_PROPERTY));
}

#[test]
fn test_nested_scope_labels() {
    let memory = Arc::new(MemoryHandler::new());
    let configuration = LoggerConfiguration::new();
    configuration.add_handler(memory.clone());
    let logger = Logger::new("Telegram.Core", configuration.shared());

    {
        let _outer = logger.begin_scope("chat 42");
        let _inner = logger.begin_scope("command /new");
        logger.info("nested");
    }
    logger.info("bare");

    let entries = memory.entries();
    assert_eq!(
        entries[0].properties[SCOPE_PROPERTY],
        FieldValue::from("chat 42 => command /new")
    );
    assert!(entries[1].properties.is_empty());
}

#[test]
fn test_factory_concurrent_create_returns_one_instance() {
    struct CountingProvider(AtomicUsize);
    impl LoggerProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }
        fn create_logger(&self, name: &str) -> Result<Arc<Logger>> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Logger::new(name, LoggerConfiguration::new().shared())))
        }
    }

    let factory = Arc::new(LoggerFactory::new(LoggerConfiguration::new().shared()));
    let provider = Arc::new(CountingProvider(AtomicUsize::new(0)));
    factory.add_provider(provider.clone());

    let threads = 16;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let factory = Arc::clone(&factory);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                factory.create_logger("Telegram.Commands")
            })
        })
        .collect();
    let loggers: Vec<Arc<Logger>> = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked"))
        .collect();

    assert!(loggers.iter().all(|l| Arc::ptr_eq(l, &loggers[0])));
    assert_eq!(provider.0.load(Ordering::SeqCst), 1);
    assert_eq!(factory.loggers(), ["Telegram.Commands"]);
}

#[test]
fn test_factory_dispose_isolates_provider_failures() {
    struct FailingDispose(&'static str);
    impl LoggerProvider for FailingDispose {
        fn name(&self) -> &str {
            self.0
        }
        fn create_logger(&self, name: &str) -> Result<Arc<Logger>> {
            Ok(Arc::new(Logger::new(name, LoggerConfiguration::new().shared())))
        }
        fn dispose(&self) -> Result<()> {
            Err(LoggerError::other("flush timed out"))
        }
    }

    let collector = collector();
    let factory = LoggerFactory::new(LoggerConfiguration::new().shared());
    factory.add_provider(Arc::new(FailingDispose("integration-dispose-a")));
    factory.add_provider(Arc::new(FailingDispose("integration-dispose-b")));

    factory.dispose();
    factory.dispose();

    assert!(factory.is_disposed());
    assert_eq!(collector.reports_from("integration-dispose-a").len(), 1);
    assert_eq!(collector.reports_from("integration-dispose-b").len(), 1);
    assert!(matches!(
        factory.remove_provider("integration-dispose-a"),
        Err(LoggerError::Unsupported { .. })
    ));
}

#[test]
fn test_file_rotation_through_logger() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let configuration = LoggerConfiguration::new();
    configuration.add_handler(Arc::new(
        FileHandler::new(temp_dir.path(), 60, 2)
            .expect("Failed to create file handler")
            .with_template("{Message}"),
    ));
    let logger = Logger::new("Telegram.Core", configuration.shared());

    // 30 bytes per line, so every file holds two lines
    for i in 0..7 {
        logger.info(format!("{:029}", i));
    }

    let mut names: Vec<String> = fs::read_dir(temp_dir.path())
        .expect("Failed to list log directory")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names.len(), 3);
    assert!(names[0].ends_with(".log"));
    assert!(names[1].ends_with(".log.1"));
    assert!(names[2].ends_with(".log.2"));

    let active =
        fs::read_to_string(temp_dir.path().join(&names[0])).expect("Failed to read active file");
    assert_eq!(active, format!("{:029}\n", 6));
}

#[test]
fn test_database_handler_through_logger() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let database = temp_dir.path().join("logs.db");
    let connection_string = format!("Data Source={}", database.display());
    let handler =
        Arc::new(DatabaseHandler::new(connection_string, "Logs").expect("valid handler"));
    handler.ensure_table().expect("Failed to create table");

    let configuration = LoggerConfiguration::new();
    configuration.add_handler(handler.clone());
    let logger = Logger::new("Client.Data", configuration.shared());

    let io_error = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
    logger.error_with_error("Mail API unreachable", &io_error);
    logger.info_template("Mailbox {Address} created", &["a1b2@tmp.io".into()]);

    let rows = handler.read_all().expect("Failed to read rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].level, "ERROR");
    assert!(rows[0].exception.as_deref().is_some_and(|e| e.contains("connection refused")));
    assert_eq!(rows[1].message, "Mailbox a1b2@tmp.io created");
    assert_eq!(rows[1].properties, r#"{"Address":"a1b2@tmp.io"}"#);
}

#[test]
fn test_json_output_round_trip() {
    let memory = Arc::new(MemoryHandler::new().with_formatter(Arc::new(JsonFormatter::new())));
    let configuration = LoggerConfiguration::new();
    configuration.add_handler(memory.clone());
    let logger = Logger::new("Telegram.Core", configuration.shared());

    logger.warning_template(
        "Chat {ChatId} over quota ({Used} of {Limit})",
        &[42.into(), 11.into(), 10.into()],
    );

    let entry = &memory.entries()[0];
    let record = JsonRecord::parse(&memory.lines()[0]).expect("valid JSON");
    assert_eq!(record.logger_name, entry.logger_name);
    assert_eq!(record.level, entry.level);
    assert_eq!(record.message, "Chat 42 over quota (11 of 10)");
    assert_eq!(record.properties, entry.properties);
    assert_eq!(record.exception, None);
}

#[test]
fn test_configuration_from_json_settings() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let json = serde_json::json!({
        "MinimumLevel": "Warning",
        "Handlers": [
            { "Type": "file", "Enabled": true,
              "Settings": { "LogDirectory": temp_dir.path(),
                            "MaxFileSize": 4096,
                            "MaxBackupCount": 1,
                            "Template": "{Level}|{LoggerName}|{Message}" } },
            { "Type": "console", "Enabled": false, "Settings": {} }
        ],
        "Filters": [
            { "Type": "category", "Settings": { "Pattern": "^Telegram", "IsInclusive": false } }
        ]
    });
    let settings = LoggingSettings::from_json_str(&json.to_string()).expect("valid settings");
    let configuration = LoggerConfiguration::from_settings(&settings).expect("valid configuration");
    let factory = LoggerFactory::new(configuration.shared());

    factory.create_logger("Telegram.Core").error("hidden by category");
    factory.create_logger("Client.Data").info("below threshold");
    factory.create_logger("Client.Data").critical("written");

    let files: Vec<_> = fs::read_dir(temp_dir.path())
        .expect("Failed to list log directory")
        .map(|e| e.expect("dir entry").path())
        .collect();
    assert_eq!(files.len(), 1);
    assert_eq!(
        fs::read_to_string(&files[0]).expect("Failed to read log file"),
        "CRITICAL|Client.Data|written\n"
    );
}

#[test]
fn test_ambient_context_follows_async_tasks() {
    let memory = Arc::new(MemoryHandler::new());
    let configuration = LoggerConfiguration::new();
    configuration.add_handler(memory.clone());
    let logger = Arc::new(Logger::new("Telegram.Updates", configuration.shared()));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("Failed to build runtime");

    runtime.block_on(async {
        let mut tasks = Vec::new();
        for update_id in 0..4i64 {
            let logger = Arc::clone(&logger);
            tasks.push(tokio::spawn(LogContext::scope(
                properties([("UpdateId", update_id.into())]),
                async move {
                    tokio::task::yield_now().await;
                    let child = LogContext::spawn({
                        let logger = Arc::clone(&logger);
                        async move { logger.info(format!("child-{}", update_id)) }
                    });
                    logger.info(format!("update-{}", update_id));
                    child.await.expect("child task panicked");
                },
            )));
        }
        for task in tasks {
            task.await.expect("task panicked");
        }
    });
    logger.info("outside");

    for entry in memory.entries() {
        match entry.message.split_once('-') {
            Some((_, id)) => {
                let id: i64 = id.parse().expect("numeric suffix");
                assert_eq!(entry.properties["UpdateId"], FieldValue::Int(id));
            }
            None => assert!(entry.properties.is_empty()),
        }
    }
    assert_eq!(memory.len(), 9);
}
