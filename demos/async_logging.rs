//! Ambient context example
//!
//! Each incoming update is handled in its own tokio task with an `UpdateId` context.
//! Entries logged from the task, and from tasks it spawns, carry that property.
//!
//! Run with: cargo run --example async_logging

use std::sync::Arc;
use std::time::Duration;
use tempmail_logging::prelude::*;

async fn handle_update(logger: Arc<Logger>, update_id: i64) {
    logger.info("Update received");
    tokio::time::sleep(Duration::from_millis(10 * (update_id as u64 % 3))).await;

    let fetcher = LogContext::spawn({
        let logger = Arc::clone(&logger);
        async move { logger.debug("Fetching inbox in a child task") }
    });
    let _ = fetcher.await;

    logger.info("Update handled");
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Temp-mail Logging - Ambient Context Example ===\n");

    let configuration = LoggerConfiguration::new().with_minimum_level(LogLevel::Debug);
    configuration.add_handler(Arc::new(ConsoleHandler::new().with_template(
        "{Timestamp:HH:mm:ss.fff} [{Level}] {LoggerName}: {Message}",
    )));
    let factory = LoggerFactory::new(configuration.shared());
    let logger = factory.create_logger("Telegram.Updates");

    let tasks: Vec<_> = (1..=5)
        .map(|update_id: i64| {
            tokio::spawn(LogContext::scope(
                properties([("UpdateId", update_id.into())]),
                handle_update(Arc::clone(&logger), update_id),
            ))
        })
        .collect();
    for task in tasks {
        let _ = task.await;
    }

    logger.info("All updates handled; this entry has no UpdateId");

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
