//! Basic logger usage example
//!
//! Demonstrates a factory-created logger writing to the console at different levels,
//! with scopes and message templates.
//!
//! Run with: cargo run --example basic_usage

use std::sync::Arc;
use tempmail_logging::formatters::StructuredFormatter;
use tempmail_logging::prelude::*;

fn main() -> Result<()> {
    println!("=== Temp-mail Logging - Basic Usage Example ===\n");

    let configuration = LoggerConfiguration::new().with_minimum_level(LogLevel::Trace);
    configuration.add_handler(Arc::new(ConsoleHandler::new()));
    let factory = LoggerFactory::new(configuration.shared());
    let logger = factory.create_logger("Telegram.Core");

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warning("This is a warning message");
    logger.error("This is an error message");
    logger.critical("This is a critical message");

    println!("\n2. Raising the minimum level to Information:");
    factory.configuration().set_minimum_level(LogLevel::Info);
    logger.debug("Debug message (hidden)");
    logger.info("Info message (visible)");

    println!("\n3. Templates and scopes:");
    {
        let _scope = logger.begin_scope("chat 42");
        logger.info_template("Mailbox {Address} created", &["a1b2@tmp.io".into()]);
    }

    println!("\n4. Errors with their source chain:");
    let cause = std::io::Error::new(std::io::ErrorKind::TimedOut, "mail API timed out");
    logger.error_with_error("Could not fetch inbox", &cause);

    println!("\n5. A second logger with logfmt output:");
    let structured = LoggerConfiguration::new();
    structured.add_handler(Arc::new(
        ConsoleHandler::new().with_formatter(Arc::new(StructuredFormatter::new())),
    ));
    let data = Logger::new("Client.Data", structured.shared());
    data.warning_template("Quota {Used} of {Limit}", &[9.into(), 10.into()]);

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
