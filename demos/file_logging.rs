//! File logging example
//!
//! Builds the pipeline from a `Logging` JSON section: colored console output plus a
//! daily file in `./logs` that rotates at 4 KB and keeps three backups.
//!
//! Run with: cargo run --example file_logging

use tempmail_logging::prelude::*;

const SETTINGS: &str = r#"{
    "MinimumLevel": "Debug",
    "Handlers": [
        { "Type": "console", "Enabled": true, "Settings": { "UseColors": true } },
        { "Type": "file", "Enabled": true,
          "Settings": { "LogDirectory": "logs", "MaxFileSize": 4096, "MaxBackupCount": 3 } }
    ],
    "Filters": [
        { "Type": "category", "Enabled": true,
          "Settings": { "Pattern": "^Vendor", "IsInclusive": false } }
    ]
}"#;

fn main() -> Result<()> {
    println!("=== Temp-mail Logging - File Logging Example ===\n");

    let settings = LoggingSettings::from_json_str(SETTINGS)?;
    let configuration = LoggerConfiguration::from_settings(&settings)?;
    let factory = LoggerFactory::new(configuration.shared());

    let bot = factory.create_logger("Telegram.Core");
    let client = factory.create_logger("Client.Data");
    let vendor = factory.create_logger("Vendor.Http");

    println!("1. Logging to both console and file:");
    bot.info("Bot started");
    client.debug("Loading mail API settings...");
    vendor.warning("Hidden by the category filter");

    println!("\n2. Enough traffic to rotate the daily file:");
    for i in 1..=100 {
        client.info_template(
            "Fetched inbox {Address} ({Count} letters)",
            &[format!("box{}@tmp.io", i).into(), (i % 7).into()],
        );
    }

    bot.flush();

    println!("\n=== Example completed successfully! ===");
    println!("Check the 'logs' directory for the daily file and its .1-.3 backups");

    Ok(())
}
