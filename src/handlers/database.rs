//! SQLite database handler
//!
//! Opens a connection per entry; there is no pooling or batching. Create the table
//! once at startup with [`DatabaseHandler::ensure_table`].

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::Rendering;
use crate::core::{fallback, Formatter, Handler, LogEntry, LoggerError, Result, TimestampFormat};

/// One row of the log table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredLog {
    pub id: i64,
    pub logger_name: String,
    pub level: String,
    pub message: String,
    pub exception: Option<String>,
    pub timestamp: String,
    /// Properties as JSON text
    pub properties: String,
}

pub struct DatabaseHandler {
    connection_string: String,
    database_path: PathBuf,
    table_name: String,
    /// Renders the `Message` column when set; otherwise the raw message is stored
    rendering: Option<Rendering>,
}

impl DatabaseHandler {
    /// `connection_string` is a file path or `Data Source=path[;...]`.
    ///
    /// # Errors
    ///
    /// Returns error if the table name is not a plain identifier or no path is given
    pub fn new(
        connection_string: impl Into<String>,
        table_name: impl Into<String>,
    ) -> Result<Self> {
        let connection_string = connection_string.into();
        let table_name = table_name.into();

        if !is_identifier(&table_name) {
            return Err(LoggerError::config(
                "DatabaseHandler",
                format!("table name '{}' is not a valid identifier", table_name),
            ));
        }
        let database_path = parse_connection_string(&connection_string)?;

        Ok(Self {
            connection_string,
            database_path,
            table_name,
            rendering: None,
        })
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        let template = self.rendering.as_ref().and_then(|r| r.template().map(str::to_string));
        self.rendering = Some(Rendering::new(formatter).with_template(template));
        self
    }

    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        let rendering = self.rendering.take().unwrap_or_default();
        self.rendering = Some(rendering.with_template(Some(template.into())));
        self
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.database_path)?)
    }

    /// Create the log table if it does not exist
    pub fn ensure_table(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                 Id INTEGER PRIMARY KEY AUTOINCREMENT,
                 LoggerName TEXT NOT NULL,
                 Level TEXT NOT NULL,
                 Message TEXT NOT NULL,
                 Exception TEXT NULL,
                 Timestamp TEXT NOT NULL,
                 Properties TEXT NOT NULL
             );",
            table = self.table_name
        ))?;
        Ok(())
    }

    fn insert(&self, entry: &LogEntry) -> Result<()> {
        let message = match self.rendering {
            Some(ref rendering) => rendering.render(entry)?,
            None => entry.message.clone(),
        };
        let exception = entry.exception.as_ref().map(ToString::to_string);
        let timestamp = TimestampFormat::Rfc3339Millis.format(&entry.timestamp);
        let properties = serde_json::to_string(&entry.properties)?;

        let conn = self.connect()?;
        conn.execute(
            &format!(
                "INSERT INTO {} (LoggerName, Level, Message, Exception, Timestamp, Properties)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                self.table_name
            ),
            rusqlite::params![
                entry.logger_name,
                entry.level.to_str(),
                message,
                exception,
                timestamp,
                properties,
            ],
        )?;
        Ok(())
    }

    /// All stored rows, oldest first
    pub fn read_all(&self) -> Result<Vec<StoredLog>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT Id, LoggerName, Level, Message, Exception, Timestamp, Properties \
             FROM {} ORDER BY Id",
            self.table_name
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok(StoredLog {
                id: row.get(0)?,
                logger_name: row.get(1)?,
                level: row.get(2)?,
                message: row.get(3)?,
                exception: row.get(4)?,
                timestamp: row.get(5)?,
                properties: row.get(6)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

impl Handler for DatabaseHandler {
    /// Failures are reported to the fallback sink and never returned
    fn handle(&self, entry: &LogEntry) -> Result<()> {
        if let Err(e) = self.insert(entry) {
            fallback::report(format!("handler 'database' ({})", self.table_name), e);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "database"
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Extract the database path from `Data Source=...;` style strings
fn parse_connection_string(connection_string: &str) -> Result<PathBuf> {
    let trimmed = connection_string.trim();
    if !trimmed.contains('=') {
        if trimmed.is_empty() {
            return Err(LoggerError::config("DatabaseHandler", "connection string is empty"));
        }
        return Ok(PathBuf::from(trimmed));
    }

    trimmed
        .split(';')
        .filter_map(|part| part.split_once('='))
        .find(|(key, _)| {
            let key = key.trim().to_ascii_lowercase();
            key == "data source" || key == "datasource" || key == "filename"
        })
        .map(|(_, value)| PathBuf::from(value.trim()))
        .filter(|path| !path.as_os_str().is_empty())
        .ok_or_else(|| {
            LoggerError::config(
                "DatabaseHandler",
                format!("no 'Data Source' in connection string '{}'", connection_string),
            )
        })
}
