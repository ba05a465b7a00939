//! Daily file handler with size-based rotation
//!
//! Entries go to `{directory}/{yyyy-MM-dd}.log`, dated by the entry's UTC timestamp.
//! Before each write, if the active file has reached `max_file_size`, backups are
//! renumbered (`.k` becomes `.k+1`, anything past `max_backup_count` is deleted), the
//! active file becomes `.1`, and writing continues in a fresh file.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::Rendering;
use crate::core::{fallback, Formatter, Handler, LogEntry, LoggerError, Result};

/// Default size at which the active file is rotated (10 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default number of numbered backups kept per day
pub const DEFAULT_MAX_BACKUP_COUNT: usize = 5;

#[derive(Default)]
struct ActiveFile {
    path: Option<PathBuf>,
    writer: Option<BufWriter<File>>,
    size: u64,
}

pub struct FileHandler {
    directory: PathBuf,
    max_file_size: u64,
    max_backup_count: usize,
    rendering: Rendering,
    state: Mutex<ActiveFile>,
}

impl FileHandler {
    /// Create a handler writing into `directory`, creating it if needed
    ///
    /// # Errors
    ///
    /// Returns error if `max_file_size` is zero or the directory cannot be created
    pub fn new(
        directory: impl Into<PathBuf>,
        max_file_size: u64,
        max_backup_count: usize,
    ) -> Result<Self> {
        let directory = directory.into();
        if max_file_size == 0 {
            return Err(LoggerError::config("FileHandler", "MaxFileSize must be greater than zero"));
        }

        fs::create_dir_all(&directory).map_err(|e| {
            LoggerError::io_operation(
                "create log directory",
                format!("Failed to create directory '{}'", directory.display()),
                e,
            )
        })?;

        Ok(Self {
            directory,
            max_file_size,
            max_backup_count,
            rendering: Rendering::default(),
            state: Mutex::new(ActiveFile::default()),
        })
    }

    /// Handler with the default size limit and backup count
    pub fn in_directory(directory: impl Into<PathBuf>) -> Result<Self> {
        Self::new(directory, DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_BACKUP_COUNT)
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        let template = self.rendering.template().map(str::to_string);
        self.rendering = Rendering::new(formatter).with_template(template);
        self
    }

    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        // FileHandler implements Drop, so the rendering cannot be moved out
        let rendering = std::mem::take(&mut self.rendering);
        self.rendering = rendering.with_template(Some(template.into()));
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    pub fn max_backup_count(&self) -> usize {
        self.max_backup_count
    }

    /// Daily file an entry stamped at `timestamp` belongs to
    pub fn path_for(&self, timestamp: &DateTime<Utc>) -> PathBuf {
        self.directory.join(format!("{}.log", timestamp.format("%Y-%m-%d")))
    }

    /// Path of backup number `index` for the daily file at `path`
    pub fn backup_path(path: &Path, index: usize) -> PathBuf {
        let mut backup = path.to_path_buf();
        let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("app.log");
        backup.set_file_name(format!("{}.{}", filename, index));
        backup
    }

    fn write_entry(&self, entry: &LogEntry) -> Result<()> {
        let mut line = self.rendering.render(entry)?;
        line.push('\n');
        let path = self.path_for(&entry.timestamp);

        let mut state = self.state.lock();
        if state.path.as_deref() != Some(path.as_path()) || state.writer.is_none() {
            Self::open(&mut state, &path)?;
        }
        if state.size >= self.max_file_size {
            self.rotate(&mut state, &path)?;
        }

        let target = path.display().to_string();
        let writer = state
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::file_handler(&target, "writer not initialized"))?;
        let written = writer.write_all(line.as_bytes()).and_then(|()| writer.flush());
        written.map_err(|e| {
            LoggerError::file_handler(target, format!("Failed to write log entry: {}", e))
        })?;
        state.size += line.len() as u64;
        Ok(())
    }

    fn open(state: &mut ActiveFile, path: &Path) -> Result<()> {
        if let Some(mut writer) = state.writer.take() {
            // best effort; the previous day's file is done
            let _ = writer.flush();
        }

        let target = path.display().to_string();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| LoggerError::file_handler(&target, format!("Failed to open: {}", e)))?;
        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_handler(&target, format!("Cannot access file metadata: {}", e))
            })?
            .len();

        state.path = Some(path.to_path_buf());
        state.writer = Some(BufWriter::new(file));
        state.size = size;
        Ok(())
    }

    fn rotate(&self, state: &mut ActiveFile, path: &Path) -> Result<()> {
        if let Some(mut writer) = state.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        if self.max_backup_count == 0 {
            remove_if_exists(path)?;
        } else {
            remove_if_exists(&Self::backup_path(path, self.max_backup_count))?;

            for i in (1..self.max_backup_count).rev() {
                let old_path = Self::backup_path(path, i);
                if old_path.exists() {
                    let new_path = Self::backup_path(path, i + 1);
                    fs::rename(&old_path, &new_path).map_err(|e| {
                        LoggerError::file_rotation(
                            old_path.display().to_string(),
                            format!("Failed to rotate backup files: {}", e),
                        )
                    })?;
                }
            }

            if path.exists() {
                fs::rename(path, Self::backup_path(path, 1)).map_err(|e| {
                    LoggerError::file_rotation(
                        path.display().to_string(),
                        format!("Failed to rotate current log file: {}", e),
                    )
                })?;
            }
        }

        Self::open(state, path)
    }
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LoggerError::file_rotation(
            path.display().to_string(),
            format!("Failed to remove old backup: {}", e),
        )),
    }
}

impl Handler for FileHandler {
    /// Failures are reported to the fallback sink and never returned
    fn handle(&self, entry: &LogEntry) -> Result<()> {
        if let Err(e) = self.write_entry(entry) {
            fallback::report("handler 'file'", e);
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let mut state = self.state.lock();
        if let Some(ref mut writer) = state.writer {
            if let Err(e) = writer.flush() {
                fallback::report("handler 'file'", format!("Failed to flush: {}", e));
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileHandler {
    fn drop(&mut self) {
        if let Some(mut writer) = self.state.get_mut().writer.take() {
            let _ = writer.flush();
        }
    }
}
