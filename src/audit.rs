// The audit log records every command the shell accepted. Records are written
// as JSON Lines, one `{"action": ..., "details": ...}` object per line, and
// each record is flushed before the command returns.

use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::errors::{Result, ShellError, ShellErrorType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub action: String,
    pub details: String,
}

impl LogEntry {
    pub fn new(action: &str, details: &str) -> LogEntry {
        LogEntry {
            action: action.to_string(),
            details: details.to_string(),
        }
    }
}

pub trait AuditSink {
    fn record(&mut self, entry: LogEntry) -> Result<()>;
}

impl AuditSink for Vec<LogEntry> {
    fn record(&mut self, entry: LogEntry) -> Result<()> {
        self.push(entry);
        Ok(())
    }
}

impl<S: AuditSink> AuditSink for Arc<Mutex<S>> {
    fn record(&mut self, entry: LogEntry) -> Result<()> {
        let mut sink = self.lock().map_err(|_| {
            ShellError::new(
                ShellErrorType::AuditError,
                "Audit log lock was poisoned".to_string(),
            )
        })?;
        sink.record(entry)
    }
}

pub struct AuditLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl AuditLog {
    /// Create the log at `path`, discarding anything already there.
    pub fn create(path: &Path) -> Result<AuditLog> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|e| {
                ShellError::new(
                    ShellErrorType::AuditError,
                    format!("Failed to create audit log {}: {}", path.display(), e),
                )
            })?;
        tracing::info!("Created audit log at {}", path.display());
        Ok(AuditLog {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for AuditLog {
    fn record(&mut self, entry: LogEntry) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &entry)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        tracing::debug!(action = %entry.action, details = %entry.details, "Audit record written");
        Ok(())
    }
}

pub fn read_log(path: &Path) -> Result<Vec<LogEntry>> {
    let reader = BufReader::new(File::open(path)?);
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(serde_json::from_str(&line)?);
    }
    Ok(entries)
}
