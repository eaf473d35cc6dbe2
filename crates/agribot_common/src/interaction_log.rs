//! Interaction log.
//!
//! Every answered question is appended to a JSON array on disk. The file is
//! read, extended and rewritten in full for each entry, so all writes go
//! through one writer thread that owns the file. Callers never wait on it
//! and never see its errors.
//!
//! Storage: `chat_logs.json` by default.

use crate::answer::Source;
use crate::error::AgriError;
use crate::language::Language;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

/// One logged interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub question: String,
    pub answer: Option<String>,
    pub language: Language,
    pub source: Source,
}

/// Entry waiting for the writer, which stamps the time at append
#[derive(Debug)]
struct PendingEntry {
    question: String,
    answer: Option<String>,
    language: Language,
    source: Source,
}

#[derive(Debug)]
enum LogCommand {
    Append(PendingEntry),
    Flush(oneshot::Sender<()>),
}

/// Handle to the log writer
#[derive(Debug, Clone)]
pub struct InteractionLog {
    path: PathBuf,
    tx: mpsc::UnboundedSender<LogCommand>,
}

impl InteractionLog {
    /// Start the writer. Must be called inside a tokio runtime.
    pub fn spawn(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let (tx, rx) = mpsc::unbounded_channel();

        let writer_path = path.clone();
        tokio::task::spawn_blocking(move || run_writer(writer_path, rx));

        Self { path, tx }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Queue an interaction. Never blocks and never fails the caller.
    pub fn log(&self, question: &str, answer: Option<&str>, language: &Language, source: Source) {
        let entry = PendingEntry {
            question: question.to_string(),
            answer: answer.map(str::to_string),
            language: language.clone(),
            source,
        };
        if self.tx.send(LogCommand::Append(entry)).is_err() {
            error!("Log error: writer has stopped, dropping entry");
        }
    }

    /// Wait until everything queued before this call is on disk
    pub async fn flush(&self) -> Result<(), AgriError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(LogCommand::Flush(done_tx))
            .map_err(|_| AgriError::LogChannelClosed)?;
        done_rx.await.map_err(|_| AgriError::LogChannelClosed)
    }
}

fn run_writer(path: PathBuf, mut rx: mpsc::UnboundedReceiver<LogCommand>) {
    let mut last_timestamp: Option<DateTime<Utc>> = None;

    while let Some(command) = rx.blocking_recv() {
        match command {
            LogCommand::Append(pending) => {
                // Wall clock may step backwards; entries must not
                let now = Utc::now();
                let timestamp = match last_timestamp {
                    Some(last) if last > now => last,
                    _ => now,
                };
                last_timestamp = Some(timestamp);

                let entry = LogEntry {
                    timestamp,
                    question: pending.question,
                    answer: pending.answer,
                    language: pending.language,
                    source: pending.source,
                };
                match append_entry(&path, &entry) {
                    Ok(()) => debug!("Logged interaction to {}", path.display()),
                    Err(e) => error!("Log error: {}", e),
                }
            }
            LogCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }

    debug!("Interaction log writer stopped");
}

/// Read the raw array, treating a missing or corrupt file as empty.
/// Entries of unknown shape are kept so they survive the rewrite.
fn read_raw(path: &Path) -> Vec<Value> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return Vec::new(),
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            warn!("Log file {} is not a JSON array, starting over", path.display());
            Vec::new()
        }
        Err(e) => {
            warn!("Log file {} is corrupt ({}), starting over", path.display(), e);
            Vec::new()
        }
    }
}

/// Read-modify-write one entry onto the log array
pub fn append_entry(path: &Path, entry: &LogEntry) -> Result<(), AgriError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut entries = read_raw(path);
    entries.push(serde_json::to_value(entry)?);

    // Write to temp file then rename so readers never see half an array
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, serde_json::to_string_pretty(&entries)?)?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Read all well-formed entries
pub fn read_all(path: &Path) -> Vec<LogEntry> {
    read_raw(path)
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect()
}
