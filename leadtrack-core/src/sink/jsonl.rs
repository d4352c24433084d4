//! Append-only JSON-lines event log

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tracing::warn;

use super::{FunnelSink, SentEvent};
use crate::error::{SinkError, StorageError};
use crate::events::EventParams;

/// Appends one [`SentEvent`] per line to a file
///
/// Sequence numbers continue from the existing log, so the file reads as one
/// ordered stream across process restarts.
#[derive(Debug)]
pub struct JsonLinesSink {
    file_path: PathBuf,
    file: Mutex<File>,
    next_seq: AtomicU64,
    measurement_id: Mutex<Option<String>>,
}

impl JsonLinesSink {
    /// Open (or create) the log at `file_path`
    pub fn open(file_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let file_path = file_path.as_ref().to_path_buf();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let next_seq = Self::read_all(&file_path)?
            .last()
            .map(|event| event.seq + 1)
            .unwrap_or(0);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)?;

        Ok(Self {
            file_path,
            file: Mutex::new(file),
            next_seq: AtomicU64::new(next_seq),
            measurement_id: Mutex::new(None),
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Read every well-formed record from a log. Missing file reads as empty;
    /// malformed lines are skipped with a warning.
    pub fn read_all(file_path: impl AsRef<Path>) -> Result<Vec<SentEvent>, StorageError> {
        let file_path = file_path.as_ref();
        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(file_path)?);
        let mut events = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<SentEvent>(&line) {
                Ok(event) => events.push(event),
                Err(e) => warn!(line = index + 1, error = %e, "Skipping malformed event log line"),
            }
        }
        Ok(events)
    }

    fn send_failed(name: &str, reason: impl ToString) -> SinkError {
        SinkError::SendFailed {
            event: name.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl FunnelSink for JsonLinesSink {
    fn configure(&self, measurement_id: &str) -> bool {
        match self.measurement_id.lock() {
            Ok(mut id) => {
                *id = Some(measurement_id.to_string());
                true
            }
            Err(_) => false,
        }
    }

    fn send(&self, name: &str, params: &EventParams) -> Result<(), SinkError> {
        let configured = self
            .measurement_id
            .lock()
            .map(|id| id.is_some())
            .unwrap_or(false);
        if !configured {
            return Err(SinkError::NotConfigured);
        }

        let mut file = self
            .file
            .lock()
            .map_err(|_| Self::send_failed(name, "event log lock poisoned"))?;

        let event = SentEvent {
            seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
            name: name.to_string(),
            params: params.clone(),
            sent_at: Utc::now(),
        };
        let line = serde_json::to_string(&event).map_err(|e| Self::send_failed(name, e))?;
        writeln!(file, "{}", line).map_err(|e| Self::send_failed(name, e))?;
        Ok(())
    }
}
