//! In-memory sink for tests and dry runs

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;

use super::{FunnelSink, SentEvent};
use crate::error::SinkError;
use crate::events::EventParams;

/// Records everything it is sent
///
/// `rejecting()` builds a sink that refuses configuration, and
/// `fail_sends(true)` makes every send error, for exercising the
/// degraded paths.
#[derive(Debug, Default)]
pub struct MemorySink {
    measurement_id: Mutex<Option<String>>,
    events: Mutex<Vec<SentEvent>>,
    reject_configure: bool,
    fail_sends: AtomicBool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose `configure` always reports not ready
    pub fn rejecting() -> Self {
        Self {
            reject_configure: true,
            ..Self::default()
        }
    }

    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Measurement id passed to the last successful `configure`
    pub fn measurement_id(&self) -> Option<String> {
        self.measurement_id.lock().ok().and_then(|id| id.clone())
    }

    /// Snapshot of recorded events, oldest first
    pub fn events(&self) -> Vec<SentEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Names of recorded events, oldest first
    pub fn event_names(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.name).collect()
    }
}

impl FunnelSink for MemorySink {
    fn configure(&self, measurement_id: &str) -> bool {
        if self.reject_configure {
            return false;
        }
        match self.measurement_id.lock() {
            Ok(mut id) => {
                *id = Some(measurement_id.to_string());
                true
            }
            Err(_) => false,
        }
    }

    fn send(&self, name: &str, params: &EventParams) -> Result<(), SinkError> {
        if self.measurement_id().is_none() {
            return Err(SinkError::NotConfigured);
        }
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(SinkError::SendFailed {
                event: name.to_string(),
                reason: "simulated failure".to_string(),
            });
        }

        let mut events = self.events.lock().map_err(|_| SinkError::SendFailed {
            event: name.to_string(),
            reason: "event buffer lock poisoned".to_string(),
        })?;
        let seq = events.len() as u64;
        events.push(SentEvent {
            seq,
            name: name.to_string(),
            params: params.clone(),
            sent_at: Utc::now(),
        });
        Ok(())
    }
}
