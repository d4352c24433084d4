//! First-touch attribution store
//!
//! Persists the first campaign seen in a session under the `utm_params`
//! session key, expires it lazily after [`ATTRIBUTION_TTL_MILLIS`], and
//! answers "where did this visitor come from" for event enrichment.
//!
//! Storage failures never escape: they are logged and read as "no
//! attribution available".

use std::sync::Mutex;

use tracing::{debug, error, warn};

use super::capture::capture;
use super::types::{ATTRIBUTION_TTL_MILLIS, AttributionData, AttributionParameters, AttributionRecord};
use crate::clock::{Clock, SystemClock};
use crate::error::StorageError;
use crate::events::FunnelEvent;
use crate::sink::FunnelSink;
use crate::storage::SessionStore;

/// Session storage key holding the serialized [`AttributionRecord`]
pub const STORAGE_KEY: &str = "utm_params";

/// Outcome of a [`AttributionStore::persist`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// A new first-touch record was written
    Written,
    /// A live record already exists; first touch wins
    AlreadyCaptured,
    /// Nothing to persist
    Empty,
    /// Storage failed; attribution is unavailable for this call
    Failed,
}

/// First-touch attribution over a session store
pub struct AttributionStore<S, C = SystemClock> {
    store: S,
    clock: C,
    ttl_millis: i64,
    /// Serializes the read-check-write in `persist` against concurrent callers
    guard: Mutex<()>,
}

impl<S: SessionStore> AttributionStore<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: SessionStore, C: Clock> AttributionStore<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            ttl_millis: ATTRIBUTION_TTL_MILLIS,
            guard: Mutex::new(()),
        }
    }

    /// Write `params` as the session's first-touch record unless a live
    /// record already exists.
    pub fn persist(&self, params: &AttributionParameters) -> PersistOutcome {
        if params.is_empty() {
            return PersistOutcome::Empty;
        }

        let _guard = self.guard.lock().unwrap_or_else(|e| e.into_inner());

        match self.load_live() {
            Ok(Some(_)) => {
                debug!("Campaign parameters already captured (first-touch attribution)");
                return PersistOutcome::AlreadyCaptured;
            }
            Ok(None) => {}
            Err(StorageError::Serialization(e)) => {
                warn!(error = %e, "Replacing unreadable attribution record");
            }
            Err(e) => {
                error!(error = %e, "Failed to save campaign parameters");
                return PersistOutcome::Failed;
            }
        }

        let record = AttributionRecord::new(params.clone(), self.clock.now_millis());
        let written = serde_json::to_string(&record)
            .map_err(StorageError::from)
            .and_then(|json| self.store.set(STORAGE_KEY, &json));

        match written {
            Ok(()) => {
                debug!(params = ?params, "Campaign parameters captured");
                PersistOutcome::Written
            }
            Err(e) => {
                error!(error = %e, "Failed to save campaign parameters");
                PersistOutcome::Failed
            }
        }
    }

    /// Stored first-touch parameters, or `None` when absent, expired, or
    /// unreadable. An expired record is deleted on the spot.
    pub fn retrieve(&self) -> Option<AttributionParameters> {
        let _guard = self.guard.lock().unwrap_or_else(|e| e.into_inner());

        match self.load_live() {
            Ok(record) => record.map(|r| r.params),
            Err(e) => {
                error!(error = %e, "Failed to retrieve campaign parameters");
                None
            }
        }
    }

    /// Attribution context for events: the stored campaign, or organic.
    pub fn get_attribution(&self) -> AttributionData {
        match self.retrieve() {
            Some(params) => AttributionData::Campaign(params),
            None => AttributionData::Organic,
        }
    }

    /// Session-start entry point.
    ///
    /// Captures the URL's campaign parameters, persists them first-touch,
    /// and emits `campaign_landing` with the *URL's* parameters whenever
    /// any were present, whether or not they were the ones persisted.
    /// `sink` is `None` when tracking is disabled; capture and persistence
    /// still happen. Returns the captured parameters.
    pub fn init_tracking(&self, url: &str, sink: Option<&dyn FunnelSink>) -> AttributionParameters {
        let captured = capture(url);
        if captured.is_empty() {
            return captured;
        }

        self.persist(&captured);

        match sink {
            Some(sink) => {
                let landing = FunnelEvent::campaign_landing(&captured, url);
                if let Err(e) = sink.send(landing.name.as_str(), &landing.params) {
                    error!(error = %e, "Failed to emit campaign landing");
                }
            }
            None => debug!("Tracking disabled; campaign landing not emitted"),
        }

        captured
    }

    fn load_live(&self) -> Result<Option<AttributionRecord>, StorageError> {
        let Some(raw) = self.store.get(STORAGE_KEY)? else {
            return Ok(None);
        };
        let record: AttributionRecord = serde_json::from_str(&raw)?;

        if record.is_expired(self.clock.now_millis(), self.ttl_millis) {
            debug!(captured_at = record.timestamp, "Campaign parameters expired");
            self.store.remove(STORAGE_KEY)?;
            return Ok(None);
        }

        Ok(Some(record))
    }
}
