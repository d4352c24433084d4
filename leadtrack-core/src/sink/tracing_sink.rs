//! Sink that writes events to the tracing subscriber

use std::sync::RwLock;

use tracing::info;

use super::FunnelSink;
use crate::error::SinkError;
use crate::events::EventParams;

/// Logs every event under the `leadtrack::events` target
#[derive(Debug, Default)]
pub struct TracingSink {
    measurement_id: RwLock<Option<String>>,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FunnelSink for TracingSink {
    fn configure(&self, measurement_id: &str) -> bool {
        match self.measurement_id.write() {
            Ok(mut id) => {
                *id = Some(measurement_id.to_string());
                info!(target: "leadtrack::events", measurement_id, "Analytics sink configured");
                true
            }
            Err(_) => false,
        }
    }

    fn send(&self, name: &str, params: &EventParams) -> Result<(), SinkError> {
        let id = self
            .measurement_id
            .read()
            .ok()
            .and_then(|id| id.clone())
            .ok_or(SinkError::NotConfigured)?;
        let params = serde_json::to_string(params).map_err(|e| SinkError::SendFailed {
            event: name.to_string(),
            reason: e.to_string(),
        })?;
        info!(target: "leadtrack::events", measurement_id = %id, event = name, %params, "Funnel event");
        Ok(())
    }
}
