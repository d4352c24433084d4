//! Analytics sink abstraction
//!
//! The sink is the external analytics vendor: it is configured once with a
//! measurement id and then accepts named events. Delivery is best-effort.

mod jsonl;
mod memory;
mod tracing_sink;

pub use jsonl::JsonLinesSink;
pub use memory::MemorySink;
pub use tracing_sink::TracingSink;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SinkError;
use crate::events::EventParams;

/// Trait for analytics event sinks
pub trait FunnelSink: Send + Sync {
    /// Configure the sink for a measurement id, returns whether it is ready
    fn configure(&self, measurement_id: &str) -> bool;

    /// Hand an event to the sink. Fire-and-forget: an `Err` is only logged.
    fn send(&self, name: &str, params: &EventParams) -> Result<(), SinkError>;
}

impl<T: FunnelSink + ?Sized> FunnelSink for Arc<T> {
    fn configure(&self, measurement_id: &str) -> bool {
        (**self).configure(measurement_id)
    }

    fn send(&self, name: &str, params: &EventParams) -> Result<(), SinkError> {
        (**self).send(name, params)
    }
}

/// An event as recorded by the in-process sinks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentEvent {
    pub seq: u64,
    pub name: String,
    pub params: EventParams,
    pub sent_at: DateTime<Utc>,
}
