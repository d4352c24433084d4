//! leadtrack-core: campaign attribution and funnel tracking for a
//! lead-generation landing page
//!
//! - **Attribution** - [`AttributionStore`] captures `utm_*` parameters from
//!   the entry URL and keeps the first campaign seen in the session for 30 days
//! - **Funnel events** - [`FunnelTracker`] maps milestones (view, intent,
//!   engagement, conversion, completion) onto analytics sink calls
//! - **Sinks** - [`FunnelSink`] trait with [`MemorySink`], [`TracingSink`]
//!   and [`JsonLinesSink`]
//! - **Session storage** - [`SessionStore`] trait with in-memory and
//!   file-backed implementations
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use leadtrack_core::{MemorySink, TrackingConfig, TrackingSession};
//!
//! let sink = Arc::new(MemorySink::new());
//! let session = TrackingSession::builder(TrackingConfig::with_measurement_id("G-XXXXXXXXXX"))
//!     .sink(sink.clone())
//!     .title("Get Early Access")
//!     .start("https://example.com/?utm_source=linkedin&utm_campaign=launch");
//!
//! let tracker = session.tracker();
//! tracker.page_view();
//! tracker.cta_click("primary_cta");
//!
//! assert_eq!(sink.event_names(), vec!["campaign_landing", "page_view", "cta_click"]);
//! ```
//!
//! # Startup order
//!
//! ```text
//! entry URL ──► capture ──► persist (first touch) ──► campaign_landing
//!                                   │
//!                                   ▼
//!                            get_attribution ──► FunnelTracker handed out
//! ```

pub mod attribution;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod session;
pub mod sink;
pub mod storage;
pub mod tracker;

// Re-export key types for convenience
pub use attribution::{
    ATTRIBUTION_TTL_MILLIS, AttributionData, AttributionParameters, AttributionRecord,
    AttributionStore, PersistOutcome, UtmKey, capture,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{MEASUREMENT_ID_ENV, TrackingConfig};
pub use error::{ConfigError, SinkError, StorageError};
pub use events::{DismissAction, EventParams, FunnelEvent, FunnelEventName, ParamValue};
pub use session::{SessionBuilder, TrackingSession};
pub use sink::{FunnelSink, JsonLinesSink, MemorySink, SentEvent, TracingSink};
pub use storage::{FileSessionStore, MemorySessionStore, SessionStore};
pub use tracker::{FormStartLatch, FunnelTracker, PageContext};
