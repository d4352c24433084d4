//! Tracking session startup
//!
//! Attribution capture has to finish before any funnel event can read it.
//! [`SessionBuilder::start`] enforces that ordering: it configures the sink,
//! runs [`AttributionStore::init_tracking`] for the entry URL, snapshots the
//! attribution, and only then returns the [`FunnelTracker`].

use std::sync::Arc;

use tracing::{debug, info_span};
use uuid::Uuid;

use crate::attribution::{AttributionData, AttributionParameters, AttributionStore};
use crate::clock::{Clock, SystemClock};
use crate::config::TrackingConfig;
use crate::sink::{FunnelSink, TracingSink};
use crate::storage::{MemorySessionStore, SessionStore};
use crate::tracker::{FunnelTracker, PageContext};

/// Attribution store as wired by a session
pub type SessionAttributionStore = AttributionStore<Arc<dyn SessionStore>, Arc<dyn Clock>>;

/// Collects collaborators for a [`TrackingSession`]
///
/// Defaults: in-memory session storage, [`TracingSink`], wall clock.
pub struct SessionBuilder {
    config: TrackingConfig,
    store: Option<Arc<dyn SessionStore>>,
    sink: Option<Arc<dyn FunnelSink>>,
    clock: Option<Arc<dyn Clock>>,
    title: String,
}

impl SessionBuilder {
    pub fn new(config: TrackingConfig) -> Self {
        Self {
            config,
            store: None,
            sink: None,
            clock: None,
            title: String::new(),
        }
    }

    pub fn store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn FunnelSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Title of the entry page, used by `page_view`
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Run session startup for a visitor arriving at `entry_url`
    pub fn start(self, entry_url: &str) -> TrackingSession {
        self.build(entry_url, true)
    }

    /// Re-attach to a page whose startup already ran in this browser
    /// session. Reads the stored attribution but does not capture the URL
    /// again, so no second `campaign_landing` goes out.
    pub fn resume(self, location: &str) -> TrackingSession {
        self.build(location, false)
    }

    fn build(self, location: &str, entry: bool) -> TrackingSession {
        let id = Uuid::new_v4();
        let span = info_span!("tracking_session", session_id = %id);
        let _entered = span.enter();

        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(TracingSink::new()) as Arc<dyn FunnelSink>);
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemorySessionStore::new()) as Arc<dyn SessionStore>);
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);

        let mut tracker = FunnelTracker::new(sink, PageContext::new(location, self.title), id);
        tracker.configure(&self.config);

        let attribution_store = AttributionStore::with_clock(store, clock);
        let landing = if entry {
            attribution_store.init_tracking(location, tracker.is_ready().then(|| tracker.sink()))
        } else {
            AttributionParameters::new()
        };
        let attribution = attribution_store.get_attribution();
        debug!(
            campaign = attribution.is_campaign(),
            tracking = tracker.is_ready(),
            "Tracking session started"
        );
        tracker.set_attribution(attribution.clone());

        TrackingSession {
            id,
            tracker,
            attribution_store,
            attribution,
            landing,
        }
    }
}

/// A started session: attribution captured, tracker ready to use
pub struct TrackingSession {
    id: Uuid,
    tracker: FunnelTracker,
    attribution_store: SessionAttributionStore,
    attribution: AttributionData,
    landing: AttributionParameters,
}

impl TrackingSession {
    pub fn builder(config: TrackingConfig) -> SessionBuilder {
        SessionBuilder::new(config)
    }

    pub fn session_id(&self) -> Uuid {
        self.id
    }

    pub fn tracker(&self) -> &FunnelTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut FunnelTracker {
        &mut self.tracker
    }

    /// Attribution as of session start
    pub fn attribution(&self) -> &AttributionData {
        &self.attribution
    }

    /// Campaign parameters on the entry URL (may differ from first touch)
    pub fn landing_params(&self) -> &AttributionParameters {
        &self.landing
    }

    /// Live attribution store, for re-reading after startup
    pub fn attribution_store(&self) -> &SessionAttributionStore {
        &self.attribution_store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribution::UtmKey;
    use crate::sink::MemorySink;

    #[test]
    fn start_with_defaults_is_disabled_without_id() {
        let session = TrackingSession::builder(TrackingConfig::default()).start("https://x.test/");
        assert!(!session.tracker().is_ready());
        assert_eq!(session.attribution(), &AttributionData::Organic);
    }

    #[test]
    fn start_captures_landing_params() {
        let sink = Arc::new(MemorySink::new());
        let session = TrackingSession::builder(TrackingConfig::with_measurement_id("G-TEST"))
            .sink(sink.clone())
            .title("Home")
            .start("https://x.test/?utm_source=newsletter");

        assert_eq!(session.landing_params().get(UtmKey::Source), Some("newsletter"));
        assert!(session.attribution().is_campaign());
        assert_eq!(session.tracker().page().title, "Home");
        assert_eq!(sink.event_names(), vec!["campaign_landing"]);
    }

    #[test]
    fn resume_reads_attribution_without_landing() {
        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        let sink = Arc::new(MemorySink::new());
        let url = "https://x.test/?utm_source=newsletter";

        TrackingSession::builder(TrackingConfig::with_measurement_id("G-TEST"))
            .store(store.clone())
            .sink(sink.clone())
            .start(url);
        let resumed = TrackingSession::builder(TrackingConfig::with_measurement_id("G-TEST"))
            .store(store)
            .sink(sink.clone())
            .resume(url);

        assert!(resumed.landing_params().is_empty());
        assert!(resumed.attribution().is_campaign());
        assert!(resumed.tracker().cta_click("primary_cta"));
        assert_eq!(sink.event_names(), vec!["campaign_landing", "cta_click"]);
    }

    #[test]
    fn sessions_get_distinct_ids() {
        let a = TrackingSession::builder(TrackingConfig::default()).start("https://x.test/");
        let b = TrackingSession::builder(TrackingConfig::default()).start("https://x.test/");
        assert_ne!(a.session_id(), b.session_id());
    }
}
