//! Funnel event tracker
//!
//! [`FunnelTracker::emit`] is the one primitive: it stamps the current page
//! location onto the event and hands it to the sink. The milestone helpers
//! only exist to keep event names and parameter shapes consistent.
//!
//! Nothing here returns an error. Every failure resolves to `false` and a
//! log line; tracking must never block the visitor.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::attribution::AttributionData;
use crate::config::TrackingConfig;
use crate::events::{DismissAction, EventParams, FunnelEvent, FunnelEventName, ParamValue};
use crate::sink::FunnelSink;

/// Page the visitor is currently on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub location: String,
    pub title: String,
}

impl PageContext {
    pub fn new(location: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            title: title.into(),
        }
    }
}

/// Why the tracker can or cannot send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SinkState {
    /// No measurement id; tracking is switched off
    Unconfigured,
    /// The sink turned the measurement id down
    Refused,
    Ready,
}

/// Maps funnel milestones onto sink calls
///
/// Obtained from [`crate::TrackingSession`], which configures the sink and
/// runs attribution capture before handing the tracker out.
pub struct FunnelTracker {
    sink: Arc<dyn FunnelSink>,
    state: SinkState,
    debug_events: bool,
    page: PageContext,
    attribution: Option<AttributionData>,
    session_id: Uuid,
}

impl FunnelTracker {
    pub(crate) fn new(sink: Arc<dyn FunnelSink>, page: PageContext, session_id: Uuid) -> Self {
        Self {
            sink,
            state: SinkState::Unconfigured,
            debug_events: false,
            page,
            attribution: None,
            session_id,
        }
    }

    /// Configure the sink from `config`. Without a measurement id the
    /// tracker stays disabled and every call returns `false`.
    pub(crate) fn configure(&mut self, config: &TrackingConfig) -> bool {
        self.debug_events = config.debug_events;
        self.state = match config.measurement_id() {
            Some(id) if self.sink.configure(id) => SinkState::Ready,
            Some(_) => {
                warn!(session_id = %self.session_id, "Analytics sink refused configuration");
                SinkState::Refused
            }
            None => {
                warn!(
                    session_id = %self.session_id,
                    "No measurement id configured; funnel tracking disabled"
                );
                SinkState::Unconfigured
            }
        };
        self.is_ready()
    }

    pub(crate) fn set_attribution(&mut self, attribution: AttributionData) {
        self.attribution = Some(attribution);
    }

    pub(crate) fn sink(&self) -> &dyn FunnelSink {
        self.sink.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.state == SinkState::Ready
    }

    pub fn page(&self) -> &PageContext {
        &self.page
    }

    /// Attribution snapshot taken at session start
    pub fn attribution(&self) -> Option<&AttributionData> {
        self.attribution.as_ref()
    }

    /// Client-side navigation to another page
    pub fn navigate(&mut self, location: impl Into<String>, title: impl Into<String>) {
        self.page = PageContext::new(location, title);
    }

    /// Send `name` with `params`, based on `{page_location: <current page>}`.
    /// Caller-supplied keys win. Returns whether the sink accepted it.
    pub fn emit(&self, name: FunnelEventName, params: EventParams) -> bool {
        match self.state {
            SinkState::Ready => {}
            // Already reported once by `configure`
            SinkState::Unconfigured => {
                debug!(event = name.as_str(), "Tracking disabled; event not tracked");
                return false;
            }
            SinkState::Refused => {
                warn!(event = name.as_str(), "Sink not initialized; event not tracked");
                return false;
            }
        }

        let mut merged = EventParams::from([(
            "page_location".to_string(),
            ParamValue::from(self.page.location.as_str()),
        )]);
        merged.extend(params);

        match self.sink.send(name.as_str(), &merged) {
            Ok(()) => {
                if self.debug_events {
                    info!(session_id = %self.session_id, event = name.as_str(), params = ?merged, "Event tracked");
                } else {
                    debug!(session_id = %self.session_id, event = name.as_str(), "Event tracked");
                }
                true
            }
            Err(e) => {
                error!(session_id = %self.session_id, event = name.as_str(), error = %e, "Event tracking failed");
                false
            }
        }
    }

    pub fn track(&self, event: FunnelEvent) -> bool {
        self.emit(event.name, event.params)
    }

    fn track_attributed(&self, event: FunnelEvent) -> bool {
        match &self.attribution {
            Some(attribution) => self.track(event.with_attribution(attribution)),
            None => self.track(event),
        }
    }

    pub fn page_view(&self) -> bool {
        self.track(FunnelEvent::page_view(&self.page.title, &self.page.location))
    }

    pub fn cta_click(&self, button_name: &str) -> bool {
        self.track(FunnelEvent::cta_click(button_name))
    }

    /// Fire only behind a [`FormStartLatch`]; the tracker does not dedupe.
    pub fn form_start(&self) -> bool {
        self.track(FunnelEvent::form_start())
    }

    pub fn form_submit(&self, has_name: bool, has_email: bool) -> bool {
        self.track_attributed(FunnelEvent::form_submit(has_name, has_email))
    }

    pub fn thank_you_view(&self) -> bool {
        self.track(FunnelEvent::thank_you_view())
    }

    pub fn blog_view(&self) -> bool {
        self.track(FunnelEvent::blog_view())
    }

    pub fn blog_cta_click(&self) -> bool {
        self.track(FunnelEvent::blog_cta_click())
    }

    pub fn popup_view(&self) -> bool {
        self.track(FunnelEvent::popup_view())
    }

    pub fn popup_dismiss(&self, action: DismissAction) -> bool {
        self.track(FunnelEvent::popup_dismiss(action))
    }

    pub fn popup_conversion(&self) -> bool {
        self.track_attributed(FunnelEvent::popup_conversion())
    }
}

/// Caller-held latch gating `form_start` to once per form lifecycle
///
/// Field focus can fire many times; call [`FormStartLatch::fire`] from each
/// and the event goes out once. [`FormStartLatch::reset`] when the form is
/// shown again.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormStartLatch {
    fired: bool,
}

impl FormStartLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` the first time per lifecycle
    pub fn should_fire(&mut self) -> bool {
        !std::mem::replace(&mut self.fired, true)
    }

    /// Emit `form_start` if this is the first interaction. Returns whether
    /// an event was sent.
    pub fn fire(&mut self, tracker: &FunnelTracker) -> bool {
        self.should_fire() && tracker.form_start()
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn reset(&mut self) {
        self.fired = false;
    }
}
