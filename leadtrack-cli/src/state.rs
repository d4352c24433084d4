//! Simulated browser state shared by CLI invocations
//!
//! Session storage and the event log live under the leadtrack data dir, so
//! consecutive `leadtrack` runs act like page loads in one browser session.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use leadtrack_core::{
    FileSessionStore, FunnelSink, JsonLinesSink, MemorySink, SessionStore, TrackingSession,
};
use tracing::debug;

use crate::config::LeadtrackConfig;

/// Session key remembering the page the visitor is on
const LOCATION_KEY: &str = "leadtrack_page_location";
/// Session key remembering that page's title
const TITLE_KEY: &str = "leadtrack_page_title";

/// Where events go for this invocation
pub enum EventTarget {
    Log(Arc<JsonLinesSink>),
    DryRun(Arc<MemorySink>),
}

impl EventTarget {
    fn sink(&self) -> Arc<dyn FunnelSink> {
        match self {
            Self::Log(sink) => sink.clone() as Arc<dyn FunnelSink>,
            Self::DryRun(sink) => sink.clone() as Arc<dyn FunnelSink>,
        }
    }

    /// Print what a dry run would have sent
    pub fn report(&self) -> Result<()> {
        if let Self::DryRun(sink) = self {
            for event in sink.events() {
                println!("{}", serde_json::to_string(&event)?);
            }
        }
        Ok(())
    }
}

pub struct LocalState {
    pub store: Arc<FileSessionStore>,
    pub event_log: PathBuf,
}

impl LocalState {
    /// Open state under the default data directory
    pub fn open() -> Result<Self> {
        Self::open_at(leadtrack_paths::session_file(), leadtrack_paths::event_log_file())
    }

    pub fn open_at(session_file: PathBuf, event_log: PathBuf) -> Result<Self> {
        let store = FileSessionStore::open(&session_file)
            .with_context(|| format!("failed to open session storage {}", session_file.display()))?;
        debug!(session = %session_file.display(), events = %event_log.display(), "Opened local state");
        Ok(Self {
            store: Arc::new(store),
            event_log,
        })
    }

    pub fn event_target(&self, dry_run: bool) -> Result<EventTarget> {
        if dry_run {
            return Ok(EventTarget::DryRun(Arc::new(MemorySink::new())));
        }
        let sink = JsonLinesSink::open(&self.event_log)
            .with_context(|| format!("failed to open event log {}", self.event_log.display()))?;
        Ok(EventTarget::Log(Arc::new(sink)))
    }

    /// Session startup for a fresh page load
    pub fn start(
        &self,
        config: &LeadtrackConfig,
        target: &EventTarget,
        url: &str,
        title: &str,
    ) -> Result<TrackingSession> {
        let session = TrackingSession::builder(config.tracking.clone())
            .store(self.store.clone())
            .sink(target.sink())
            .title(title)
            .start(url);

        self.store.set(LOCATION_KEY, url)?;
        self.store.set(TITLE_KEY, title)?;
        Ok(session)
    }

    /// Re-attach to the page remembered by the last `visit`
    pub fn resume(&self, config: &LeadtrackConfig, target: &EventTarget) -> Result<TrackingSession> {
        let location = self
            .store
            .get(LOCATION_KEY)?
            .context("no page visited yet; run `leadtrack visit <url>` first")?;
        let title = self
            .store
            .get(TITLE_KEY)?
            .unwrap_or_else(|| config.page.title.clone());

        Ok(TrackingSession::builder(config.tracking.clone())
            .store(self.store.clone())
            .sink(target.sink())
            .title(title)
            .resume(&location))
    }

    /// End the simulated browser session
    pub fn reset(&self) -> Result<()> {
        self.store.clear()?;
        Ok(())
    }
}
