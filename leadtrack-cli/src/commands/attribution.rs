//! Show the attribution events are tagged with

use anyhow::Result;
use leadtrack_core::AttributionStore;

use crate::state::LocalState;

/// Run attribution command
pub fn run() -> Result<()> {
    let state = LocalState::open()?;
    let attribution = AttributionStore::new(state.store.clone()).get_attribution();
    println!(
        "{}",
        serde_json::to_string_pretty(&attribution.to_event_params())?
    );
    Ok(())
}
