//! Campaign attribution
//!
//! - [`capture`] reads `utm_*` parameters from an entry URL
//! - [`AttributionStore`] persists them first-touch with a 30 day TTL
//! - [`AttributionData`] is what events get tagged with

mod capture;
mod store;
pub mod types;

pub use capture::capture;
pub use store::{AttributionStore, PersistOutcome, STORAGE_KEY};
pub use types::{
    ATTRIBUTION_TTL_MILLIS, AttributionData, AttributionParameters, AttributionRecord, UtmKey,
};
