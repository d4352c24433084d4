//! Funnel events

pub mod types;

pub use types::{
    DEFAULT_CTA_BUTTON, DismissAction, EventParams, FunnelEvent, FunnelEventName, FunnelStage,
    LEAD_FORM_NAME, ParamValue,
};
