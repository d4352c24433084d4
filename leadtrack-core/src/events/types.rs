//! Funnel event type definitions

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::attribution::{AttributionData, AttributionParameters};

/// Parameter keys that would carry personal data. Events describe *that*
/// such data was present, never the data itself.
const PII_KEYS: [&str; 3] = ["name", "email", "phone"];

/// Form name shared by the lead-capture form events
pub const LEAD_FORM_NAME: &str = "lead_generation";

/// Default `button_name` for the hero call-to-action
pub const DEFAULT_CTA_BUTTON: &str = "primary_cta";

/// Primitive value carried by an event parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Parameters attached to an outgoing event, ordered by key
pub type EventParams = BTreeMap<String, ParamValue>;

/// Stage of the funnel an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    Intent,
    Engagement,
    Conversion,
    Completion,
    Retention,
}

impl FunnelStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intent => "intent",
            Self::Engagement => "engagement",
            Self::Conversion => "conversion",
            Self::Completion => "completion",
            Self::Retention => "retention",
        }
    }
}

/// The closed set of events this tracker emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelEventName {
    PageView,
    CtaClick,
    FormStart,
    FormSubmit,
    ThankYouView,
    BlogView,
    BlogCtaClick,
    PopupView,
    PopupDismiss,
    PopupConversion,
    CampaignLanding,
}

impl FunnelEventName {
    pub const ALL: [FunnelEventName; 11] = [
        Self::PageView,
        Self::CtaClick,
        Self::FormStart,
        Self::FormSubmit,
        Self::ThankYouView,
        Self::BlogView,
        Self::BlogCtaClick,
        Self::PopupView,
        Self::PopupDismiss,
        Self::PopupConversion,
        Self::CampaignLanding,
    ];

    /// Wire name sent to the sink
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageView => "page_view",
            Self::CtaClick => "cta_click",
            Self::FormStart => "form_start",
            Self::FormSubmit => "form_submit",
            Self::ThankYouView => "thank_you_view",
            Self::BlogView => "blog_view",
            Self::BlogCtaClick => "blog_cta_click",
            Self::PopupView => "popup_view",
            Self::PopupDismiss => "popup_dismiss",
            Self::PopupConversion => "popup_conversion",
            Self::CampaignLanding => "campaign_landing",
        }
    }

    /// Parse from a wire name
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.as_str() == s)
    }

    /// Funnel stage the event reports, if it reports one
    pub fn funnel_stage(&self) -> Option<FunnelStage> {
        match self {
            Self::CtaClick | Self::BlogCtaClick => Some(FunnelStage::Intent),
            Self::FormStart => Some(FunnelStage::Engagement),
            Self::FormSubmit | Self::PopupConversion => Some(FunnelStage::Conversion),
            Self::ThankYouView => Some(FunnelStage::Completion),
            Self::PopupView => Some(FunnelStage::Retention),
            Self::PageView | Self::BlogView | Self::PopupDismiss | Self::CampaignLanding => None,
        }
    }
}

impl fmt::Display for FunnelEventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the exit-intent popup was dismissed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissAction {
    #[default]
    CloseButton,
    OverlayClick,
}

impl DismissAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CloseButton => "close_button",
            Self::OverlayClick => "overlay_click",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "close_button" => Some(Self::CloseButton),
            "overlay_click" => Some(Self::OverlayClick),
            _ => None,
        }
    }
}

/// A named event with its parameters, built and then handed to a tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelEvent {
    pub name: FunnelEventName,
    pub params: EventParams,
}

impl FunnelEvent {
    /// Event with no parameters yet
    pub fn new(name: FunnelEventName) -> Self {
        Self {
            name,
            params: EventParams::new(),
        }
    }

    /// Add a parameter. Keys naming personal data are a programming error.
    pub fn with_param(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        debug_assert!(
            !PII_KEYS.contains(&key),
            "event parameter `{}` would carry personal data",
            key
        );
        self.params.insert(key.to_string(), value.into());
        self
    }

    fn with_stage(self) -> Self {
        match self.name.funnel_stage() {
            Some(stage) => self.with_param("funnel_stage", stage.as_str()),
            None => self,
        }
    }

    /// Add attribution keys the event does not already carry
    pub fn with_attribution(mut self, attribution: &AttributionData) -> Self {
        for (key, value) in attribution.to_event_params() {
            self.params.entry(key).or_insert(value);
        }
        self
    }

    pub fn page_view(title: &str, location: &str) -> Self {
        let event = Self::new(FunnelEventName::PageView)
            .with_param("page_title", title)
            .with_param("page_location", location);
        match Url::parse(location) {
            Ok(url) => event.with_param("page_path", url.path()),
            Err(_) => event,
        }
    }

    pub fn cta_click(button_name: &str) -> Self {
        Self::new(FunnelEventName::CtaClick)
            .with_param("button_name", button_name)
            .with_stage()
    }

    pub fn form_start() -> Self {
        Self::new(FunnelEventName::FormStart)
            .with_stage()
            .with_param("form_name", LEAD_FORM_NAME)
    }

    /// Only field presence is reported, never field contents
    pub fn form_submit(has_name: bool, has_email: bool) -> Self {
        Self::new(FunnelEventName::FormSubmit)
            .with_stage()
            .with_param("form_name", LEAD_FORM_NAME)
            .with_param("has_name_field", has_name)
            .with_param("has_email_field", has_email)
    }

    pub fn thank_you_view() -> Self {
        Self::new(FunnelEventName::ThankYouView)
            .with_stage()
            .with_param("conversion_status", "success")
    }

    pub fn blog_view() -> Self {
        Self::new(FunnelEventName::BlogView)
            .with_param("content_type", "blog_post")
            .with_param("page_type", "content")
    }

    pub fn blog_cta_click() -> Self {
        Self::new(FunnelEventName::BlogCtaClick)
            .with_stage()
            .with_param("cta_location", "blog_bottom")
    }

    pub fn popup_view() -> Self {
        Self::new(FunnelEventName::PopupView)
            .with_param("popup_type", "exit_intent")
            .with_stage()
    }

    pub fn popup_dismiss(action: DismissAction) -> Self {
        Self::new(FunnelEventName::PopupDismiss)
            .with_param("popup_type", "exit_intent")
            .with_param("action", action.as_str())
    }

    pub fn popup_conversion() -> Self {
        Self::new(FunnelEventName::PopupConversion)
            .with_param("popup_type", "exit_intent")
            .with_stage()
            .with_param("has_email_field", true)
    }

    /// Landing signal for a campaign-tagged visit: the URL's own utm keys
    /// plus where the visitor landed
    pub fn campaign_landing(params: &AttributionParameters, location: &str) -> Self {
        let mut event = Self::new(FunnelEventName::CampaignLanding);
        for (key, value) in params.iter() {
            event = event.with_param(key.query_name(), value.as_str());
        }
        event.with_param("page_location", location)
    }
}
