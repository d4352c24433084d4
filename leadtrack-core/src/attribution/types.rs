//! Attribution data types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::events::{EventParams, ParamValue};

/// How long captured attribution stays valid: 30 days
pub const ATTRIBUTION_TTL_MILLIS: i64 = 30 * 24 * 60 * 60 * 1000;

/// Recognized campaign query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UtmKey {
    #[serde(rename = "utm_source")]
    Source,
    #[serde(rename = "utm_medium")]
    Medium,
    #[serde(rename = "utm_campaign")]
    Campaign,
    #[serde(rename = "utm_term")]
    Term,
    #[serde(rename = "utm_content")]
    Content,
}

impl UtmKey {
    pub const ALL: [UtmKey; 5] = [
        Self::Source,
        Self::Medium,
        Self::Campaign,
        Self::Term,
        Self::Content,
    ];

    /// Name as it appears in the query string and in event parameters
    pub fn query_name(&self) -> &'static str {
        match self {
            Self::Source => "utm_source",
            Self::Medium => "utm_medium",
            Self::Campaign => "utm_campaign",
            Self::Term => "utm_term",
            Self::Content => "utm_content",
        }
    }

    pub fn from_query_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.query_name() == name)
    }
}

/// Campaign parameters captured from an entry URL
///
/// Only keys that were present with a non-empty value are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributionParameters(BTreeMap<UtmKey, String>);

impl AttributionParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value; empty values are dropped. Returns whether it was stored.
    pub fn insert(&mut self, key: UtmKey, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.is_empty() {
            return false;
        }
        self.0.insert(key, value);
        true
    }

    pub fn get(&self, key: UtmKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UtmKey, &String)> {
        self.0.iter()
    }

    /// Parameters keyed by their `utm_*` names
    pub fn to_event_params(&self) -> EventParams {
        self.0
            .iter()
            .map(|(key, value)| (key.query_name().to_string(), ParamValue::from(value.as_str())))
            .collect()
    }
}

impl FromIterator<(UtmKey, String)> for AttributionParameters {
    fn from_iter<I: IntoIterator<Item = (UtmKey, String)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// Persisted first-touch attribution
///
/// Stored as `{"params": {...}, "timestamp": <epoch millis>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionRecord {
    pub params: AttributionParameters,
    pub timestamp: i64,
}

impl AttributionRecord {
    pub fn new(params: AttributionParameters, captured_at_millis: i64) -> Self {
        Self {
            params,
            timestamp: captured_at_millis,
        }
    }

    /// Strictly older than `ttl_millis` at `now_millis`. An age that does
    /// not fit in an i64 only comes from a corrupt timestamp and counts as
    /// expired.
    pub fn is_expired(&self, now_millis: i64, ttl_millis: i64) -> bool {
        now_millis
            .checked_sub(self.timestamp)
            .is_none_or(|age| age > ttl_millis)
    }
}

/// Attribution context attached to events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributionData {
    /// Visitor arrived through a tagged campaign
    Campaign(AttributionParameters),
    /// No campaign on record: direct / organic traffic
    Organic,
}

impl AttributionData {
    pub fn is_campaign(&self) -> bool {
        matches!(self, Self::Campaign(_))
    }

    /// Flattened form used as event parameters
    pub fn to_event_params(&self) -> EventParams {
        match self {
            Self::Campaign(params) => {
                let mut out = params.to_event_params();
                out.insert("attribution".to_string(), "campaign".into());
                out
            }
            Self::Organic => EventParams::from([
                ("attribution".to_string(), "organic".into()),
                (UtmKey::Source.query_name().to_string(), "direct".into()),
                (UtmKey::Medium.query_name().to_string(), "none".into()),
            ]),
        }
    }
}
