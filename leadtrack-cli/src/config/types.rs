use leadtrack_core::TrackingConfig;
use serde::{Deserialize, Serialize};

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawLeadtrackConfig {
    #[serde(default)]
    pub tracking: RawTrackingConfig,

    #[serde(default)]
    pub page: RawPageConfig,
}

/// Tracking config as stored in TOML (optional fields for proper merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawTrackingConfig {
    /// Analytics measurement id
    pub measurement_id: Option<String>,

    /// Log every event at info level
    pub debug_events: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawPageConfig {
    /// Title reported by page_view when --title is not given
    pub title: Option<String>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LeadtrackConfig {
    #[serde(default)]
    pub tracking: TrackingConfig,

    #[serde(default)]
    pub page: PageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub title: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_PAGE_TITLE.to_string(),
        }
    }
}

/// Default title of the landing page
pub const DEFAULT_PAGE_TITLE: &str = "Get Early Access";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = LeadtrackConfig::default();
        assert!(config.tracking.measurement_id.is_none());
        assert!(!config.tracking.debug_events);
        assert_eq!(config.page.title, DEFAULT_PAGE_TITLE);
    }

    #[test]
    fn test_raw_config_partial_parsing() {
        let toml_str = r#"
[tracking]
measurement_id = "G-ABC123"
"#;
        let raw: RawLeadtrackConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(raw.tracking.measurement_id.as_deref(), Some("G-ABC123"));
        assert!(raw.tracking.debug_events.is_none());
        assert!(raw.page.title.is_none());
    }

    #[test]
    fn test_raw_config_empty_uses_none() {
        let raw: RawLeadtrackConfig = toml::from_str("").unwrap();
        assert!(raw.tracking.measurement_id.is_none());
        assert!(raw.page.title.is_none());
    }

    #[test]
    fn test_final_config_serializes_sections() {
        let config = LeadtrackConfig {
            tracking: TrackingConfig::with_measurement_id("G-ABC123"),
            page: PageConfig::default(),
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[tracking]"));
        assert!(toml_str.contains("measurement_id = \"G-ABC123\""));
        assert!(toml_str.contains("[page]"));
    }
}
