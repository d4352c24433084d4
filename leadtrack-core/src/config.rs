//! Configuration for funnel tracking

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable overriding the measurement id
pub const MEASUREMENT_ID_ENV: &str = "LEADTRACK_MEASUREMENT_ID";

/// Configuration for funnel tracking
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Analytics vendor measurement id. Tracking is disabled without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_id: Option<String>,

    /// Log every emitted event at info level instead of debug
    #[serde(default)]
    pub debug_events: bool,
}

impl TrackingConfig {
    /// Config with tracking enabled for `measurement_id`
    pub fn with_measurement_id(measurement_id: impl Into<String>) -> Self {
        Self {
            measurement_id: Some(measurement_id.into()),
            ..Self::default()
        }
    }

    /// Measurement id, ignoring blank values
    pub fn measurement_id(&self) -> Option<&str> {
        self.measurement_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Whether events will be sent at all
    pub fn enabled(&self) -> bool {
        self.measurement_id().is_some()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay `LEADTRACK_MEASUREMENT_ID` when it is set and non-blank
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(id) = std::env::var(MEASUREMENT_ID_ENV)
            && !id.trim().is_empty()
        {
            self.measurement_id = Some(id.trim().to_string());
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(id) = self.measurement_id()
            && id.chars().any(char::is_whitespace)
        {
            return Err(ConfigError::Invalid(format!(
                "measurement_id must not contain whitespace: {:?}",
                id
            )));
        }
        Ok(())
    }
}
