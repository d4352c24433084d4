use super::types::{
    DEFAULT_PAGE_TITLE, LeadtrackConfig, PageConfig, RawLeadtrackConfig, RawPageConfig,
    RawTrackingConfig,
};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use leadtrack_core::TrackingConfig;
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project + environment)
    pub fn load() -> Result<LeadtrackConfig> {
        let mut layers = Vec::new();
        if let Some(user_path) = Self::user_config_path() {
            layers.push(user_path);
        }
        layers.push(Self::project_config_path());

        let config = Self::load_layers(&layers)?;
        Ok(LeadtrackConfig {
            tracking: config.tracking.with_env_overrides(),
            page: config.page,
        })
    }

    /// Merge the given files in order; later files override earlier ones and
    /// missing files are skipped
    pub fn load_layers(paths: &[PathBuf]) -> Result<LeadtrackConfig> {
        let mut raw = RawLeadtrackConfig::default();

        for path in paths {
            if !path.exists() {
                continue;
            }
            let layer = Self::read_raw(path)?;
            raw = Self::merge_raw(raw, layer);
        }

        let config = Self::finalize(raw);
        config
            .tracking
            .validate()
            .context("invalid [tracking] configuration")?;
        Ok(config)
    }

    /// Get user config path (platform-specific)
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "leadtrack").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get project config path
    /// Can be overridden with LEADTRACK_PROJECT_CONFIG_DIR env var
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("LEADTRACK_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".leadtrack/config.toml")
        }
    }

    fn read_raw(path: &Path) -> Result<RawLeadtrackConfig> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawLeadtrackConfig, overlay: RawLeadtrackConfig) -> RawLeadtrackConfig {
        RawLeadtrackConfig {
            tracking: RawTrackingConfig {
                measurement_id: overlay
                    .tracking
                    .measurement_id
                    .or(base.tracking.measurement_id),
                debug_events: overlay.tracking.debug_events.or(base.tracking.debug_events),
            },
            page: RawPageConfig {
                title: overlay.page.title.or(base.page.title),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawLeadtrackConfig) -> LeadtrackConfig {
        LeadtrackConfig {
            tracking: TrackingConfig {
                measurement_id: raw.tracking.measurement_id,
                debug_events: raw.tracking.debug_events.unwrap_or(false),
            },
            page: PageConfig {
                title: raw
                    .page
                    .title
                    .unwrap_or_else(|| DEFAULT_PAGE_TITLE.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_no_files_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigLoader::load_layers(&[temp_dir.path().join("missing.toml")]).unwrap();

        assert!(!config.tracking.enabled());
        assert_eq!(config.page.title, DEFAULT_PAGE_TITLE);
    }

    #[test]
    fn test_project_overrides_user() {
        let temp_dir = TempDir::new().unwrap();
        let user = write(
            &temp_dir,
            "user.toml",
            "[tracking]\nmeasurement_id = \"G-USER\"\ndebug_events = true\n",
        );
        let project = write(
            &temp_dir,
            "project.toml",
            "[tracking]\nmeasurement_id = \"G-PROJECT\"\n",
        );

        let config = ConfigLoader::load_layers(&[user, project]).unwrap();
        assert_eq!(config.tracking.measurement_id(), Some("G-PROJECT"));
        // Not set in the project file, so the user value survives
        assert!(config.tracking.debug_events);
    }

    #[test]
    fn test_page_title_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, "config.toml", "[page]\ntitle = \"Launch Week\"\n");

        let config = ConfigLoader::load_layers(&[path]).unwrap();
        assert_eq!(config.page.title, "Launch Week");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, "config.toml", "[tracking\n");

        assert!(ConfigLoader::load_layers(&[path]).is_err());
    }

    #[test]
    fn test_invalid_measurement_id_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            &temp_dir,
            "config.toml",
            "[tracking]\nmeasurement_id = \"G ABC\"\n",
        );

        assert!(ConfigLoader::load_layers(&[path]).is_err());
    }

    #[test]
    #[serial]
    fn test_project_config_path_respects_env() {
        unsafe {
            std::env::set_var("LEADTRACK_PROJECT_CONFIG_DIR", "/tmp/leadtrack-e2e");
        }
        assert_eq!(
            ConfigLoader::project_config_path(),
            PathBuf::from("/tmp/leadtrack-e2e/config.toml")
        );
        unsafe {
            std::env::remove_var("LEADTRACK_PROJECT_CONFIG_DIR");
        }
        assert_eq!(
            ConfigLoader::project_config_path(),
            PathBuf::from(".leadtrack/config.toml")
        );
    }
}
