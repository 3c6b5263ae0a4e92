//! Settings file loading and command-line override handling.
//!
//! Relocation settings live in a JSON or TOML file (dispatch by
//! extension). Command-line flags override individual numeric values so a
//! pipeline can reuse one settings file across materials.

use crate::error::{SettingsError, SettingsResult};
use purgekit_core::RelocationConfig;
use std::path::Path;
use tracing::debug;

/// Individual values a caller may override after loading.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Replacement for `threshold` (mm).
    pub threshold: Option<f64>,
    /// Replacement for `skip_threshold` (mm).
    pub skip_threshold: Option<f64>,
}

impl Overrides {
    /// Apply the overrides to a loaded configuration.
    pub fn apply(&self, config: &mut RelocationConfig) {
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(skip_threshold) = self.skip_threshold {
            config.skip_threshold = skip_threshold;
        }
    }
}

/// Load relocation settings from a JSON or TOML file.
pub fn load_from_file(path: &Path) -> SettingsResult<RelocationConfig> {
    let content = std::fs::read_to_string(path)?;

    let config: RelocationConfig = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&content)?
    } else if path.extension().is_some_and(|ext| ext == "toml") {
        toml::from_str(&content)?
    } else {
        return Err(SettingsError::UnsupportedFormat(
            path.display().to_string(),
        ));
    };

    debug!("loaded settings from {}", path.display());
    Ok(config)
}

/// Produce the validated configuration for a run: the settings file (or
/// defaults when none is given) with overrides applied on top.
///
/// Validation failures stop the run here, before any input is read.
pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> SettingsResult<RelocationConfig> {
    let mut config = match path {
        Some(path) => load_from_file(path)?,
        None => RelocationConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_settings(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("temp file");
        file.write_all(content.as_bytes()).expect("write settings");
        file
    }

    #[test]
    fn test_load_json_settings() {
        let file = temp_settings(
            ".json",
            r#"{
                "threshold": 50.0,
                "skip_threshold": 5.0,
                "purge_code": "G1 E{threshold} F300",
                "patterns": { "tool_change": "^T(\\d+)" }
            }"#,
        );
        let config = load_from_file(file.path()).expect("valid json");
        assert_eq!(config.threshold, 50.0);
        assert_eq!(config.skip_threshold, 5.0);
        assert_eq!(config.purge_code.as_deref(), Some("G1 E{threshold} F300"));
        assert_eq!(config.patterns.tool_change.as_deref(), Some(r"^T(\d+)"));
    }

    #[test]
    fn test_load_toml_settings() {
        let file = temp_settings(
            ".toml",
            "threshold = 42.5\npre_tool_change_code = \"M400\"\n",
        );
        let config = load_from_file(file.path()).expect("valid toml");
        assert_eq!(config.threshold, 42.5);
        assert_eq!(config.pre_tool_change_code.as_deref(), Some("M400"));
        assert_eq!(config.skip_threshold, 0.0);
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let file = temp_settings(".yaml", "threshold: 50");
        assert!(matches!(
            load_from_file(file.path()),
            Err(SettingsError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_resolve_requires_threshold() {
        // No file and no override: the default config has no threshold.
        let result = resolve(None, &Overrides::default());
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_overrides_win_over_file_values() {
        let file = temp_settings(".toml", "threshold = 42.5\nskip_threshold = 1.0\n");
        let overrides = Overrides {
            threshold: Some(80.0),
            skip_threshold: None,
        };
        let config = resolve(Some(file.path()), &overrides).expect("valid");
        assert_eq!(config.threshold, 80.0);
        assert_eq!(config.skip_threshold, 1.0);
    }

    #[test]
    fn test_override_alone_is_enough() {
        let overrides = Overrides {
            threshold: Some(60.0),
            skip_threshold: Some(4.0),
        };
        let config = resolve(None, &overrides).expect("valid");
        assert_eq!(config.threshold, 60.0);
        assert!(config.skip_enabled());
    }

    #[test]
    fn test_malformed_json_is_a_setup_error() {
        let file = temp_settings(".json", "{ not json");
        assert!(matches!(
            load_from_file(file.path()),
            Err(SettingsError::JsonError(_))
        ));
    }
}
