//! Relocation configuration consumed read-only by the processing pass.
//!
//! The settings crate loads these values from JSON or TOML files and
//! applies command-line overrides; the core only validates and reads them.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Optional overrides for the classification patterns.
///
/// Each field replaces one of the documented default patterns in
/// [`crate::classifier::LineClassifier`]. An override that fails to
/// compile falls back to the default with a warning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternOverrides {
    /// Pattern identifying tool-change lines. Default: `^\s*(T\d+)`
    #[serde(default)]
    pub tool_change: Option<String>,
    /// Pattern identifying the slicer-identification comment.
    /// Default: `^;.*(?i:generated by|sliced by)\s*(.*)`
    #[serde(default)]
    pub slicer: Option<String>,
    /// Pattern identifying extrusion-bearing motion lines, with one
    /// capture group for the filament feed amount.
    /// Default: `^\s*G[01]\b.*?\bE(-?\d+(?:\.\d+)?)`
    #[serde(default)]
    pub extrusion: Option<String>,
    /// Pattern identifying feature-marker comments.
    /// Default: `^;\s*TYPE:\s*(\S.*)`
    #[serde(default)]
    pub feature_marker: Option<String>,
}

/// Settings governing where (or whether) each tool change is moved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelocationConfig {
    /// Millimetres of filament that must be provably extruded between the
    /// relocated tool change and its original position. Required, > 0.
    pub threshold: f64,
    /// Millimetres below which the upcoming tool's usage is judged too
    /// small to warrant a tool change at all. 0 disables skip logic.
    #[serde(default)]
    pub skip_threshold: f64,
    /// Purge G-code appended after a tool change that could not be
    /// relocated. `{threshold}` is replaced with the threshold value.
    #[serde(default)]
    pub purge_code: Option<String>,
    /// Raw G-code block inserted before a relocated tool change.
    #[serde(default)]
    pub pre_tool_change_code: Option<String>,
    /// Raw G-code block inserted after a relocated tool change.
    #[serde(default)]
    pub post_tool_change_code: Option<String>,
    /// Classification pattern overrides.
    #[serde(default)]
    pub patterns: PatternOverrides,
}

impl Default for RelocationConfig {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            skip_threshold: 0.0,
            purge_code: None,
            pre_tool_change_code: None,
            post_tool_change_code: None,
            patterns: PatternOverrides::default(),
        }
    }
}

impl RelocationConfig {
    /// Validate the configuration.
    ///
    /// The threshold is the one required setting: the run must not start
    /// without it.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(ConfigError::Missing("threshold".to_string()));
        }

        if !self.skip_threshold.is_finite() || self.skip_threshold < 0.0 {
            return Err(ConfigError::InvalidValue {
                name: "skip_threshold".to_string(),
                reason: "must be >= 0".to_string(),
            });
        }

        Ok(())
    }

    /// Whether the forward skip evaluator is enabled at all.
    pub fn skip_enabled(&self) -> bool {
        self.skip_threshold > 0.0
    }
}
