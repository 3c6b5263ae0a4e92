//! Line classification for G-code streams.
//!
//! Each input line is tagged as a comment, a tool change, a feature
//! marker, an extrusion-bearing motion, or plain passthrough text. The
//! scan logic only ever sees the tagged variant, so the regex-based
//! matching here can be swapped for a tokenizer without touching it.

use crate::config::PatternOverrides;
use regex::Regex;
use tracing::warn;

/// Default pattern for tool-change lines (`T0`, `T1`, ...).
pub const DEFAULT_TOOL_CHANGE_PATTERN: &str = r"^\s*(T\d+)";

/// Default pattern for the slicer-identification comment.
pub const DEFAULT_SLICER_PATTERN: &str = r"^;.*(?i:generated by|sliced by)\s*(.*)";

/// Default pattern for extrusion-bearing motion lines. The single capture
/// group yields the filament feed amount in mm.
pub const DEFAULT_EXTRUSION_PATTERN: &str = r"^\s*G[01]\b.*?\bE(-?\d+(?:\.\d+)?)";

/// Default pattern for feature-marker comments (`;TYPE:Perimeter`).
pub const DEFAULT_FEATURE_PATTERN: &str = r"^;\s*TYPE:\s*(\S.*)";

/// Planar-move parameter check. A motion line with a feed amount but no
/// X/Y word is a retraction or prime, not forward deposition.
const PLANAR_MOVE_PATTERN: &str = r"\b[XY]-?\.?\d";

/// Classification result for a single input line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineClass {
    /// A comment line (leading `;`).
    Comment,
    /// A tool-change instruction with its tool identifier text.
    ToolChange { tool: String },
    /// A slicer feature annotation, e.g. `;TYPE:Perimeter`.
    FeatureMarker { name: String },
    /// A motion instruction depositing `amount` mm of filament.
    Extrusion { amount: f64 },
    /// Anything else; passed through untouched.
    Other,
}

/// Classifies G-code lines against a configurable pattern set.
#[derive(Debug)]
pub struct LineClassifier {
    tool_change: Regex,
    slicer: Regex,
    extrusion: Regex,
    feature_marker: Regex,
    planar_move: Regex,
}

/// Compile an override pattern, falling back to the default when the
/// override is absent or does not compile.
fn compile_or_default(name: &str, override_pattern: Option<&str>, default: &str) -> Regex {
    if let Some(pattern) = override_pattern {
        match Regex::new(pattern) {
            Ok(re) => return re,
            Err(e) => {
                warn!(
                    "Invalid {} pattern '{}' ({}), using default '{}'",
                    name, pattern, e, default
                );
            }
        }
    }
    Regex::new(default).expect("default pattern must compile")
}

impl LineClassifier {
    /// Create a classifier from the configured pattern overrides.
    pub fn new(overrides: &PatternOverrides) -> Self {
        Self {
            tool_change: compile_or_default(
                "tool-change",
                overrides.tool_change.as_deref(),
                DEFAULT_TOOL_CHANGE_PATTERN,
            ),
            slicer: compile_or_default(
                "slicer",
                overrides.slicer.as_deref(),
                DEFAULT_SLICER_PATTERN,
            ),
            extrusion: compile_or_default(
                "extrusion",
                overrides.extrusion.as_deref(),
                DEFAULT_EXTRUSION_PATTERN,
            ),
            feature_marker: compile_or_default(
                "feature-marker",
                overrides.feature_marker.as_deref(),
                DEFAULT_FEATURE_PATTERN,
            ),
            planar_move: Regex::new(PLANAR_MOVE_PATTERN).expect("planar pattern must compile"),
        }
    }

    /// Classify a single line of G-code.
    pub fn classify(&self, line: &str) -> LineClass {
        if let Some(caps) = self.tool_change.captures(line) {
            let tool = caps
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| line.trim().to_string());
            return LineClass::ToolChange { tool };
        }

        if line.trim_start().starts_with(';') {
            if let Some(caps) = self.feature_marker.captures(line) {
                if let Some(name) = caps.get(1) {
                    return LineClass::FeatureMarker {
                        name: name.as_str().trim().to_string(),
                    };
                }
            }
            return LineClass::Comment;
        }

        if let Some(caps) = self.extrusion.captures(line) {
            // Feed without a planar move is retraction/priming; it must
            // not count as deposited material.
            if !self.planar_move.is_match(line) {
                return LineClass::Other;
            }
            let raw = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            match raw.parse::<f64>() {
                Ok(amount) => return LineClass::Extrusion { amount },
                Err(e) => {
                    warn!("Unparseable extrusion amount '{}' in '{}': {}", raw, line, e);
                    return LineClass::Other;
                }
            }
        }

        LineClass::Other
    }

    /// If this line is the slicer-identification comment, return the
    /// slicer name for operator-facing logging.
    pub fn slicer_name(&self, line: &str) -> Option<String> {
        self.slicer
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|name| !name.is_empty())
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new(&PatternOverrides::default())
    }
}
