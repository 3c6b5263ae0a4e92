//! # PurgeKit Core
//!
//! Tool-change relocation engine for multi-tool 3D-printer G-code.
//!
//! A tool change normally forces a physical purge of the old material.
//! This engine moves the tool-change instruction earlier in the stream so
//! that a configurable amount of already-planned extrusion happens between
//! the new position and the original one, making the purge unnecessary.
//! When no earlier position can satisfy the threshold, configurable purge
//! G-code is spliced in after the original position instead.
//!
//! The pass is single-threaded and strictly sequential: segments are
//! processed in file order because each backward scan is bounded by the
//! previous tool change, and each skip decision peeks at content not yet
//! otherwise consumed.

pub mod classifier;
pub mod config;
pub mod error;
pub mod processor;
pub mod relocate;
pub mod segment;

pub use classifier::{LineClass, LineClassifier};
pub use config::{PatternOverrides, RelocationConfig};
pub use error::{ConfigError, ConfigResult, ProcessError, ProcessResult};
pub use processor::{process_file, RunningTotals, StreamProcessor};
pub use relocate::{
    relocate_tool_change, ExtrusionTally, RelocationOutcome, SkipEvaluator, SKIP_SCAN_MARGIN,
};
pub use segment::{Line, Segment};
