//! # PurgeKit
//!
//! A post-processor for multi-tool 3D-printer G-code. Tool changes are
//! moved earlier in the instruction stream so that enough already-planned
//! extrusion happens between the new position and the original one to make
//! a physical purge unnecessary; when that is impossible, configurable
//! purge G-code is spliced in instead.
//!
//! ## Architecture
//!
//! PurgeKit is organized as a workspace:
//!
//! 1. **purgekit-core** - line classification, segment buffering, the
//!    backward relocation and forward skip scans, stream emission
//! 2. **purgekit-settings** - settings file loading and overrides
//! 3. **purgekit** - the command-line binary tying them together
//!
//! Typical use is as a pipe stage between slicer and printer:
//!
//! ```text
//! slicer model.3mf | purgekit --config purge.toml > print.gcode
//! ```

pub use purgekit_core::{
    LineClass, LineClassifier, PatternOverrides, ProcessError, ProcessResult, RelocationConfig,
    RelocationOutcome, RunningTotals, Segment, StreamProcessor,
};
pub use purgekit_settings::{load_from_file, resolve, Overrides, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr (stdout carries the processed G-code)
/// - RUST_LOG environment variable support
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::from_default_env().add_directive(default_level.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
