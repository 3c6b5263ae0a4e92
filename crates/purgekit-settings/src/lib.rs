//! # PurgeKit Settings
//!
//! Loads relocation settings from JSON or TOML files and applies
//! command-line overrides, producing the validated [`RelocationConfig`]
//! the core consumes read-only.

pub mod error;
pub mod loader;

pub use error::{SettingsError, SettingsResult};
pub use loader::{load_from_file, resolve, Overrides};
pub use purgekit_core::{PatternOverrides, RelocationConfig};
