//! Diagnostic settings for the registry, with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Settings file: any TOML file the host passes to [`Settings::load`]
//! 3. Environment variables: `INJECTED_*` prefix
//!
//! The registry never loads settings on its own; hosts call
//! [`Settings::load`] and hand the result to [`InjectedValues::configure`].
//!
//! [`InjectedValues::configure`]: crate::InjectedValues::configure

use std::path::Path;

use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

use crate::error::{InjectedError, InjectedResult};
use crate::error_ext::IoResultExt;

/// Environment variable prefix for overrides (`INJECTED_TRACE_READS=true`).
pub const ENV_PREFIX: &str = "INJECTED";

/// Registry diagnostics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Emit a `trace` event on every slot read
    pub trace_reads: bool,
    /// Emit `debug`/`trace` events when slots are written
    pub trace_writes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trace_reads: false,
            trace_writes: true,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub trace_reads: Option<bool>,
    pub trace_writes: Option<bool>,
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> InjectedResult<RawSettings> {
    let content = std::fs::read_to_string(path).with_path_context("read settings", path)?;
    toml::from_str(&content).map_err(|e| InjectedError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            trace_reads: overlay.trace_reads.unwrap_or(self.trace_reads),
            trace_writes: overlay.trace_writes.unwrap_or(self.trace_writes),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `path` - Optional settings file; skipped when it does not exist
    pub fn load(path: Option<&Path>) -> InjectedResult<Self> {
        let mut current = Self::default();

        if let Some(path) = path {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        Self::apply_env_overrides(current)
    }

    /// Apply `INJECTED_*` environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> InjectedResult<Self> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_bool("trace_reads") {
            settings.trace_reads = val;
        }
        if let Ok(val) = config.get_bool("trace_writes") {
            settings.trace_writes = val;
        }

        Ok(settings)
    }

    /// Render the effective settings as TOML.
    pub fn to_toml_string(&self) -> InjectedResult<String> {
        toml::to_string_pretty(self).map_err(|e| InjectedError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

fn config_err(e: ConfigError) -> InjectedError {
    InjectedError::Config {
        message: e.to_string(),
    }
}
