//! Configuration schema definitions.
//!
//! The file form of [`Options`]. The attribute rewrite hook is code-only and
//! is never read from a file.

use serde::{Deserialize, Serialize};

use crate::config::loader::ConfigError;
use crate::config::options::Options;
use crate::config::validation::{validate_config, ValidationError};
use crate::record::Level;

/// Environment variable overriding [`LogConfig::level`].
pub const LEVEL_ENV: &str = "TIERED_LOG_LEVEL";

/// Environment variable overriding [`LogConfig::time_format`].
pub const TIME_FORMAT_ENV: &str = "TIERED_LOG_TIME_FORMAT";

/// Conventional variable that disables color when set to a non-empty value.
pub const NO_COLOR_ENV: &str = "NO_COLOR";

/// Logging configuration as read from TOML.
///
/// ```toml
/// level = "debug"
/// time_format = "%H:%M:%S%.3f"
/// no_color = false
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// Minimum level (debug, info, warn, error, optionally with an offset like "error+4").
    pub level: String,

    /// chrono strftime layout for timestamps.
    pub time_format: Option<String>,

    /// Disable ANSI colors.
    pub no_color: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            time_format: None,
            no_color: false,
        }
    }
}

impl LogConfig {
    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup(LEVEL_ENV) {
            self.level = level;
        }
        if let Some(format) = lookup(TIME_FORMAT_ENV) {
            self.time_format = Some(format);
        }
        if lookup(NO_COLOR_ENV).is_some_and(|v| !v.is_empty()) {
            self.no_color = true;
        }
    }

    /// Validated [`Options`] from this configuration alone.
    pub fn to_options(&self) -> Result<Options, ConfigError> {
        self.merge_into(&Options::default())
    }

    /// Validated copy of `base` with this configuration's knobs applied.
    ///
    /// `base` keeps its rewrite hook and `add_source` setting.
    pub fn merge_into(&self, base: &Options) -> Result<Options, ConfigError> {
        validate_config(self).map_err(ConfigError::Validation)?;

        let level: Level = self.level.parse().map_err(|e| {
            ConfigError::Validation(vec![ValidationError::UnknownLevel(e)])
        })?;

        let mut opts = base.clone();
        opts.level = level;
        opts.time_format = self.time_format.clone();
        opts.no_color = self.no_color;
        Ok(opts)
    }
}
