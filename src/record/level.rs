//! Severity levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Ordered record severity.
///
/// Levels are plain integers so callers can define their own levels between
/// or above the named ones (`Level::ERROR.offset(4)` for a "critical" tier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Level(i32);

impl Level {
    pub const DEBUG: Level = Level(-4);
    pub const INFO: Level = Level(0);
    pub const WARN: Level = Level(4);
    pub const ERROR: Level = Level(8);

    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Level `delta` steps away from this one.
    pub const fn offset(self, delta: i32) -> Self {
        Self(self.0.saturating_add(delta))
    }

    /// Nearest named level at or below this one, and the distance to it.
    ///
    /// Anything below `INFO` is reported relative to `DEBUG`.
    pub fn base(self) -> (Level, i32) {
        let base = if self < Level::INFO {
            Level::DEBUG
        } else if self < Level::WARN {
            Level::INFO
        } else if self < Level::ERROR {
            Level::WARN
        } else {
            Level::ERROR
        };
        (base, self.0.saturating_sub(base.0))
    }

    fn name(self) -> &'static str {
        match self {
            Level::DEBUG => "DEBUG",
            Level::INFO => "INFO",
            Level::WARN => "WARN",
            _ => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (base, delta) = self.base();
        if delta == 0 {
            f.write_str(base.name())
        } else {
            write!(f, "{}{:+}", base.name(), delta)
        }
    }
}

/// Error returned when a level name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log level {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    /// Parses `debug`, `info`, `warn` (or `warning`), `error`, case-insensitive,
    /// with an optional signed offset such as `error+4` or `INFO-2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseLevelError(s.to_string());
        let trimmed = s.trim();
        let (name, delta) = match trimmed.find(['+', '-']) {
            Some(idx) => {
                let delta: i32 = trimmed[idx..].parse().map_err(|_| err())?;
                (&trimmed[..idx], delta)
            }
            None => (trimmed, 0),
        };

        let base = match name.to_ascii_lowercase().as_str() {
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" | "warning" => Level::WARN,
            "error" => Level::ERROR,
            _ => return Err(err()),
        };
        Ok(base.offset(delta))
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl From<i32> for Level {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<Level> for i32 {
    fn from(level: Level) -> Self {
        level.0
    }
}
