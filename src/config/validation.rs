//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the level name parses
//! - Check the time layout is a valid strftime pattern
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LogConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is turned into handler options

use chrono::format::{Item, StrftimeItems};
use thiserror::Error;

use crate::config::schema::LogConfig;
use crate::record::{Level, ParseLevelError};

/// A single semantic problem in a [`LogConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(transparent)]
    UnknownLevel(#[from] ParseLevelError),

    #[error("time format is empty")]
    EmptyTimeFormat,

    #[error("invalid time format {0:?}")]
    InvalidTimeFormat(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &LogConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.level.parse::<Level>() {
        errors.push(ValidationError::UnknownLevel(e));
    }

    if let Some(format) = &config.time_format {
        if format.is_empty() {
            errors.push(ValidationError::EmptyTimeFormat);
        } else if !is_valid_time_format(format) {
            errors.push(ValidationError::InvalidTimeFormat(format.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Whether chrono accepts `format` as a strftime layout.
pub fn is_valid_time_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}
