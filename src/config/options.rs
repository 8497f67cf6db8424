//! Formatting options for console handlers.

use std::fmt;
use std::sync::Arc;

use crate::record::{Attr, Level};

/// Attribute rewrite hook.
///
/// Called with the open group path and the attribute; returns the attribute
/// to render. Returning an attribute with an empty key drops it.
pub type ReplaceAttr = Arc<dyn Fn(&[String], Attr) -> Attr + Send + Sync>;

/// Default time layout, e.g. `Jan  2 15:04:05.000`.
pub const DEFAULT_TIME_FORMAT: &str = "%b %e %H:%M:%S%.3f";

/// Formatting knobs for a console handler.
///
/// A value type: cloning copies every knob, so handlers built from a clone
/// are unaffected by later changes to the original.
#[derive(Clone)]
pub struct Options {
    /// Records below this level are not emitted.
    pub level: Level,

    /// Render the call site (`file:line`) of each record.
    pub add_source: bool,

    /// chrono strftime layout for timestamps. `None` uses [`DEFAULT_TIME_FORMAT`].
    pub time_format: Option<String>,

    /// Disable ANSI escape sequences.
    pub no_color: bool,

    /// Optional attribute rewrite hook.
    pub replace_attr: Option<ReplaceAttr>,
}

impl Options {
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = Some(format.into());
        self
    }

    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    pub fn with_replace_attr<F>(mut self, f: F) -> Self
    where
        F: Fn(&[String], Attr) -> Attr + Send + Sync + 'static,
    {
        self.replace_attr = Some(Arc::new(f));
        self
    }

    /// Effective time layout.
    pub fn time_format(&self) -> &str {
        self.time_format.as_deref().unwrap_or(DEFAULT_TIME_FORMAT)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            add_source: false,
            time_format: None,
            no_color: false,
            replace_attr: None,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("level", &self.level)
            .field("add_source", &self.add_source)
            .field("time_format", &self.time_format)
            .field("no_color", &self.no_color)
            .field("replace_attr", &self.replace_attr.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
