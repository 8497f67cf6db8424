//! Logger facade.
//!
//! # Responsibilities
//! - Offer severity-tagged emission methods
//! - Build records with timestamp and call site
//! - Derive loggers carrying attributes or groups
//!
//! # Design Decisions
//! - Check `enabled` before building a record, so disabled levels are cheap
//! - Call sites come from `#[track_caller]`, not from a macro
//! - `log` and friends drop emission errors; `try_log` returns them

use std::sync::Arc;

use crate::error::LogResult;
use crate::handler::Handler;
use crate::record::{Attr, Level, Record, Source};

/// Handle for emitting records through a [`Handler`].
///
/// Cloning is cheap; clones share the handler.
#[derive(Debug, Clone)]
pub struct Logger {
    handler: Arc<dyn Handler>,
}

impl Logger {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }

    pub fn from_handler<H: Handler + 'static>(handler: H) -> Self {
        Self::new(Arc::new(handler))
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.handler.enabled(level)
    }

    /// Emit a record, returning any handler error.
    #[track_caller]
    pub fn try_log(&self, level: Level, msg: &str, attrs: &[Attr]) -> LogResult<()> {
        if !self.enabled(level) {
            return Ok(());
        }
        let record = Record::new(level, msg)
            .with_attrs(attrs.iter().cloned())
            .with_source(Source::caller());
        self.handler.handle(&record)
    }

    /// Emit a record. A handler error loses the record and nothing else.
    #[track_caller]
    pub fn log(&self, level: Level, msg: &str, attrs: &[Attr]) {
        let _ = self.try_log(level, msg, attrs);
    }

    #[track_caller]
    pub fn debug(&self, msg: &str, attrs: &[Attr]) {
        self.log(Level::DEBUG, msg, attrs);
    }

    #[track_caller]
    pub fn info(&self, msg: &str, attrs: &[Attr]) {
        self.log(Level::INFO, msg, attrs);
    }

    #[track_caller]
    pub fn warn(&self, msg: &str, attrs: &[Attr]) {
        self.log(Level::WARN, msg, attrs);
    }

    #[track_caller]
    pub fn error(&self, msg: &str, attrs: &[Attr]) {
        self.log(Level::ERROR, msg, attrs);
    }

    /// Logger whose records all carry `attrs`.
    pub fn with(&self, attrs: &[Attr]) -> Logger {
        if attrs.is_empty() {
            return self.clone();
        }
        Self::new(self.handler.with_attrs(attrs))
    }

    /// Logger whose later attributes are qualified with group `name`.
    pub fn with_group(&self, name: &str) -> Logger {
        if name.is_empty() {
            return self.clone();
        }
        Self::new(self.handler.with_group(name))
    }
}
