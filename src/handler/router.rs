//! Level-based routing between two handlers.
//!
//! # Responsibilities
//! - Send `ERROR` and above to the high-severity handler
//! - Send everything below `ERROR` to the low-severity handler
//! - Answer `enabled` from the same handler `handle` would use
//! - Apply attrs and groups to both handlers alike
//!
//! # Design Decisions
//! - The threshold is fixed; per-tier behavior is configured on the handlers
//! - Immutable after construction (thread-safe without locks)
//! - Sink errors are returned unchanged; no retry, no fallback tier

use std::sync::Arc;

use crate::error::LogResult;
use crate::handler::Handler;
use crate::record::{Attr, Level, Record};

/// Lowest level routed to the high-severity handler.
pub const ERROR_THRESHOLD: Level = Level::ERROR;

/// Routes records to one of two handlers by severity.
#[derive(Debug, Clone)]
pub struct LevelRouter {
    low: Arc<dyn Handler>,
    high: Arc<dyn Handler>,
}

impl LevelRouter {
    pub fn new(low: Arc<dyn Handler>, high: Arc<dyn Handler>) -> Self {
        Self { low, high }
    }

    /// Handler for levels below [`ERROR_THRESHOLD`].
    pub fn low(&self) -> &Arc<dyn Handler> {
        &self.low
    }

    /// Handler for [`ERROR_THRESHOLD`] and above.
    pub fn high(&self) -> &Arc<dyn Handler> {
        &self.high
    }

    fn select(&self, level: Level) -> &Arc<dyn Handler> {
        if level >= ERROR_THRESHOLD {
            &self.high
        } else {
            &self.low
        }
    }
}

impl Handler for LevelRouter {
    fn enabled(&self, level: Level) -> bool {
        self.select(level).enabled(level)
    }

    fn handle(&self, record: &Record) -> LogResult<()> {
        self.select(record.level).handle(record)
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Handler> {
        Arc::new(Self {
            low: self.low.with_attrs(attrs),
            high: self.high.with_attrs(attrs),
        })
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        Arc::new(Self {
            low: self.low.with_group(name),
            high: self.high.with_group(name),
        })
    }
}
