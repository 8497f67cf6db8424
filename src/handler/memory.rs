//! In-memory handler that records what it receives.
//!
//! Useful for asserting on log output in tests. All handlers derived from
//! one `MemoryHandler` append to the same storage.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::LogResult;
use crate::handler::Handler;
use crate::record::{Attr, Level, Record};

#[derive(Debug, Clone, Default)]
pub struct MemoryHandler {
    records: Arc<Mutex<Vec<Record>>>,
    min_level: Option<Level>,
    /// Attributes added by `with_attrs`, already qualified with their group.
    attrs: Vec<Attr>,
    /// Open groups joined as `a.b.`.
    prefix: String,
}

impl MemoryHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept records at or above `level`.
    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = Some(level);
        self
    }

    /// Copies of every record handled so far, oldest first.
    ///
    /// Attributes added through `with_attrs` come first, followed by the
    /// record's own attributes; keys carry their group prefix.
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .map(|r| r.message.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }

    fn qualify(&self, attr: &Attr) -> Attr {
        Attr {
            key: format!("{}{}", self.prefix, attr.key),
            value: attr.value.clone(),
        }
    }
}

impl Handler for MemoryHandler {
    fn enabled(&self, level: Level) -> bool {
        self.min_level.map_or(true, |min| level >= min)
    }

    fn handle(&self, record: &Record) -> LogResult<()> {
        let mut captured = record.clone();
        captured.attrs = self
            .attrs
            .iter()
            .cloned()
            .chain(record.attrs.iter().map(|a| self.qualify(a)))
            .collect();
        self.records.lock().push(captured);
        Ok(())
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Handler> {
        let mut derived = self.clone();
        derived.attrs.extend(attrs.iter().map(|a| self.qualify(a)));
        Arc::new(derived)
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        let mut derived = self.clone();
        if !name.is_empty() {
            derived.prefix.push_str(name);
            derived.prefix.push('.');
        }
        Arc::new(derived)
    }
}
