//! Shared handlers and writers for integration tests.

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;
use tiered_log::error::LogResult;
use tiered_log::{Attr, Handler, Level, LogError, Record};

/// Handler that keeps every record and ignores decoration.
#[derive(Debug, Clone, Default)]
pub struct RecordingHandler {
    records: Arc<Mutex<Vec<Record>>>,
    min_level: Option<Level>,
}

#[allow(dead_code)]
impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_level(level: Level) -> Self {
        Self {
            min_level: Some(level),
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }

    pub fn levels(&self) -> Vec<Level> {
        self.records.lock().iter().map(|r| r.level).collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }
}

impl Handler for RecordingHandler {
    fn enabled(&self, level: Level) -> bool {
        self.min_level.map_or(true, |min| level >= min)
    }

    fn handle(&self, record: &Record) -> LogResult<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    fn with_attrs(&self, _attrs: &[Attr]) -> Arc<dyn Handler> {
        Arc::new(self.clone())
    }

    fn with_group(&self, _name: &str) -> Arc<dyn Handler> {
        Arc::new(self.clone())
    }
}

/// Handler whose every emission fails.
#[allow(dead_code)]
#[derive(Debug, Clone, Default)]
pub struct FailingHandler;

impl Handler for FailingHandler {
    fn enabled(&self, _level: Level) -> bool {
        true
    }

    fn handle(&self, _record: &Record) -> LogResult<()> {
        Err(LogError::Write(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "stream closed",
        )))
    }

    fn with_attrs(&self, _attrs: &[Attr]) -> Arc<dyn Handler> {
        Arc::new(self.clone())
    }

    fn with_group(&self, _name: &str) -> Arc<dyn Handler> {
        Arc::new(self.clone())
    }
}

/// In-memory output stream.
#[derive(Debug, Clone, Default)]
pub struct Buffer(Arc<Mutex<Vec<u8>>>);

#[allow(dead_code)]
impl Buffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for Buffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
