//! Output stream shared between handlers.

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

/// A cloneable handle to one output stream.
///
/// Every clone writes to the same stream. Each call to [`write_line`](Self::write_line)
/// holds the lock for the whole line, so lines from concurrent handlers
/// never interleave.
#[derive(Clone)]
pub struct SharedWriter {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl SharedWriter {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// The process's standard error stream.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Write one complete, already rendered line and flush.
    pub fn write_line(&self, line: &[u8]) -> io::Result<()> {
        let mut writer = self.inner.lock();
        writer.write_all(line)?;
        writer.flush()
    }

    /// Whether two handles refer to the same stream.
    pub fn same_stream(&self, other: &SharedWriter) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for SharedWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedWriter").finish_non_exhaustive()
    }
}
