//! Record handlers.
//!
//! # Data Flow
//! ```text
//! Logger::info(..)
//!     → router.rs (pick the low or high tier by level)
//!     → console.rs (render a line, colorize, add source)
//!     → writer.rs (single locked write to the shared stream)
//!
//! Logger::with(..) / with_group(..)
//!     → router.rs (derive both tiers with the same decoration)
//!     → each handler returns a new derived instance
//! ```
//!
//! # Design Decisions
//! - Handlers are immutable; decoration always returns a new handler
//! - Derived handlers are shared as `Arc<dyn Handler>`
//! - Emission failures are returned, never swallowed, by handlers
//! - Thread safety of output is the sink's job (the writer lock), not the router's

pub mod console;
pub mod memory;
pub mod router;
pub mod writer;

use std::fmt;
use std::sync::Arc;

use crate::error::LogResult;
use crate::record::{Attr, Level, Record};

pub use console::ConsoleHandler;
pub use memory::MemoryHandler;
pub use router::{LevelRouter, ERROR_THRESHOLD};
pub use writer::SharedWriter;

/// A destination for log records.
pub trait Handler: Send + Sync + fmt::Debug {
    /// Whether a record at `level` would be processed at all.
    ///
    /// Callers check this before building a record so that disabled levels
    /// cost nothing.
    fn enabled(&self, level: Level) -> bool;

    /// Emit a record.
    fn handle(&self, record: &Record) -> LogResult<()>;

    /// New handler that adds `attrs` to every record it handles.
    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Handler>;

    /// New handler that qualifies all later attributes with group `name`.
    fn with_group(&self, name: &str) -> Arc<dyn Handler>;
}
