//! Two-tier structured logging.
//!
//! Records below `ERROR` go to a lightweight console handler without call
//! sites; `ERROR` and above go to a second console handler that prints
//! `file:line` and highlights `err` / `error` attributes in red.
//!
//! ```text
//! Logger::info(..) / Logger::error(..) / tracing events (bridge)
//!     → LevelRouter
//!         level <  ERROR → ConsoleHandler (no source)
//!         level >= ERROR → ConsoleHandler (source, red errors)
//!     → SharedWriter (stderr)
//! ```
//!
//! ```ignore
//! let logger = tiered_log::init_default(None);
//! logger.info("listening", &[Attr::new("port", 8080)]);
//! tiered_log::error("accept failed", &[Attr::new("err", "too many open files")]);
//! ```

pub mod bridge;
pub mod builder;
pub mod config;
pub mod default;
pub mod error;
pub mod handler;
pub mod logger;
pub mod record;

pub use bridge::TieredLayer;
pub use builder::{build_logger, build_router, init_default};
pub use config::{load_config, ConfigWatcher, LogConfig, Options};
pub use default::{debug, default_logger, error, info, log, set_default, warn};
pub use error::LogError;
pub use handler::{ConsoleHandler, Handler, LevelRouter, MemoryHandler, SharedWriter};
pub use logger::Logger;
pub use record::{Attr, Level, Record, Source, Value};
