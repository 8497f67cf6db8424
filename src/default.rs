//! Process-wide default logger.
//!
//! # Responsibilities
//! - Hold the logger used by code that has no logger of its own
//! - Replace it atomically on install
//!
//! # Design Decisions
//! - Last writer wins; there is no unset
//! - Reads are lock-free (`ArcSwap`)
//! - Until something is installed, records go to stderr at `INFO` and above
//! - Nothing else in the crate reads this slot except the tracing bridge in
//!   its default-logger mode

use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwap;

use crate::config::Options;
use crate::handler::{ConsoleHandler, SharedWriter};
use crate::logger::Logger;
use crate::record::{Attr, Level};

static DEFAULT: LazyLock<ArcSwap<Logger>> = LazyLock::new(|| {
    let handler = ConsoleHandler::new(SharedWriter::stderr(), Options::default());
    ArcSwap::from_pointee(Logger::from_handler(handler))
});

/// The currently installed default logger.
pub fn default_logger() -> Logger {
    Logger::clone(&DEFAULT.load_full())
}

/// Install `logger` as the default, replacing whatever was there.
pub fn set_default(logger: Logger) {
    DEFAULT.store(Arc::new(logger));
}

/// Emit through the default logger.
#[track_caller]
pub fn log(level: Level, msg: &str, attrs: &[Attr]) {
    DEFAULT.load().log(level, msg, attrs);
}

#[track_caller]
pub fn debug(msg: &str, attrs: &[Attr]) {
    log(Level::DEBUG, msg, attrs);
}

#[track_caller]
pub fn info(msg: &str, attrs: &[Attr]) {
    log(Level::INFO, msg, attrs);
}

#[track_caller]
pub fn warn(msg: &str, attrs: &[Attr]) {
    log(Level::WARN, msg, attrs);
}

#[track_caller]
pub fn error(msg: &str, attrs: &[Attr]) {
    log(Level::ERROR, msg, attrs);
}
