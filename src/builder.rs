//! Building the two-tier logger from one set of options.
//!
//! # Responsibilities
//! - Copy the caller's base options once per tier
//! - Force call-site output off for the low tier and on for the high tier
//! - Highlight `err` / `error` attributes on the high tier
//! - Optionally install the result as the process default
//!
//! # Design Decisions
//! - The caller's rewrite hook runs first; highlighting checks the key it
//!   returns, so a hook that renames `err` away also turns highlighting off
//! - Both tiers write to one shared stream (stderr unless told otherwise)

use std::sync::Arc;

use crate::config::{Options, ReplaceAttr};
use crate::default::set_default;
use crate::handler::{ConsoleHandler, LevelRouter, SharedWriter};
use crate::logger::Logger;
use crate::record::Attr;

/// ANSI palette index used for error attributes (bright red).
pub const ERROR_HIGHLIGHT_COLOR: u8 = 9;

/// Attribute keys highlighted on the high tier.
pub const ERROR_KEYS: [&str; 2] = ["err", "error"];

/// Compose `user` with error highlighting.
///
/// The returned hook calls `user` (when present) and then, if the resulting
/// key is `err` or `error`, tints the value with [`ERROR_HIGHLIGHT_COLOR`].
pub fn highlight_errors(user: Option<ReplaceAttr>) -> ReplaceAttr {
    Arc::new(move |groups: &[String], attr: Attr| {
        let attr = match &user {
            Some(replace) => replace(groups, attr),
            None => attr,
        };
        if ERROR_KEYS.contains(&attr.key.as_str()) {
            Attr::tint(ERROR_HIGHLIGHT_COLOR, attr)
        } else {
            attr
        }
    })
}

/// Options for the low tier: the base without call sites.
pub fn low_options(base: &Options) -> Options {
    let mut opts = base.clone();
    opts.add_source = false;
    opts
}

/// Options for the high tier: the base with call sites and error highlighting.
pub fn high_options(base: &Options) -> Options {
    let mut opts = base.clone();
    opts.add_source = true;
    opts.replace_attr = Some(highlight_errors(opts.replace_attr.take()));
    opts
}

/// Build the router over two console handlers writing to `writer`.
pub fn build_router(writer: SharedWriter, opts: Option<&Options>) -> LevelRouter {
    let base = opts.cloned().unwrap_or_default();
    let low = ConsoleHandler::new(writer.clone(), low_options(&base));
    let high = ConsoleHandler::new(writer, high_options(&base));
    LevelRouter::new(Arc::new(low), Arc::new(high))
}

/// Build a logger writing to stderr. Global state is untouched.
pub fn build_logger(opts: Option<&Options>) -> Logger {
    Logger::from_handler(build_router(SharedWriter::stderr(), opts))
}

/// Build a logger writing to stderr and install it as the process default.
pub fn init_default(opts: Option<&Options>) -> Logger {
    let logger = build_logger(opts);
    set_default(logger.clone());
    logger
}
