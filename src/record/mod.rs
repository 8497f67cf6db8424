//! Record model.
//!
//! # Responsibilities
//! - Define ordered severity levels
//! - Define typed attribute values and key/value attributes
//! - Define the record handed to handlers, with optional call-site info
//!
//! # Design Decisions
//! - Levels are integers, so custom levels above `ERROR` order correctly
//! - Records are plain owned data; cloning gives an independent copy
//! - Highlighting is a value wrapper, so it survives attribute rewriting

pub mod level;
#[allow(clippy::module_inception)]
pub mod record;
pub mod value;

pub use level::{Level, ParseLevelError};
pub use record::{Record, Source};
pub use value::{Attr, Value};
