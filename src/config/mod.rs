//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → schema.rs (LogConfig, environment overrides)
//!     → validation.rs (semantic checks)
//!     → options.rs (Options, merged over a code-supplied base)
//!     → builder (two console handlers + router)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → default logger is replaced atomically
//! ```
//!
//! # Design Decisions
//! - Options are copied by value into each handler; later edits do not leak in
//! - All file fields have defaults to allow an empty config
//! - The attribute rewrite hook is code-only
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod options;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use options::{Options, ReplaceAttr, DEFAULT_TIME_FORMAT};
pub use schema::LogConfig;
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
