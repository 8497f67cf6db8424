//! Configuration file watcher for hot reload.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::builder::init_default;
use crate::config::loader::{load_config, ConfigError};
use crate::config::options::Options;
use crate::logger::Logger;

/// Watches a configuration file and re-installs the default logger when it changes.
pub struct ConfigWatcher {
    path: PathBuf,
    base: Options,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// `base` supplies what the file cannot express, such as the rewrite
    /// hook; the file's level, time format and color setting replace the
    /// base's on every reload.
    pub fn new(path: &Path, base: Option<&Options>) -> Self {
        Self {
            path: path.to_path_buf(),
            base: base.cloned().unwrap_or_default(),
        }
    }

    /// Load the file once and install the resulting logger as the default.
    pub fn reload(&self) -> Result<Logger, ConfigError> {
        reload_default(&self.path, &self.base)
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher stops when dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = self.path.clone();
        let base = self.base.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Logging config change detected, reloading...");
                        match reload_changed(&path, &base) {
                            Some(Ok(_)) => tracing::info!("Logging config reloaded"),
                            Some(Err(e)) => tracing::error!(
                                "Failed to reload logging config: {}. Keeping current logger.",
                                e
                            ),
                            None => tracing::debug!("Logging config is blank, skipping reload"),
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Logging config watcher started");
        Ok(watcher)
    }
}

/// Reload after a change event.
///
/// Returns `None` without touching the default when the file is blank:
/// editors and `fs::write` truncate before writing, and the truncation
/// fires its own event.
fn reload_changed(path: &Path, base: &Options) -> Option<Result<Logger, ConfigError>> {
    match fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => None,
        _ => Some(reload_default(path, base)),
    }
}

fn reload_default(path: &Path, base: &Options) -> Result<Logger, ConfigError> {
    let opts = load_config(path)?.merge_into(base)?;
    Ok(init_default(Some(&opts)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Level;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reload_builds_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "level = \"debug\"").unwrap();

        let watcher = ConfigWatcher::new(file.path(), None);
        let logger = watcher.reload().unwrap();
        assert!(logger.enabled(Level::DEBUG));
    }

    #[test]
    fn test_reload_rejects_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "level = \"loud\"").unwrap();

        let watcher = ConfigWatcher::new(file.path(), None);
        assert!(matches!(watcher.reload(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_blank_change_is_skipped() {
        let file = NamedTempFile::new().unwrap();
        assert!(reload_changed(file.path(), &Options::default()).is_none());

        std::fs::write(file.path(), "  \n").unwrap();
        assert!(reload_changed(file.path(), &Options::default()).is_none());
    }

    #[test]
    fn test_changed_file_with_errors_is_reported() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "level = \"loud\"").unwrap();

        let result = reload_changed(file.path(), &Options::default());
        assert!(matches!(result, Some(Err(ConfigError::Validation(_)))));
    }

    #[test]
    fn test_run_starts_watching() {
        let file = NamedTempFile::new().unwrap();
        let watcher = ConfigWatcher::new(file.path(), None).run();
        assert!(watcher.is_ok());
    }
}
