//! Colorized single-line console handler.
//!
//! # Output Format
//! ```text
//! Jan  2 15:04:05.000 INF connected peer=10.0.0.7 attempt=2
//! Jan  2 15:04:05.120 ERR src/net.rs:88 request failed err="connection reset"
//! ```
//!
//! # Design Decisions
//! - Attributes from `with_attrs` are rendered once, at derivation time
//! - A line is rendered into a buffer first, then written under one lock
//! - The rewrite hook sees built-in fields (`time`, `level`, `source`, `msg`)
//!   with an empty group path, like any other attribute
//! - An attribute whose key is empty after rewriting is dropped

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::config::options::Options;
use crate::error::LogResult;
use crate::handler::{Handler, SharedWriter};
use crate::record::{Attr, Level, Record, Value};

pub const TIME_KEY: &str = "time";
pub const LEVEL_KEY: &str = "level";
pub const SOURCE_KEY: &str = "source";
pub const MESSAGE_KEY: &str = "msg";

const RESET: &str = "\x1b[0m";
const FAINT: &str = "\x1b[2m";
const RESET_FAINT: &str = "\x1b[22m";
const BRIGHT_RED: &str = "\x1b[91m";
const BRIGHT_GREEN: &str = "\x1b[92m";
const BRIGHT_YELLOW: &str = "\x1b[93m";

/// Renders records as colorized text lines.
#[derive(Debug, Clone)]
pub struct ConsoleHandler {
    writer: SharedWriter,
    opts: Options,
    /// Open groups, outermost first.
    groups: Vec<String>,
    /// `groups` joined as `a.b.`.
    prefix: String,
    /// Attributes from `with_attrs`, already rendered with a leading space.
    preformatted: String,
}

impl ConsoleHandler {
    pub fn new(writer: SharedWriter, opts: Options) -> Self {
        Self {
            writer,
            opts,
            groups: Vec::new(),
            prefix: String::new(),
            preformatted: String::new(),
        }
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    pub fn writer(&self) -> &SharedWriter {
        &self.writer
    }

    /// Render a record to a complete line, including the trailing newline.
    pub fn render(&self, record: &Record) -> String {
        let mut buf = String::with_capacity(128);

        if let Some(attr) = self.replace_builtin(Attr::new(TIME_KEY, record.time)) {
            match &attr.value {
                Value::Time(time) => {
                    self.push_faint(&mut buf, |buf| self.push_time(buf, time));
                }
                other => self.push_value(&mut buf, other, false),
            }
        }

        if let Some(attr) = self.replace_builtin(Attr::new(LEVEL_KEY, record.level)) {
            push_separator(&mut buf);
            match &attr.value {
                Value::Level(level) => self.push_level(&mut buf, *level),
                other => self.push_value(&mut buf, other, false),
            }
        }

        if self.opts.add_source {
            if let Some(source) = &record.source {
                let attr = Attr::new(SOURCE_KEY, source.to_string());
                if let Some(attr) = self.replace_builtin(attr) {
                    push_separator(&mut buf);
                    self.push_faint(&mut buf, |buf| self.push_value(buf, &attr.value, false));
                }
            }
        }

        if let Some(attr) = self.replace_builtin(Attr::new(MESSAGE_KEY, record.message.as_str())) {
            let start = buf.len();
            push_separator(&mut buf);
            let rendered = buf.len();
            self.push_value(&mut buf, &attr.value, false);
            if buf.len() == rendered {
                buf.truncate(start);
            }
        }

        buf.push_str(&self.preformatted);
        for attr in &record.attrs {
            self.push_attr(&mut buf, attr.clone(), &self.prefix, &self.groups);
        }

        // Attributes carry a leading space; drop it when every built-in was omitted.
        if buf.starts_with(' ') {
            buf.remove(0);
        }
        buf.push('\n');
        buf
    }

    fn replace_builtin(&self, attr: Attr) -> Option<Attr> {
        let attr = match &self.opts.replace_attr {
            Some(replace) => replace(&[], attr),
            None => attr,
        };
        (!attr.key.is_empty()).then_some(attr)
    }

    fn push_attr(&self, buf: &mut String, attr: Attr, prefix: &str, groups: &[String]) {
        let attr = match (&self.opts.replace_attr, &attr.value) {
            (_, Value::Group(_)) | (None, _) => attr,
            (Some(replace), _) => replace(groups, attr),
        };

        match attr.value {
            Value::Group(children) => {
                if children.is_empty() {
                    return;
                }
                if attr.key.is_empty() {
                    // Unnamed groups are inlined into the enclosing scope.
                    for child in children {
                        self.push_attr(buf, child, prefix, groups);
                    }
                    return;
                }
                let nested_prefix = format!("{}{}.", prefix, attr.key);
                let mut nested_groups = groups.to_vec();
                nested_groups.push(attr.key);
                for child in children {
                    self.push_attr(buf, child, &nested_prefix, &nested_groups);
                }
            }
            value => {
                if attr.key.is_empty() {
                    return;
                }
                buf.push(' ');
                self.push_faint(buf, |buf| {
                    buf.push_str(prefix);
                    buf.push_str(&attr.key);
                    buf.push('=');
                });
                self.push_value(buf, &value, true);
            }
        }
    }

    fn push_value(&self, buf: &mut String, value: &Value, quote: bool) {
        match value {
            Value::String(s) => {
                if quote && needs_quoting(s) {
                    let _ = write!(buf, "{:?}", s);
                } else {
                    buf.push_str(s);
                }
            }
            Value::Time(time) => self.push_time(buf, time),
            Value::Tinted { color, value } => {
                if self.opts.no_color {
                    self.push_value(buf, value, quote);
                } else {
                    push_color(buf, *color);
                    self.push_value(buf, value, quote);
                    buf.push_str(RESET);
                }
            }
            other => {
                let _ = write!(buf, "{}", other);
            }
        }
    }

    fn push_time(&self, buf: &mut String, time: &DateTime<Local>) {
        let start = buf.len();
        if write!(buf, "{}", time.format(self.opts.time_format())).is_err() {
            // Invalid layouts fail while formatting; fall back to RFC 3339.
            buf.truncate(start);
            buf.push_str(&time.to_rfc3339_opts(chrono::SecondsFormat::Millis, true));
        }
    }

    fn push_level(&self, buf: &mut String, level: Level) {
        let (base, delta) = level.base();
        let (label, color) = match base {
            Level::DEBUG => ("DBG", None),
            Level::INFO => ("INF", Some(BRIGHT_GREEN)),
            Level::WARN => ("WRN", Some(BRIGHT_YELLOW)),
            _ => ("ERR", Some(BRIGHT_RED)),
        };
        let color = color.filter(|_| !self.opts.no_color);

        if let Some(color) = color {
            buf.push_str(color);
        }
        buf.push_str(label);
        if delta != 0 {
            let _ = write!(buf, "{:+}", delta);
        }
        if color.is_some() {
            buf.push_str(RESET);
        }
    }

    fn push_faint(&self, buf: &mut String, body: impl FnOnce(&mut String)) {
        if self.opts.no_color {
            body(buf);
        } else {
            buf.push_str(FAINT);
            body(buf);
            buf.push_str(RESET_FAINT);
        }
    }
}

impl Handler for ConsoleHandler {
    fn enabled(&self, level: Level) -> bool {
        level >= self.opts.level
    }

    fn handle(&self, record: &Record) -> LogResult<()> {
        let line = self.render(record);
        self.writer.write_line(line.as_bytes())?;
        Ok(())
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Handler> {
        let mut derived = self.clone();
        for attr in attrs {
            let mut rendered = String::new();
            self.push_attr(&mut rendered, attr.clone(), &self.prefix, &self.groups);
            derived.preformatted.push_str(&rendered);
        }
        Arc::new(derived)
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        let mut derived = self.clone();
        if !name.is_empty() {
            derived.groups.push(name.to_string());
            derived.prefix.push_str(name);
            derived.prefix.push('.');
        }
        Arc::new(derived)
    }
}

fn push_separator(buf: &mut String) {
    if !buf.is_empty() {
        buf.push(' ');
    }
}

/// ANSI foreground escape for a 256-color palette index.
fn push_color(buf: &mut String, color: u8) {
    let _ = match color {
        0..=7 => write!(buf, "\x1b[{}m", 30 + u32::from(color)),
        8..=15 => write!(buf, "\x1b[{}m", 90 + u32::from(color) - 8),
        _ => write!(buf, "\x1b[38;5;{}m", color),
    };
}

fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '=' || c == '"')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Source;
    use std::io::{self, Write};

    #[derive(Clone, Default)]
    struct Buffer(Arc<parking_lot::Mutex<Vec<u8>>>);

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
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

    fn plain() -> Options {
        Options::default()
            .with_no_color(true)
            .with_replace_attr(|groups, attr| {
                // Drop the timestamp so lines are deterministic.
                if groups.is_empty() && attr.key == TIME_KEY {
                    Attr::new("", attr.value)
                } else {
                    attr
                }
            })
    }

    fn handler(opts: Options) -> (ConsoleHandler, Buffer) {
        let buffer = Buffer::default();
        (ConsoleHandler::new(SharedWriter::new(buffer.clone()), opts), buffer)
    }

    #[test]
    fn test_render_plain_line() {
        let (handler, buffer) = handler(plain());
        let record = Record::new(Level::INFO, "connected")
            .with_attrs([Attr::new("peer", "10.0.0.7"), Attr::new("attempt", 2)]);

        handler.handle(&record).unwrap();
        assert_eq!(buffer.contents(), "INF connected peer=10.0.0.7 attempt=2\n");
    }

    #[test]
    fn test_level_labels() {
        let (handler, _) = handler(plain());
        let render = |level| handler.render(&Record::new(level, "m"));

        assert_eq!(render(Level::DEBUG), "DBG m\n");
        assert_eq!(render(Level::WARN), "WRN m\n");
        assert_eq!(render(Level::ERROR), "ERR m\n");
        assert_eq!(render(Level::ERROR.offset(4)), "ERR+4 m\n");
        assert_eq!(render(Level::INFO.offset(1)), "INF+1 m\n");
    }

    #[test]
    fn test_source_only_when_enabled() {
        let record = Record::new(Level::ERROR, "failed").with_source(Source::new("src/net.rs", 88));

        let (without, _) = handler(plain());
        assert_eq!(without.render(&record), "ERR failed\n");

        let mut opts = plain();
        opts.add_source = true;
        let (with, _) = handler(opts);
        assert_eq!(with.render(&record), "ERR src/net.rs:88 failed\n");
    }

    #[test]
    fn test_quoting() {
        let (handler, _) = handler(plain());
        let record = Record::new(Level::INFO, "m").with_attrs([
            Attr::new("err", "connection reset"),
            Attr::new("empty", ""),
            Attr::new("path", "/a/b"),
        ]);
        assert_eq!(
            handler.render(&record),
            "INF m err=\"connection reset\" empty=\"\" path=/a/b\n"
        );
    }

    #[test]
    fn test_groups_and_attrs() {
        let (handler, buffer) = handler(plain());
        let derived = handler
            .with_attrs(&[Attr::new("service", "api")])
            .with_group("req")
            .with_attrs(&[Attr::new("id", 7)]);

        let record = Record::new(Level::INFO, "done").with_attrs([
            Attr::new("status", 200),
            Attr::group("timing", [Attr::new("db_ms", 3)]),
            Attr::group("nothing", []),
        ]);
        derived.handle(&record).unwrap();

        assert_eq!(
            buffer.contents(),
            "INF done service=api req.id=7 req.status=200 req.timing.db_ms=3\n"
        );
    }

    #[test]
    fn test_replace_attr_sees_groups_and_can_drop() {
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let seen_in_hook = seen.clone();
        let opts = plain().with_replace_attr(move |groups, attr| {
            seen_in_hook.lock().push((groups.to_vec(), attr.key.clone()));
            if attr.key == "secret" || attr.key == TIME_KEY {
                Attr::new("", attr.value)
            } else {
                attr
            }
        });
        let (handler, _) = handler(opts);
        let derived = handler.with_group("auth");

        let record = Record::new(Level::INFO, "login")
            .with_attrs([Attr::new("user", "ann"), Attr::new("secret", "hunter2")]);
        let result = derived.with_attrs(&[]).with_group("").handle(&record);
        assert!(result.is_ok());

        let seen = seen.lock();
        assert!(seen.contains(&(vec!["auth".to_string()], "user".to_string())));
        assert!(seen.contains(&(Vec::new(), MESSAGE_KEY.to_string())));
    }

    #[test]
    fn test_dropped_secret_not_rendered() {
        let opts = plain().with_replace_attr(|_, attr| {
            if attr.key == "secret" || attr.key == TIME_KEY {
                Attr::new("", attr.value)
            } else {
                attr
            }
        });
        let (handler, _) = handler(opts);
        let record = Record::new(Level::INFO, "login").with_attrs([Attr::new("secret", "hunter2")]);
        assert_eq!(handler.render(&record), "INF login\n");
    }

    #[test]
    fn test_tinted_value_colors() {
        let record = Record::new(Level::INFO, "m")
            .with_attrs([Attr::tint(9, Attr::new("err", "boom"))]);

        let (plain_handler, _) = handler(plain());
        assert_eq!(plain_handler.render(&record), "INF m err=boom\n");

        let (colored, _) = handler(plain().with_no_color(false));
        let line = colored.render(&record);
        assert!(line.contains("\x1b[91mboom\x1b[0m"), "{line:?}");
        assert!(line.contains("\x1b[2merr=\x1b[22m"), "{line:?}");
    }

    #[test]
    fn test_color_escapes() {
        let mut buf = String::new();
        push_color(&mut buf, 1);
        push_color(&mut buf, 9);
        push_color(&mut buf, 208);
        assert_eq!(buf, "\x1b[31m\x1b[91m\x1b[38;5;208m");
    }

    #[test]
    fn test_enabled_uses_min_level() {
        let (handler, _) = handler(Options::default().with_level(Level::WARN));
        assert!(!handler.enabled(Level::INFO));
        assert!(handler.enabled(Level::WARN));
    }

    #[test]
    fn test_time_format() {
        let (handler, _) = handler(Options::default().with_no_color(true).with_time_format("%Y"));
        let record = Record::new(Level::INFO, "m");
        let year = record.time.format("%Y").to_string();
        assert_eq!(handler.render(&record), format!("{year} INF m\n"));
    }

    #[test]
    fn test_write_failure_is_returned() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let handler = ConsoleHandler::new(SharedWriter::new(Broken), plain());
        let err = handler.handle(&Record::new(Level::INFO, "lost")).unwrap_err();
        assert!(err.to_string().contains("closed"));
    }
}
