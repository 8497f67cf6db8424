//! Forwarding `tracing` events into a handler.
//!
//! This layer lets code instrumented with `tracing` macros log through the
//! two-tier router:
//!
//! ```ignore
//! use tiered_log::bridge::TieredLayer;
//! use tracing_subscriber::prelude::*;
//! use tracing_subscriber::EnvFilter;
//!
//! tiered_log::init_default(None);
//! tracing_subscriber::registry()
//!     .with(TieredLayer::default_logger().with_filter(EnvFilter::from_default_env()))
//!     .init();
//!
//! let span = tracing::info_span!("flush", shard = 3);
//! let _guard = span.enter();
//! tracing::error!(err = "disk full", "flush failed");
//! // ERR src/store.rs:42 flush failed flush.shard=3 flush.err="disk full"
//! ```

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::span::{self, Id};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use crate::default::default_logger;
use crate::handler::Handler;
use crate::record::{Attr, Level, Record, Source, Value};

/// Map a `tracing` level onto a record level.
///
/// `TRACE` has no named counterpart and sits four steps below `DEBUG`.
pub fn level_from_tracing(level: &tracing::Level) -> Level {
    if *level == tracing::Level::ERROR {
        Level::ERROR
    } else if *level == tracing::Level::WARN {
        Level::WARN
    } else if *level == tracing::Level::INFO {
        Level::INFO
    } else if *level == tracing::Level::DEBUG {
        Level::DEBUG
    } else {
        Level::DEBUG.offset(-4)
    }
}

enum Target {
    Handler(Arc<dyn Handler>),
    Default,
}

/// A tracing Layer that turns events into records.
///
/// Event fields become attributes and the names of enclosing spans become
/// groups, outermost first.
pub struct TieredLayer {
    target: Target,
}

impl TieredLayer {
    /// Forward every event to `handler`.
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self {
            target: Target::Handler(handler),
        }
    }

    /// Forward every event to whichever logger is the process default when
    /// the event fires.
    pub fn default_logger() -> Self {
        Self {
            target: Target::Default,
        }
    }

    fn handler(&self) -> Arc<dyn Handler> {
        match &self.target {
            Target::Handler(handler) => handler.clone(),
            Target::Default => default_logger().handler().clone(),
        }
    }
}

/// Fields recorded on a span, stored in its extensions.
struct SpanFields(Vec<Attr>);

impl<S> Layer<S> for TieredLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut visitor = AttrVisitor::default();
        attrs.record(&mut visitor);
        span.extensions_mut().insert(SpanFields(visitor.into_attrs()));
    }

    fn on_record(&self, id: &Id, values: &span::Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut visitor = AttrVisitor::default();
        values.record(&mut visitor);

        let mut extensions = span.extensions_mut();
        match extensions.get_mut::<SpanFields>() {
            Some(fields) => fields.0.extend(visitor.into_attrs()),
            None => extensions.insert(SpanFields(visitor.into_attrs())),
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = level_from_tracing(metadata.level());

        let mut handler = self.handler();
        if !handler.enabled(level) {
            return;
        }

        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                handler = handler.with_group(span.name());
                if let Some(fields) = span.extensions().get::<SpanFields>() {
                    if !fields.0.is_empty() {
                        handler = handler.with_attrs(&fields.0);
                    }
                }
            }
        }

        let mut visitor = AttrVisitor::default();
        event.record(&mut visitor);

        let mut record = Record::new(level, visitor.message.unwrap_or_default())
            .with_attrs(visitor.attrs);
        if let (Some(file), Some(line)) = (metadata.file(), metadata.line()) {
            record = record.with_source(Source::new(file, line));
        }

        // Errors are dropped like any other log call.
        let _ = handler.handle(&record);
    }
}

/// Visitor that extracts the message and typed fields from an event.
#[derive(Default)]
struct AttrVisitor {
    message: Option<String>,
    attrs: Vec<Attr>,
}

impl AttrVisitor {
    /// Every visited field as an attribute, `message` included.
    fn into_attrs(mut self) -> Vec<Attr> {
        if let Some(message) = self.message.take() {
            self.attrs.insert(0, Attr::new("message", message));
        }
        self.attrs
    }

    fn push(&mut self, field: &Field, value: impl Into<Value>) {
        self.attrs.push(Attr::new(field.name(), value));
    }
}

impl Visit for AttrVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let mut buf = String::new();
        let _ = write!(&mut buf, "{:?}", value);

        if field.name() == "message" {
            self.message = Some(buf);
        } else {
            self.push(field, buf);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.push(field, value);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, value);
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.push(field, value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::MemoryHandler;
    use tracing_subscriber::prelude::*;

    #[test]
    fn test_events_become_records() {
        let memory = MemoryHandler::new();
        let subscriber =
            tracing_subscriber::registry().with(TieredLayer::new(Arc::new(memory.clone())));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(count = 3, ready = true, "started");
            let span = tracing::info_span!("req");
            let _guard = span.enter();
            tracing::error!(err = "boom", "failed");
        });

        let records = memory.records();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].level, Level::INFO);
        assert_eq!(records[0].message, "started");
        assert_eq!(
            records[0].attrs,
            vec![Attr::new("count", 3i64), Attr::new("ready", true)]
        );
        assert!(records[0].source.is_some());

        assert_eq!(records[1].level, Level::ERROR);
        assert_eq!(records[1].attrs, vec![Attr::new("req.err", "boom")]);
    }

    #[test]
    fn test_disabled_levels_are_skipped() {
        let memory = MemoryHandler::new().with_min_level(Level::INFO);
        let subscriber =
            tracing_subscriber::registry().with(TieredLayer::new(Arc::new(memory.clone())));

        tracing::subscriber::with_default(subscriber, || {
            tracing::trace!("noise");
            tracing::debug!("noise");
            tracing::warn!("kept");
        });

        assert_eq!(memory.messages(), vec!["kept"]);
    }

    #[test]
    fn test_span_fields_become_group_attrs() {
        let memory = MemoryHandler::new();
        let subscriber =
            tracing_subscriber::registry().with(TieredLayer::new(Arc::new(memory.clone())));

        tracing::subscriber::with_default(subscriber, || {
            let outer = tracing::info_span!("req", id = 7, user = tracing::field::Empty);
            let _outer = outer.enter();
            outer.record("user", "ann");

            let inner = tracing::info_span!("db");
            let _inner = inner.enter();
            tracing::info!(k = "v", "query");
        });

        let records = memory.records();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].attrs,
            vec![
                Attr::new("req.id", 7i64),
                Attr::new("req.user", "ann"),
                Attr::new("req.db.k", "v"),
            ]
        );
    }

    #[test]
    fn test_env_filter_limits_events() {
        let memory = MemoryHandler::new();
        let layer = TieredLayer::new(Arc::new(memory.clone()))
            .with_filter(tracing_subscriber::EnvFilter::new("warn"));
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("dropped");
            tracing::warn!("kept");
            tracing::error!("kept too");
        });

        assert_eq!(memory.messages(), vec!["kept", "kept too"]);
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(level_from_tracing(&tracing::Level::TRACE), Level::DEBUG.offset(-4));
        assert_eq!(level_from_tracing(&tracing::Level::WARN), Level::WARN);
        assert_eq!(level_from_tracing(&tracing::Level::ERROR), Level::ERROR);
    }
}
