//! Tracing layer that forwards events to the browser console.
//!
//! The core crates log through `tracing`; in the browser nothing prints those
//! events unless a subscriber is installed. [`ConsoleLayer`] renders each
//! event as one line (`WARN target: message key=value ...`) and hands it to
//! `console.error` / `console.warn` / `console.info` / `console.debug` by level.

use std::fmt::{self, Write as _};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use wasm_bindgen::JsValue;

/// Receives each rendered line.
pub type Sink = fn(Level, &str);

pub struct ConsoleLayer {
    max_level: Level,
    sink: Sink,
}

impl ConsoleLayer {
    /// Forwards events at `max_level` and above (e.g. `Level::WARN` keeps
    /// warnings and errors).
    pub fn new(max_level: Level) -> Self {
        Self {
            max_level,
            sink: write_to_console,
        }
    }

    pub fn with_sink(mut self, sink: Sink) -> Self {
        self.sink = sink;
        self
    }
}

impl Default for ConsoleLayer {
    fn default() -> Self {
        Self::new(Level::WARN)
    }
}

impl<S> Layer<S> for ConsoleLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() > self.max_level {
            return;
        }
        let mut line = LineVisitor::default();
        event.record(&mut line);
        let rendered = format!(
            "{} {}: {}{}",
            meta.level(),
            meta.target(),
            line.message,
            line.fields
        );
        (self.sink)(*meta.level(), &rendered);
    }
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

fn write_to_console(level: Level, line: &str) {
    let line = JsValue::from_str(line);
    if level == Level::ERROR {
        web_sys::console::error_1(&line);
    } else if level == Level::WARN {
        web_sys::console::warn_1(&line);
    } else if level == Level::INFO {
        web_sys::console::info_1(&line);
    } else {
        web_sys::console::debug_1(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tracing_subscriber::layer::SubscriberExt;

    thread_local! {
        static LINES: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
    }

    fn capture(level: Level, line: &str) {
        LINES.with(|l| l.borrow_mut().push((level, line.to_string())));
    }

    fn captured() -> Vec<(Level, String)> {
        LINES.with(|l| l.take())
    }

    #[test]
    fn warnings_are_rendered_with_their_fields() {
        let subscriber = tracing_subscriber::registry().with(ConsoleLayer::default().with_sink(capture));
        tracing::subscriber::with_default(subscriber, || {
            let err = "request to /api/fuke/search failed with status 500";
            tracing::warn!(variant = "fuke", error = %err, "search failed");
        });

        let lines = captured();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Level::WARN);
        assert!(lines[0].1.starts_with("WARN "));
        assert!(lines[0].1.contains(": search failed variant=fuke"));
        assert!(lines[0].1.contains("error=request to /api/fuke/search failed with status 500"));
    }

    #[test]
    fn events_below_the_threshold_are_dropped() {
        let subscriber = tracing_subscriber::registry().with(ConsoleLayer::default().with_sink(capture));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("primary facet loaded");
            tracing::debug!("discarding stale search response");
            tracing::error!("fetch rejected");
        });

        let lines = captured();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Level::ERROR);
        assert!(lines[0].1.ends_with("fetch rejected"));
    }
}
