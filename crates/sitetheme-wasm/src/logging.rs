//! Routes `tracing` events to the browser console.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use wasm_bindgen::JsValue;
use web_sys::console;

type Writer = fn(Level, &str);

/// Layer that writes each event as one console line, using the console method
/// that matches the event level.
#[derive(Clone, Copy)]
pub struct ConsoleLayer {
    write: Writer,
}

impl ConsoleLayer {
    pub fn new() -> Self {
        Self {
            write: write_console,
        }
    }

    #[cfg(test)]
    fn with_writer(write: Writer) -> Self {
        Self { write }
    }
}

impl Default for ConsoleLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for ConsoleLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut line = EventLine::default();
        event.record(&mut line);
        let metadata = event.metadata();
        (self.write)(*metadata.level(), &line.render(metadata.target()));
    }
}

fn write_console(level: Level, line: &str) {
    let line = JsValue::from_str(line);
    match level {
        Level::ERROR => console::error_1(&line),
        Level::WARN => console::warn_1(&line),
        Level::INFO => console::info_1(&line),
        _ => console::debug_1(&line),
    }
}

#[derive(Default)]
struct EventLine {
    message: String,
    fields: String,
}

impl EventLine {
    fn render(&self, target: &str) -> String {
        format!("{target}: {}{}", self.message, self.fields)
    }
}

impl Visit for EventLine {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}

/// Install the console layer as the global subscriber. Events above
/// `max_level` are dropped. Does nothing if a subscriber is already set.
pub fn init(max_level: LevelFilter) {
    let _ = tracing_subscriber::registry()
        .with(ConsoleLayer::new().with_filter(max_level))
        .try_init();
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    thread_local! {
        static LINES: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
    }

    fn capture(level: Level, line: &str) {
        LINES.with(|lines| lines.borrow_mut().push((level, line.to_string())));
    }

    #[test]
    fn test_warnings_reach_the_console_with_fields() {
        let subscriber = tracing_subscriber::registry()
            .with(ConsoleLayer::with_writer(capture).with_filter(LevelFilter::WARN));
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(theme.palette = "ocean", theme.listener_id = 3_u64, "Unknown palette, using default");
            tracing::info!("Theme applied");
        });

        let lines = LINES.with(|lines| lines.borrow().clone());
        assert_eq!(lines.len(), 1);
        let (level, line) = &lines[0];
        assert_eq!(*level, Level::WARN);
        assert!(line.contains(": Unknown palette, using default"));
        assert!(line.ends_with(" theme.palette=ocean theme.listener_id=3"));
    }
}
