//! A `tracing` layer that records events so tests can assert on logs.

use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

/// One recorded event: level, message and the names of its enclosing spans.
type Captured = (Level, String, Vec<String>);

#[derive(Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<Captured>>>,
}

impl LogCapture {
    /// Installs the capture as the default subscriber for the current thread.
    ///
    /// Tasks spawned on a current-thread runtime log through it as well.
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let guard = tracing::subscriber::set_default(
            tracing_subscriber::registry().with(capture.clone()),
        );
        (capture, guard)
    }

    pub fn errors(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, _, _)| *level == Level::ERROR)
            .map(|(_, message, _)| message.clone())
            .collect()
    }

    /// Span names enclosing the first event whose message equals `message`.
    pub fn spans_of(&self, message: &str) -> Option<Vec<String>> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .find(|(_, m, _)| m == message)
            .map(|(_, _, spans)| spans.clone())
    }
}

impl<S> Layer<S> for LogCapture
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let spans = ctx
            .event_scope(event)
            .map(|scope| scope.map(|span| span.name().to_string()).collect())
            .unwrap_or_default();
        self.events
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.0, spans));
    }
}

#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}
