//! Tracing layer that mirrors transport events into the diagnostic log.
//!
//! The resource client only reports request outcomes through `tracing`; this
//! layer turns those records into `LogAppended` events so a UI can show them
//! next to the engine's own diagnostics.

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use jules_application::EventSink;

/// Target prefix of the HTTP transport crate.
pub const TRANSPORT_TARGET: &str = "jules_interaction";

/// Forwards `INFO` and more severe events of one target prefix.
pub struct DiagnosticLogLayer {
    sink: EventSink,
    target_prefix: String,
}

impl DiagnosticLogLayer {
    pub fn new(sink: EventSink) -> Self {
        Self::for_target(sink, TRANSPORT_TARGET)
    }

    pub fn for_target(sink: EventSink, target_prefix: impl Into<String>) -> Self {
        Self {
            sink,
            target_prefix: target_prefix.into(),
        }
    }

    fn accepts(&self, event: &Event<'_>) -> bool {
        let metadata = event.metadata();
        *metadata.level() <= Level::INFO && metadata.target().starts_with(&self.target_prefix)
    }
}

impl<S> Layer<S> for DiagnosticLogLayer
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !self.accepts(event) {
            return;
        }

        let mut fields = BTreeMap::new();
        event.record(&mut FieldVisitor(&mut fields));

        let message = match fields.remove("message") {
            Some(Value::String(text)) => text,
            Some(other) => other.to_string(),
            None => String::new(),
        };

        let mut line = format!("{} {}", event.metadata().level(), message);
        for (name, value) in &fields {
            match value {
                Value::String(text) => line.push_str(&format!(" {name}={text}")),
                other => line.push_str(&format!(" {name}={other}")),
            }
        }

        self.sink.log(line);
    }
}

/// Field visitor that extracts tracing event fields into a map
struct FieldVisitor<'a>(&'a mut BTreeMap<String, Value>);

impl<'a> tracing::field::Visit for FieldVisitor<'a> {
    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(
            field.name().to_string(),
            serde_json::json!(format!("{:?}", value)),
        );
    }
}
