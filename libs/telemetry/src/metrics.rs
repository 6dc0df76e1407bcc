use ::metrics::Label;
use tracing::Span;

use crate::context::TelemetryLabels;

pub fn with_common_fields(span: &Span, platform: &str, sender_id: Option<&str>, kind: Option<&str>) {
    span.record("platform", tracing::field::display(platform));
    if let Some(sender_id) = sender_id {
        span.record("sender_id", tracing::field::display(sender_id));
    }
    if let Some(kind) = kind {
        span.record("kind", tracing::field::display(kind));
    }
}

fn labels_of(labels: &TelemetryLabels) -> Vec<Label> {
    labels
        .tags()
        .into_iter()
        .map(|(key, value)| Label::new(key, value))
        .collect()
}

pub fn record_counter(name: &'static str, value: u64, labels: &TelemetryLabels) {
    ::metrics::counter!(name, labels_of(labels)).increment(value);
}
