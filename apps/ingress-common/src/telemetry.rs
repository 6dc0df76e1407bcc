use gsm_core::{EventKind, InboundEvent};
use gsm_telemetry::{TelemetryLabels, record_counter, with_common_fields};
use tracing::Span;

pub const PLATFORM: &str = "messenger";

const EVENTS_COUNTER: &str = "messenger_events_total";
const SEND_FAILURE_COUNTER: &str = "messenger_send_failures_total";
const GROUP_JOIN_COUNTER: &str = "group_join_total";
const INGRESS_SPAN_NAME: &str = "ingress.handle";

/// Counts one decoded webhook event under its kind.
pub fn record_ingress(event: &InboundEvent) {
    record_counter(EVENTS_COUNTER, 1, &labels_from_event(event));
}

/// Counts a reply that could not be delivered; `kind` is the outbound message kind.
pub fn record_send_failure(kind: &str) {
    let labels = TelemetryLabels::new(PLATFORM).with_kind(kind);
    record_counter(SEND_FAILURE_COUNTER, 1, &labels);
}

pub fn record_group_join(joined: bool) {
    let outcome = if joined { "joined" } else { "rejected" };
    let labels = TelemetryLabels::new(PLATFORM).with_extra("outcome", outcome);
    record_counter(GROUP_JOIN_COUNTER, 1, &labels);
}

/// Span wrapping the handling of a single event.
pub fn start_ingress_span(event: &InboundEvent) -> Span {
    let span = tracing::info_span!(
        INGRESS_SPAN_NAME,
        platform = tracing::field::Empty,
        sender_id = tracing::field::Empty,
        kind = tracing::field::Empty
    );
    with_common_fields(
        &span,
        PLATFORM,
        Some(event.sender_id.as_str()),
        Some(event.kind().as_str()),
    );
    span
}

fn labels_from_event(event: &InboundEvent) -> TelemetryLabels {
    let kind: EventKind = event.kind();
    TelemetryLabels::new(PLATFORM).with_kind(kind.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsm_core::MessengerEvent;

    fn read_event() -> InboundEvent {
        InboundEvent {
            sender_id: "psid-7".into(),
            recipient_id: "page-1".into(),
            timestamp: Some(1_700_000_000_000),
            event: MessengerEvent::Read {
                watermark: Some(1_700_000_000_000),
            },
        }
    }

    #[test]
    fn labels_carry_kind() {
        let labels = labels_from_event(&read_event());
        assert_eq!(labels.kind.as_deref(), Some("read"));
        assert!(labels.tags().iter().all(|(_, value)| value != "psid-7"));
    }

    #[test]
    #[tracing_test::traced_test]
    fn span_records_sender_and_kind() {
        let event = read_event();
        record_ingress(&event);
        let span = start_ingress_span(&event);
        let _guard = span.enter();
        tracing::info!("handling");
        assert!(logs_contain("psid-7"));
        assert!(logs_contain("read"));
    }
}
