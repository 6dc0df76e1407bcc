//! Decoding of Messenger webhook deliveries.
//!
//! ```text
//! {"object":"page","entry":[{"id":"<page>","time":1,"messaging":[{...}]}]}
//! ```
//!
//! Every item in `messaging` becomes one [`InboundEvent`].

mod events;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

pub use events::{Attachment, EventKind, InboundEvent, MessengerEvent};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported webhook object `{0}`, expected `page`")]
    NotPageObject(String),
    #[error("webhook payload has no `entry` array")]
    MissingEntries,
}

#[derive(Deserialize)]
struct WebhookPayload {
    object: String,
    entry: Option<Vec<Entry>>,
}

#[derive(Deserialize)]
struct Entry {
    #[serde(default)]
    messaging: Vec<MessagingItem>,
}

#[derive(Deserialize)]
struct Party {
    id: String,
}

#[derive(Deserialize)]
struct MessagingItem {
    sender: Option<Party>,
    recipient: Option<Party>,
    timestamp: Option<i64>,
    message: Option<RawMessage>,
    postback: Option<RawPostback>,
    referral: Option<RawReferral>,
    delivery: Option<RawDelivery>,
    read: Option<RawRead>,
    optin: Option<RawOptIn>,
    account_linking: Option<RawAccountLinking>,
}

#[derive(Deserialize)]
struct RawMessage {
    mid: Option<String>,
    text: Option<String>,
    #[serde(default)]
    is_echo: bool,
    quick_reply: Option<RawQuickReply>,
    #[serde(default)]
    attachments: Vec<RawAttachment>,
}

#[derive(Deserialize)]
struct RawQuickReply {
    payload: String,
}

#[derive(Deserialize)]
struct RawAttachment {
    #[serde(rename = "type")]
    kind: String,
    payload: Option<Value>,
}

#[derive(Deserialize)]
struct RawPostback {
    title: Option<String>,
    payload: Option<String>,
}

#[derive(Deserialize)]
struct RawReferral {
    #[serde(rename = "ref")]
    reference: Option<String>,
    source: Option<String>,
}

#[derive(Deserialize)]
struct RawDelivery {
    #[serde(default)]
    mids: Vec<String>,
    watermark: Option<i64>,
}

#[derive(Deserialize)]
struct RawRead {
    watermark: Option<i64>,
}

#[derive(Deserialize)]
struct RawOptIn {
    #[serde(rename = "ref")]
    reference: Option<String>,
}

#[derive(Deserialize)]
struct RawAccountLinking {
    status: String,
    authorization_code: Option<String>,
}

/// Decodes a raw webhook body into classified events.
pub fn decode_events(body: &[u8]) -> Result<Vec<InboundEvent>, DecodeError> {
    let payload: WebhookPayload = serde_json::from_slice(body)?;
    if payload.object != "page" {
        return Err(DecodeError::NotPageObject(payload.object));
    }
    let entries = payload.entry.ok_or(DecodeError::MissingEntries)?;

    let mut out = Vec::new();
    for item in entries.into_iter().flat_map(|entry| entry.messaging) {
        let (Some(sender), Some(recipient)) = (item.sender.as_ref(), item.recipient.as_ref()) else {
            warn!("messaging item without sender or recipient skipped");
            continue;
        };
        let sender_id = sender.id.clone();
        let recipient_id = recipient.id.clone();
        let timestamp = item.timestamp;
        out.push(InboundEvent {
            sender_id,
            recipient_id,
            timestamp,
            event: classify(item),
        });
    }
    Ok(out)
}

fn classify(item: MessagingItem) -> MessengerEvent {
    if let Some(message) = item.message {
        return classify_message(message);
    }
    if let Some(postback) = item.postback {
        return MessengerEvent::Postback {
            title: postback.title,
            payload: postback.payload,
        };
    }
    if let Some(referral) = item.referral {
        return MessengerEvent::Referral {
            reference: referral.reference,
            source: referral.source,
        };
    }
    if let Some(delivery) = item.delivery {
        return MessengerEvent::Delivery {
            mids: delivery.mids,
            watermark: delivery.watermark,
        };
    }
    if let Some(read) = item.read {
        return MessengerEvent::Read {
            watermark: read.watermark,
        };
    }
    if let Some(optin) = item.optin {
        return MessengerEvent::OptIn {
            reference: optin.reference,
        };
    }
    if let Some(linking) = item.account_linking {
        return MessengerEvent::AccountLinking {
            linked: linking.status == "linked",
            authorization_code: linking.authorization_code,
        };
    }
    MessengerEvent::Unknown
}

fn classify_message(message: RawMessage) -> MessengerEvent {
    if message.is_echo {
        return MessengerEvent::Echo {
            mid: message.mid,
            text: message.text,
        };
    }
    match (message.quick_reply, message.text) {
        (Some(quick_reply), text) => MessengerEvent::QuickReply {
            mid: message.mid,
            text: text.unwrap_or_else(|| quick_reply.payload.clone()),
            payload: quick_reply.payload,
        },
        (None, Some(text)) => MessengerEvent::Text {
            mid: message.mid,
            text,
        },
        (None, None) if !message.attachments.is_empty() => MessengerEvent::Attachment {
            mid: message.mid,
            attachments: message
                .attachments
                .into_iter()
                .map(|raw| Attachment {
                    url: raw
                        .payload
                        .as_ref()
                        .and_then(|p| p.get("url"))
                        .and_then(|u| u.as_str())
                        .map(str::to_string),
                    kind: raw.kind,
                    payload: raw.payload,
                })
                .collect(),
        },
        (None, None) => MessengerEvent::Unknown,
    }
}
