mod memory;

use async_trait::async_trait;
use serde_json::{Value, json};
use thiserror::Error;

pub use memory::InMemorySender;

/// A `web_url` button rendered inside a button template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlButton {
    pub title: String,
    pub url: String,
    pub full_height: bool,
    pub messenger_extensions: bool,
}

impl UrlButton {
    pub fn to_json(&self) -> Value {
        let mut button = json!({
            "type": "web_url",
            "title": self.title,
            "url": self.url,
        });
        if self.full_height {
            button["webview_height_ratio"] = json!("full");
        }
        if self.messenger_extensions {
            button["messenger_extensions"] = json!(true);
        }
        button
    }
}

/// Replies the bot knows how to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    Text {
        text: String,
    },
    /// Text with tappable options; each option's title doubles as its payload.
    QuickReplies {
        text: String,
        options: Vec<String>,
    },
    ButtonTemplate {
        text: String,
        buttons: Vec<UrlButton>,
    },
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        OutboundMessage::Text { text: text.into() }
    }

    pub fn quick_replies(text: impl Into<String>, options: Vec<String>) -> Self {
        OutboundMessage::QuickReplies {
            text: text.into(),
            options,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            OutboundMessage::Text { .. } => "text",
            OutboundMessage::QuickReplies { .. } => "quick_replies",
            OutboundMessage::ButtonTemplate { .. } => "button_template",
        }
    }

    /// The `message` object of a Send API request.
    pub fn to_message_json(&self) -> Value {
        match self {
            OutboundMessage::Text { text } => json!({ "text": text }),
            OutboundMessage::QuickReplies { text, options } => json!({
                "text": text,
                "quick_replies": options
                    .iter()
                    .map(|option| json!({
                        "content_type": "text",
                        "title": option,
                        "payload": option,
                    }))
                    .collect::<Vec<_>>(),
            }),
            OutboundMessage::ButtonTemplate { text, buttons } => json!({
                "attachment": {
                    "type": "template",
                    "payload": {
                        "template_type": "button",
                        "text": text,
                        "buttons": buttons.iter().map(UrlButton::to_json).collect::<Vec<_>>(),
                    }
                }
            }),
        }
    }
}

/// Full Send API body for a reply to `recipient_id`.
pub fn send_payload(recipient_id: &str, msg: &OutboundMessage) -> Value {
    json!({
        "recipient": { "id": recipient_id },
        "messaging_type": "RESPONSE",
        "message": msg.to_message_json(),
    })
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SendResult {
    pub message_id: Option<String>,
    pub raw: Option<Value>,
}

/// Delivery failures. Callers log them; nothing is retried.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("messenger transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("messenger api returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("delivery rejected: {0}")]
    Rejected(String),
}

impl SendError {
    pub fn code(&self) -> &'static str {
        match self {
            SendError::Transport(_) => "transport",
            SendError::Api { .. } => "api",
            SendError::Rejected(_) => "rejected",
        }
    }
}

#[async_trait]
pub trait EgressSender: Send + Sync {
    async fn send(&self, recipient_id: &str, msg: OutboundMessage) -> Result<SendResult, SendError>;

    async fn send_text(&self, recipient_id: &str, text: &str) -> Result<SendResult, SendError> {
        self.send(recipient_id, OutboundMessage::text(text)).await
    }

    async fn send_quick_replies(
        &self,
        recipient_id: &str,
        text: &str,
        options: Vec<String>,
    ) -> Result<SendResult, SendError> {
        self.send(recipient_id, OutboundMessage::quick_replies(text, options))
            .await
    }
}
