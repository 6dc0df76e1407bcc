use serde_json::Value;

/// Event kinds delivered on a Messenger page subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Text,
    QuickReply,
    Postback,
    Referral,
    Attachment,
    Echo,
    Delivery,
    Read,
    OptIn,
    AccountLinking,
    Unknown,
}

impl EventKind {
    /// Lowercase identifier used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Text => "text",
            EventKind::QuickReply => "quick_reply",
            EventKind::Postback => "postback",
            EventKind::Referral => "referral",
            EventKind::Attachment => "attachment",
            EventKind::Echo => "echo",
            EventKind::Delivery => "delivery",
            EventKind::Read => "read",
            EventKind::OptIn => "optin",
            EventKind::AccountLinking => "account_linking",
            EventKind::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub kind: String,
    pub url: Option<String>,
    pub payload: Option<Value>,
}

/// One classified messaging item. Exactly one variant per item.
#[derive(Debug, Clone, PartialEq)]
pub enum MessengerEvent {
    Text {
        mid: Option<String>,
        text: String,
    },
    QuickReply {
        mid: Option<String>,
        text: String,
        payload: String,
    },
    Postback {
        title: Option<String>,
        payload: Option<String>,
    },
    Referral {
        reference: Option<String>,
        source: Option<String>,
    },
    Attachment {
        mid: Option<String>,
        attachments: Vec<Attachment>,
    },
    Echo {
        mid: Option<String>,
        text: Option<String>,
    },
    Delivery {
        mids: Vec<String>,
        watermark: Option<i64>,
    },
    Read {
        watermark: Option<i64>,
    },
    OptIn {
        reference: Option<String>,
    },
    AccountLinking {
        linked: bool,
        authorization_code: Option<String>,
    },
    Unknown,
}

impl MessengerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            MessengerEvent::Text { .. } => EventKind::Text,
            MessengerEvent::QuickReply { .. } => EventKind::QuickReply,
            MessengerEvent::Postback { .. } => EventKind::Postback,
            MessengerEvent::Referral { .. } => EventKind::Referral,
            MessengerEvent::Attachment { .. } => EventKind::Attachment,
            MessengerEvent::Echo { .. } => EventKind::Echo,
            MessengerEvent::Delivery { .. } => EventKind::Delivery,
            MessengerEvent::Read { .. } => EventKind::Read,
            MessengerEvent::OptIn { .. } => EventKind::OptIn,
            MessengerEvent::AccountLinking { .. } => EventKind::AccountLinking,
            MessengerEvent::Unknown => EventKind::Unknown,
        }
    }
}

/// A classified event together with who sent it to which page.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub sender_id: String,
    pub recipient_id: String,
    pub timestamp: Option<i64>,
    pub event: MessengerEvent,
}

impl InboundEvent {
    pub fn kind(&self) -> EventKind {
        self.event.kind()
    }
}
