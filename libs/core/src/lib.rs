//! Messenger platform contracts shared by the bot binary.
//!
//! The crate decodes webhook payloads into closed [`InboundEvent`] values, verifies
//! Meta signatures and handshakes, and sends replies through the [`EgressSender`]
//! seam. [`MessengerSender`] talks to the Graph Send API; [`InMemorySender`] records
//! replies for tests.
pub mod egress;
pub mod ingress;
pub mod platforms;

pub use egress::{
    EgressSender, InMemorySender, OutboundMessage, SendError, SendResult, UrlButton, send_payload,
};
pub use ingress::{Attachment, DecodeError, EventKind, InboundEvent, MessengerEvent, decode_events};
pub use platforms::messenger::{
    DEFAULT_API_BASE, MenuItem, MessengerCredentials, MessengerSender, ProfileSettings,
    VerificationError, update_profile,
};
