use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{EgressSender, OutboundMessage, SendError, SendResult};

/// Sender that records replies instead of calling the Send API.
#[derive(Clone, Default)]
pub struct InMemorySender {
    sent: Arc<Mutex<Vec<(String, OutboundMessage)>>>,
    failing: Arc<AtomicBool>,
}

impl InMemorySender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following send fail with [`SendError::Rejected`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn take_sent(&self) -> Vec<(String, OutboundMessage)> {
        let mut guard = self.sent.lock().await;
        std::mem::take(&mut *guard)
    }
}

#[async_trait]
impl EgressSender for InMemorySender {
    async fn send(&self, recipient_id: &str, msg: OutboundMessage) -> Result<SendResult, SendError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SendError::Rejected("in-memory sender set to fail".into()));
        }
        let mut guard = self.sent.lock().await;
        guard.push((recipient_id.to_string(), msg));
        Ok(SendResult {
            message_id: Some(format!("mem:{}", guard.len())),
            raw: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_and_drains() {
        let sender = InMemorySender::new();
        sender.send_text("u1", "hello").await.unwrap();
        let sent = sender.take_sent().await;
        assert_eq!(sent, vec![("u1".to_string(), OutboundMessage::text("hello"))]);
        assert!(sender.take_sent().await.is_empty());
    }

    #[tokio::test]
    async fn failing_mode_rejects() {
        let sender = InMemorySender::new();
        sender.set_failing(true);
        let err = sender.send_text("u1", "hello").await.unwrap_err();
        assert_eq!(err.code(), "rejected");
        assert!(sender.take_sent().await.is_empty());
    }
}
