use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::egress::{EgressSender, OutboundMessage, SendError, SendResult, send_payload};

pub const DEFAULT_API_BASE: &str = "https://graph.facebook.com/v19.0";

/// Send API client for one page.
pub struct MessengerSender {
    http: reqwest::Client,
    api_base: String,
    page_access_token: String,
}

impl MessengerSender {
    pub fn new(
        http: reqwest::Client,
        page_access_token: impl Into<String>,
        api_base: Option<String>,
    ) -> Self {
        let base = api_base.unwrap_or_else(|| DEFAULT_API_BASE.into());
        Self {
            http,
            api_base: base.trim_end_matches('/').to_string(),
            page_access_token: page_access_token.into(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn build_url(&self) -> String {
        format!("{}/me/messages", self.api_base)
    }
}

#[async_trait]
impl EgressSender for MessengerSender {
    async fn send(&self, recipient_id: &str, msg: OutboundMessage) -> Result<SendResult, SendError> {
        let payload = send_payload(recipient_id, &msg);

        if self.api_base.starts_with("mock://") {
            debug!(recipient_id, kind = msg.kind(), "mock messenger send");
            return Ok(SendResult {
                message_id: Some(format!("mock:{recipient_id}")),
                raw: Some(payload),
            });
        }

        let response = self
            .http
            .post(self.build_url())
            .query(&[("access_token", self.page_access_token.as_str())])
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let raw: Value = response.json().await.unwrap_or(Value::Null);
        let message_id = raw
            .get("message_id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        Ok(SendResult {
            message_id,
            raw: Some(raw),
        })
    }
}
