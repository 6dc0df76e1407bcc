use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Membership service the referral handler reports joins to.
#[async_trait]
pub trait GroupClient: Send + Sync {
    /// Returns `true` only when the service accepted the join. Failures are logged, never raised.
    async fn join(&self, user_id: &str, group_id: &str) -> bool;
}

pub struct HttpGroupClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGroupClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn join_url(&self) -> String {
        format!("{}/group/join", self.base_url)
    }
}

#[async_trait]
impl GroupClient for HttpGroupClient {
    async fn join(&self, user_id: &str, group_id: &str) -> bool {
        let result = self
            .http
            .post(self.join_url())
            .query(&[("userId", user_id), ("groupId", group_id)])
            .send()
            .await;
        match result {
            Ok(resp) if resp.status() == reqwest::StatusCode::OK => {
                debug!(user_id, group_id, "group join accepted");
                true
            }
            Ok(resp) => {
                warn!(user_id, group_id, status = %resp.status(), "group join refused");
                false
            }
            Err(err) => {
                warn!(user_id, group_id, error = %err, "group service unreachable");
                false
            }
        }
    }
}

/// Test double answering every join with a fixed outcome and recording the calls.
#[derive(Clone, Default)]
pub struct InMemoryGroupClient {
    accept: bool,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl InMemoryGroupClient {
    pub fn accepting() -> Self {
        Self {
            accept: true,
            ..Default::default()
        }
    }

    pub fn refusing() -> Self {
        Self::default()
    }

    pub async fn take_calls(&self) -> Vec<(String, String)> {
        let mut guard = self.calls.lock().await;
        std::mem::take(&mut *guard)
    }
}

#[async_trait]
impl GroupClient for InMemoryGroupClient {
    async fn join(&self, user_id: &str, group_id: &str) -> bool {
        self.calls
            .lock()
            .await
            .push((user_id.to_string(), group_id.to_string()));
        self.accept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_trims_slash() {
        let client = HttpGroupClient::new(reqwest::Client::new(), "http://groups.local/");
        assert_eq!(client.join_url(), "http://groups.local/group/join");
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn unreachable_service_means_not_joined() {
        // nothing listens on the discard port
        let client = HttpGroupClient::new(reqwest::Client::new(), "http://127.0.0.1:9");
        assert!(!client.join("u1", "g1").await);
        assert!(logs_contain("group service unreachable"));
    }

    #[tokio::test]
    async fn in_memory_records_calls() {
        let client = InMemoryGroupClient::accepting();
        assert!(client.join("u1", "g1").await);
        assert_eq!(
            client.take_calls().await,
            vec![("u1".to_string(), "g1".to_string())]
        );
    }
}
