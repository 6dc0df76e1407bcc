use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use gsm_core::{DEFAULT_API_BASE, MessengerCredentials};
use url::Url;

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
/// Upper bound for `SESSION_IDLE_TTL_SECS`: one year.
const MAX_SESSION_IDLE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub addr: SocketAddr,
    pub credentials: MessengerCredentials,
    pub api_base: String,
    pub group_service_url: Option<String>,
    pub menu_webview_url: Option<Url>,
    pub session_idle_ttl: Option<Duration>,
    pub reset_on_end: bool,
    pub strict_verify: bool,
    pub provision_profile: bool,
    pub http_timeout: Duration,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str| get(key).with_context(|| format!("{key} must be set"));

        let credentials = MessengerCredentials {
            app_secret: required("MESSENGER_APP_SECRET")?,
            verify_token: required("MESSENGER_VERIFY_TOKEN")?,
            page_access_token: required("MESSENGER_PAGE_ACCESS_TOKEN")?,
        };

        let addr = get("BIND")
            .unwrap_or_else(|| DEFAULT_BIND.into())
            .parse::<SocketAddr>()
            .context("invalid BIND address")?;

        let menu_webview_url = get("MENU_WEBVIEW_URL")
            .map(|raw| Url::parse(&raw).with_context(|| format!("invalid MENU_WEBVIEW_URL {raw}")))
            .transpose()?;

        let session_idle_ttl = match get("SESSION_IDLE_TTL_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().context("SESSION_IDLE_TTL_SECS must be seconds")?;
                if secs > MAX_SESSION_IDLE_TTL_SECS {
                    bail!("SESSION_IDLE_TTL_SECS must not exceed {MAX_SESSION_IDLE_TTL_SECS}");
                }
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().context("HTTP_TIMEOUT_SECS must be seconds")?;
                if secs == 0 {
                    bail!("HTTP_TIMEOUT_SECS must be greater than zero");
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            addr,
            credentials,
            api_base: get("MESSENGER_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.into()),
            group_service_url: get("GROUP_SERVICE_URL"),
            menu_webview_url,
            session_idle_ttl,
            reset_on_end: flag(get("MENU_RESET_ON_END")),
            strict_verify: flag(get("STRICT_VERIFY")),
            provision_profile: flag(get("MESSENGER_PROVISION_PROFILE")),
            http_timeout,
        })
    }
}

fn flag(value: Option<String>) -> bool {
    matches!(
        value.as_deref().map(str::to_ascii_lowercase).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}
