//! Messenger bot service: webhook endpoints, event routing and the numbered
//! quick-reply menu.
//!
//! `main` wires [`BotConfig`] into an [`AppState`]; tests build the same state
//! around in-memory senders and group clients.
pub mod config;
pub mod group;
pub mod http;
pub mod router;
pub mod sweeper;

use std::sync::Arc;

use gsm_core::{EgressSender, MessengerSender, ProfileSettings, update_profile};
use gsm_session::{MenuNavigator, SharedSessionStore};
use tracing::{info, warn};

pub use config::BotConfig;
pub use group::{GroupClient, HttpGroupClient, InMemoryGroupClient};
pub use http::{AppState, build_router};
pub use router::{EventRouter, HandlerError};
pub use sweeper::{spawn_sweeper, sweep_once};

/// Production state: Graph API sender plus the HTTP group client when configured.
pub fn build_state(config: &BotConfig, http: reqwest::Client, store: SharedSessionStore) -> AppState {
    let sender: Arc<dyn EgressSender> = Arc::new(MessengerSender::new(
        http.clone(),
        config.credentials.page_access_token.clone(),
        Some(config.api_base.clone()),
    ));
    let groups: Option<Arc<dyn GroupClient>> = config
        .group_service_url
        .as_ref()
        .map(|url| Arc::new(HttpGroupClient::new(http, url.clone())) as Arc<dyn GroupClient>);
    state_with(config, store, sender, groups)
}

/// Assembles the state around caller-supplied collaborators.
pub fn state_with(
    config: &BotConfig,
    store: SharedSessionStore,
    sender: Arc<dyn EgressSender>,
    groups: Option<Arc<dyn GroupClient>>,
) -> AppState {
    let navigator = MenuNavigator::new(store).with_reset_on_end(config.reset_on_end);
    let mut router = EventRouter::new(navigator, sender);
    if let Some(groups) = groups {
        router = router.with_groups(groups, config.menu_webview_url.clone());
    }
    AppState {
        router: Arc::new(router),
        app_secret: config.credentials.app_secret.clone(),
        verify_token: config.credentials.verify_token.clone(),
        strict_verify: config.strict_verify,
    }
}

/// Pushes the page profile. Failures are logged; startup continues.
pub async fn provision_profile(config: &BotConfig, http: &reqwest::Client) {
    let Some(webview) = &config.menu_webview_url else {
        warn!("MENU_WEBVIEW_URL unset; messenger profile not provisioned");
        return;
    };
    let settings = ProfileSettings::for_webview(webview.as_str().trim_end_matches('/'));
    match update_profile(
        http,
        &config.api_base,
        &config.credentials.page_access_token,
        &settings,
    )
    .await
    {
        Ok(()) => info!("messenger profile provisioned"),
        Err(err) => warn!(code = err.code(), error = %err, "messenger profile provisioning failed"),
    }
}
