use serde_json::{Value, json};
use tracing::info;

use crate::egress::SendError;

/// Entry of the persistent menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    WebUrl {
        title: String,
        url: String,
        full_height: bool,
        messenger_extensions: bool,
    },
    Postback {
        title: String,
        payload: String,
    },
}

impl MenuItem {
    fn to_json(&self) -> Value {
        match self {
            MenuItem::WebUrl {
                title,
                url,
                full_height,
                messenger_extensions,
            } => {
                let mut item = json!({ "type": "web_url", "title": title, "url": url });
                if *full_height {
                    item["webview_height_ratio"] = json!("full");
                }
                if *messenger_extensions {
                    item["messenger_extensions"] = json!(true);
                }
                item
            }
            MenuItem::Postback { title, payload } => {
                json!({ "type": "postback", "title": title, "payload": payload })
            }
        }
    }
}

/// Page-level settings pushed to the Messenger Profile API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSettings {
    pub get_started_payload: String,
    pub greeting: String,
    /// `(locale, text)` overrides of the default greeting.
    pub localized_greetings: Vec<(String, String)>,
    pub whitelisted_domains: Vec<String>,
    pub persistent_menu: Vec<MenuItem>,
}

impl ProfileSettings {
    /// The bot's stock profile, with `webview_url` as menu target and whitelisted domain.
    pub fn for_webview(webview_url: &str) -> Self {
        Self {
            get_started_payload: "GET_STARTED".into(),
            greeting: "Hello!".into(),
            localized_greetings: vec![("en_US".into(), "This is a bot for dating pets".into())],
            whitelisted_domains: vec![webview_url.to_string()],
            persistent_menu: vec![
                MenuItem::WebUrl {
                    title: "\u{1F47B} Menu".into(),
                    url: webview_url.to_string(),
                    full_height: true,
                    messenger_extensions: true,
                },
                MenuItem::Postback {
                    title: "\u{1F50E} Open Menu".into(),
                    payload: "SEARCH_PET_PAYLOAD".into(),
                },
                MenuItem::Postback {
                    title: "\u{1F514} Turn On/Off notification".into(),
                    payload: "TURN_ON_OFF_PAYLOAD".into(),
                },
            ],
        }
    }

    pub fn to_json(&self) -> Value {
        let mut greeting = vec![json!({ "locale": "default", "text": self.greeting })];
        greeting.extend(
            self.localized_greetings
                .iter()
                .map(|(locale, text)| json!({ "locale": locale, "text": text })),
        );
        json!({
            "get_started": { "payload": self.get_started_payload },
            "greeting": greeting,
            "whitelisted_domains": self.whitelisted_domains,
            "persistent_menu": [{
                "locale": "default",
                "composer_input_disabled": false,
                "call_to_actions": self
                    .persistent_menu
                    .iter()
                    .map(MenuItem::to_json)
                    .collect::<Vec<_>>(),
            }],
        })
    }
}

/// Pushes `settings` to `{api_base}/me/messenger_profile`.
pub async fn update_profile(
    http: &reqwest::Client,
    api_base: &str,
    page_access_token: &str,
    settings: &ProfileSettings,
) -> Result<(), SendError> {
    if api_base.starts_with("mock://") {
        info!("mock messenger profile update skipped");
        return Ok(());
    }

    let url = format!("{}/me/messenger_profile", api_base.trim_end_matches('/'));
    let response = http
        .post(&url)
        .query(&[("access_token", page_access_token)])
        .json(&settings.to_json())
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "no response body".into());
        return Err(SendError::Api {
            status: status.as_u16(),
            body,
        });
    }

    info!("messenger profile updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_json_has_default_locale_first() {
        let settings = ProfileSettings::for_webview("https://menu.example");
        let body = settings.to_json();
        assert_eq!(body["greeting"][0]["locale"], "default");
        assert_eq!(body["greeting"][1]["locale"], "en_US");
        assert_eq!(body["whitelisted_domains"][0], "https://menu.example");
        let actions = body["persistent_menu"][0]["call_to_actions"]
            .as_array()
            .unwrap();
        assert_eq!(actions.len(), 3);
        assert_eq!(actions[0]["type"], "web_url");
        assert_eq!(actions[1]["payload"], "SEARCH_PET_PAYLOAD");
    }

    #[tokio::test]
    async fn mock_base_skips_network() {
        let settings = ProfileSettings::for_webview("https://menu.example");
        update_profile(&reqwest::Client::new(), "mock://fb", "token", &settings)
            .await
            .unwrap();
    }
}
