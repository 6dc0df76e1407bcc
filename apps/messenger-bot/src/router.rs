use std::sync::Arc;

use gsm_core::{
    EgressSender, InboundEvent, MessengerEvent, OutboundMessage, SendError, UrlButton,
};
use gsm_ingress_common::{record_group_join, record_ingress, record_send_failure, start_ingress_span};
use gsm_session::{MenuNavigator, MenuPage, NavError};
use thiserror::Error;
use tracing::{Instrument, info, warn};
use url::Url;

use crate::group::GroupClient;

/// Text shown above the numbered quick replies.
pub const MENU_PROMPT: &str = "Pick a number";
/// Text of the button template sent after a successful group join.
pub const MENU_BUTTON_TEXT: &str = "Your group is ready, open the menu to order";
pub const MENU_BUTTON_TITLE: &str = "Menu";

const START_COMMAND: &str = "start";

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Nav(#[from] NavError),
    #[error(transparent)]
    Send(#[from] SendError),
    #[error("cannot build menu link: {0}")]
    MenuLink(#[from] url::ParseError),
}

impl HandlerError {
    /// Expected outcomes of user input, as opposed to delivery or configuration faults.
    pub fn is_benign(&self) -> bool {
        match self {
            HandlerError::Nav(err) => err.is_benign(),
            HandlerError::Send(_) | HandlerError::MenuLink(_) => false,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            HandlerError::Nav(err) => err.code(),
            HandlerError::Send(err) => err.code(),
            HandlerError::MenuLink(_) => "menu_link",
        }
    }
}

/// Routes each inbound event to exactly one handler.
pub struct EventRouter {
    navigator: MenuNavigator,
    sender: Arc<dyn EgressSender>,
    groups: Option<Arc<dyn GroupClient>>,
    menu_webview_url: Option<Url>,
}

impl EventRouter {
    pub fn new(navigator: MenuNavigator, sender: Arc<dyn EgressSender>) -> Self {
        Self {
            navigator,
            sender,
            groups: None,
            menu_webview_url: None,
        }
    }

    pub fn with_groups(mut self, groups: Arc<dyn GroupClient>, menu_webview_url: Option<Url>) -> Self {
        self.groups = Some(groups);
        self.menu_webview_url = menu_webview_url;
        self
    }

    pub fn navigator(&self) -> &MenuNavigator {
        &self.navigator
    }

    /// Handles one event. Handler errors end here: they are logged and never propagate.
    pub async fn dispatch(&self, event: &InboundEvent) {
        record_ingress(event);
        let span = start_ingress_span(event);
        if let Err(err) = self.handle(event).instrument(span.clone()).await {
            let _guard = span.enter();
            if err.is_benign() {
                info!(code = err.code(), error = %err, "event ignored");
            } else {
                warn!(code = err.code(), error = %err, "event handling failed");
            }
        }
    }

    async fn handle(&self, inbound: &InboundEvent) -> Result<(), HandlerError> {
        let user_id = inbound.sender_id.as_str();
        match &inbound.event {
            MessengerEvent::Text { text, .. } => self.on_text(user_id, text).await,
            MessengerEvent::QuickReply { text, .. } => self.on_quick_reply(user_id, text).await,
            MessengerEvent::Referral { reference, source } => {
                self.on_referral(user_id, reference.as_deref(), source.as_deref())
                    .await
            }
            MessengerEvent::Postback { .. }
            | MessengerEvent::Attachment { .. }
            | MessengerEvent::Echo { .. }
            | MessengerEvent::Delivery { .. }
            | MessengerEvent::Read { .. }
            | MessengerEvent::OptIn { .. }
            | MessengerEvent::AccountLinking { .. }
            | MessengerEvent::Unknown => {
                info!("Received new {} event", inbound.kind().as_str());
                Ok(())
            }
        }
    }

    async fn on_text(&self, user_id: &str, text: &str) -> Result<(), HandlerError> {
        info!("Received new text event");
        if text != START_COMMAND {
            return Ok(());
        }
        let page = self.navigator.start(user_id);
        self.send_page(user_id, &page).await
    }

    async fn on_quick_reply(&self, user_id: &str, text: &str) -> Result<(), HandlerError> {
        info!("Received new quick_reply event");
        let choice = text.trim();
        if choice.eq_ignore_ascii_case("back") {
            let page = self.navigator.back(user_id)?;
            self.send_page(user_id, &page).await
        } else if choice.eq_ignore_ascii_case("end") {
            let path = self.navigator.end(user_id)?;
            self.sender
                .send_text(user_id, &path)
                .await
                .map_err(|err| send_failed("text", err))?;
            Ok(())
        } else {
            let page = self.navigator.select(user_id, choice)?;
            self.send_page(user_id, &page).await
        }
    }

    async fn on_referral(
        &self,
        user_id: &str,
        reference: Option<&str>,
        source: Option<&str>,
    ) -> Result<(), HandlerError> {
        info!(source, "Received new referral event");
        let Some(group_id) = reference else {
            info!("referral without ref skipped");
            return Ok(());
        };
        let Some(groups) = &self.groups else {
            warn!(group_id, "group service not configured; referral dropped");
            return Ok(());
        };

        let joined = groups.join(user_id, group_id).await;
        record_group_join(joined);
        if !joined {
            return Ok(());
        }

        let Some(base) = &self.menu_webview_url else {
            warn!(group_id, "menu webview not configured; join not announced");
            return Ok(());
        };
        let url = menu_link(base, user_id, group_id)?;
        let msg = OutboundMessage::ButtonTemplate {
            text: MENU_BUTTON_TEXT.into(),
            buttons: vec![UrlButton {
                title: MENU_BUTTON_TITLE.into(),
                url: url.into(),
                full_height: true,
                messenger_extensions: true,
            }],
        };
        let kind = msg.kind();
        self.sender
            .send(user_id, msg)
            .await
            .map_err(|err| send_failed(kind, err))?;
        Ok(())
    }

    async fn send_page(&self, user_id: &str, page: &MenuPage) -> Result<(), HandlerError> {
        self.sender
            .send_quick_replies(user_id, MENU_PROMPT, page.options())
            .await
            .map_err(|err| send_failed("quick_replies", err))?;
        Ok(())
    }
}

fn send_failed(kind: &str, err: SendError) -> HandlerError {
    record_send_failure(kind);
    HandlerError::Send(err)
}

/// `{base}/restaurant?userId=..&groupId=..`
pub fn menu_link(base: &Url, user_id: &str, group_id: &str) -> Result<Url, url::ParseError> {
    let raw = format!("{}/restaurant", base.as_str().trim_end_matches('/'));
    Url::parse_with_params(&raw, &[("userId", user_id), ("groupId", group_id)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_link_keeps_base_path() {
        let base = Url::parse("https://menu.example/app/").unwrap();
        let link = menu_link(&base, "psid-1", "grp 7").unwrap();
        assert_eq!(
            link.as_str(),
            "https://menu.example/app/restaurant?userId=psid-1&groupId=grp+7"
        );
    }

    #[test]
    fn benign_only_for_missing_session() {
        let benign = HandlerError::from(NavError::NoSession("u1".into()));
        let fault = HandlerError::from(SendError::Rejected("down".into()));
        let bad_input = HandlerError::from(NavError::InvalidInput("abc".into()));
        assert!(benign.is_benign());
        assert!(!fault.is_benign());
        assert!(!bad_input.is_benign());
    }
}
