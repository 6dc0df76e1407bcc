use tracing::debug;

use crate::{MenuPage, NavError, SharedSessionStore, shared_memory_store};

const ROOT_PAGE: u32 = 0;

/// Numbered quick-reply menu driven by a per-user page stack.
///
/// The navigator only computes pages; delivering them is up to the caller,
/// which keeps the session lock out of any network round trip.
#[derive(Clone)]
pub struct MenuNavigator {
    store: SharedSessionStore,
    reset_on_end: bool,
}

impl MenuNavigator {
    pub fn new(store: SharedSessionStore) -> Self {
        Self {
            store,
            reset_on_end: false,
        }
    }

    /// Clears the session once the path has been rendered by [`end`](Self::end).
    pub fn with_reset_on_end(mut self, reset_on_end: bool) -> Self {
        self.reset_on_end = reset_on_end;
        self
    }

    pub fn store(&self) -> &SharedSessionStore {
        &self.store
    }

    /// Opens (or restarts) the menu for `user_id` at the root page.
    pub fn start(&self, user_id: &str) -> MenuPage {
        self.store.upsert(user_id, |session| session.reset(ROOT_PAGE));
        debug!(user_id, "menu session started");
        MenuPage::root()
    }

    /// Pushes the chosen page and returns the page listed after it.
    pub fn select(&self, user_id: &str, raw: &str) -> Result<MenuPage, NavError> {
        let number = parse_selection(raw)?;
        let depth = self
            .store
            .update(user_id, |session| {
                session.push(number);
                session.depth()
            })
            .ok_or_else(|| NavError::NoSession(user_id.to_string()))?;
        debug!(user_id, number, depth, "menu option selected");
        MenuPage::from_start(number, depth > 1)
            .ok_or_else(|| NavError::InvalidInput(raw.to_string()))
    }

    /// Steps back one page; the root page is the floor.
    pub fn back(&self, user_id: &str) -> Result<MenuPage, NavError> {
        let (depth, top) = self
            .store
            .update(user_id, |session| {
                session.pop();
                (session.depth(), session.top())
            })
            .ok_or_else(|| NavError::NoSession(user_id.to_string()))?;
        debug!(user_id, depth, "menu stepped back");
        match top {
            Some(top) if depth > 1 => MenuPage::from_start(top, true)
                .ok_or_else(|| NavError::InvalidInput(top.to_string())),
            _ => Ok(MenuPage::root()),
        }
    }

    /// Returns the visited path, e.g. `0,2,10`.
    pub fn end(&self, user_id: &str) -> Result<String, NavError> {
        let path = self
            .store
            .update(user_id, |session| {
                (session.depth() > 0).then(|| session.path())
            })
            .flatten()
            .ok_or_else(|| NavError::NoSession(user_id.to_string()))?;
        if self.reset_on_end {
            self.store.evict(user_id);
        }
        Ok(path)
    }

    pub fn depth(&self, user_id: &str) -> Option<usize> {
        self.store.get(user_id).map(|session| session.depth())
    }
}

impl Default for MenuNavigator {
    fn default() -> Self {
        Self::new(shared_memory_store())
    }
}

fn parse_selection(raw: &str) -> Result<u32, NavError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|number| MenuPage::from_start(*number, false).is_some())
        .ok_or_else(|| NavError::InvalidInput(raw.to_string()))
}
