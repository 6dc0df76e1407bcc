//! Per-user menu sessions for the messenger bot.
//!
//! A session is a stack of page numbers. The bottom is always the root page
//! `0`; every selected option is pushed on top and "Back" pops it again. The
//! store keeps sessions in memory only and exposes eviction hooks so the
//! owning service can bound its growth.

mod error;
mod memory;
mod navigator;
mod page;

use std::sync::Arc;

use time::OffsetDateTime;

pub use error::NavError;
pub use memory::MemorySessionStore;
pub use navigator::MenuNavigator;
pub use page::{BACK_OPTION, END_OPTION, MenuPage, PAGE_SIZE};

/// Shared session store handle used across request handlers.
pub type SharedSessionStore = Arc<MemorySessionStore>;

/// Navigation state for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSession {
    stack: Vec<u32>,
    last_touched: OffsetDateTime,
}

impl MenuSession {
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            last_touched: OffsetDateTime::now_utc(),
        }
    }

    /// Pages visited so far, root first.
    pub fn stack(&self) -> &[u32] {
        &self.stack
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn top(&self) -> Option<u32> {
        self.stack.last().copied()
    }

    pub fn last_touched(&self) -> OffsetDateTime {
        self.last_touched
    }

    /// Drops the whole path and starts over at `root`.
    pub fn reset(&mut self, root: u32) {
        self.stack.clear();
        self.stack.push(root);
        self.touch();
    }

    pub fn push(&mut self, page: u32) {
        self.stack.push(page);
        self.touch();
    }

    /// Pops the top page unless only the root is left.
    pub fn pop(&mut self) -> Option<u32> {
        self.touch();
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    /// Renders the path as `0,3,7`.
    pub fn path(&self) -> String {
        self.stack
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    fn touch(&mut self) {
        self.last_touched = OffsetDateTime::now_utc();
    }

    #[cfg(test)]
    pub(crate) fn set_last_touched(&mut self, at: OffsetDateTime) {
        self.last_touched = at;
    }
}

impl Default for MenuSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns an empty in-memory store wrapped in an [`Arc`].
pub fn shared_memory_store() -> SharedSessionStore {
    Arc::new(MemorySessionStore::new())
}
