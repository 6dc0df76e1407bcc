use dashmap::DashMap;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::MenuSession;

/// Process-lifetime session map keyed by Messenger user id.
///
/// Every accessor runs under the shard lock of its key, so creating a session
/// and mutating it are atomic per user while other users proceed in parallel.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, MenuSession>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Runs `f` on the user's session, creating it first when absent.
    pub fn upsert<R>(&self, user_id: &str, f: impl FnOnce(&mut MenuSession) -> R) -> R {
        let mut entry = self
            .sessions
            .entry(user_id.to_string())
            .or_insert_with(MenuSession::new);
        f(entry.value_mut())
    }

    /// Runs `f` on an existing session. Returns `None` if the user has none.
    pub fn update<R>(&self, user_id: &str, f: impl FnOnce(&mut MenuSession) -> R) -> Option<R> {
        self.sessions
            .get_mut(user_id)
            .map(|mut entry| f(entry.value_mut()))
    }

    pub fn get(&self, user_id: &str) -> Option<MenuSession> {
        self.sessions.get(user_id).map(|entry| entry.value().clone())
    }

    /// Removes one session. Returns whether it existed.
    pub fn evict(&self, user_id: &str) -> bool {
        self.sessions.remove(user_id).is_some()
    }

    /// Removes every session not touched since `cutoff`.
    pub fn evict_idle_before(&self, cutoff: OffsetDateTime) -> usize {
        let mut evicted = 0;
        self.sessions.retain(|user_id, session| {
            let keep = session.last_touched() >= cutoff;
            if !keep {
                debug!(user_id = %user_id, "evicting idle menu session");
                evicted += 1;
            }
            keep
        });
        evicted
    }

    /// Removes every session idle for longer than `max_idle`.
    ///
    /// A `max_idle` reaching past the earliest representable timestamp evicts nothing.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        match OffsetDateTime::now_utc().checked_sub(max_idle) {
            Some(cutoff) => self.evict_idle_before(cutoff),
            None => 0,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_creates_once() {
        let store = MemorySessionStore::new();
        store.upsert("u1", |s| s.reset(0));
        store.upsert("u1", |s| s.push(2));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("u1").map(|s| s.path()), Some("0,2".to_string()));
    }

    #[test]
    fn update_skips_missing_users() {
        let store = MemorySessionStore::new();
        assert_eq!(store.update("ghost", |s| s.depth()), None);
        assert!(store.is_empty());
    }

    #[test]
    fn evict_idle_only_drops_stale_sessions() {
        let store = MemorySessionStore::new();
        store.upsert("stale", |s| {
            s.reset(0);
            s.set_last_touched(OffsetDateTime::now_utc() - Duration::hours(2));
        });
        store.upsert("fresh", |s| s.reset(0));

        assert_eq!(store.evict_idle(Duration::minutes(30)), 1);
        assert!(store.get("stale").is_none());
        assert!(store.get("fresh").is_some());
    }

    #[test]
    fn evict_idle_with_huge_ttl_keeps_everything() {
        let store = MemorySessionStore::new();
        store.upsert("u1", |s| s.reset(0));
        assert_eq!(store.evict_idle(Duration::seconds(1_000_000_000_000)), 0);
        assert_eq!(store.evict_idle(Duration::MAX), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn evict_reports_presence() {
        let store = MemorySessionStore::new();
        store.upsert("u1", |s| s.reset(0));
        assert!(store.evict("u1"));
        assert!(!store.evict("u1"));
    }
}
