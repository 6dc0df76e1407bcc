use std::time::Duration;

use gsm_session::SharedSessionStore;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const MAX_SWEEP_PERIOD: Duration = Duration::from_secs(60);

/// Drops sessions idle for longer than `max_idle`; returns how many went.
pub fn sweep_once(store: &SharedSessionStore, max_idle: Duration) -> usize {
    match time::Duration::try_from(max_idle) {
        Ok(max_idle) => store.evict_idle(max_idle),
        Err(err) => {
            warn!(error = %err, "session ttl out of range; sweep skipped");
            0
        }
    }
}

/// Runs [`sweep_once`] on an interval for the life of the process.
pub fn spawn_sweeper(store: SharedSessionStore, max_idle: Duration) -> JoinHandle<()> {
    let period = max_idle.min(MAX_SWEEP_PERIOD).max(Duration::from_secs(1));
    info!(ttl_secs = max_idle.as_secs(), period_secs = period.as_secs(), "session sweeper started");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let evicted = sweep_once(&store, max_idle);
            if evicted > 0 {
                debug!(evicted, remaining = store.len(), "idle sessions evicted");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsm_session::{MenuNavigator, shared_memory_store};

    #[test]
    fn fresh_sessions_survive() {
        let store = shared_memory_store();
        let nav = MenuNavigator::new(store.clone());
        nav.start("u1");
        assert_eq!(sweep_once(&store, Duration::from_secs(300)), 0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn zero_ttl_sweeps_everything() {
        let store = shared_memory_store();
        let nav = MenuNavigator::new(store.clone());
        nav.start("u1");
        nav.start("u2");
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(sweep_once(&store, Duration::ZERO), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn huge_ttl_evicts_nothing() {
        let store = shared_memory_store();
        MenuNavigator::new(store.clone()).start("u1");
        assert_eq!(sweep_once(&store, Duration::from_secs(1_000_000_000_000)), 0);
        assert_eq!(sweep_once(&store, Duration::MAX), 0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_evicts_stale_sessions() {
        let store = shared_memory_store();
        let sweeper = spawn_sweeper(store.clone(), Duration::from_millis(1));
        // first tick fires immediately on the empty store
        tokio::task::yield_now().await;

        MenuNavigator::new(store.clone()).start("u1");
        assert_eq!(store.len(), 1);
        // session timestamps use the wall clock, not the paused tokio clock
        std::thread::sleep(Duration::from_millis(5));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(store.is_empty());
        sweeper.abort();
    }
}
