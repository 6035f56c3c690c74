use chrono::{DateTime, Utc};
use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::debug;

/// An immutable result of one refresh cycle
pub struct Snapshot<T> {
    pub ticket: u64,
    pub data: Arc<T>,
    pub refreshed_at: DateTime<Utc>,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            ticket: self.ticket,
            data: Arc::clone(&self.data),
            refreshed_at: self.refreshed_at,
        }
    }
}

/// Holds the latest snapshot. Every refresh takes a ticket before it starts
/// and a result is only published if no later-started refresh has already
/// published, so a slow stale request can never overwrite newer data.
pub struct SnapshotStore<T> {
    next_ticket: AtomicU64,
    current: RwLock<Option<Snapshot<T>>>,
}

impl<T> Default for SnapshotStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SnapshotStore<T> {
    pub fn new() -> Self {
        Self {
            next_ticket: AtomicU64::new(0),
            current: RwLock::new(None),
        }
    }

    /// Take a ticket for a refresh that is about to start
    pub fn begin(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publish a result. Returns false if a newer refresh already landed.
    pub async fn publish(&self, ticket: u64, data: T) -> bool {
        let mut current = self.current.write().await;

        if let Some(existing) = current.as_ref() {
            if existing.ticket >= ticket {
                debug!(
                    ticket,
                    current = existing.ticket,
                    "Discarding stale refresh result"
                );
                return false;
            }
        }

        *current = Some(Snapshot {
            ticket,
            data: Arc::new(data),
            refreshed_at: Utc::now(),
        });
        true
    }

    pub async fn latest(&self) -> Option<Snapshot<T>> {
        self.current.read().await.clone()
    }
}

/// Run one refresh cycle. Errors are logged and swallowed so the previous
/// snapshot stays in place.
pub async fn refresh_with<T, E, F, Fut>(store: &SnapshotStore<T>, load: F) -> bool
where
    E: Display,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let ticket = store.begin();

    match load().await {
        Ok(data) => store.publish(ticket, data).await,
        Err(e) => {
            debug!(ticket, "Background refresh failed, keeping previous data: {}", e);
            false
        }
    }
}

/// A single value reused until it is `ttl` old. The lock is held while
/// loading so concurrent callers share one upstream request.
pub struct TimedCache<T> {
    ttl: Duration,
    entry: Mutex<Option<(Instant, T)>>,
}

impl<T: Clone> TimedCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: Mutex::new(None),
        }
    }

    pub async fn get_or_load<F, Fut>(&self, load: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut entry = self.entry.lock().await;

        if let Some((loaded_at, value)) = entry.as_ref() {
            if loaded_at.elapsed() < self.ttl {
                return value.clone();
            }
        }

        let value = load().await;
        *entry = Some((Instant::now(), value.clone()));
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_and_read() {
        let store = SnapshotStore::new();
        assert!(store.latest().await.is_none());

        let ticket = store.begin();
        assert!(store.publish(ticket, "first").await);

        let snapshot = store.latest().await.unwrap();
        assert_eq!(*snapshot.data, "first");
        assert_eq!(snapshot.ticket, ticket);
    }

    #[tokio::test]
    async fn test_stale_result_is_discarded() {
        let store = SnapshotStore::new();

        let slow = store.begin();
        let fast = store.begin();
        assert!(store.publish(fast, "newer").await);
        assert!(!store.publish(slow, "older").await);

        assert_eq!(*store.latest().await.unwrap().data, "newer");
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous() {
        let store = SnapshotStore::new();
        assert!(refresh_with(&store, || async { Ok::<_, String>(1) }).await);
        assert!(!refresh_with(&store, || async { Err::<i32, _>("network down".to_string()) }).await);

        assert_eq!(*store.latest().await.unwrap().data, 1);
    }

    #[tokio::test]
    async fn test_timed_cache_reuses_until_expired() {
        let cache = TimedCache::new(Duration::from_secs(300));
        assert_eq!(cache.get_or_load(|| async { 1 }).await, 1);
        assert_eq!(cache.get_or_load(|| async { 2 }).await, 1);

        let expired = TimedCache::new(Duration::ZERO);
        assert_eq!(expired.get_or_load(|| async { 1 }).await, 1);
        assert_eq!(expired.get_or_load(|| async { 2 }).await, 2);
    }
}
