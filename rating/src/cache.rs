use crate::domain::RatingPayload;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Immutable snapshot held by the slot; replaced wholesale on every store
#[derive(Debug)]
pub struct CachedEntry {
    pub payload: RatingPayload,
    pub expires_at: Instant,
    pub cached_at: DateTime<Utc>,
}

impl CachedEntry {
    pub fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Single-entry cache for the one place this process serves.
///
/// Readers clone an `Arc` out of the lock, so the lock is never held
/// across the upstream call.
#[derive(Debug)]
pub struct CacheSlot {
    entry: RwLock<Option<Arc<CachedEntry>>>,
    ttl: Duration,
}

impl CacheSlot {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: RwLock::new(None),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current entry, fresh or not
    pub async fn snapshot(&self) -> Option<Arc<CachedEntry>> {
        self.entry.read().await.clone()
    }

    /// Payload while it is still within TTL
    pub async fn fresh(&self) -> Option<RatingPayload> {
        let now = Instant::now();
        self.snapshot()
            .await
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.payload.clone())
    }

    /// Last stored payload regardless of expiry
    pub async fn last_known(&self) -> Option<RatingPayload> {
        self.snapshot().await.map(|entry| entry.payload.clone())
    }

    /// Replace the entry; it expires `ttl` after `requested_at`
    pub async fn store(&self, payload: RatingPayload, requested_at: Instant) {
        let entry = CachedEntry {
            payload,
            // Absurdly long TTLs saturate to roughly thirty years
            expires_at: requested_at
                .checked_add(self.ttl)
                .unwrap_or_else(|| requested_at + FAR_FUTURE),
            cached_at: Utc::now(),
        };
        *self.entry.write().await = Some(Arc::new(entry));
    }
}
