//! Time-bounded key-set cache in front of another provider.
//!
//! - Many readers share the cached copy under a read lock.
//! - At most one task refetches at a time (write lock + re-check).
//! - A copy older than the TTL is never handed out.
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::services::auth::failure::AuthFailure;
use crate::services::auth::key_set::KeySet;
use crate::services::auth::provider::KeySetProvider;

struct CachedSet {
    keys: KeySet,
    fetched_at: Instant,
}

pub struct CachedKeySetProvider {
    inner: Arc<dyn KeySetProvider>,
    ttl: Duration,
    slot: RwLock<Option<CachedSet>>,
}

impl CachedKeySetProvider {
    pub fn new(inner: Arc<dyn KeySetProvider>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            slot: RwLock::new(None),
        }
    }

    fn fresh<'a>(&self, slot: &'a Option<CachedSet>) -> Option<&'a KeySet> {
        slot.as_ref()
            .filter(|c| c.fetched_at.elapsed() < self.ttl)
            .map(|c| &c.keys)
    }

    async fn reload(&self, stale_before: Option<Instant>) -> Result<KeySet, AuthFailure> {
        let mut slot = self.slot.write().await;

        // Someone else may have reloaded while we waited for the lock.
        if let Some(cached) = slot.as_ref() {
            let newer = stale_before.is_none_or(|t| cached.fetched_at > t);
            if newer && cached.fetched_at.elapsed() < self.ttl {
                return Ok(cached.keys.clone());
            }
        }

        let keys = self.inner.fetch().await?;
        tracing::info!(
            source = self.inner.source(),
            keys = keys.keys.len(),
            "key-set cache refreshed"
        );
        *slot = Some(CachedSet {
            keys: keys.clone(),
            fetched_at: Instant::now(),
        });
        Ok(keys)
    }
}

#[async_trait]
impl KeySetProvider for CachedKeySetProvider {
    fn source(&self) -> &str {
        self.inner.source()
    }

    async fn fetch(&self) -> Result<KeySet, AuthFailure> {
        {
            let slot = self.slot.read().await;
            if let Some(keys) = self.fresh(&slot) {
                return Ok(keys.clone());
            }
        }
        self.reload(None).await
    }

    async fn fetch_for(&self, kid: &str) -> Result<KeySet, AuthFailure> {
        let seen_at = {
            let slot = self.slot.read().await;
            match (self.fresh(&slot), slot.as_ref()) {
                (Some(keys), _) if keys.contains(kid) => return Ok(keys.clone()),
                (Some(_), Some(cached)) => Some(cached.fetched_at),
                _ => None,
            }
        };

        if seen_at.is_some() {
            tracing::debug!(kid, "kid not in cached key set; refetching");
        }
        self.reload(seen_at).await
    }
}
