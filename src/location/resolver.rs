//! Location resolver: cache first, provider on miss.
//!
//! Flow:  key → cache hit → done
//!                 miss   → provider → normalize → best-effort populate → done
//!
//! Concurrent misses for the same key are not coalesced. Both reach the
//! provider and both attempt the insert; the store rejects the second one
//! and that rejection is swallowed like any other populate failure.

use super::cache::LocationStore;
use super::normalize::normalize;
use super::providers::GeocodeClient;
use super::types::{CacheEntry, CacheKey, Location, LocationError, LocationSource, StoreError};

/// Resolves place names to locations through the cache and a provider.
pub struct GeocodeResolver<C, S> {
    client: C,
    store: S,
}

impl<C: GeocodeClient, S: LocationStore> GeocodeResolver<C, S> {
    pub fn new(client: C, store: S) -> Self {
        Self { client, store }
    }

    /// Resolve a place name to exactly one `Location`.
    pub async fn resolve(&self, place: &str) -> Result<Location, LocationError> {
        self.resolve_with_source(place).await.map(|(loc, _)| loc)
    }

    /// Like `resolve`, also reporting which path produced the answer.
    pub async fn resolve_with_source(
        &self,
        place: &str,
    ) -> Result<(Location, LocationSource), LocationError> {
        let key = CacheKey::new(place);
        if key.is_empty() {
            return Err(LocationError::EmptyQuery);
        }

        if let Some(entry) = self.store.get(&key).await.map_err(LocationError::CacheRead)? {
            tracing::debug!(key = %key, "location cache hit");
            return Ok((entry.into_location(place), LocationSource::Cache));
        }

        tracing::debug!(key = %key, "location cache miss");
        let payload = self.client.geocode(place).await?;
        let location = normalize(place, &payload)?;

        if let Err(e) = self.store.put(CacheEntry::from_location(&key, &location)).await {
            log_populate_failure(&key, &e);
        }

        Ok((location, LocationSource::Provider))
    }
}

fn log_populate_failure(key: &CacheKey, err: &StoreError) {
    tracing::warn!(key = %key, error = %err, "failed to cache resolved location");
}
