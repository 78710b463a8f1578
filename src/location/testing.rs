//! Test doubles for the geocode provider and the cache store.

use super::cache::LocationStore;
use super::normalize::GeocodeResponse;
use super::providers::GeocodeClient;
use super::types::{CacheEntry, CacheKey, LocationError, StoreError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;

/// What the scripted geocoder answers with.
#[derive(Clone)]
pub enum Script {
    Payload(GeocodeResponse),
    FetchError(String),
}

/// Geocoder that replays a fixed answer and counts calls.
pub struct ScriptedGeocoder {
    script: Script,
    calls: AtomicUsize,
    barrier: Option<Arc<Barrier>>,
}

impl ScriptedGeocoder {
    pub fn returning(payload: GeocodeResponse) -> Self {
        Self {
            script: Script::Payload(payload),
            calls: AtomicUsize::new(0),
            barrier: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            script: Script::FetchError(msg.to_string()),
            calls: AtomicUsize::new(0),
            barrier: None,
        }
    }

    /// Hold every call until `n` callers are inside `geocode` at once.
    pub fn rendezvous(mut self, n: usize) -> Self {
        self.barrier = Some(Arc::new(Barrier::new(n)));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl GeocodeClient for ScriptedGeocoder {
    async fn geocode(&self, _query: &str) -> Result<GeocodeResponse, LocationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        match &self.script {
            Script::Payload(p) => Ok(p.clone()),
            Script::FetchError(msg) => Err(LocationError::UpstreamFetch(msg.clone())),
        }
    }
}

impl<T: GeocodeClient> GeocodeClient for Arc<T> {
    async fn geocode(&self, query: &str) -> Result<GeocodeResponse, LocationError> {
        self.as_ref().geocode(query).await
    }
}

/// In-memory store with switchable failures.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<String, CacheEntry>>,
    fail_reads: bool,
    fail_writes: bool,
    blind_reads: bool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn with_row(entry: CacheEntry) -> Self {
        let store = Self::default();
        store
            .rows
            .lock()
            .unwrap()
            .insert(entry.city_name.clone(), entry);
        store
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Report every key as absent while still enforcing uniqueness on
    /// insert, as if another writer landed the row after our read.
    pub fn blind_reads(mut self) -> Self {
        self.blind_reads = true;
        self
    }

    pub fn row(&self, key: &str) -> Option<CacheEntry> {
        self.rows.lock().unwrap().get(key).cloned()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl LocationStore for MemoryStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Connection("store offline".into()));
        }
        if self.blind_reads {
            return Ok(None);
        }
        Ok(self.rows.lock().unwrap().get(key.as_str()).cloned())
    }

    async fn put(&self, entry: CacheEntry) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes {
            return Err(StoreError::Connection("store offline".into()));
        }
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&entry.city_name) {
            return Err(StoreError::DuplicateKey(entry.city_name));
        }
        rows.insert(entry.city_name.clone(), entry);
        Ok(())
    }
}

impl<T: LocationStore> LocationStore for Arc<T> {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, StoreError> {
        self.as_ref().get(key).await
    }

    async fn put(&self, entry: CacheEntry) -> Result<(), StoreError> {
        self.as_ref().put(entry).await
    }
}
