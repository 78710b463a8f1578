//! Core types for the location subsystem.

use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Which path served a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    Cache,
    Provider,
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cache => write!(f, "cache"),
            Self::Provider => write!(f, "provider"),
        }
    }
}

/// A resolved place: the client's query echoed back with the provider's
/// canonical address and coordinates.
///
/// Fields are private so a `Location` cannot be altered after resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    search_query: String,
    formatted_query: String,
    latitude: f64,
    longitude: f64,
}

impl Location {
    pub fn new(
        search_query: impl Into<String>,
        formatted_query: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            search_query: search_query.into(),
            formatted_query: formatted_query.into(),
            latitude,
            longitude,
        }
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn formatted_query(&self) -> &str {
        &self.formatted_query
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Normalized place name used to index the cache.
///
/// Surrounding whitespace is trimmed and inner runs collapse to a single
/// space. Case is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(query: &str) -> Self {
        Self(query.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted row of the `locations` table.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub city_name: String,
    pub city_address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl CacheEntry {
    pub fn from_location(key: &CacheKey, location: &Location) -> Self {
        Self {
            city_name: key.as_str().to_string(),
            city_address: location.formatted_query.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }

    /// Project the row back into a response-facing `Location`, echoing the
    /// caller's original query.
    pub fn into_location(self, search_query: &str) -> Location {
        Location::new(search_query, self.city_address, self.latitude, self.longitude)
    }
}

/// Location resolution errors.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Geocode request failed: {0}")]
    UpstreamFetch(String),

    #[error("Geocode request timed out after {0:?}")]
    UpstreamTimeout(Duration),

    #[error("Unusable geocode response: {0}")]
    MalformedPayload(String),

    #[error("Location cache read failed: {0}")]
    CacheRead(#[source] StoreError),

    #[error("No location specified")]
    EmptyQuery,
}

/// Cache store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("'{0}' is already cached")]
    DuplicateKey(String),

    #[error("Location store unavailable: {0}")]
    Connection(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}
