//! Location resolution for the aggregator.
//!
//! Turns a client-supplied place name into coordinates, serving repeat
//! lookups from a persistent cache and falling back to a remote geocoder.

pub mod cache;
pub mod normalize;
pub mod providers;
pub mod resolver;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{LocationStore, SqliteStore};
pub use providers::{GeocodeClient, GoogleGeocoder};
pub use resolver::GeocodeResolver;
pub use types::{CacheEntry, CacheKey, Location, LocationError, LocationSource, StoreError};
