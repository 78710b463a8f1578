//! External geocode providers.

use super::normalize::GeocodeResponse;
use super::types::LocationError;
use std::future::Future;
use std::io;
use std::time::Duration;

pub const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "CityExplorer/0.1 (location-aggregator)";

/// A remote forward-geocoding service.
pub trait GeocodeClient: Send + Sync {
    /// Look up `query` and return the provider's raw payload.
    fn geocode(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<GeocodeResponse, LocationError>> + Send;
}

// ─── Google Geocoding API ───────────────────────────────────────

/// Google Maps geocoding client.
#[derive(Clone)]
pub struct GoogleGeocoder {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl GoogleGeocoder {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            base_url: GOOGLE_GEOCODE_URL.to_string(),
            api_key: api_key.into(),
            timeout,
        }
    }

    /// Point the client at a different endpoint (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn fetch_blocking(&self, query: &str) -> Result<GeocodeResponse, LocationError> {
        let response = self
            .agent
            .get(&self.base_url)
            .query("address", query)
            .query("key", &self.api_key)
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => {
                    LocationError::UpstreamFetch(format!("HTTP {}", code))
                }
                ureq::Error::Transport(t) if is_timeout(&t) => {
                    LocationError::UpstreamTimeout(self.timeout)
                }
                ureq::Error::Transport(t) => LocationError::UpstreamFetch(describe_transport(&t)),
            })?;

        response.into_json::<GeocodeResponse>().map_err(|e| {
            if is_io_timeout(&e) {
                LocationError::UpstreamTimeout(self.timeout)
            } else {
                LocationError::MalformedPayload(e.to_string())
            }
        })
    }
}

impl GeocodeClient for GoogleGeocoder {
    async fn geocode(&self, query: &str) -> Result<GeocodeResponse, LocationError> {
        let this = self.clone();
        let query = query.to_string();
        let task = tokio::task::spawn_blocking(move || this.fetch_blocking(&query));

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join)) => Err(LocationError::UpstreamFetch(format!(
                "geocode task failed: {}",
                join
            ))),
            Err(_) => Err(LocationError::UpstreamTimeout(self.timeout)),
        }
    }
}

/// Transport failure text without the request URL, which carries the API key.
fn describe_transport(t: &ureq::Transport) -> String {
    match std::error::Error::source(t) {
        Some(src) => format!("{}: {}", t.kind(), src),
        None => t.kind().to_string(),
    }
}

fn is_timeout(t: &ureq::Transport) -> bool {
    std::error::Error::source(t)
        .and_then(|e| e.downcast_ref::<io::Error>())
        .is_some_and(is_io_timeout)
}

fn is_io_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}
