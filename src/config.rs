//! Process configuration from flags and environment.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::location::providers::GOOGLE_GEOCODE_URL;

/// City Explorer: location lookup backend with a persistent geocode cache.
///
/// Every flag can also be supplied through the environment variable shown.
///
/// Examples:
///   city-explorer --geocode-api-key KEY
///   GOOGLE_API_KEY=KEY PORT=8080 city-explorer
///   city-explorer --database-url /var/lib/city-explorer/locations.db
#[derive(Parser, Debug, Clone)]
#[command(name = "city-explorer", version, about, long_about = None)]
pub struct Config {
    /// Google Geocoding API key.
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub geocode_api_key: String,

    /// Geocoding endpoint.
    #[arg(long, env = "GEOCODE_URL", default_value = GOOGLE_GEOCODE_URL)]
    pub geocode_url: String,

    /// Seconds to wait for the geocoder before giving up.
    #[arg(
        long,
        env = "GEOCODE_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub geocode_timeout_secs: u64,

    /// SQLite database holding the location cache.
    /// Defaults to ~/.city-explorer/locations.db.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, short = 'p', env = "PORT", default_value_t = 3000)]
    pub port: u16,
}

impl Config {
    pub fn database_path(&self) -> PathBuf {
        self.database_url.clone().unwrap_or_else(default_database_path)
    }

    pub fn geocode_timeout(&self) -> Duration {
        Duration::from_secs(self.geocode_timeout_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_database_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".city-explorer")
        .join("locations.db")
}
