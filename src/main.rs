use city_explorer::config::Config;
use city_explorer::location::{GeocodeResolver, GoogleGeocoder, SqliteStore};
use city_explorer::server;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = Config::parse();

    // ── Cache store: refuse to serve without it ─────────────────

    let db_path = cfg.database_path();
    let store = SqliteStore::open(&db_path).unwrap_or_else(|e| {
        tracing::error!("cannot open location cache at {}: {}", db_path.display(), e);
        std::process::exit(1);
    });
    tracing::info!("location cache at {}", db_path.display());

    // ── Geocoder ────────────────────────────────────────────────

    let geocoder = GoogleGeocoder::new(cfg.geocode_api_key.clone(), cfg.geocode_timeout())
        .with_base_url(cfg.geocode_url.clone());

    let resolver = GeocodeResolver::new(geocoder, store);

    if let Err(e) = server::start(&cfg.bind_addr(), resolver).await {
        tracing::error!("server error on {}: {}", cfg.bind_addr(), e);
        std::process::exit(1);
    }
}
