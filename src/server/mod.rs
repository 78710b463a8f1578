mod handlers;
mod state;

use axum::routing::get;
use axum::Router;
use state::AppState;
use std::io;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::location::{GeocodeClient, GeocodeResolver, LocationStore};

pub fn build_router<C, S>(resolver: GeocodeResolver<C, S>) -> Router
where
    C: GeocodeClient + 'static,
    S: LocationStore + 'static,
{
    let state = Arc::new(AppState { resolver });

    Router::new()
        .route("/location", get(handlers::location::<C, S>))
        .fallback(handlers::fallback)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start<C, S>(addr: &str, resolver: GeocodeResolver<C, S>) -> io::Result<()>
where
    C: GeocodeClient + 'static,
    S: LocationStore + 'static,
{
    let app = build_router(resolver);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
