use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::location::{GeocodeClient, Location, LocationError, LocationStore};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

const RESPONSE_TEXT: &str = "Sorry, something went wrong.";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorBody {
    status: u16,
    response_text: &'static str,
    error: &'static str,
}

/// The one failure shape clients ever see. Causes are logged, not sent.
#[derive(Debug)]
pub struct ApiError;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let body = ApiErrorBody {
            status: status.as_u16(),
            response_text: RESPONSE_TEXT,
            error: status.canonical_reason().unwrap_or("Internal Server Error"),
        };
        (status, Json(body)).into_response()
    }
}

// ─── GET /location ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LocationQuery {
    pub data: Option<String>,
}

pub async fn location<C, S>(
    State(state): State<Arc<AppState<C, S>>>,
    params: Result<Query<LocationQuery>, QueryRejection>,
) -> Result<Json<Location>, ApiError>
where
    C: GeocodeClient + 'static,
    S: LocationStore + 'static,
{
    let start = Instant::now();

    let query = match params {
        Ok(Query(q)) => q.data.unwrap_or_default(),
        Err(rejection) => {
            tracing::error!(error = %rejection, "GET /location: bad query string");
            return Err(ApiError);
        }
    };

    match state.resolver.resolve_with_source(&query).await {
        Ok((location, source)) => {
            tracing::info!(
                query = %query,
                source = %source,
                elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                "GET /location -> {}",
                location.formatted_query()
            );
            Ok(Json(location))
        }
        Err(e) => {
            log_failure(&query, &e);
            Err(ApiError)
        }
    }
}

fn log_failure(query: &str, err: &LocationError) {
    match err {
        LocationError::EmptyQuery => {
            tracing::warn!("GET /location without a place name")
        }
        _ => tracing::error!(query = %query, error = %err, "GET /location failed"),
    }
}

// ─── Anything else ───────────────────────────────────────────────

pub async fn fallback() -> ApiError {
    ApiError
}
