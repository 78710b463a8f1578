//! Shapes a Google-style geocode payload into a canonical `Location`.
//!
//! Only the first result is used. Every field the `Location` needs is
//! optional on the wire so that a short payload surfaces as
//! `MalformedPayload` instead of a decode failure.

use super::types::{Location, LocationError};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub location: Option<LatLng>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl GeocodeResponse {
    /// Single-result payload, as the provider returns for an unambiguous place.
    pub fn single(formatted_address: &str, lat: f64, lng: f64) -> Self {
        Self {
            status: Some("OK".into()),
            error_message: None,
            results: vec![GeocodeResult {
                formatted_address: Some(formatted_address.to_string()),
                geometry: Some(Geometry {
                    location: Some(LatLng { lat, lng }),
                }),
            }],
        }
    }
}

/// Build a `Location` from the first result of `payload`.
pub fn normalize(search_query: &str, payload: &GeocodeResponse) -> Result<Location, LocationError> {
    let first = payload.results.first().ok_or_else(|| {
        let status = payload.status.as_deref().unwrap_or("no status");
        let detail = match &payload.error_message {
            Some(msg) => format!("no results ({}: {})", status, msg),
            None => format!("no results ({})", status),
        };
        LocationError::MalformedPayload(detail)
    })?;

    let address = first
        .formatted_address
        .as_deref()
        .ok_or_else(|| LocationError::MalformedPayload("missing formatted_address".into()))?;

    let coords = first
        .geometry
        .as_ref()
        .and_then(|g| g.location)
        .ok_or_else(|| LocationError::MalformedPayload("missing geometry.location".into()))?;

    if !coords.lat.is_finite() || !coords.lng.is_finite() {
        return Err(LocationError::MalformedPayload(format!(
            "non-finite coordinates ({}, {})",
            coords.lat, coords.lng
        )));
    }

    Ok(Location::new(search_query, address, coords.lat, coords.lng))
}
