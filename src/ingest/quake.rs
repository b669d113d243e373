/// USGS FDSN earthquake catalog client.
///
/// Handles URL construction and GeoJSON response parsing for the USGS
/// event query endpoint:
///   https://earthquake.usgs.gov/fdsnws/event/1/query
///
/// The endpoint returns a GeoJSON FeatureCollection; each feature is one
/// earthquake event. See `fixtures.rs` for annotated examples.

use crate::config::QuakeConfig;
use crate::model::{CollectError, QuakeObservation};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

const EVENT_QUERY_PATH: &str = "/fdsnws/event/1/query";

/// Kilometers per degree of latitude, for radius conversion.
const KM_PER_DEGREE: f64 = 111.0;

// ---------------------------------------------------------------------------
// Serde structures for GeoJSON deserialization
// ---------------------------------------------------------------------------

/// Envelope holds features as raw values so one malformed feature can be
/// skipped without failing the batch; each value is re-deserialized into
/// the typed `Feature` below.
#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct Feature {
    id: String,
    properties: Properties,
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Properties {
    mag: Option<f64>,
    #[serde(rename = "magType")]
    mag_type: Option<String>,
    place: Option<String>,
    /// Event time, milliseconds since epoch.
    time: i64,
    url: Option<String>,
    felt: Option<i32>,
    alert: Option<String>,
    /// USGS significance score.
    sig: Option<i32>,
    net: Option<String>,
    /// 1 when USGS issued a tsunami warning for this event.
    tsunami: Option<i32>,
}

#[derive(Deserialize)]
struct Geometry {
    /// [longitude, latitude, depth_km]
    coordinates: Vec<f64>,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds a query URL for events since `start_time` with magnitude at or
/// above `min_magnitude`, newest first.
pub fn build_recent_url(base_url: &str, start_time: DateTime<Utc>, min_magnitude: f64) -> String {
    format!(
        "{}{}?format=geojson&starttime={}&minmagnitude={:.1}&orderby=time",
        base_url,
        EVENT_QUERY_PATH,
        start_time.format("%Y-%m-%dT%H:%M:%S"),
        min_magnitude
    )
}

/// Builds a query URL for events near a point. The radius arrives in
/// degrees (the unit the command layer exposes) and is converted to the
/// kilometers the FDSN API expects at 111 km/degree.
pub fn build_radius_url(
    base_url: &str,
    start_time: DateTime<Utc>,
    latitude: f64,
    longitude: f64,
    radius_degrees: f64,
    min_magnitude: f64,
) -> String {
    format!(
        "{}{}?format=geojson&starttime={}&latitude={:.4}&longitude={:.4}&maxradiuskm={:.1}&minmagnitude={:.1}",
        base_url,
        EVENT_QUERY_PATH,
        start_time.format("%Y-%m-%dT%H:%M:%S"),
        latitude,
        longitude,
        radius_degrees * KM_PER_DEGREE,
        min_magnitude
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a USGS GeoJSON response body into `QuakeObservation`s.
///
/// A feature that fails field-level parsing (missing id, geometry, or
/// timestamp) is logged and skipped; the rest of the batch continues.
/// `collected_at` is stamped here, once, at parse time.
///
/// # Errors
/// - `CollectError::Parse` — the envelope itself is malformed.
/// - `CollectError::NoData` — the envelope is valid but carries no
///   parseable events.
pub fn parse_quake_response(json: &str) -> Result<Vec<QuakeObservation>, CollectError> {
    let response: FeatureCollection = serde_json::from_str(json)
        .map_err(|e| CollectError::Parse(format!("GeoJSON deserialization failed: {}", e)))?;

    if response.features.is_empty() {
        return Err(CollectError::NoData("no features in response".to_string()));
    }

    let collected_at = Utc::now();
    let mut observations = Vec::new();

    for raw_feature in response.features {
        let feature: Feature = match serde_json::from_value(raw_feature.clone()) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("[quake] skipping malformed feature: {}", e);
                continue;
            }
        };

        // Coordinates are [lon, lat, depth]; depth may be absent.
        if feature.geometry.coordinates.len() < 2 {
            eprintln!(
                "[quake] skipping event {} with incomplete coordinates",
                feature.id
            );
            continue;
        }
        let longitude = feature.geometry.coordinates[0];
        let latitude = feature.geometry.coordinates[1];
        let depth_km = feature.geometry.coordinates.get(2).copied();

        let event_time = match DateTime::from_timestamp_millis(feature.properties.time) {
            Some(t) => t,
            None => {
                eprintln!(
                    "[quake] skipping event {} with invalid timestamp {}",
                    feature.id, feature.properties.time
                );
                continue;
            }
        };

        let place = feature.properties.place.unwrap_or_default();
        let region = extract_region(&place);

        observations.push(QuakeObservation {
            event_id: feature.id,
            magnitude: feature.properties.mag,
            magnitude_type: feature.properties.mag_type,
            depth_km,
            latitude,
            longitude,
            event_time,
            region,
            place,
            tsunami_flag: feature.properties.tsunami == Some(1),
            alert_level: feature.properties.alert,
            significance: feature.properties.sig,
            felt_reports: feature.properties.felt,
            network: feature.properties.net,
            event_url: feature.properties.url,
            raw_payload: raw_feature.to_string(),
            collected_at,
        });
    }

    if observations.is_empty() {
        return Err(CollectError::NoData(
            "all features failed field-level parsing".to_string(),
        ));
    }

    Ok(observations)
}

/// Extracts the country/region from a USGS place string.
/// "23 km SW of Tokyo, Japan" -> "Japan".
fn extract_region(place: &str) -> String {
    match place.rsplit_once(',') {
        Some((_, region)) if !region.trim().is_empty() => region.trim().to_string(),
        _ if !place.trim().is_empty() => place.trim().to_string(),
        _ => "Unknown".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Fetch operations
// ---------------------------------------------------------------------------

/// Fetches events from the trailing `lookback_hours` window at or above
/// `min_magnitude`.
pub fn fetch_recent(
    client: &reqwest::blocking::Client,
    config: &QuakeConfig,
    lookback_hours: i64,
    min_magnitude: f64,
) -> Result<Vec<QuakeObservation>, CollectError> {
    let start_time = Utc::now() - Duration::hours(lookback_hours);
    let url = build_recent_url(&config.base_url, start_time, min_magnitude);
    let body = super::http_get_text(client, &url, config.timeout_secs)?;
    parse_quake_response(&body)
}

/// Fetches events near a point from the trailing 30 days.
pub fn fetch_near_location(
    client: &reqwest::blocking::Client,
    config: &QuakeConfig,
    latitude: f64,
    longitude: f64,
    radius_degrees: f64,
    min_magnitude: f64,
) -> Result<Vec<QuakeObservation>, CollectError> {
    let start_time = Utc::now() - Duration::days(30);
    let url = build_radius_url(
        &config.base_url,
        start_time,
        latitude,
        longitude,
        radius_degrees,
        min_magnitude,
    );
    let body = super::http_get_text(client, &url, config.timeout_secs)?;
    parse_quake_response(&body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
