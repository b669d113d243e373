/// NOAA CO-OPS Tides and Currents API client.
///
/// Handles URL construction and JSON parsing for the datagetter endpoint:
///   https://api.tidesandcurrents.noaa.gov/api/prod/datagetter
///
/// One request returns the latest water level for one station. All numeric
/// fields arrive as strings, timestamps arrive as "YYYY-MM-DD HH:MM" in
/// GMT with no offset, and error conditions arrive as a 200 response with
/// an `error` object instead of `data`. See `fixtures.rs`.

use crate::config::TidesConfig;
use crate::model::{CollectError, WaterLevelObservation, WaterProvider};
use crate::stations::{self, FloodStages};
use chrono::{NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

/// Meters to feet.
const FT_PER_M: f64 = 3.28084;

// ---------------------------------------------------------------------------
// Serde structures for datagetter deserialization
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct DatagetterResponse {
    metadata: Option<Metadata>,
    data: Option<Vec<DataPoint>>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Metadata {
    name: Option<String>,
    // NOAA serializes coordinates as strings ("40.7006"), not numbers.
    lat: Option<String>,
    lon: Option<String>,
}

#[derive(Deserialize)]
struct DataPoint {
    /// Timestamp, "YYYY-MM-DD HH:MM" in GMT.
    t: String,
    /// Water level value (meters when units=metric), as a string.
    v: String,
    /// Quality assurance flag.
    q: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds a datagetter URL requesting the latest water level for one
/// station, in meters against the MLLW datum, GMT timestamps.
pub fn build_latest_url(config: &TidesConfig, station_id: &str) -> String {
    format!(
        "{}/datagetter?station={}&product=water_level&datum=MLLW&units=metric&time_zone=gmt&application={}&format=json&date=latest",
        config.base_url,
        station_id,
        urlencoding::encode(&config.application)
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a datagetter response body into a `WaterLevelObservation` for
/// `station_id`, attaching flood thresholds from the station roster.
///
/// # Errors
/// - `CollectError::Parse` — malformed JSON, unparseable value/timestamp,
///   or an upstream `error` object.
/// - `CollectError::NoData` — valid envelope with an empty data array.
pub fn parse_tides_response(
    json: &str,
    station_id: &str,
) -> Result<WaterLevelObservation, CollectError> {
    let response: DatagetterResponse = serde_json::from_str(json)
        .map_err(|e| CollectError::Parse(format!("JSON deserialization failed: {}", e)))?;

    if let Some(err) = response.error {
        return Err(CollectError::Parse(format!(
            "NOAA error for station {}: {}",
            station_id, err.message
        )));
    }

    let data = response
        .data
        .filter(|d| !d.is_empty())
        .ok_or_else(|| CollectError::NoData(format!("no readings for station {}", station_id)))?;

    // date=latest yields a single-element array; take the first defensively.
    let latest = &data[0];

    let naive = NaiveDateTime::parse_from_str(&latest.t, "%Y-%m-%d %H:%M")
        .map_err(|e| CollectError::Parse(format!("bad timestamp '{}': {}", latest.t, e)))?;
    let observed_at = Utc.from_utc_datetime(&naive);

    let level_m: f64 = latest
        .v
        .parse()
        .map_err(|e| CollectError::Parse(format!("bad water level '{}': {}", latest.v, e)))?;
    let level_ft = level_m * FT_PER_M;

    let roster = stations::find_tide_station(station_id);
    let flood_stages = roster.and_then(|s| s.flood_stages);
    let station_name = response
        .metadata
        .as_ref()
        .and_then(|m| m.name.clone())
        .or_else(|| roster.map(|s| s.name.to_string()))
        .unwrap_or_else(|| station_id.to_string());

    let parse_coord = |s: &Option<String>| s.as_ref().and_then(|v| v.parse::<f64>().ok());

    Ok(WaterLevelObservation {
        station_id: station_id.to_string(),
        station_name,
        provider: WaterProvider::NoaaTides,
        latitude: response.metadata.as_ref().and_then(|m| parse_coord(&m.lat)),
        longitude: response.metadata.as_ref().and_then(|m| parse_coord(&m.lon)),
        observed_at,
        water_level_ft: Some(level_ft),
        water_level_m: Some(level_m),
        datum: Some("MLLW".to_string()),
        discharge_cfs: None,
        gage_height_ft: None,
        action_stage_ft: flood_stages.as_ref().and_then(|f: &FloodStages| f.action_ft),
        minor_flood_stage_ft: flood_stages.as_ref().and_then(|f| f.minor_ft),
        moderate_flood_stage_ft: flood_stages.as_ref().and_then(|f| f.moderate_ft),
        major_flood_stage_ft: flood_stages.as_ref().and_then(|f| f.major_ft),
        quality_code: latest.q.clone(),
        raw_payload: json.to_string(),
        collected_at: Utc::now(),
    })
}

// ---------------------------------------------------------------------------
// Fetch operation
// ---------------------------------------------------------------------------

/// Fetches the latest water level for one tide station.
pub fn fetch_latest(
    client: &reqwest::blocking::Client,
    config: &TidesConfig,
    station_id: &str,
) -> Result<WaterLevelObservation, CollectError> {
    let url = build_latest_url(config, station_id);
    let body = super::http_get_text(client, &url, config.timeout_secs)?;
    parse_tides_response(&body, station_id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
