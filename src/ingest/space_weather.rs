/// Space-weather feed clients: NOAA SWPC planetary Kp index and NASA DONKI
/// coronal mass ejections.
///
/// Two small providers share this module because they produce the same
/// observation shape. The SWPC feed is a plain JSON array with no query
/// parameters; DONKI takes a date window and an API key:
///   https://services.swpc.noaa.gov/json/planetary_k_index_1m.json
///   https://api.nasa.gov/DONKI/CME

use crate::config::SpaceWeatherConfig;
use crate::model::{CollectError, SpaceWeatherKind, SpaceWeatherObservation};
use chrono::{Duration, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Serde structures
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct KpSample {
    time_tag: String,
    kp_index: Option<f64>,
    estimated_kp: Option<f64>,
}

// DONKI CME entries vary in shape release to release, so each element is
// handled as a raw value and fields are pulled out individually.

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds the DONKI CME query URL for the trailing `lookback_days` window.
pub fn build_cme_url(config: &SpaceWeatherConfig, lookback_days: i64) -> String {
    let end = Utc::now().date_naive();
    let start = end - Duration::days(lookback_days);
    format!(
        "{}/CME?startDate={}&endDate={}&api_key={}",
        config.donki_base_url,
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d"),
        urlencoding::encode(&config.nasa_api_key)
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses the SWPC planetary Kp index feed into observations, one per
/// sample. A sample missing its timestamp or both Kp fields is skipped.
///
/// The measured `kp_index` wins over `estimated_kp` when both are present.
pub fn parse_kp_response(json: &str) -> Result<Vec<SpaceWeatherObservation>, CollectError> {
    let samples: Vec<serde_json::Value> = serde_json::from_str(json)
        .map_err(|e| CollectError::Parse(format!("Kp feed deserialization failed: {}", e)))?;

    if samples.is_empty() {
        return Err(CollectError::NoData("Kp feed returned no samples".to_string()));
    }

    let collected_at = Utc::now();
    let mut observations = Vec::new();

    for raw in samples {
        let sample: KpSample = match serde_json::from_value(raw.clone()) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("[space_weather] skipping malformed Kp sample: {}", e);
                continue;
            }
        };

        let kp = match sample.kp_index.or(sample.estimated_kp) {
            Some(kp) => kp,
            None => continue, // neither measured nor estimated value
        };

        let observed_at = match NaiveDateTime::parse_from_str(&sample.time_tag, "%Y-%m-%dT%H:%M:%S")
        {
            Ok(naive) => Utc.from_utc_datetime(&naive),
            Err(e) => {
                eprintln!(
                    "[space_weather] skipping Kp sample with bad time_tag '{}': {}",
                    sample.time_tag, e
                );
                continue;
            }
        };

        observations.push(SpaceWeatherObservation {
            metric_id: format!("kp:{}", sample.time_tag),
            kind: SpaceWeatherKind::KpIndex,
            kp_index: Some(kp),
            cme_speed_kms: None,
            cme_class: None,
            observed_at,
            raw_payload: raw.to_string(),
            collected_at,
        });
    }

    if observations.is_empty() {
        return Err(CollectError::NoData(
            "all Kp samples failed field-level parsing".to_string(),
        ));
    }

    Ok(observations)
}

/// Parses a DONKI CME response into observations, one per activity.
/// Speed and class come from the first analysis entry when present.
pub fn parse_cme_response(json: &str) -> Result<Vec<SpaceWeatherObservation>, CollectError> {
    let activities: Vec<serde_json::Value> = serde_json::from_str(json)
        .map_err(|e| CollectError::Parse(format!("DONKI deserialization failed: {}", e)))?;

    if activities.is_empty() {
        return Err(CollectError::NoData("DONKI returned no CME activity".to_string()));
    }

    let collected_at = Utc::now();
    let mut observations = Vec::new();

    for raw in activities {
        let activity_id = match raw.get("activityID").and_then(|v| v.as_str()) {
            Some(id) => id.to_string(),
            None => {
                eprintln!("[space_weather] skipping CME without an activityID");
                continue;
            }
        };

        // DONKI start times look like "2024-05-01T12:24Z".
        let observed_at = raw
            .get("startTime")
            .and_then(|v| v.as_str())
            .and_then(|s| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%MZ").ok())
            .map(|naive| Utc.from_utc_datetime(&naive))
            .unwrap_or(collected_at);

        let first_analysis = raw
            .get("cmeAnalyses")
            .and_then(|v| v.as_array())
            .and_then(|a| a.first());

        observations.push(SpaceWeatherObservation {
            metric_id: activity_id,
            kind: SpaceWeatherKind::Cme,
            kp_index: None,
            cme_speed_kms: first_analysis
                .and_then(|a| a.get("speed"))
                .and_then(|v| v.as_f64())
                .map(|s| s as i32),
            cme_class: first_analysis
                .and_then(|a| a.get("type"))
                .and_then(|v| v.as_str())
                .map(str::to_string),
            observed_at,
            raw_payload: raw.to_string(),
            collected_at,
        });
    }

    if observations.is_empty() {
        return Err(CollectError::NoData(
            "all CME activities failed field-level parsing".to_string(),
        ));
    }

    Ok(observations)
}

// ---------------------------------------------------------------------------
// Fetch operations
// ---------------------------------------------------------------------------

/// Fetches the current planetary Kp index feed.
pub fn fetch_kp_index(
    client: &reqwest::blocking::Client,
    config: &SpaceWeatherConfig,
) -> Result<Vec<SpaceWeatherObservation>, CollectError> {
    let body = super::http_get_text(client, &config.kp_index_url, config.timeout_secs)?;
    parse_kp_response(&body)
}

/// Fetches CME activity from the configured lookback window.
pub fn fetch_cme(
    client: &reqwest::blocking::Client,
    config: &SpaceWeatherConfig,
) -> Result<Vec<SpaceWeatherObservation>, CollectError> {
    let url = build_cme_url(config, config.cme_lookback_days);
    let body = super::http_get_text(client, &url, config.timeout_secs)?;
    parse_cme_response(&body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
