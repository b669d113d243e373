/// USGS NWIS Instantaneous Values (IV) API client.
///
/// Handles URL construction and JSON response parsing for the USGS Water
/// Services IV endpoint:
///   https://waterservices.usgs.gov/nwis/iv/
///
/// The IV service returns WaterML rendered as JSON: one `timeSeries` entry
/// per site/parameter pair, measurement values as strings, and the sentinel
/// `-999999` standing in for missing data. Gage height (00065) and
/// discharge (00060) for the same site merge into a single observation.
/// See `fixtures.rs` for annotated examples of the response structure.

use crate::config::RiverConfig;
use crate::model::{CollectError, WaterLevelObservation, WaterProvider};
use crate::stations::{self, PARAM_DISCHARGE, PARAM_STAGE};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// Feet to meters, for the normalized metric level.
const M_PER_FT: f64 = 0.3048;

// ---------------------------------------------------------------------------
// Serde structures for WaterML JSON deserialization
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct IvResponse {
    value: ValueWrapper,
}

#[derive(Deserialize)]
struct ValueWrapper {
    #[serde(rename = "timeSeries")]
    time_series: Vec<TimeSeries>,
}

#[derive(Deserialize)]
struct TimeSeries {
    #[serde(rename = "sourceInfo")]
    source_info: SourceInfo,
    variable: Variable,
    values: Vec<Values>,
}

#[derive(Deserialize)]
struct SourceInfo {
    #[serde(rename = "siteName")]
    site_name: String,
    #[serde(rename = "siteCode")]
    site_code: Vec<SiteCode>,
    #[serde(rename = "geoLocation")]
    geo_location: Option<GeoLocation>,
}

#[derive(Deserialize)]
struct SiteCode {
    value: String,
}

#[derive(Deserialize)]
struct GeoLocation {
    #[serde(rename = "geogLocation")]
    geog_location: Option<GeogLocation>,
}

#[derive(Deserialize)]
struct GeogLocation {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct Variable {
    #[serde(rename = "variableCode")]
    variable_code: Vec<VariableCode>,
    #[serde(rename = "noDataValue")]
    no_data_value: f64,
}

#[derive(Deserialize)]
struct VariableCode {
    value: String,
}

#[derive(Deserialize)]
struct Values {
    value: Vec<ValueEntry>,
}

#[derive(Deserialize)]
struct ValueEntry {
    value: String, // USGS returns measurements as strings
    qualifiers: Vec<String>,
    #[serde(rename = "dateTime")]
    date_time: String,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds an IV API URL requesting gage height and discharge for the given
/// site codes. The URL always requests JSON format and filters to active
/// sites only.
pub fn build_iv_url(config: &RiverConfig, sites: &[&str]) -> String {
    format!(
        "{}?format=json&sites={}&parameterCd={},{}&siteStatus=active",
        config.base_url,
        sites.join(","),
        PARAM_STAGE,
        PARAM_DISCHARGE
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Partial per-site state accumulated while folding timeSeries entries.
struct SiteAccumulator {
    site_name: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    observed_at: DateTime<Utc>,
    gage_height_ft: Option<f64>,
    discharge_cfs: Option<f64>,
    quality_code: Option<String>,
}

/// Parses a USGS IV API JSON response body into one `WaterLevelObservation`
/// per site, merging the site's gage height and discharge series.
///
/// A series with an unparseable value, an empty value array, or only the
/// sentinel value is skipped; the rest of the batch continues. Flood stage
/// thresholds attach from the river site roster.
///
/// # Errors
/// - `CollectError::Parse` — malformed or unexpected JSON structure.
/// - `CollectError::NoData` — no series carried a usable measurement.
pub fn parse_iv_response(json: &str) -> Result<Vec<WaterLevelObservation>, CollectError> {
    let response: IvResponse = serde_json::from_str(json)
        .map_err(|e| CollectError::Parse(format!("JSON deserialization failed: {}", e)))?;

    if response.value.time_series.is_empty() {
        return Err(CollectError::NoData(
            "no timeSeries entries in response".to_string(),
        ));
    }

    // Insertion order preserved so output follows upstream response order.
    let mut site_order: Vec<String> = Vec::new();
    let mut sites: HashMap<String, SiteAccumulator> = HashMap::new();

    for series in response.value.time_series {
        let site_code = match series.source_info.site_code.first() {
            Some(code) => code.value.clone(),
            None => {
                eprintln!("[river] skipping series without a siteCode");
                continue;
            }
        };

        let parameter_code = match series.variable.variable_code.first() {
            Some(code) => code.value.clone(),
            None => {
                eprintln!("[river] skipping series for {} without a variableCode", site_code);
                continue;
            }
        };

        // Most recent value is the last entry of the chronological array.
        let latest = match series.values.first().and_then(|v| v.value.last()) {
            Some(entry) => entry,
            None => continue, // no readings for this series; try others
        };

        let value: f64 = match latest.value.parse() {
            Ok(v) => v,
            Err(e) => {
                eprintln!(
                    "[river] skipping unparseable value '{}' for {}: {}",
                    latest.value, site_code, e
                );
                continue;
            }
        };

        // USGS uses -999999 as an explicit missing-data sentinel.
        if (value - series.variable.no_data_value).abs() < 0.1 {
            continue;
        }

        let observed_at = match DateTime::parse_from_rfc3339(&latest.date_time) {
            Ok(dt) => dt.with_timezone(&Utc),
            Err(e) => {
                eprintln!(
                    "[river] skipping reading with bad timestamp '{}' for {}: {}",
                    latest.date_time, site_code, e
                );
                continue;
            }
        };

        let entry = sites.entry(site_code.clone()).or_insert_with(|| {
            site_order.push(site_code.clone());
            SiteAccumulator {
                site_name: series.source_info.site_name.clone(),
                latitude: series
                    .source_info
                    .geo_location
                    .as_ref()
                    .and_then(|g| g.geog_location.as_ref())
                    .map(|g| g.latitude),
                longitude: series
                    .source_info
                    .geo_location
                    .as_ref()
                    .and_then(|g| g.geog_location.as_ref())
                    .map(|g| g.longitude),
                observed_at,
                gage_height_ft: None,
                discharge_cfs: None,
                quality_code: None,
            }
        });

        if parameter_code == PARAM_STAGE {
            entry.gage_height_ft = Some(value);
        } else if parameter_code == PARAM_DISCHARGE {
            entry.discharge_cfs = Some(value);
        }
        // Most recent series timestamp wins for the merged observation.
        if observed_at > entry.observed_at {
            entry.observed_at = observed_at;
        }
        if entry.quality_code.is_none() {
            entry.quality_code = latest.qualifiers.first().cloned();
        }
    }

    let collected_at = Utc::now();
    let observations: Vec<WaterLevelObservation> = site_order
        .into_iter()
        .filter_map(|site_code| sites.remove(&site_code).map(|acc| (site_code, acc)))
        .map(|(site_code, acc)| {
            let flood_stages =
                stations::find_river_site(&site_code).and_then(|s| s.flood_stages);
            WaterLevelObservation {
                station_id: site_code,
                station_name: acc.site_name,
                provider: WaterProvider::UsgsWater,
                latitude: acc.latitude,
                longitude: acc.longitude,
                observed_at: acc.observed_at,
                water_level_ft: acc.gage_height_ft,
                water_level_m: acc.gage_height_ft.map(|ft| ft * M_PER_FT),
                datum: None,
                discharge_cfs: acc.discharge_cfs,
                gage_height_ft: acc.gage_height_ft,
                action_stage_ft: flood_stages.as_ref().and_then(|f| f.action_ft),
                minor_flood_stage_ft: flood_stages.as_ref().and_then(|f| f.minor_ft),
                moderate_flood_stage_ft: flood_stages.as_ref().and_then(|f| f.moderate_ft),
                major_flood_stage_ft: flood_stages.as_ref().and_then(|f| f.major_ft),
                quality_code: acc.quality_code,
                raw_payload: json.to_string(),
                collected_at,
            }
        })
        .collect();

    if observations.is_empty() {
        return Err(CollectError::NoData(
            "all timeSeries entries were empty or contained sentinel values".to_string(),
        ));
    }

    Ok(observations)
}

// ---------------------------------------------------------------------------
// Fetch operation
// ---------------------------------------------------------------------------

/// Fetches the latest gage height and discharge for the given sites.
pub fn fetch_latest(
    client: &reqwest::blocking::Client,
    config: &RiverConfig,
    sites: &[&str],
) -> Result<Vec<WaterLevelObservation>, CollectError> {
    let url = build_iv_url(config, sites);
    let body = super::http_get_text(client, &url, config.timeout_secs)?;
    parse_iv_response(&body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::*;

    // --- URL construction ---------------------------------------------------

    #[test]
    fn test_iv_url_targets_endpoint_with_json_format() {
        let config = RiverConfig::default();
        let url = build_iv_url(&config, &["01646500"]);
        assert!(
            url.contains("waterservices.usgs.gov/nwis/iv"),
            "must target the IV endpoint, got: {}",
            url
        );
        assert!(url.contains("format=json"), "must request JSON format");
        assert!(url.contains("siteStatus=active"), "should filter to active sites");
    }

    #[test]
    fn test_iv_url_includes_both_parameters_and_all_sites() {
        let config = RiverConfig::default();
        let url = build_iv_url(&config, &["01646500", "02035000"]);
        assert!(url.contains("01646500,02035000"), "sites should be comma-separated");
        assert!(url.contains(PARAM_STAGE), "must request gage height");
        assert!(url.contains(PARAM_DISCHARGE), "must request discharge");
    }

    // --- Parsing: happy path ------------------------------------------------

    #[test]
    fn test_parse_merges_stage_and_discharge_into_one_observation() {
        let observations = parse_iv_response(fixture_river_potomac_json())
            .expect("valid fixture should parse");

        assert_eq!(
            observations.len(),
            1,
            "stage and discharge series for one site should merge"
        );
        let potomac = &observations[0];
        assert_eq!(potomac.station_id, "01646500");
        assert_eq!(potomac.provider, WaterProvider::UsgsWater);
        assert_eq!(potomac.gage_height_ft, Some(3.48));
        assert_eq!(potomac.water_level_ft, Some(3.48));
        assert_eq!(potomac.discharge_cfs, Some(11_200.0));
    }

    #[test]
    fn test_parse_converts_gage_height_to_meters() {
        let observations = parse_iv_response(fixture_river_potomac_json()).expect("should parse");
        let meters = observations[0].water_level_m.expect("meters should be set");
        assert!(
            (meters - 3.48 * 0.3048).abs() < 1e-9,
            "feet should convert to meters at 0.3048, got {}",
            meters
        );
    }

    #[test]
    fn test_parse_attaches_roster_flood_stages() {
        let observations = parse_iv_response(fixture_river_potomac_json()).expect("should parse");
        let potomac = &observations[0];
        // Little Falls carries NWS thresholds in the roster.
        assert_eq!(potomac.action_stage_ft, Some(5.0));
        assert_eq!(potomac.minor_flood_stage_ft, Some(10.0));
        assert_eq!(potomac.major_flood_stage_ft, Some(14.2));
    }

    #[test]
    fn test_parse_multi_site_response_keeps_upstream_order() {
        let observations =
            parse_iv_response(fixture_river_multi_site_json()).expect("should parse");
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].station_id, "01646500");
        assert_eq!(observations[1].station_id, "02035000");
    }

    #[test]
    fn test_parse_provisional_qualifier_is_preserved() {
        let observations = parse_iv_response(fixture_river_potomac_json()).expect("should parse");
        assert_eq!(observations[0].quality_code.as_deref(), Some("P"));
    }

    // --- Parsing: error and edge cases --------------------------------------

    #[test]
    fn test_parse_sentinel_value_returns_no_data() {
        // USGS uses the string "-999999" as a sentinel even when a timestamp
        // is present. It must not be stored as a valid reading.
        let result = parse_iv_response(fixture_river_sentinel_json());
        assert!(
            matches!(result, Err(CollectError::NoData(_))),
            "sentinel value should yield NoData, got {:?}",
            result
        );
    }

    #[test]
    fn test_parse_empty_value_array_returns_no_data() {
        let result = parse_iv_response(fixture_river_empty_values_json());
        assert!(
            matches!(result, Err(CollectError::NoData(_))),
            "empty value array should yield NoData, got {:?}",
            result
        );
    }

    #[test]
    fn test_parse_malformed_json_returns_parse_error() {
        let result = parse_iv_response("{ this is not valid json }}}");
        assert!(
            matches!(result, Err(CollectError::Parse(_))),
            "malformed JSON should return Parse, got {:?}",
            result
        );
    }

    #[test]
    fn test_parse_empty_time_series_returns_no_data() {
        let json = r#"{ "value": { "timeSeries": [] } }"#;
        let result = parse_iv_response(json);
        assert!(matches!(result, Err(CollectError::NoData(_))));
    }

    #[test]
    fn test_parse_bad_value_in_one_series_keeps_the_other() {
        // The discharge series carries an unparseable value; the stage
        // series must still produce an observation.
        let observations =
            parse_iv_response(fixture_river_partial_json()).expect("batch should survive");
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].gage_height_ft, Some(3.48));
        assert_eq!(observations[0].discharge_cfs, None);
    }
}
