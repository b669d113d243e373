/// Source adapters for the hazard observation collection service.
///
/// One submodule per upstream provider. Each adapter builds the
/// provider-specific query URL, issues a blocking HTTP GET with a finite
/// timeout, and parses the structured response into normalized
/// `Observation` records. URL construction and parsing are pure functions
/// so they can be tested against the fixture payloads without a network.
///
/// Submodules:
/// - `quake`         — USGS FDSN earthquake catalog (GeoJSON)
/// - `tides`         — NOAA CO-OPS tide gauges (datagetter JSON)
/// - `river`         — USGS NWIS IV river gauges (WaterML-as-JSON)
/// - `space_weather` — NOAA SWPC Kp index + NASA DONKI CME feeds
/// - `fixtures` (test only) — representative API response payloads

pub mod quake;
pub mod river;
pub mod space_weather;
pub mod tides;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::model::CollectError;

/// Issues a blocking GET and returns the body as text.
///
/// Connection failures and timeouts map to `CollectError::Network`;
/// non-2xx statuses map to `CollectError::Http`. Shared by all adapters
/// so transport errors classify uniformly for the resilience wrapper.
pub(crate) fn http_get_text(
    client: &reqwest::blocking::Client,
    url: &str,
    timeout_secs: u64,
) -> Result<String, CollectError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .send()
        .map_err(|e| CollectError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CollectError::Http(status.as_u16()));
    }

    response
        .text()
        .map_err(|e| CollectError::Network(e.to_string()))
}
