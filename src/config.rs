/// Service configuration loader - parses hazmon.toml
///
/// Separates tunable settings (provider URLs, poll intervals, retry and
/// circuit-breaker policy, fan-out limits) from code so operators can
/// adjust them without recompiling. The configuration is constructed once
/// at startup and passed by reference to each component.

use serde::Deserialize;
use std::fs;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Provider sections
// ---------------------------------------------------------------------------

/// USGS FDSN earthquake catalog settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuakeConfig {
    pub base_url: String,
    /// Minimum magnitude for the default recent-events query.
    pub min_magnitude: f64,
    /// Lookback window for the default recent-events query, in hours.
    pub lookback_hours: i64,
    pub timeout_secs: u64,
}

impl Default for QuakeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://earthquake.usgs.gov".to_string(),
            min_magnitude: 4.5,
            lookback_hours: 24,
            timeout_secs: 20,
        }
    }
}

/// NOAA CO-OPS Tides and Currents settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TidesConfig {
    pub base_url: String,
    /// Identifies this client to NOAA, passed as the `application` param.
    pub application: String,
    pub timeout_secs: u64,
    /// Delay between station dispatches during fan-out, for rate limiting.
    pub dispatch_stagger_ms: u64,
}

impl Default for TidesConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.tidesandcurrents.noaa.gov/api/prod".to_string(),
            application: "hazmon-service".to_string(),
            timeout_secs: 15,
            dispatch_stagger_ms: 100,
        }
    }
}

/// USGS NWIS Instantaneous Values settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RiverConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub dispatch_stagger_ms: u64,
}

impl Default for RiverConfig {
    fn default() -> Self {
        Self {
            base_url: "https://waterservices.usgs.gov/nwis/iv".to_string(),
            timeout_secs: 15,
            dispatch_stagger_ms: 150,
        }
    }
}

/// NOAA SWPC + NASA DONKI space-weather settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpaceWeatherConfig {
    pub kp_index_url: String,
    pub donki_base_url: String,
    /// NASA API key. DEMO_KEY works but is heavily rate-limited; the
    /// NASA_API_KEY environment variable overrides this at startup.
    pub nasa_api_key: String,
    /// Lookback window for the CME query, in days.
    pub cme_lookback_days: i64,
    pub timeout_secs: u64,
}

impl Default for SpaceWeatherConfig {
    fn default() -> Self {
        Self {
            kp_index_url:
                "https://services.swpc.noaa.gov/json/planetary_k_index_1m.json".to_string(),
            donki_base_url: "https://api.nasa.gov/DONKI".to_string(),
            nasa_api_key: "DEMO_KEY".to_string(),
            cme_lookback_days: 7,
            timeout_secs: 20,
        }
    }
}

// ---------------------------------------------------------------------------
// Resilience, fan-out, and publishing sections
// ---------------------------------------------------------------------------

/// Retry and circuit-breaker policy, shared by all sources. Each source
/// gets its own breaker instance; this section only sets the parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Total attempts per call (first try + retries).
    pub retry_attempts: u32,
    pub retry_backoff_ms: u64,
    /// Consecutive failed (post-retry) calls before the breaker opens.
    pub breaker_failure_threshold: u32,
    /// How long an open breaker rejects calls before allowing a trial.
    pub breaker_cooldown_secs: u64,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            retry_attempts: 3,
            retry_backoff_ms: 500,
            breaker_failure_threshold: 5,
            breaker_cooldown_secs: 60,
        }
    }
}

impl ResilienceConfig {
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn breaker_cooldown(&self) -> Duration {
        Duration::from_secs(self.breaker_cooldown_secs)
    }
}

/// Fan-out coordinator limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FanOutConfig {
    /// Maximum station fetches in flight at once.
    pub max_in_flight: usize,
}

impl Default for FanOutConfig {
    fn default() -> Self {
        Self { max_in_flight: 4 }
    }
}

/// Outbound event channel settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Base URL of the Pub/Sub-style push gateway. Empty disables
    /// publishing (events are logged and dropped).
    pub gateway_url: String,
    pub timeout_secs: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            gateway_url: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Per-domain poll intervals for the daemon's periodic triggers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub quake_poll_minutes: u64,
    pub tides_poll_minutes: u64,
    pub river_poll_minutes: u64,
    pub space_weather_poll_minutes: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            quake_poll_minutes: 10,
            tides_poll_minutes: 15,
            river_poll_minutes: 15,
            space_weather_poll_minutes: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// Root configuration
// ---------------------------------------------------------------------------

/// Root configuration for the service, deserialized from hazmon.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub quake: QuakeConfig,
    pub tides: TidesConfig,
    pub river: RiverConfig,
    pub space_weather: SpaceWeatherConfig,
    pub resilience: ResilienceConfig,
    pub fanout: FanOutConfig,
    pub publish: PublishConfig,
    pub schedule: ScheduleConfig,
}

impl CollectorConfig {
    /// Loads configuration from `hazmon.toml` in the working directory,
    /// falling back to defaults when the file is absent. Every provider has
    /// a working default URL, so a missing file is not an error — only a
    /// malformed one is.
    ///
    /// `NASA_API_KEY` in the environment (or `.env`) overrides the
    /// configured DONKI key.
    pub fn load() -> Result<Self, String> {
        Self::load_from("hazmon.toml")
    }

    pub fn load_from(path: &str) -> Result<Self, String> {
        let mut config: CollectorConfig = match fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .map_err(|e| format!("Failed to parse {}: {}", path, e))?,
            Err(_) => CollectorConfig::default(),
        };

        dotenv::dotenv().ok();
        if let Ok(key) = std::env::var("NASA_API_KEY") {
            if !key.is_empty() {
                config.space_weather.nasa_api_key = key;
            }
        }

        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_production_endpoints() {
        let config = CollectorConfig::default();
        assert!(config.quake.base_url.contains("earthquake.usgs.gov"));
        assert!(config.tides.base_url.contains("tidesandcurrents.noaa.gov"));
        assert!(config.river.base_url.contains("waterservices.usgs.gov"));
        assert!(config.space_weather.kp_index_url.contains("swpc.noaa.gov"));
    }

    #[test]
    fn test_default_thresholds_are_sane() {
        let config = CollectorConfig::default();
        assert!(config.quake.min_magnitude >= 4.0);
        assert!(config.resilience.retry_attempts >= 2);
        assert!(config.resilience.breaker_failure_threshold >= 3);
        assert!(config.fanout.max_in_flight >= 1);
    }

    #[test]
    fn test_partial_toml_overrides_only_named_fields() {
        let toml_str = r#"
            [quake]
            min_magnitude = 5.5

            [resilience]
            retry_attempts = 2
        "#;
        let config: CollectorConfig = toml::from_str(toml_str).expect("should parse");
        assert_eq!(config.quake.min_magnitude, 5.5);
        assert_eq!(config.resilience.retry_attempts, 2);
        // Unnamed fields keep their defaults.
        assert_eq!(config.quake.lookback_hours, 24);
        assert_eq!(config.tides.dispatch_stagger_ms, 100);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = CollectorConfig::load_from("does_not_exist.toml")
            .expect("missing file should not be an error");
        assert_eq!(config.quake.lookback_hours, 24);
    }

    #[test]
    fn test_duration_helpers() {
        let resilience = ResilienceConfig::default();
        assert_eq!(resilience.retry_backoff(), Duration::from_millis(500));
        assert_eq!(resilience.breaker_cooldown(), Duration::from_secs(60));
    }
}
