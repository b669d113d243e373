/// Core data types for the hazard observation collection service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O and no external dependencies beyond chrono — only the
/// observation types, the hazard source taxonomy, and the error taxonomy.

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Hazard sources
// ---------------------------------------------------------------------------

/// The hazard domains this service collects observations for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// USGS FDSN earthquake catalog.
    Seismic,
    /// NOAA CO-OPS coastal tide gauges.
    Tide,
    /// USGS NWIS river gauges.
    River,
    /// NOAA SWPC Kp index and NASA DONKI CME feeds.
    SpaceWeather,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Seismic => "seismic",
            Source::Tide => "tide",
            Source::River => "river",
            Source::SpaceWeather => "space_weather",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Observation types
// ---------------------------------------------------------------------------

/// A single earthquake event from the USGS FDSN catalog.
///
/// `event_id` is the USGS-assigned identifier (e.g. "us7000m123") and is the
/// natural key for deduplication — an event seen twice is stored once.
#[derive(Debug, Clone, PartialEq)]
pub struct QuakeObservation {
    pub event_id: String,
    /// Moment/local magnitude. USGS occasionally omits this for very fresh
    /// events, so it stays optional all the way through classification.
    pub magnitude: Option<f64>,
    pub magnitude_type: Option<String>,
    /// Hypocenter depth in kilometers.
    pub depth_km: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    pub event_time: DateTime<Utc>,
    /// Human-readable location, e.g. "23 km SW of Tokyo, Japan".
    pub place: String,
    /// Country/region extracted from the place string.
    pub region: String,
    /// Upstream tsunami warning flag (GeoJSON `tsunami` property).
    pub tsunami_flag: bool,
    /// USGS alert level: green, yellow, orange, red.
    pub alert_level: Option<String>,
    /// USGS significance score (0-1000+).
    pub significance: Option<i32>,
    pub felt_reports: Option<i32>,
    /// Reporting network (e.g. "us", "ci", "nc").
    pub network: Option<String>,
    pub event_url: Option<String>,
    /// Original GeoJSON feature, retained verbatim for audit.
    pub raw_payload: String,
    pub collected_at: DateTime<Utc>,
}

/// Which upstream provider a water-level reading came from. The two
/// providers share one observation shape but differ in units, datum
/// handling, and which fields they populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterProvider {
    /// NOAA CO-OPS Tides and Currents (coastal/ocean stations).
    NoaaTides,
    /// USGS NWIS Instantaneous Values (river/stream sites).
    UsgsWater,
}

impl WaterProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaterProvider::NoaaTides => "noaa_tides",
            WaterProvider::UsgsWater => "usgs_water",
        }
    }

    /// The hazard source this provider's readings belong to.
    pub fn source(&self) -> Source {
        match self {
            WaterProvider::NoaaTides => Source::Tide,
            WaterProvider::UsgsWater => Source::River,
        }
    }
}

/// A single water-level reading from a tide station or river gauge.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterLevelObservation {
    pub station_id: String,
    pub station_name: String,
    pub provider: WaterProvider,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Reading time as reported upstream.
    pub observed_at: DateTime<Utc>,
    pub water_level_ft: Option<f64>,
    pub water_level_m: Option<f64>,
    /// Reference datum (MLLW, NAVD88, ...). NOAA only.
    pub datum: Option<String>,
    /// Stream discharge in cubic feet per second. USGS only.
    pub discharge_cfs: Option<f64>,
    /// Gage height in feet. USGS only.
    pub gage_height_ft: Option<f64>,
    /// NWS flood stage thresholds, attached from the station roster.
    /// Stations without official thresholds carry `None` and always
    /// classify as NORMAL.
    pub action_stage_ft: Option<f64>,
    pub minor_flood_stage_ft: Option<f64>,
    pub moderate_flood_stage_ft: Option<f64>,
    pub major_flood_stage_ft: Option<f64>,
    pub quality_code: Option<String>,
    pub raw_payload: String,
    pub collected_at: DateTime<Utc>,
}

/// What kind of space-weather metric an observation carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceWeatherKind {
    KpIndex,
    Cme,
}

impl SpaceWeatherKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpaceWeatherKind::KpIndex => "kp_index",
            SpaceWeatherKind::Cme => "cme",
        }
    }
}

/// A space-weather metric: a planetary Kp index sample or a coronal mass
/// ejection record.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceWeatherObservation {
    /// Natural key: `kp:<time_tag>` for Kp samples, the DONKI activity id
    /// for CMEs.
    pub metric_id: String,
    pub kind: SpaceWeatherKind,
    pub kp_index: Option<f64>,
    pub cme_speed_kms: Option<i32>,
    pub cme_class: Option<String>,
    pub observed_at: DateTime<Utc>,
    pub raw_payload: String,
    pub collected_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Common envelope
// ---------------------------------------------------------------------------

/// One observation record, variant per hazard domain.
///
/// The envelope accessors below are what the store gateway, the router,
/// and the publisher operate on — they never need to match on the variant
/// themselves just to read shared fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    Quake(QuakeObservation),
    WaterLevel(WaterLevelObservation),
    SpaceWeather(SpaceWeatherObservation),
}

impl Observation {
    pub fn source(&self) -> Source {
        match self {
            Observation::Quake(_) => Source::Seismic,
            Observation::WaterLevel(w) => w.provider.source(),
            Observation::SpaceWeather(_) => Source::SpaceWeather,
        }
    }

    /// Provider-assigned identifier used for deduplication. Globally unique
    /// within a domain; a record whose key already exists is discarded.
    pub fn natural_key(&self) -> String {
        match self {
            Observation::Quake(q) => q.event_id.clone(),
            // One reading per provider+station+timestamp, matching the
            // upstream (station_id, timestamp) uniqueness guarantee.
            Observation::WaterLevel(w) => format!(
                "{}:{}:{}",
                w.provider.as_str(),
                w.station_id,
                w.observed_at.timestamp()
            ),
            Observation::SpaceWeather(s) => s.metric_id.clone(),
        }
    }

    /// Event/reading time as reported upstream.
    pub fn observed_at(&self) -> DateTime<Utc> {
        match self {
            Observation::Quake(q) => q.event_time,
            Observation::WaterLevel(w) => w.observed_at,
            Observation::SpaceWeather(s) => s.observed_at,
        }
    }

    /// Local collection time, stamped once at parse time.
    pub fn collected_at(&self) -> DateTime<Utc> {
        match self {
            Observation::Quake(q) => q.collected_at,
            Observation::WaterLevel(w) => w.collected_at,
            Observation::SpaceWeather(s) => s.collected_at,
        }
    }

    pub fn latitude(&self) -> Option<f64> {
        match self {
            Observation::Quake(q) => Some(q.latitude),
            Observation::WaterLevel(w) => w.latitude,
            Observation::SpaceWeather(_) => None,
        }
    }

    pub fn longitude(&self) -> Option<f64> {
        match self {
            Observation::Quake(q) => Some(q.longitude),
            Observation::WaterLevel(w) => w.longitude,
            Observation::SpaceWeather(_) => None,
        }
    }

    /// Station/site identifier for per-station queries. Quakes and
    /// space-weather metrics are not station-scoped.
    pub fn station_id(&self) -> Option<&str> {
        match self {
            Observation::WaterLevel(w) => Some(&w.station_id),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or parsing upstream provider data.
///
/// Only `Network` and `Http` are transient: the resilience wrapper retries
/// them and they feed the circuit breaker. `Parse` failures at the envelope
/// level are never retried — re-requesting malformed data yields the same
/// malformed data.
#[derive(Debug, PartialEq)]
pub enum CollectError {
    /// Connection failure, timeout, or other transport-level error.
    Network(String),
    /// Non-2xx HTTP response from the provider.
    Http(u16),
    /// The response body could not be deserialized.
    Parse(String),
    /// Structurally valid response containing no usable records
    /// (empty arrays, sentinel values only).
    NoData(String),
}

impl CollectError {
    /// Whether the resilience wrapper should retry this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CollectError::Network(_) | CollectError::Http(_))
    }
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Network(msg) => write!(f, "network error: {}", msg),
            CollectError::Http(code) => write!(f, "HTTP error: {}", code),
            CollectError::Parse(msg) => write!(f, "parse error: {}", msg),
            CollectError::NoData(msg) => write!(f, "no data available: {}", msg),
        }
    }
}

impl std::error::Error for CollectError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
