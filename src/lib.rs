/// hazmon_service: multi-hazard observation collection and alerting service.
///
/// # Module structure
///
/// ```text
/// hazmon_service
/// ├── model       — shared data types (Observation, Source, CollectError, …)
/// ├── config      — runtime settings loader (hazmon.toml)
/// ├── stations    — tide station and river site rosters with flood thresholds
/// ├── ingest
/// │   ├── quake         — USGS FDSN earthquake catalog (GeoJSON)
/// │   ├── tides         — NOAA CO-OPS tide gauges (datagetter)
/// │   ├── river         — USGS NWIS IV river gauges (WaterML-as-JSON)
/// │   ├── space_weather — NOAA SWPC Kp index + NASA DONKI CME
/// │   └── fixtures (test only) — representative API response payloads
/// ├── resilience  — retry, per-source circuit breakers, cache fallback
/// ├── store       — ObservationStore trait + in-memory natural-key index
/// ├── db          — PostgreSQL store gateway and connection validation
/// ├── alert
/// │   ├── severity — pure classification (severity tiers, tsunami risk, flood stages)
/// │   └── router   — channel decision table
/// ├── publish     — outbound event channel (Pub/Sub-style push gateway)
/// ├── fanout      — bounded worker-pool fan-out with merged output channel
/// ├── collector   — per-domain orchestration + fire-and-forget trigger handle
/// ├── daemon      — startup validation, freshness report, per-domain timers
/// └── endpoint    — HTTP surface for manual collection triggers
/// ```

/// Public modules
pub mod alert;
pub mod collector;
pub mod config;
pub mod daemon;
pub mod db;
pub mod endpoint;
pub mod fanout;
pub mod ingest;
pub mod model;
pub mod publish;
pub mod resilience;
pub mod stations;
pub mod store;
