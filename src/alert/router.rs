/// Outbound channel routing: the decision table mapping a classified
/// record to zero or more channels.
///
/// Conditions are evaluated independently — a single record can fan out
/// to several channels (an M6.5 shallow quake goes to the data channel,
/// the seismic alert channel, AND the tsunami warning channel). Routing
/// happens after persistence, so a publish failure loses only the
/// notification, never the stored record.

use crate::alert::severity;
use crate::model::{Observation, SpaceWeatherKind};

// ---------------------------------------------------------------------------
// Channel names
// ---------------------------------------------------------------------------

pub const CH_EARTHQUAKE_DATA: &str = "raw.earthquake.data";
pub const CH_EARTHQUAKE_ALERT: &str = "raw.earthquake.alert";
pub const CH_TSUNAMI_WARNING: &str = "raw.tsunami.warning";
pub const CH_WATERLEVEL_DATA: &str = "raw.waterlevel.data";
pub const CH_FLOOD_ALERT: &str = "raw.flood.alert";
pub const CH_SPACE_WEATHER_KP: &str = "raw.spaceweather.kp";
pub const CH_SPACE_WEATHER_CME: &str = "raw.spaceweather.cme";

/// Tsunami risk score at or above which the warning channel fires even
/// without an upstream flag.
const TSUNAMI_RISK_CUTOFF: u8 = 50;

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Which query produced the record. The significant-events query variant
/// routes its records to the alert channel with a distinct tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Standard,
    Significant,
}

/// One outbound delivery decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub channel: &'static str,
    /// Event-type tag carried in the published payload.
    pub event_type: &'static str,
}

/// Applies the decision table to a record. Every new record routes to its
/// domain's data channel; alert channels are added per condition.
pub fn routes_for(record: &Observation, query: QueryKind) -> Vec<Route> {
    let mut routes = Vec::new();

    match record {
        Observation::Quake(quake) => {
            routes.push(Route {
                channel: CH_EARTHQUAKE_DATA,
                event_type: "earthquake.data",
            });

            if severity::is_dangerous(quake) {
                routes.push(Route {
                    channel: CH_EARTHQUAKE_ALERT,
                    event_type: "earthquake.alert",
                });
            }

            if quake.tsunami_flag || severity::tsunami_risk_score(quake) >= TSUNAMI_RISK_CUTOFF {
                routes.push(Route {
                    channel: CH_TSUNAMI_WARNING,
                    event_type: "tsunami.warning",
                });
            }

            if query == QueryKind::Significant {
                routes.push(Route {
                    channel: CH_EARTHQUAKE_ALERT,
                    event_type: "earthquake.significant",
                });
            }
        }
        Observation::WaterLevel(reading) => {
            routes.push(Route {
                channel: CH_WATERLEVEL_DATA,
                event_type: "waterlevel.data",
            });

            if severity::is_flooding(reading) {
                routes.push(Route {
                    channel: CH_FLOOD_ALERT,
                    event_type: "flood.alert",
                });
            }
        }
        Observation::SpaceWeather(metric) => {
            let (channel, event_type) = match metric.kind {
                SpaceWeatherKind::KpIndex => (CH_SPACE_WEATHER_KP, "spaceweather.kp"),
                SpaceWeatherKind::Cme => (CH_SPACE_WEATHER_CME, "spaceweather.cme"),
            };
            routes.push(Route { channel, event_type });
        }
    }

    routes
}

/// Partition key for outbound publishes: the record's provider-assigned
/// identifier, so all deliveries for one real-world event land on one
/// partition.
pub fn partition_key(record: &Observation) -> String {
    match record {
        Observation::Quake(q) => q.event_id.clone(),
        Observation::WaterLevel(w) => w.station_id.clone(),
        Observation::SpaceWeather(s) => s.metric_id.clone(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
