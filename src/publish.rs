/// Outbound event channel for classified observation records.
///
/// Publishing is at-least-once and fire-and-forget: the completion status
/// is used only for logging, and a failed publish never rolls back the
/// already-persisted record. Payloads travel Pub/Sub style — a JSON
/// message envelope carrying the base64-encoded event and a partition key
/// attribute, POSTed to the configured push gateway.

use crate::alert::severity;
use crate::config::PublishConfig;
use crate::model::Observation;
use base64::prelude::{Engine as _, BASE64_STANDARD};
use serde_json::json;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Publisher trait
// ---------------------------------------------------------------------------

/// The outbound channel interface consumed by the collection pipeline.
pub trait EventPublisher: Send + Sync {
    /// Publishes one event. Never fails from the caller's perspective —
    /// implementations log delivery failures and move on.
    fn send(&self, channel: &str, partition_key: &str, payload: &serde_json::Value);
}

// ---------------------------------------------------------------------------
// Event payloads
// ---------------------------------------------------------------------------

/// Builds the outbound payload for a record, embedding the derived
/// classification fields alongside the raw attributes so consumers never
/// recompute them inconsistently.
pub fn event_payload(record: &Observation, event_type: &str) -> serde_json::Value {
    match record {
        Observation::Quake(q) => json!({
            "eventType": event_type,
            "earthquakeId": q.event_id,
            "magnitude": q.magnitude,
            "magnitudeType": q.magnitude_type,
            "depthKm": q.depth_km,
            "latitude": q.latitude,
            "longitude": q.longitude,
            "eventTime": q.event_time.to_rfc3339(),
            "place": q.place,
            "region": q.region,
            "severity": severity::quake_severity(q).as_str(),
            "dangerous": severity::is_dangerous(q),
            "catastrophic": severity::is_catastrophic(q),
            "shallow": severity::is_shallow(q),
            "tsunamiWarning": q.tsunami_flag,
            "tsunamiRiskScore": severity::tsunami_risk_score(q),
            "alertLevel": q.alert_level,
            "significance": q.significance,
            "feltReports": q.felt_reports,
            "network": q.network,
            "eventUrl": q.event_url,
            "collectedAt": q.collected_at.to_rfc3339(),
        }),
        Observation::WaterLevel(w) => json!({
            "eventType": event_type,
            "stationId": w.station_id,
            "stationName": w.station_name,
            "provider": w.provider.as_str(),
            "source": w.provider.source().as_str(),
            "latitude": w.latitude,
            "longitude": w.longitude,
            "observedAt": w.observed_at.to_rfc3339(),
            "waterLevelFeet": w.water_level_ft,
            "waterLevelMeters": w.water_level_m,
            "datum": w.datum,
            "dischargeCfs": w.discharge_cfs,
            "gageHeightFeet": w.gage_height_ft,
            "floodSeverity": severity::flood_severity(w).as_str(),
            "isFlooding": severity::is_flooding(w),
            "qualityCode": w.quality_code,
            "collectedAt": w.collected_at.to_rfc3339(),
        }),
        Observation::SpaceWeather(s) => json!({
            "eventType": event_type,
            "metricId": s.metric_id,
            "metricType": s.kind.as_str(),
            "kpIndex": s.kp_index,
            "cmeSpeedKms": s.cme_speed_kms,
            "cmeClass": s.cme_class,
            "observedAt": s.observed_at.to_rfc3339(),
            "collectedAt": s.collected_at.to_rfc3339(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Pub/Sub gateway publisher
// ---------------------------------------------------------------------------

/// Publishes events to a Pub/Sub-style push gateway over HTTP. The event
/// JSON is base64-encoded into the message `data` field, with the
/// partition key carried as an attribute.
pub struct PubsubPublisher {
    client: reqwest::blocking::Client,
    config: PublishConfig,
}

impl PubsubPublisher {
    pub fn new(config: PublishConfig) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            config,
        }
    }

    fn publish_url(&self, channel: &str) -> String {
        format!("{}/topics/{}:publish", self.config.gateway_url.trim_end_matches('/'), channel)
    }
}

/// Builds the Pub/Sub message envelope for one event.
fn pubsub_body(partition_key: &str, payload: &serde_json::Value) -> serde_json::Value {
    json!({
        "messages": [{
            "data": BASE64_STANDARD.encode(payload.to_string()),
            "attributes": { "partitionKey": partition_key }
        }]
    })
}

impl EventPublisher for PubsubPublisher {
    fn send(&self, channel: &str, partition_key: &str, payload: &serde_json::Value) {
        if self.config.gateway_url.is_empty() {
            // No gateway configured: log-and-drop keeps the pipeline
            // observable in development without a broker.
            println!("[publish] (dry-run) {} key={}", channel, partition_key);
            return;
        }

        let url = self.publish_url(channel);
        let body = pubsub_body(partition_key, payload);

        let result = self
            .client
            .post(&url)
            .json(&body)
            .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
            .send();

        match result {
            Ok(response) if response.status().is_success() => {
                println!("[publish] delivered to {} key={}", channel, partition_key);
            }
            Ok(response) => {
                eprintln!(
                    "[publish] gateway rejected event for {} key={}: HTTP {}",
                    channel,
                    partition_key,
                    response.status()
                );
            }
            Err(e) => {
                eprintln!(
                    "[publish] failed to deliver event for {} key={}: {}",
                    channel, partition_key, e
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Collecting publisher (tests and dry runs)
// ---------------------------------------------------------------------------

/// Records every published event in memory instead of sending it. Backs
/// the pipeline tests, which assert on exactly which channels fired.
pub struct CollectingPublisher {
    sent: Mutex<Vec<PublishedEvent>>,
}

#[derive(Debug, Clone)]
pub struct PublishedEvent {
    pub channel: String,
    pub partition_key: String,
    pub payload: serde_json::Value,
}

impl CollectingPublisher {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<PublishedEvent> {
        self.sent.lock().expect("publisher lock poisoned").clone()
    }

    pub fn channels(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.channel).collect()
    }
}

impl Default for CollectingPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher for CollectingPublisher {
    fn send(&self, channel: &str, partition_key: &str, payload: &serde_json::Value) {
        self.sent
            .lock()
            .expect("publisher lock poisoned")
            .push(PublishedEvent {
                channel: channel.to_string(),
                partition_key: partition_key.to_string(),
                payload: payload.clone(),
            });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
