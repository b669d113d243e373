/// HTTP endpoint for triggering collection manually.
///
/// Provides the command surface external tools use to kick off a
/// collection run outside its schedule. Every trigger is fire-and-forget:
/// the response means "dispatched", never "completed" — a run's outcome is
/// observable only through the store and the logs.
///
/// Endpoints:
/// - POST /collect/quakes             - recent earthquakes
/// - POST /collect/significant-quakes - 7-day magnitude 6.0+ sweep
/// - POST /collect/quakes-near?lat=..&lon=..&radius=..&min_mag=..
/// - POST /collect/tides              - tide station fan-out
/// - POST /collect/rivers             - river site fan-out
/// - POST /collect/kp-index           - planetary Kp index
/// - POST /collect/cme                - CME activity
/// - GET  /health                     - service health check
/// - GET  /breakers                   - circuit breaker state per upstream API

use crate::collector::{CollectionTask, CollectorHandle};
use std::collections::HashMap;
use tiny_http::Method;

// ---------------------------------------------------------------------------
// HTTP server
// ---------------------------------------------------------------------------

/// Starts the trigger endpoint on the given port. Blocks serving requests;
/// callers run it on a dedicated thread.
pub fn start_endpoint_server(port: u16, handle: CollectorHandle) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    println!("HTTP endpoint listening on http://0.0.0.0:{}", port);
    println!("   POST /collect/{{quakes|significant-quakes|tides|rivers|kp-index|cme}}");
    println!("   POST /collect/quakes-near?lat=..&lon=..&radius=..&min_mag=..");
    println!("   GET  /health | GET /breakers\n");

    for request in server.incoming_requests() {
        let url = request.url().to_string();
        let (path, query) = split_query(&url);

        let response = match (request.method(), path) {
            (Method::Get, "/health") => handle_health(),
            (Method::Get, "/breakers") => handle_breakers(&handle),
            (Method::Post, path) if path.starts_with("/collect/") => {
                handle_collect(&handle, path.trim_start_matches("/collect/"), &query)
            }
            _ => create_response(
                404,
                serde_json::json!({
                    "error": "Not found",
                    "available_endpoints": [
                        "POST /collect/{quakes|significant-quakes|quakes-near|tides|rivers|kp-index|cme}",
                        "GET /health",
                        "GET /breakers"
                    ]
                }),
            ),
        };

        if let Err(e) = request.respond(response) {
            eprintln!("Failed to send response: {}", e);
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn handle_health() -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    create_response(
        200,
        serde_json::json!({
            "status": "ok",
            "service": "hazmon_service",
            "version": "0.1.0"
        }),
    )
}

fn handle_breakers(handle: &CollectorHandle) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let states: Vec<serde_json::Value> = handle
        .collector()
        .breaker_states()
        .into_iter()
        .map(|(name, state)| serde_json::json!({ "name": name, "state": state.as_str() }))
        .collect();
    create_response(200, serde_json::json!({ "breakers": states }))
}

fn handle_collect(
    handle: &CollectorHandle,
    domain: &str,
    query: &HashMap<String, String>,
) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let task = match domain {
        "quakes" => CollectionTask::RecentQuakes,
        "significant-quakes" => CollectionTask::SignificantQuakes,
        "tides" => CollectionTask::TideLevels,
        "rivers" => CollectionTask::RiverLevels,
        "kp-index" => CollectionTask::KpIndex,
        "cme" => CollectionTask::Cme,
        "quakes-near" => match parse_quakes_near(query) {
            Ok(task) => task,
            Err(message) => {
                return create_response(
                    400,
                    serde_json::json!({ "error": message, "domain": domain }),
                )
            }
        },
        unknown => {
            return create_response(
                404,
                serde_json::json!({ "error": "Unknown collection domain", "domain": unknown }),
            )
        }
    };

    println!("Manual trigger: {}", task.describe());
    handle.trigger(task);

    create_response(
        202,
        serde_json::json!({
            "status": "dispatched",
            "collection": task.describe()
        }),
    )
}

/// Builds the near-location task from query parameters. `lat` and `lon`
/// are required; `radius` (degrees) and `min_mag` default sensibly.
fn parse_quakes_near(query: &HashMap<String, String>) -> Result<CollectionTask, String> {
    let parse_f64 = |key: &str| -> Result<Option<f64>, String> {
        match query.get(key) {
            Some(raw) => raw
                .parse::<f64>()
                .map(Some)
                .map_err(|_| format!("parameter '{}' must be a number, got '{}'", key, raw)),
            None => Ok(None),
        }
    };

    let latitude = parse_f64("lat")?.ok_or("missing required parameter 'lat'")?;
    let longitude = parse_f64("lon")?.ok_or("missing required parameter 'lon'")?;
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(format!("latitude {} out of range [-90, 90]", latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(format!("longitude {} out of range [-180, 180]", longitude));
    }

    Ok(CollectionTask::QuakesNear {
        latitude,
        longitude,
        radius_degrees: parse_f64("radius")?.unwrap_or(2.0),
        min_magnitude: parse_f64("min_mag")?.unwrap_or(3.0),
    })
}

// ---------------------------------------------------------------------------
// Request plumbing
// ---------------------------------------------------------------------------

/// Splits a request URL into its path and decoded query parameters.
fn split_query(url: &str) -> (&str, HashMap<String, String>) {
    match url.split_once('?') {
        Some((path, raw_query)) => {
            let params = raw_query
                .split('&')
                .filter_map(|pair| {
                    let (key, value) = pair.split_once('=')?;
                    Some((
                        key.to_string(),
                        urlencoding::decode(value).ok()?.into_owned(),
                    ))
                })
                .collect();
            (path, params)
        }
        None => (url, HashMap::new()),
    }
}

/// Creates an HTTP response with a JSON body.
fn create_response(status_code: u16, json: serde_json::Value) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_string());

    tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(status_code))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                .expect("static header is valid"),
        )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
