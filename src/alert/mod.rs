/// Alerting for the hazard observation collection service.
///
/// Submodules:
/// - `severity` — pure classification: seismic severity tiers, tsunami
///   risk scoring, flood stage severity.
/// - `router`   — the decision table mapping a classified record to its
///   outbound channels.

pub mod router;
pub mod severity;
