/// Risk classification: pure functions over observation records.
///
/// Everything here is deterministic and side-effect free. Derived values
/// are never stored as independent truth — they are recomputed from the
/// raw attributes wherever needed, so a record can never disagree with
/// its own classification.

use crate::model::{QuakeObservation, WaterLevelObservation};

// ---------------------------------------------------------------------------
// Seismic severity
// ---------------------------------------------------------------------------

/// Magnitude-class severity tiers, ascending. Boundaries are inclusive on
/// the lower bound: M7.0 is MAJOR, not STRONG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum QuakeSeverity {
    /// Magnitude not yet assigned by the network.
    Unknown,
    /// Below M3.0 — recorded by seismographs, not felt.
    Micro,
    /// M3.0+ — often felt, rarely damaging.
    Minor,
    /// M4.0+ — felt, objects shake.
    Light,
    /// M5.0+ — minor building damage.
    Moderate,
    /// M6.0+ — significant damage.
    Strong,
    /// M7.0+ — serious damage over large areas.
    Major,
    /// M8.0+ — global-scale catastrophe.
    Great,
}

impl QuakeSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuakeSeverity::Unknown => "UNKNOWN",
            QuakeSeverity::Micro => "MICRO",
            QuakeSeverity::Minor => "MINOR",
            QuakeSeverity::Light => "LIGHT",
            QuakeSeverity::Moderate => "MODERATE",
            QuakeSeverity::Strong => "STRONG",
            QuakeSeverity::Major => "MAJOR",
            QuakeSeverity::Great => "GREAT",
        }
    }
}

/// Classifies a quake by magnitude; the highest threshold met wins.
pub fn quake_severity(quake: &QuakeObservation) -> QuakeSeverity {
    let magnitude = match quake.magnitude {
        Some(m) => m,
        None => return QuakeSeverity::Unknown,
    };

    if magnitude >= 8.0 {
        QuakeSeverity::Great
    } else if magnitude >= 7.0 {
        QuakeSeverity::Major
    } else if magnitude >= 6.0 {
        QuakeSeverity::Strong
    } else if magnitude >= 5.0 {
        QuakeSeverity::Moderate
    } else if magnitude >= 4.0 {
        QuakeSeverity::Light
    } else if magnitude >= 3.0 {
        QuakeSeverity::Minor
    } else {
        QuakeSeverity::Micro
    }
}

/// Magnitude 5.0 or above.
pub fn is_dangerous(quake: &QuakeObservation) -> bool {
    quake.magnitude.map(|m| m >= 5.0).unwrap_or(false)
}

/// Magnitude 7.0 or above.
pub fn is_catastrophic(quake: &QuakeObservation) -> bool {
    quake.magnitude.map(|m| m >= 7.0).unwrap_or(false)
}

/// Hypocenter shallower than 70 km. Shallow events cause more surface
/// damage at equal magnitude.
pub fn is_shallow(quake: &QuakeObservation) -> bool {
    quake.depth_km.map(|d| d < 70.0).unwrap_or(false)
}

/// Tsunami risk score on a 0–100 scale.
///
/// Factors: magnitude (+50 at M7.5, +30 at M6.5), shallow depth (+25
/// under 30 km, +15 under 70 km), and the upstream tsunami warning flag
/// (+25). The sum clamps to 100. Events missing magnitude or depth score
/// zero — the score expresses positive evidence, not uncertainty.
pub fn tsunami_risk_score(quake: &QuakeObservation) -> u8 {
    let (magnitude, depth_km) = match (quake.magnitude, quake.depth_km) {
        (Some(m), Some(d)) => (m, d),
        _ => return 0,
    };

    let mut risk: u32 = 0;

    if magnitude >= 7.5 {
        risk += 50;
    } else if magnitude >= 6.5 {
        risk += 30;
    }

    if depth_km < 30.0 {
        risk += 25;
    } else if depth_km < 70.0 {
        risk += 15;
    }

    if quake.tsunami_flag {
        risk += 25;
    }

    risk.min(100) as u8
}

// ---------------------------------------------------------------------------
// Flood severity
// ---------------------------------------------------------------------------

/// Flood severity tiers in strict ascending order. Ord follows the
/// declaration order, so `FloodSeverity::Minor < FloodSeverity::Major`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FloodSeverity {
    Normal,
    Action,
    Minor,
    Moderate,
    Major,
}

impl FloodSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            FloodSeverity::Normal => "NORMAL",
            FloodSeverity::Action => "ACTION",
            FloodSeverity::Minor => "MINOR",
            FloodSeverity::Moderate => "MODERATE",
            FloodSeverity::Major => "MAJOR",
        }
    }
}

/// Classifies a water level against its station's flood stage thresholds,
/// checking from most severe downward; the first stage the level reaches
/// wins. Stages the station does not define are skipped. A station with no
/// thresholds, or a reading with no level, is NORMAL.
pub fn flood_severity(reading: &WaterLevelObservation) -> FloodSeverity {
    let level = match reading.water_level_ft {
        Some(level) => level,
        None => return FloodSeverity::Normal,
    };

    let reaches = |stage: Option<f64>| stage.map(|s| level >= s).unwrap_or(false);

    if reaches(reading.major_flood_stage_ft) {
        FloodSeverity::Major
    } else if reaches(reading.moderate_flood_stage_ft) {
        FloodSeverity::Moderate
    } else if reaches(reading.minor_flood_stage_ft) {
        FloodSeverity::Minor
    } else if reaches(reading.action_stage_ft) {
        FloodSeverity::Action
    } else {
        FloodSeverity::Normal
    }
}

/// Any stage above NORMAL counts as flooding.
pub fn is_flooding(reading: &WaterLevelObservation) -> bool {
    flood_severity(reading) != FloodSeverity::Normal
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WaterProvider;
    use chrono::{TimeZone, Utc};

    fn quake_with(magnitude: Option<f64>, depth_km: Option<f64>, tsunami_flag: bool) -> QuakeObservation {
        QuakeObservation {
            event_id: "us7000test".to_string(),
            magnitude,
            magnitude_type: None,
            depth_km,
            latitude: 38.0,
            longitude: 142.0,
            event_time: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            place: "test".to_string(),
            region: "test".to_string(),
            tsunami_flag,
            alert_level: None,
            significance: None,
            felt_reports: None,
            network: None,
            event_url: None,
            raw_payload: "{}".to_string(),
            collected_at: Utc::now(),
        }
    }

    fn reading_with(level_ft: Option<f64>, stages: [Option<f64>; 4]) -> WaterLevelObservation {
        let observed = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        WaterLevelObservation {
            station_id: "01646500".to_string(),
            station_name: "test gauge".to_string(),
            provider: WaterProvider::UsgsWater,
            latitude: None,
            longitude: None,
            observed_at: observed,
            water_level_ft: level_ft,
            water_level_m: None,
            datum: None,
            discharge_cfs: None,
            gage_height_ft: level_ft,
            action_stage_ft: stages[0],
            minor_flood_stage_ft: stages[1],
            moderate_flood_stage_ft: stages[2],
            major_flood_stage_ft: stages[3],
            quality_code: None,
            raw_payload: "{}".to_string(),
            collected_at: observed,
        }
    }

    // --- Severity tiers -------------------------------------------------------

    #[test]
    fn test_severity_boundaries_are_inclusive_on_lower_bound() {
        let cases = [
            (8.0, QuakeSeverity::Great),
            (7.9, QuakeSeverity::Major),
            (7.0, QuakeSeverity::Major),
            (6.0, QuakeSeverity::Strong),
            (5.0, QuakeSeverity::Moderate),
            (4.0, QuakeSeverity::Light),
            (3.0, QuakeSeverity::Minor),
            (2.9, QuakeSeverity::Micro),
            (0.0, QuakeSeverity::Micro),
        ];
        for (magnitude, expected) in cases {
            assert_eq!(
                quake_severity(&quake_with(Some(magnitude), Some(10.0), false)),
                expected,
                "M{} should classify as {:?}",
                magnitude,
                expected
            );
        }
    }

    #[test]
    fn test_absent_magnitude_classifies_unknown() {
        assert_eq!(
            quake_severity(&quake_with(None, Some(10.0), false)),
            QuakeSeverity::Unknown
        );
    }

    #[test]
    fn test_danger_flags_at_magnitude_thresholds() {
        assert!(is_dangerous(&quake_with(Some(5.0), None, false)));
        assert!(!is_dangerous(&quake_with(Some(4.9), None, false)));
        assert!(is_catastrophic(&quake_with(Some(7.0), None, false)));
        assert!(!is_catastrophic(&quake_with(Some(6.9), None, false)));
        assert!(is_shallow(&quake_with(Some(5.0), Some(69.9), false)));
        assert!(!is_shallow(&quake_with(Some(5.0), Some(70.0), false)));
        assert!(!is_dangerous(&quake_with(None, None, false)), "no magnitude, no danger call");
    }

    // --- Tsunami risk ---------------------------------------------------------

    #[test]
    fn test_tsunami_score_maximum_case_clamps_to_100() {
        // M8.0, 10 km deep, warning flag: 50 + 25 + 25 = 100.
        let quake = quake_with(Some(8.0), Some(10.0), true);
        assert_eq!(tsunami_risk_score(&quake), 100);
    }

    #[test]
    fn test_tsunami_score_component_sums() {
        // M6.2 at 20 km: no magnitude points (below 6.5), +25 shallow.
        assert_eq!(tsunami_risk_score(&quake_with(Some(6.2), Some(20.0), false)), 25);
        // M6.5 at 20 km: 30 + 25 = 55.
        assert_eq!(tsunami_risk_score(&quake_with(Some(6.5), Some(20.0), false)), 55);
        // M7.5 at 50 km: 50 + 15 = 65.
        assert_eq!(tsunami_risk_score(&quake_with(Some(7.5), Some(50.0), false)), 65);
        // M7.5 at 80 km: 50, no depth contribution.
        assert_eq!(tsunami_risk_score(&quake_with(Some(7.5), Some(80.0), false)), 50);
        // Flag alone on a small deep quake: 25.
        assert_eq!(tsunami_risk_score(&quake_with(Some(4.0), Some(100.0), true)), 25);
    }

    #[test]
    fn test_tsunami_score_monotone_in_magnitude_and_depth() {
        // Non-decreasing in magnitude at fixed depth.
        let mut last = 0;
        for magnitude in [4.0, 6.5, 6.9, 7.5, 8.5] {
            let score = tsunami_risk_score(&quake_with(Some(magnitude), Some(25.0), false));
            assert!(
                score >= last,
                "score must not decrease as magnitude rises (M{} -> {})",
                magnitude,
                score
            );
            last = score;
        }
        // Non-increasing in depth at fixed magnitude.
        let mut last = 100;
        for depth in [10.0, 29.9, 30.0, 69.9, 70.0, 300.0] {
            let score = tsunami_risk_score(&quake_with(Some(7.6), Some(depth), false));
            assert!(
                score <= last,
                "score must not increase as depth grows ({} km -> {})",
                depth,
                score
            );
            last = score;
        }
    }

    #[test]
    fn test_tsunami_score_zero_without_magnitude_or_depth() {
        assert_eq!(tsunami_risk_score(&quake_with(None, Some(10.0), true)), 0);
        assert_eq!(tsunami_risk_score(&quake_with(Some(8.0), None, true)), 0);
    }

    // --- Flood severity -------------------------------------------------------

    #[test]
    fn test_flood_severity_first_match_from_most_severe_wins() {
        // Level 12.0 with action=8, minor=10, moderate=12, major=15.
        let reading = reading_with(Some(12.0), [Some(8.0), Some(10.0), Some(12.0), Some(15.0)]);
        assert_eq!(flood_severity(&reading), FloodSeverity::Moderate);
    }

    #[test]
    fn test_flood_severity_below_all_stages_is_normal() {
        let reading = reading_with(Some(5.0), [Some(8.0), Some(10.0), Some(12.0), Some(15.0)]);
        assert_eq!(flood_severity(&reading), FloodSeverity::Normal);
        assert!(!is_flooding(&reading));
    }

    #[test]
    fn test_flood_severity_skips_undefined_stages() {
        // Only a major stage is defined; a level between would-be minor and
        // major must not match the absent stages.
        let reading = reading_with(Some(12.0), [None, None, None, Some(15.0)]);
        assert_eq!(flood_severity(&reading), FloodSeverity::Normal);

        let above_major = reading_with(Some(16.0), [None, None, None, Some(15.0)]);
        assert_eq!(flood_severity(&above_major), FloodSeverity::Major);
    }

    #[test]
    fn test_flood_severity_without_thresholds_is_normal() {
        let reading = reading_with(Some(40.0), [None, None, None, None]);
        assert_eq!(flood_severity(&reading), FloodSeverity::Normal);
    }

    #[test]
    fn test_flood_severity_without_level_is_normal() {
        let reading = reading_with(None, [Some(8.0), Some(10.0), Some(12.0), Some(15.0)]);
        assert_eq!(flood_severity(&reading), FloodSeverity::Normal);
    }

    #[test]
    fn test_flood_severity_ordering_is_total() {
        use FloodSeverity::*;
        let tiers = [Normal, Action, Minor, Moderate, Major];
        for pair in tiers.windows(2) {
            assert!(pair[0] < pair[1], "{:?} must order below {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_action_stage_boundary_is_inclusive() {
        let reading = reading_with(Some(8.0), [Some(8.0), Some(10.0), None, None]);
        assert_eq!(flood_severity(&reading), FloodSeverity::Action);
        assert!(is_flooding(&reading));
    }
}
