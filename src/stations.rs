/// Station registry for the hazard observation collection service.
///
/// Defines the canonical rosters of NOAA CO-OPS tide stations and USGS NWIS
/// river sites polled by this service, along with flood stage thresholds
/// where the NWS publishes them. This is the single source of truth for
/// station identifiers — other modules reference rosters from here rather
/// than hardcoding ids.

// ---------------------------------------------------------------------------
// USGS parameter codes (used in NWIS URL construction)
// ---------------------------------------------------------------------------

/// USGS parameter code for discharge (streamflow), in cubic feet per second.
pub const PARAM_DISCHARGE: &str = "00060";

/// USGS parameter code for gage height (stage), in feet.
pub const PARAM_STAGE: &str = "00065";

// ---------------------------------------------------------------------------
// Station metadata
// ---------------------------------------------------------------------------

/// NWS flood stage thresholds for a water-level station, in feet.
///
/// Stage levels in ascending order: action < minor < moderate < major.
/// Not every station has official thresholds; coastal stations in
/// particular often define only the lower stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloodStages {
    pub action_ft: Option<f64>,
    pub minor_ft: Option<f64>,
    pub moderate_ft: Option<f64>,
    pub major_ft: Option<f64>,
}

/// Metadata for one monitored water-level station (tide or river).
pub struct WaterStation {
    /// NOAA station id (7-digit) or USGS site code (8-digit).
    pub station_id: &'static str,
    pub name: &'static str,
    /// Flood stage thresholds, if the NWS defines them for this station.
    pub flood_stages: Option<FloodStages>,
}

// ---------------------------------------------------------------------------
// Tide station roster (NOAA CO-OPS)
// ---------------------------------------------------------------------------

/// Major US coastal stations monitored for tide levels, Atlantic coast
/// through the Gulf to the Pacific and islands.
///
/// Sources:
///   - Station ids: NOAA CO-OPS (tidesandcurrents.noaa.gov)
///   - Coastal flood thresholds: NWS coastal flood advisory criteria
pub static TIDE_STATIONS: &[WaterStation] = &[
    WaterStation {
        station_id: "8518750",
        name: "The Battery, NY",
        flood_stages: Some(FloodStages {
            action_ft: Some(4.9),
            minor_ft: Some(6.0),
            moderate_ft: Some(7.4),
            major_ft: Some(8.6),
        }),
    },
    WaterStation {
        station_id: "8454000",
        name: "Providence, RI",
        flood_stages: Some(FloodStages {
            action_ft: Some(5.0),
            minor_ft: Some(7.0),
            moderate_ft: Some(9.0),
            major_ft: Some(11.0),
        }),
    },
    WaterStation {
        station_id: "8575512",
        name: "Annapolis, MD",
        flood_stages: Some(FloodStages {
            action_ft: Some(1.9),
            minor_ft: Some(2.6),
            moderate_ft: Some(3.2),
            major_ft: Some(4.0),
        }),
    },
    WaterStation {
        station_id: "8638610",
        name: "Sewells Point, VA",
        flood_stages: Some(FloodStages {
            action_ft: Some(4.5),
            minor_ft: Some(5.3),
            moderate_ft: Some(6.5),
            major_ft: Some(8.0),
        }),
    },
    WaterStation {
        station_id: "8658120",
        name: "Wilmington, NC",
        flood_stages: None,
    },
    WaterStation {
        station_id: "8720218",
        name: "Mayport, FL",
        flood_stages: None,
    },
    WaterStation {
        station_id: "8726520",
        name: "St. Petersburg, FL",
        flood_stages: None,
    },
    WaterStation {
        station_id: "8761724",
        name: "Grand Isle, LA",
        flood_stages: Some(FloodStages {
            action_ft: Some(1.5),
            minor_ft: Some(2.0),
            moderate_ft: Some(3.0),
            major_ft: Some(4.0),
        }),
    },
    WaterStation {
        station_id: "8770570",
        name: "Sabine Pass North, TX",
        flood_stages: None,
    },
    WaterStation {
        station_id: "9414290",
        name: "San Francisco, CA",
        flood_stages: None,
    },
    WaterStation {
        station_id: "9447130",
        name: "Seattle, WA",
        flood_stages: None,
    },
    WaterStation {
        station_id: "1612340",
        name: "Honolulu, HI",
        flood_stages: None,
    },
    WaterStation {
        station_id: "9751364",
        name: "San Juan, PR",
        flood_stages: None,
    },
];

// ---------------------------------------------------------------------------
// River site roster (USGS NWIS)
// ---------------------------------------------------------------------------

/// Major river monitoring sites across the US.
///
/// Sources:
///   - Site codes: USGS NWIS (waterservices.usgs.gov)
///   - Flood stages: NWS Advanced Hydrologic Prediction Service
pub static RIVER_SITES: &[WaterStation] = &[
    WaterStation {
        station_id: "01646500",
        name: "Potomac River at Little Falls, DC",
        flood_stages: Some(FloodStages {
            action_ft: Some(5.0),
            minor_ft: Some(10.0),
            moderate_ft: Some(11.5),
            major_ft: Some(14.2),
        }),
    },
    WaterStation {
        station_id: "02035000",
        name: "James River at Richmond, VA",
        flood_stages: Some(FloodStages {
            action_ft: Some(9.0),
            minor_ft: Some(12.0),
            moderate_ft: Some(15.0),
            major_ft: Some(22.0),
        }),
    },
    WaterStation {
        station_id: "02089500",
        name: "Neuse River at Kinston, NC",
        flood_stages: Some(FloodStages {
            action_ft: Some(13.0),
            minor_ft: Some(14.0),
            moderate_ft: Some(18.0),
            major_ft: Some(21.0),
        }),
    },
    WaterStation {
        station_id: "02169500",
        name: "Congaree River at Columbia, SC",
        flood_stages: Some(FloodStages {
            action_ft: Some(15.0),
            minor_ft: Some(19.0),
            moderate_ft: Some(23.0),
            major_ft: Some(27.0),
        }),
    },
    WaterStation {
        station_id: "02228000",
        name: "Altamaha River at Doctortown, GA",
        flood_stages: None,
    },
    WaterStation {
        station_id: "07374000",
        name: "Mississippi River at Baton Rouge, LA",
        flood_stages: Some(FloodStages {
            action_ft: Some(30.0),
            minor_ft: Some(35.0),
            moderate_ft: Some(40.0),
            major_ft: Some(43.0),
        }),
    },
    WaterStation {
        station_id: "08074000",
        name: "Buffalo Bayou at Houston, TX",
        flood_stages: None,
    },
    WaterStation {
        station_id: "09380000",
        name: "Colorado River at Lees Ferry, AZ",
        flood_stages: None,
    },
    WaterStation {
        station_id: "11447650",
        name: "Sacramento River at Freeport, CA",
        flood_stages: None,
    },
    WaterStation {
        station_id: "12113390",
        name: "Cedar River at Renton, WA",
        flood_stages: None,
    },
    WaterStation {
        station_id: "01463500",
        name: "Delaware River at Trenton, NJ",
        flood_stages: Some(FloodStages {
            action_ft: Some(13.0),
            minor_ft: Some(20.0),
            moderate_ft: Some(23.0),
            major_ft: Some(25.0),
        }),
    },
    WaterStation {
        station_id: "03234500",
        name: "Scioto River at Columbus, OH",
        flood_stages: None,
    },
];

// ---------------------------------------------------------------------------
// Lookup helpers
// ---------------------------------------------------------------------------

/// Returns the station ids of all tide stations, suitable for the fan-out
/// coordinator's roster.
pub fn tide_station_ids() -> Vec<&'static str> {
    TIDE_STATIONS.iter().map(|s| s.station_id).collect()
}

/// Returns the site codes of all river sites.
pub fn river_site_ids() -> Vec<&'static str> {
    RIVER_SITES.iter().map(|s| s.station_id).collect()
}

/// Looks up a tide station by id. Returns `None` if not in the roster.
pub fn find_tide_station(station_id: &str) -> Option<&'static WaterStation> {
    TIDE_STATIONS.iter().find(|s| s.station_id == station_id)
}

/// Looks up a river site by code. Returns `None` if not in the roster.
pub fn find_river_site(site_code: &str) -> Option<&'static WaterStation> {
    RIVER_SITES.iter().find(|s| s.station_id == site_code)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
