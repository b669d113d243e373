/// Test fixtures: representative JSON payloads from each upstream provider.
///
/// These fixtures are structurally complete but truncated to the minimum
/// needed to exercise the parsers. They reflect the real response envelopes
/// returned by:
///   https://earthquake.usgs.gov/fdsnws/event/1/query?format=geojson
///   https://api.tidesandcurrents.noaa.gov/api/prod/datagetter
///   https://waterservices.usgs.gov/nwis/iv/?format=json
///   https://services.swpc.noaa.gov/json/planetary_k_index_1m.json
///   https://api.nasa.gov/DONKI/CME
///
/// Provider quirks preserved here on purpose: USGS IV measurement values
/// are JSON strings (with -999999 as a missing-data sentinel), NOAA CO-OPS
/// serializes coordinates as strings and reports GMT timestamps with no
/// offset, and DONKI omits `cmeAnalyses` until an event has been analyzed.

// ---------------------------------------------------------------------------
// USGS FDSN earthquake catalog
// ---------------------------------------------------------------------------

/// Two valid events: an M6.2 near Tokyo (shallow, no tsunami flag) and an
/// M4.0 in California. Epoch-millisecond times; coordinates [lon, lat, depth].
pub(crate) fn fixture_quake_batch_json() -> &'static str {
    r#"{
      "type": "FeatureCollection",
      "metadata": { "generated": 1714565000000, "count": 2, "status": 200 },
      "features": [
        {
          "type": "Feature",
          "id": "us7000abcd",
          "properties": {
            "mag": 6.2,
            "magType": "mww",
            "place": "23 km SW of Tokyo, Japan",
            "time": 1714564800000,
            "updated": 1714564900000,
            "url": "https://earthquake.usgs.gov/earthquakes/eventpage/us7000abcd",
            "felt": 1240,
            "cdi": 6.1,
            "mmi": 5.8,
            "alert": "yellow",
            "sig": 592,
            "net": "us",
            "tsunami": 0
          },
          "geometry": { "type": "Point", "coordinates": [139.9, 35.4, 20.0] }
        },
        {
          "type": "Feature",
          "id": "nc73900000",
          "properties": {
            "mag": 4.0,
            "magType": "md",
            "place": "7 km NW of The Geysers, CA",
            "time": 1714561200000,
            "updated": 1714561300000,
            "url": "https://earthquake.usgs.gov/earthquakes/eventpage/nc73900000",
            "felt": 86,
            "alert": null,
            "sig": 246,
            "net": "nc",
            "tsunami": 0
          },
          "geometry": { "type": "Point", "coordinates": [-122.84, 38.82, 2.7] }
        }
      ]
    }"#
}

/// A great-magnitude subduction event with the upstream tsunami flag set.
pub(crate) fn fixture_quake_tsunami_json() -> &'static str {
    r#"{
      "type": "FeatureCollection",
      "metadata": { "count": 1, "status": 200 },
      "features": [
        {
          "type": "Feature",
          "id": "us6000tsun",
          "properties": {
            "mag": 8.1,
            "magType": "mww",
            "place": "120 km E of Sendai, Japan",
            "time": 1714560000000,
            "url": "https://earthquake.usgs.gov/earthquakes/eventpage/us6000tsun",
            "alert": "red",
            "sig": 1840,
            "net": "us",
            "tsunami": 1
          },
          "geometry": { "type": "Point", "coordinates": [142.5, 38.1, 25.0] }
        }
      ]
    }"#
}

/// One feature with no geometry (field-level failure, must be skipped) and
/// one fully valid feature. Exercises per-element partial-failure tolerance.
pub(crate) fn fixture_quake_partial_json() -> &'static str {
    r#"{
      "type": "FeatureCollection",
      "metadata": { "count": 2, "status": 200 },
      "features": [
        {
          "type": "Feature",
          "id": "usbrokenev",
          "properties": {
            "mag": 5.1,
            "place": "somewhere",
            "time": 1714560000000,
            "tsunami": 0
          }
        },
        {
          "type": "Feature",
          "id": "nc73900000",
          "properties": {
            "mag": 4.0,
            "magType": "md",
            "place": "7 km NW of The Geysers, CA",
            "time": 1714561200000,
            "net": "nc",
            "tsunami": 0
          },
          "geometry": { "type": "Point", "coordinates": [-122.84, 38.82, 2.7] }
        }
      ]
    }"#
}

/// A very fresh event for which USGS has not yet assigned a magnitude.
pub(crate) fn fixture_quake_no_magnitude_json() -> &'static str {
    r#"{
      "type": "FeatureCollection",
      "metadata": { "count": 1, "status": 200 },
      "features": [
        {
          "type": "Feature",
          "id": "ak024fresh",
          "properties": {
            "mag": null,
            "place": "58 km W of Anchor Point, Alaska",
            "time": 1714564500000,
            "net": "ak",
            "tsunami": 0
          },
          "geometry": { "type": "Point", "coordinates": [-152.7, 59.7, 60.1] }
        }
      ]
    }"#
}

// ---------------------------------------------------------------------------
// NOAA CO-OPS tides
// ---------------------------------------------------------------------------

/// Latest water level at The Battery, NY. Note the string-typed
/// coordinates and the GMT timestamp without an offset.
pub(crate) fn fixture_tides_battery_json() -> &'static str {
    r#"{
      "metadata": {
        "id": "8518750",
        "name": "The Battery",
        "lat": "40.7006",
        "lon": "-74.0142"
      },
      "data": [
        { "t": "2024-05-01 12:06", "v": "1.527", "s": "0.003", "f": "1,0,0,0", "q": "p" }
      ]
    }"#
}

/// NOAA reports unknown stations as a 200 response carrying an error
/// object instead of data.
pub(crate) fn fixture_tides_error_json() -> &'static str {
    r#"{
      "error": {
        "message": "No station found for station id: 9999999"
      }
    }"#
}

// ---------------------------------------------------------------------------
// USGS NWIS IV (river gauges)
// ---------------------------------------------------------------------------

/// Potomac at Little Falls with both gage height and discharge series.
pub(crate) fn fixture_river_potomac_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [
          {
            "sourceInfo": {
              "siteName": "POTOMAC RIVER NEAR WASH, DC LITTLE FALLS PUMP STA",
              "siteCode": [{ "value": "01646500", "network": "NWIS", "agencyCode": "USGS" }],
              "geoLocation": {
                "geogLocation": { "srs": "EPSG:4326", "latitude": 38.94977, "longitude": -77.12763 }
              }
            },
            "variable": {
              "variableCode": [{ "value": "00065", "network": "NWIS" }],
              "variableName": "Gage height, ft",
              "unit": { "unitCode": "ft" },
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "3.48", "qualifiers": ["P"], "dateTime": "2024-05-01T12:00:00.000-04:00" }
              ],
              "qualifier": [{ "qualifierCode": "P", "qualifierDescription": "Provisional data subject to revision." }]
            }]
          },
          {
            "sourceInfo": {
              "siteName": "POTOMAC RIVER NEAR WASH, DC LITTLE FALLS PUMP STA",
              "siteCode": [{ "value": "01646500", "network": "NWIS", "agencyCode": "USGS" }],
              "geoLocation": {
                "geogLocation": { "srs": "EPSG:4326", "latitude": 38.94977, "longitude": -77.12763 }
              }
            },
            "variable": {
              "variableCode": [{ "value": "00060", "network": "NWIS" }],
              "variableName": "Streamflow, ft&#179;/s",
              "unit": { "unitCode": "ft3/s" },
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "11200", "qualifiers": ["P"], "dateTime": "2024-05-01T12:00:00.000-04:00" }
              ],
              "qualifier": []
            }]
          }
        ]
      }
    }"#
}

/// Two sites in one response: Potomac (stage) then James River (stage).
/// Tests multi-site parsing and upstream ordering.
pub(crate) fn fixture_river_multi_site_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [
          {
            "sourceInfo": {
              "siteName": "POTOMAC RIVER NEAR WASH, DC LITTLE FALLS PUMP STA",
              "siteCode": [{ "value": "01646500", "network": "NWIS" }]
            },
            "variable": {
              "variableCode": [{ "value": "00065", "network": "NWIS" }],
              "unit": { "unitCode": "ft" },
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "3.48", "qualifiers": ["P"], "dateTime": "2024-05-01T12:00:00.000-04:00" }
              ],
              "qualifier": []
            }]
          },
          {
            "sourceInfo": {
              "siteName": "JAMES RIVER AND KANAWHA CANAL NR RICHMOND, VA",
              "siteCode": [{ "value": "02035000", "network": "NWIS" }]
            },
            "variable": {
              "variableCode": [{ "value": "00065", "network": "NWIS" }],
              "unit": { "unitCode": "ft" },
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "4.10", "qualifiers": ["P"], "dateTime": "2024-05-01T11:45:00.000-04:00" }
              ],
              "qualifier": []
            }]
          }
        ]
      }
    }"#
}

/// A site reporting the USGS sentinel value -999999 — a timestamp is
/// present but the measurement is explicitly missing. Must be treated as
/// no data, not as a reading of -999999 ft.
pub(crate) fn fixture_river_sentinel_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [
          {
            "sourceInfo": {
              "siteName": "BUFFALO BAYOU AT HOUSTON, TX",
              "siteCode": [{ "value": "08074000", "network": "NWIS" }]
            },
            "variable": {
              "variableCode": [{ "value": "00065", "network": "NWIS" }],
              "unit": { "unitCode": "ft" },
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "-999999", "qualifiers": ["P"], "dateTime": "2024-05-01T12:00:00.000-05:00" }
              ],
              "qualifier": []
            }]
          }
        ]
      }
    }"#
}

/// A site with an empty value array — sensor outage or data gap.
pub(crate) fn fixture_river_empty_values_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [
          {
            "sourceInfo": {
              "siteName": "CEDAR RIVER AT RENTON, WA",
              "siteCode": [{ "value": "12113390", "network": "NWIS" }]
            },
            "variable": {
              "variableCode": [{ "value": "00065", "network": "NWIS" }],
              "unit": { "unitCode": "ft" },
              "noDataValue": -999999.0
            },
            "values": [{ "value": [], "qualifier": [] }]
          }
        ]
      }
    }"#
}

/// Valid stage series plus a discharge series whose value is not numeric.
/// The batch must survive with stage only.
pub(crate) fn fixture_river_partial_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [
          {
            "sourceInfo": {
              "siteName": "POTOMAC RIVER NEAR WASH, DC LITTLE FALLS PUMP STA",
              "siteCode": [{ "value": "01646500", "network": "NWIS" }]
            },
            "variable": {
              "variableCode": [{ "value": "00065", "network": "NWIS" }],
              "unit": { "unitCode": "ft" },
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "3.48", "qualifiers": ["P"], "dateTime": "2024-05-01T12:00:00.000-04:00" }
              ],
              "qualifier": []
            }]
          },
          {
            "sourceInfo": {
              "siteName": "POTOMAC RIVER NEAR WASH, DC LITTLE FALLS PUMP STA",
              "siteCode": [{ "value": "01646500", "network": "NWIS" }]
            },
            "variable": {
              "variableCode": [{ "value": "00060", "network": "NWIS" }],
              "unit": { "unitCode": "ft3/s" },
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "Ice", "qualifiers": ["P", "e"], "dateTime": "2024-05-01T12:00:00.000-04:00" }
              ],
              "qualifier": []
            }]
          }
        ]
      }
    }"#
}

// ---------------------------------------------------------------------------
// NOAA SWPC planetary Kp index
// ---------------------------------------------------------------------------

/// Three Kp samples: measured + estimated, measured only, estimated only.
pub(crate) fn fixture_kp_index_json() -> &'static str {
    r#"[
      { "time_tag": "2024-05-01T12:00:00", "kp_index": 5.33, "estimated_kp": 5.0, "kp": "5P" },
      { "time_tag": "2024-05-01T12:01:00", "kp_index": 4.0, "kp": "4O" },
      { "time_tag": "2024-05-01T12:02:00", "estimated_kp": 2.67, "kp": "3M" }
    ]"#
}

// ---------------------------------------------------------------------------
// NASA DONKI CME
// ---------------------------------------------------------------------------

/// Two valid CME activities (one analyzed, one not yet) plus a malformed
/// entry with no activityID that parsers must skip.
pub(crate) fn fixture_cme_json() -> &'static str {
    r#"[
      {
        "activityID": "2024-05-01T12:24:00-CME-001",
        "catalog": "M2M_CATALOG",
        "startTime": "2024-05-01T12:24Z",
        "sourceLocation": "N15W30",
        "note": "Halo CME observed in LASCO C2/C3.",
        "cmeAnalyses": [
          { "speed": 1250.0, "type": "R", "isMostAccurate": true, "halfAngle": 45.0 }
        ]
      },
      {
        "activityID": "2024-05-02T03:12:00-CME-001",
        "catalog": "M2M_CATALOG",
        "startTime": "2024-05-02T03:12Z",
        "sourceLocation": "S05E12",
        "note": "Narrow CME, analysis pending.",
        "cmeAnalyses": []
      },
      {
        "catalog": "M2M_CATALOG",
        "startTime": "2024-05-02T09:00Z",
        "note": "Entry missing its activityID."
      }
    ]"#
}
