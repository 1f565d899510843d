//! Classic Rockfall Dashboard - first-generation variant
//!
//! Self-contained predecessor of the main dashboard, kept as its own
//! binary rather than folded into the primary engine: it uses different
//! weights (base 20, rainfall 0.3, displacement 2, strain 5), applies no
//! per-zone sensitivity, and recomputes on every request instead of going
//! through the stale/fresh session cache. Only the zone registry and the
//! shared data types are common with the main dashboard.
//!
//! Usage:
//!   cargo run --release --bin classic_dashboard              # Port 8081
//!   cargo run --release --bin classic_dashboard -- --port N

use rockmon_service::model::{RiskAssessment, RiskLevel, SensorReading};
use rockmon_service::zones::ZONE_REGISTRY;
use std::env;

const DEFAULT_PORT: u16 = 8081;

// ---------------------------------------------------------------------------
// First-generation formula
// ---------------------------------------------------------------------------

const CLASSIC_BASE: i64 = 20;
const CLASSIC_RAINFALL_WEIGHT: f64 = 0.3;
const CLASSIC_DISPLACEMENT_WEIGHT: f64 = 2.0;
const CLASSIC_STRAIN_WEIGHT: f64 = 5.0;

/// Probability under the first-generation weights, clamped into [0, 100].
/// Every zone scores identically; this variant predates the sensitivity
/// multiplier.
fn classic_probability(reading: &SensorReading) -> u8 {
    let reading = reading.clamped();
    let raw = CLASSIC_BASE
        + (reading.rainfall_mm * CLASSIC_RAINFALL_WEIGHT).floor() as i64
        + (reading.displacement_mm * CLASSIC_DISPLACEMENT_WEIGHT).floor() as i64
        + (reading.strain_mm_per_m * CLASSIC_STRAIN_WEIGHT).floor() as i64;
    raw.clamp(0, 100) as u8
}

fn classic_assess_all(reading: &SensorReading) -> Vec<RiskAssessment> {
    let probability = classic_probability(reading);
    ZONE_REGISTRY
        .iter()
        .map(|zone| RiskAssessment {
            zone: zone.name.to_string(),
            latitude: zone.latitude,
            longitude: zone.longitude,
            probability,
            level: RiskLevel::from_probability(probability),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Query parsing
// ---------------------------------------------------------------------------

/// Parses `rainfall=50&displacement=10&strain=1`, falling back to the
/// slider defaults for anything missing or unparsable.
fn parse_query(query: &str) -> SensorReading {
    let mut reading = SensorReading::default();
    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        match key {
            "rainfall" => {
                if let Ok(v) = value.parse() {
                    reading.rainfall_mm = v;
                }
            }
            "displacement" => {
                if let Ok(v) = value.parse() {
                    reading.displacement_mm = v;
                }
            }
            "strain" => {
                if let Ok(v) = value.parse() {
                    reading.strain_mm_per_m = v;
                }
            }
            _ => {}
        }
    }
    reading
}

// ---------------------------------------------------------------------------
// HTTP server
// ---------------------------------------------------------------------------

fn start_server(port: u16) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    println!("📡 Classic dashboard listening on http://0.0.0.0:{}", port);
    println!("   GET /        - Dashboard page");
    println!("   GET /assess  - JSON risk assessment (recomputed every call)\n");

    for request in server.incoming_requests() {
        let url = request.url().to_string();

        let response = if url == "/" || url == "/index.html" {
            html_response(PAGE.to_string())
        } else if url == "/assess" || url.starts_with("/assess?") {
            let query = url.split_once('?').map(|(_, q)| q).unwrap_or("");
            let assessments = classic_assess_all(&parse_query(query));
            let zones: Vec<serde_json::Value> = assessments
                .iter()
                .map(|a| {
                    serde_json::json!({
                        "zone": a.zone,
                        "latitude": a.latitude,
                        "longitude": a.longitude,
                        "probability": a.probability,
                        "level": a.level.label(),
                        "color": a.level.marker_color(),
                    })
                })
                .collect();
            json_response(200, serde_json::json!({ "assessments": zones }))
        } else {
            json_response(
                404,
                serde_json::json!({
                    "error": "Not found",
                    "available_endpoints": ["/", "/assess"]
                }),
            )
        };

        if let Err(e) = request.respond(response) {
            eprintln!("Failed to send response: {}", e);
        }
    }

    Ok(())
}

fn json_response(
    status_code: u16,
    json: serde_json::Value,
) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_string_pretty(&json).unwrap();
    tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(status_code))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
        )
}

fn html_response(html: String) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    tiny_http::Response::from_data(html.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(200))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..])
                .unwrap(),
        )
}

fn main() {
    println!("🪨 Classic Rockfall Dashboard (first-generation weights)");
    println!("========================================================\n");

    let args: Vec<String> = env::args().collect();
    let mut port = DEFAULT_PORT;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                if i + 1 < args.len() {
                    match args[i + 1].parse() {
                        Ok(p) => port = p,
                        Err(_) => {
                            eprintln!("Error: --port requires a valid port number");
                            std::process::exit(1);
                        }
                    }
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--port PORT]", args[0]);
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = start_server(port) {
        eprintln!("\n❌ Server error: {}", e);
        std::process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

const PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Classic Rockfall Dashboard</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
  <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
  <style>
    body { margin: 0; font-family: system-ui, sans-serif; }
    .layout { display: flex; gap: 16px; padding: 16px; }
    .sidebar { width: 280px; }
    .sidebar label { display: block; margin-top: 12px; font-size: 14px; }
    .sidebar input[type=range] { width: 100%; }
    #map { height: 480px; flex: 1; }
    .legend { position: fixed; bottom: 50px; left: 50px; width: 120px;
              border: 2px solid grey; z-index: 9999; font-size: 14px;
              background-color: white; padding: 10px; }
    #zones li { margin: 4px 0; font-size: 14px; }
  </style>
</head>
<body>
  <div class="layout">
    <div class="sidebar">
      <h2>🪨 Rockfall Prediction</h2>
      <h3>Sensor Inputs</h3>
      <label>Rainfall (mm)
        <input type="range" id="rainfall" min="0" max="200" step="1" value="50" />
      </label>
      <label>Displacement (mm)
        <input type="range" id="displacement" min="0" max="50" step="1" value="10" />
      </label>
      <label>Strain (mm/m)
        <input type="range" id="strain" min="0" max="5" step="1" value="1" />
      </label>
      <button id="update">Update Risk</button>
      <ul id="zones"></ul>
    </div>
    <div id="map"></div>
  </div>
  <div class="legend">
    <b>Risk Legend</b><br>
    <i style="color:green">&#9679; Low</i><br>
    <i style="color:orange">&#9679; Medium</i><br>
    <i style="color:red">&#9679; High</i>
  </div>
  <script>
    const map = L.map('map').setView([28.515, 77.015], 14);
    L.tileLayer('https://tile.openstreetmap.org/{z}/{x}/{y}.png', {
      attribution: '&copy; OpenStreetMap contributors'
    }).addTo(map);
    const markerLayer = L.layerGroup().addTo(map);

    async function refresh() {
      const params = new URLSearchParams();
      for (const id of ['rainfall', 'displacement', 'strain']) {
        params.set(id, document.getElementById(id).value);
      }
      const response = await fetch('/assess?' + params.toString());
      if (!response.ok) return;
      const data = await response.json();

      markerLayer.clearLayers();
      const list = document.getElementById('zones');
      list.innerHTML = '';
      for (const a of data.assessments) {
        L.circleMarker([a.latitude, a.longitude], {
          radius: 15, color: a.color, fillColor: a.color, fillOpacity: 0.8
        }).bindPopup(`${a.zone}: ${a.level} (${a.probability}%)`).addTo(markerLayer);

        const item = document.createElement('li');
        item.innerHTML = `<b>${a.zone}</b>: ${a.level} (${a.probability}%)`;
        list.appendChild(item);
      }
    }

    document.getElementById('update').addEventListener('click', refresh);
    refresh();
  </script>
</body>
</html>
"#;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
