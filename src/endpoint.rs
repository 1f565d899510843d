//! HTTP endpoint serving the dashboard and its assessment API.
//!
//! One synchronous server loop in front of one `DashboardSession`: each
//! request is a full parse → policy → render pass with no suspension points
//! and no shared state beyond the session cache.
//!
//! Endpoints:
//! - GET /        - Dashboard page
//! - GET /assess  - JSON risk assessment driven through the update policy
//! - GET /health  - Service health check

use crate::config::SensitivityTable;
use crate::dashboard;
use crate::model::SensorReading;
use crate::session::{DashboardSession, Evaluation};

// ---------------------------------------------------------------------------
// Query parsing
// ---------------------------------------------------------------------------

/// Parsed `/assess` query string.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessQuery {
    pub reading: SensorReading,
    pub update_requested: bool,
    /// `Some` only when the request carries an `auto` parameter; the
    /// session's flag is left untouched otherwise.
    pub auto_refresh: Option<bool>,
}

/// Parses an `/assess` query string such as
/// `rainfall=50&displacement=10&strain=1.0&update=1&auto=0`.
///
/// Missing or unparsable slider parameters fall back to the documented
/// defaults; the UI pre-bounds its inputs, so a malformed value means a
/// hand-edited URL and the defaults are the least surprising answer.
/// Range clamping happens later, in the engine.
pub fn parse_assess_query(query: &str) -> AssessQuery {
    let mut reading = SensorReading::default();
    let mut update_requested = false;
    let mut auto_refresh = None;

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
            "update" => update_requested = value == "1" || value == "true",
            "auto" => auto_refresh = Some(value == "1" || value == "true"),
            _ => {}
        }
    }

    AssessQuery {
        reading,
        update_requested,
        auto_refresh,
    }
}

// ---------------------------------------------------------------------------
// Assessment response
// ---------------------------------------------------------------------------

/// Runs one render pass through the session and shapes the JSON body the
/// page consumes: per-zone assessments with marker colors, the sidebar
/// summary, and the freshness bookkeeping.
pub fn assess_payload(
    session: &mut DashboardSession,
    sensitivities: &SensitivityTable,
    query: &AssessQuery,
) -> serde_json::Value {
    if let Some(auto) = query.auto_refresh {
        session.set_auto_refresh(auto);
    }

    let (assessments, evaluation) =
        session.render_pass(&query.reading, sensitivities, query.update_requested);

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
    let summary = dashboard::summarize(assessments);

    serde_json::json!({
        "assessments": zones,
        "summary": summary,
        "evaluation": evaluation.label(),
        "auto_refresh": session.auto_refresh(),
        "last_updated": session.last_updated().map(|t| t.to_rfc3339()),
    })
}

// ---------------------------------------------------------------------------
// HTTP server
// ---------------------------------------------------------------------------

/// Starts the dashboard server on the specified port and serves requests
/// until the process exits. The session lives on this loop's stack and is
/// never handed to another thread.
pub fn start_dashboard_server(port: u16, sensitivities: SensitivityTable) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    println!("📡 Dashboard listening on http://0.0.0.0:{}", port);
    println!("   GET /        - Dashboard page");
    println!("   GET /assess  - JSON risk assessment");
    println!("   GET /health  - Service health check\n");

    let mut session = DashboardSession::new();

    for request in server.incoming_requests() {
        let url = request.url().to_string();

        let response = if url == "/" || url == "/index.html" {
            create_html_response(dashboard::render_page())
        } else if url == "/health" {
            handle_health()
        } else if url == "/assess" || url.starts_with("/assess?") {
            let query = url.split_once('?').map(|(_, q)| q).unwrap_or("");
            handle_assess(&mut session, &sensitivities, query)
        } else {
            create_response(
                404,
                serde_json::json!({
                    "error": "Not found",
                    "available_endpoints": ["/", "/assess", "/health"]
                }),
            )
        };

        if let Err(e) = request.respond(response) {
            eprintln!("Failed to send response: {}", e);
        }
    }

    Ok(())
}

/// Handle /assess
fn handle_assess(
    session: &mut DashboardSession,
    sensitivities: &SensitivityTable,
    query: &str,
) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let query = parse_assess_query(query);
    let payload = assess_payload(session, sensitivities, &query);

    if payload["evaluation"] == Evaluation::Computed.label() {
        let summary = &payload["summary"];
        println!(
            "🔄 Recomputed risk: {} high / {} medium / {} low",
            summary["high_zones"], summary["medium_zones"], summary["low_zones"]
        );
    }

    create_response(200, payload)
}

/// Handle /health
fn handle_health() -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    create_response(
        200,
        serde_json::json!({
            "status": "ok",
            "service": "rockmon_service",
            "version": "0.1.0"
        }),
    )
}

/// Create HTTP response with JSON body
fn create_response(
    status_code: u16,
    json: serde_json::Value,
) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_string_pretty(&json).unwrap();
    let bytes = body.into_bytes();

    tiny_http::Response::from_data(bytes)
        .with_status_code(tiny_http::StatusCode::from(status_code))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
        )
}

/// Create HTTP response with HTML body
fn create_html_response(html: String) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    tiny_http::Response::from_data(html.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(200))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..])
                .unwrap(),
        )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_query() {
        let query = parse_assess_query("rainfall=120&displacement=30&strain=2.5&update=1&auto=0");
        assert_eq!(query.reading.rainfall_mm, 120.0);
        assert_eq!(query.reading.displacement_mm, 30.0);
        assert_eq!(query.reading.strain_mm_per_m, 2.5);
        assert!(query.update_requested);
        assert_eq!(query.auto_refresh, Some(false));
    }

    #[test]
    fn test_empty_query_uses_slider_defaults() {
        let query = parse_assess_query("");
        assert_eq!(query.reading, SensorReading::default());
        assert!(!query.update_requested);
        assert_eq!(query.auto_refresh, None);
    }

    #[test]
    fn test_unparsable_value_falls_back_to_default() {
        let query = parse_assess_query("rainfall=lots&displacement=20");
        assert_eq!(query.reading.rainfall_mm, 50.0);
        assert_eq!(query.reading.displacement_mm, 20.0);
    }

    #[test]
    fn test_unknown_parameters_are_ignored() {
        let query = parse_assess_query("rainfall=10&zoom=14&theme=dark");
        assert_eq!(query.reading.rainfall_mm, 10.0);
    }

    #[test]
    fn test_assess_payload_shape() {
        let mut session = DashboardSession::new();
        let table = SensitivityTable::registry_defaults();
        let query = parse_assess_query("rainfall=50&displacement=10&strain=1.0");

        let payload = assess_payload(&mut session, &table, &query);

        let zones = payload["assessments"].as_array().expect("assessments array");
        assert_eq!(zones.len(), 4);
        assert_eq!(zones[0]["zone"], "Zone 1");
        assert_eq!(zones[0]["probability"], 53);
        assert_eq!(zones[0]["level"], "Medium");
        assert_eq!(zones[0]["color"], "orange");
        assert_eq!(payload["evaluation"], "computed");
        assert!(payload["last_updated"].is_string());
        assert_eq!(payload["summary"]["medium_zones"], 4);
    }

    #[test]
    fn test_second_identical_request_is_served_from_cache() {
        let mut session = DashboardSession::new();
        let table = SensitivityTable::registry_defaults();
        let query = parse_assess_query("rainfall=50&displacement=10&strain=1.0");

        let first = assess_payload(&mut session, &table, &query);
        let second = assess_payload(&mut session, &table, &query);

        assert_eq!(second["evaluation"], "cached");
        assert_eq!(second["assessments"], first["assessments"]);
        assert_eq!(second["last_updated"], first["last_updated"]);
    }

    #[test]
    fn test_auto_parameter_flips_session_flag() {
        let mut session = DashboardSession::new();
        let table = SensitivityTable::registry_defaults();

        let on = assess_payload(&mut session, &table, &parse_assess_query("auto=1"));
        assert_eq!(on["auto_refresh"], true);

        // No auto parameter: the flag keeps its previous value.
        let unchanged = assess_payload(&mut session, &table, &parse_assess_query("update=1"));
        assert_eq!(unchanged["auto_refresh"], true);
    }
}
