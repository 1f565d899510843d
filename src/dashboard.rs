//! Presentation glue for the dashboard page.
//!
//! Renders the single-page UI (sliders, update button, auto-refresh toggle,
//! Leaflet map with colored markers and a legend, per-zone alert cards,
//! summary metrics, probability bar chart) and computes the summary shown in
//! the sidebar. All risk semantics live in `risk` and `session`; this module
//! only shapes what the browser sees.

use serde::Serialize;

use crate::model::{
    RiskAssessment, RiskLevel, DEFAULT_DISPLACEMENT_MM, DEFAULT_RAINFALL_MM,
    DEFAULT_STRAIN_MM_PER_M, DISPLACEMENT_RANGE_MM, RAINFALL_RANGE_MM, STRAIN_RANGE_MM_PER_M,
};

// ---------------------------------------------------------------------------
// Map framing
// ---------------------------------------------------------------------------

/// Initial map view covering all four zones.
pub const MAP_CENTER: (f64, f64) = (28.515, 77.015);
pub const MAP_ZOOM: u8 = 14;
/// Circle marker radius in pixels.
pub const MARKER_RADIUS: u8 = 15;

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// Sidebar summary over one assessment set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskSummary {
    pub low_zones: usize,
    pub medium_zones: usize,
    pub high_zones: usize,
    /// Zone with the highest probability; ties resolve to registry order.
    pub highest_zone: Option<String>,
    pub highest_probability: Option<u8>,
}

/// Counts zones per level and picks the highest-risk zone.
pub fn summarize(assessments: &[RiskAssessment]) -> RiskSummary {
    let mut summary = RiskSummary {
        low_zones: 0,
        medium_zones: 0,
        high_zones: 0,
        highest_zone: None,
        highest_probability: None,
    };

    for assessment in assessments {
        match assessment.level {
            RiskLevel::Low => summary.low_zones += 1,
            RiskLevel::Medium => summary.medium_zones += 1,
            RiskLevel::High => summary.high_zones += 1,
        }
        if summary.highest_probability.is_none_or(|p| assessment.probability > p) {
            summary.highest_probability = Some(assessment.probability);
            summary.highest_zone = Some(assessment.zone.clone());
        }
    }

    summary
}

// ---------------------------------------------------------------------------
// Page template
// ---------------------------------------------------------------------------

/// Fills the slider ranges, defaults, and map framing into the page
/// template. The page itself drives `/assess` from the browser.
pub fn render_page() -> String {
    PAGE_TEMPLATE
        .replace("__RAINFALL_MAX__", &format!("{}", RAINFALL_RANGE_MM.1))
        .replace("__RAINFALL_DEFAULT__", &format!("{}", DEFAULT_RAINFALL_MM))
        .replace("__DISPLACEMENT_MAX__", &format!("{}", DISPLACEMENT_RANGE_MM.1))
        .replace("__DISPLACEMENT_DEFAULT__", &format!("{}", DEFAULT_DISPLACEMENT_MM))
        .replace("__STRAIN_MAX__", &format!("{}", STRAIN_RANGE_MM_PER_M.1))
        .replace("__STRAIN_DEFAULT__", &format!("{}", DEFAULT_STRAIN_MM_PER_M))
        .replace("__MAP_LAT__", &format!("{}", MAP_CENTER.0))
        .replace("__MAP_LON__", &format!("{}", MAP_CENTER.1))
        .replace("__MAP_ZOOM__", &format!("{}", MAP_ZOOM))
        .replace("__MARKER_RADIUS__", &format!("{}", MARKER_RADIUS))
}

const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Rockfall Risk Dashboard</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
  <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
  <style>
    body { margin: 0; font-family: system-ui, sans-serif; background: #f4f4f2; }
    header { padding: 12px 20px; background: #2b2b2b; color: #fff; }
    header h1 { margin: 0; font-size: 20px; }
    .layout { display: flex; gap: 16px; padding: 16px; }
    .sidebar { width: 300px; background: #fff; border-radius: 8px; padding: 16px; }
    .content { flex: 1; min-width: 0; }
    .sidebar label { display: block; margin-top: 12px; font-size: 14px; }
    .sidebar input[type=range] { width: 100%; }
    .sidebar .value { float: right; color: #555; }
    button#update { margin-top: 16px; width: 100%; padding: 8px; }
    .toggle { margin-top: 12px; font-size: 14px; }
    #map { height: 420px; border-radius: 8px; }
    .legend { position: absolute; bottom: 24px; left: 24px; z-index: 999;
              width: 120px; border: 2px solid grey; font-size: 14px;
              background: #fff; padding: 10px; border-radius: 4px; }
    .cards { display: flex; gap: 12px; margin-top: 16px; flex-wrap: wrap; }
    .card { flex: 1; min-width: 140px; background: #fff; border-radius: 8px;
            padding: 12px; border-left: 6px solid #ccc; }
    .card.Low { border-left-color: green; }
    .card.Medium { border-left-color: orange; }
    .card.High { border-left-color: red; }
    .metrics { margin-top: 16px; font-size: 14px; }
    .chart { margin-top: 16px; background: #fff; border-radius: 8px; padding: 12px; }
    .bar-row { display: flex; align-items: center; margin: 6px 0; }
    .bar-row span { width: 70px; font-size: 13px; }
    .bar { height: 18px; border-radius: 3px; }
    #status { margin-top: 12px; font-size: 12px; color: #777; }
  </style>
</head>
<body>
  <header><h1>🪨 Rockfall Risk Dashboard</h1></header>
  <div class="layout">
    <div class="sidebar">
      <h3>Sensor Inputs</h3>
      <label>Rainfall (mm) <span class="value" id="rainfall-value"></span>
        <input type="range" id="rainfall" min="0" max="__RAINFALL_MAX__" step="1"
               value="__RAINFALL_DEFAULT__" />
      </label>
      <label>Displacement (mm) <span class="value" id="displacement-value"></span>
        <input type="range" id="displacement" min="0" max="__DISPLACEMENT_MAX__" step="1"
               value="__DISPLACEMENT_DEFAULT__" />
      </label>
      <label>Strain (mm/m) <span class="value" id="strain-value"></span>
        <input type="range" id="strain" min="0" max="__STRAIN_MAX__" step="0.1"
               value="__STRAIN_DEFAULT__" />
      </label>
      <button id="update">Update Risk</button>
      <div class="toggle">
        <label><input type="checkbox" id="auto" /> Auto-refresh</label>
      </div>
      <div class="metrics" id="metrics"></div>
      <div id="status"></div>
    </div>
    <div class="content">
      <div style="position: relative;">
        <div id="map"></div>
        <div class="legend">
          <b>Risk Legend</b><br>
          <i style="color:green">&#9679; Low</i><br>
          <i style="color:orange">&#9679; Medium</i><br>
          <i style="color:red">&#9679; High</i>
        </div>
      </div>
      <div class="cards" id="cards"></div>
      <div class="chart" id="chart"><h3>Probability by Zone</h3><div id="bars"></div></div>
    </div>
  </div>
  <script>
    const map = L.map('map').setView([__MAP_LAT__, __MAP_LON__], __MAP_ZOOM__);
    L.tileLayer('https://tile.openstreetmap.org/{z}/{x}/{y}.png', {
      attribution: '&copy; OpenStreetMap contributors'
    }).addTo(map);
    const markerLayer = L.layerGroup().addTo(map);

    const sliders = ['rainfall', 'displacement', 'strain'];
    let autoTimer = null;

    function showSliderValues() {
      for (const id of sliders) {
        document.getElementById(id + '-value').textContent =
          document.getElementById(id).value;
      }
    }

    async function renderPass(updateRequested) {
      const params = new URLSearchParams();
      for (const id of sliders) {
        params.set(id, document.getElementById(id).value);
      }
      if (updateRequested) params.set('update', '1');
      params.set('auto', document.getElementById('auto').checked ? '1' : '0');

      const response = await fetch('/assess?' + params.toString());
      if (!response.ok) return;
      draw(await response.json());
    }

    function draw(data) {
      markerLayer.clearLayers();
      for (const a of data.assessments) {
        L.circleMarker([a.latitude, a.longitude], {
          radius: __MARKER_RADIUS__,
          color: a.color,
          fillColor: a.color,
          fillOpacity: 0.8
        }).bindPopup(`${a.zone}: ${a.level} (${a.probability}%)`).addTo(markerLayer);
      }

      const cards = document.getElementById('cards');
      cards.innerHTML = '';
      for (const a of data.assessments) {
        const card = document.createElement('div');
        card.className = 'card ' + a.level;
        card.innerHTML = `<b>${a.zone}</b><br>${a.level} risk<br>${a.probability}%`;
        cards.appendChild(card);
      }

      const s = data.summary;
      document.getElementById('metrics').innerHTML =
        `<b>Summary</b><br>High: ${s.high_zones} &middot; Medium: ${s.medium_zones}` +
        ` &middot; Low: ${s.low_zones}<br>` +
        (s.highest_zone ? `Highest: ${s.highest_zone} (${s.highest_probability}%)` : '');

      const bars = document.getElementById('bars');
      bars.innerHTML = '';
      for (const a of data.assessments) {
        const row = document.createElement('div');
        row.className = 'bar-row';
        row.innerHTML = `<span>${a.zone}</span>` +
          `<div class="bar" style="width:${a.probability * 0.8}%;background:${a.color}"></div>` +
          `<span style="width:auto;margin-left:6px">${a.probability}%</span>`;
        bars.appendChild(row);
      }

      document.getElementById('status').textContent =
        `${data.evaluation} · last updated ${data.last_updated ?? 'never'}`;
    }

    for (const id of sliders) {
      document.getElementById(id).addEventListener('input', () => {
        showSliderValues();
        renderPass(false);
      });
    }
    document.getElementById('update').addEventListener('click', () => renderPass(true));
    document.getElementById('auto').addEventListener('change', (e) => {
      if (autoTimer) { clearInterval(autoTimer); autoTimer = null; }
      if (e.target.checked) autoTimer = setInterval(() => renderPass(false), 2000);
      renderPass(false);
    });

    showSliderValues();
    renderPass(false);
  </script>
</body>
</html>
"#;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment(zone: &str, probability: u8) -> RiskAssessment {
        RiskAssessment {
            zone: zone.to_string(),
            latitude: 28.5,
            longitude: 77.0,
            probability,
            level: RiskLevel::from_probability(probability),
        }
    }

    #[test]
    fn test_summary_counts_levels() {
        let summary = summarize(&[
            assessment("Zone 1", 20),
            assessment("Zone 2", 55),
            assessment("Zone 3", 55),
            assessment("Zone 4", 90),
        ]);
        assert_eq!(summary.low_zones, 1);
        assert_eq!(summary.medium_zones, 2);
        assert_eq!(summary.high_zones, 1);
    }

    #[test]
    fn test_summary_picks_highest_zone_first_on_tie() {
        let summary = summarize(&[
            assessment("Zone 1", 80),
            assessment("Zone 2", 80),
        ]);
        assert_eq!(summary.highest_zone.as_deref(), Some("Zone 1"));
        assert_eq!(summary.highest_probability, Some(80));
    }

    #[test]
    fn test_summary_of_empty_set_has_no_highest() {
        let summary = summarize(&[]);
        assert_eq!(summary.highest_zone, None);
        assert_eq!(summary.highest_probability, None);
        assert_eq!(summary.low_zones + summary.medium_zones + summary.high_zones, 0);
    }

    #[test]
    fn test_page_fills_every_template_token() {
        let page = render_page();
        assert!(!page.contains("__"), "unreplaced template token left in page");
    }

    #[test]
    fn test_page_carries_slider_ranges_and_defaults() {
        let page = render_page();
        assert!(page.contains(r#"max="200""#));
        assert!(page.contains(r#"max="50""#));
        assert!(page.contains(r#"max="5""#));
        assert!(page.contains(r#"value="50""#));
        assert!(page.contains(r#"value="10""#));
        assert!(page.contains(r#"value="1""#));
    }

    #[test]
    fn test_page_has_map_legend_and_controls() {
        let page = render_page();
        assert!(page.contains("leaflet"));
        assert!(page.contains("Risk Legend"));
        assert!(page.contains("Update Risk"));
        assert!(page.contains("Auto-refresh"));
        assert!(page.contains("Probability by Zone"));
    }
}
