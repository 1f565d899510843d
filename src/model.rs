//! Shared data types for the rockfall risk dashboard.
//!
//! The types here are deliberately small: one transient sensor reading, one
//! derived per-zone assessment, and the three-level risk classification.
//! Everything downstream (engine, session cache, JSON responses) is built
//! from these.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input ranges and slider defaults
// ---------------------------------------------------------------------------

/// Slider range for rainfall, in millimetres.
pub const RAINFALL_RANGE_MM: (f64, f64) = (0.0, 200.0);
/// Slider range for slope displacement, in millimetres.
pub const DISPLACEMENT_RANGE_MM: (f64, f64) = (0.0, 50.0);
/// Slider range for strain, in mm/m. Fractional values are meaningful here.
pub const STRAIN_RANGE_MM_PER_M: (f64, f64) = (0.0, 5.0);

/// Default slider positions shown on first page load.
pub const DEFAULT_RAINFALL_MM: f64 = 50.0;
pub const DEFAULT_DISPLACEMENT_MM: f64 = 10.0;
pub const DEFAULT_STRAIN_MM_PER_M: f64 = 1.0;

// ---------------------------------------------------------------------------
// Sensor reading
// ---------------------------------------------------------------------------

/// One set of simulated sensor inputs, supplied by the dashboard sliders on
/// each evaluation. Transient — never stored beyond the current render pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub rainfall_mm: f64,
    pub displacement_mm: f64,
    pub strain_mm_per_m: f64,
}

impl SensorReading {
    /// Returns a copy with every field clamped into its documented slider
    /// range. The UI pre-bounds its inputs, so this only matters for values
    /// arriving from outside the page (hand-edited query strings); those are
    /// clamped rather than rejected.
    pub fn clamped(self) -> Self {
        Self {
            rainfall_mm: self.rainfall_mm.clamp(RAINFALL_RANGE_MM.0, RAINFALL_RANGE_MM.1),
            displacement_mm: self
                .displacement_mm
                .clamp(DISPLACEMENT_RANGE_MM.0, DISPLACEMENT_RANGE_MM.1),
            strain_mm_per_m: self
                .strain_mm_per_m
                .clamp(STRAIN_RANGE_MM_PER_M.0, STRAIN_RANGE_MM_PER_M.1),
        }
    }
}

impl Default for SensorReading {
    fn default() -> Self {
        Self {
            rainfall_mm: DEFAULT_RAINFALL_MM,
            displacement_mm: DEFAULT_DISPLACEMENT_MM,
            strain_mm_per_m: DEFAULT_STRAIN_MM_PER_M,
        }
    }
}

// ---------------------------------------------------------------------------
// Risk classification
// ---------------------------------------------------------------------------

/// Categorical risk bucket derived from the numeric probability.
///
/// The three levels partition [0, 100] exactly: Low covers 0–40, Medium
/// 41–70, High 71–100. Boundary values belong to the lower bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classifies a clamped probability into its risk bucket.
    pub fn from_probability(probability: u8) -> Self {
        if probability > 70 {
            RiskLevel::High
        } else if probability > 40 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    /// Map marker and legend color for this level.
    pub fn marker_color(&self) -> &'static str {
        match self {
            RiskLevel::Low => "green",
            RiskLevel::Medium => "orange",
            RiskLevel::High => "red",
        }
    }
}

// ---------------------------------------------------------------------------
// Risk assessment
// ---------------------------------------------------------------------------

/// Risk result for a single zone. Derived data — the full set is recomputed
/// wholesale on each trigger, never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub zone: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Clamped into [0, 100].
    pub probability: u8,
    pub level: RiskLevel,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
