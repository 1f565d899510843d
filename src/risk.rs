//! Deterministic rockfall risk scoring engine.
//!
//! Maps one `SensorReading` and a per-zone sensitivity multiplier to a
//! clamped probability and a categorical level, for each registered zone.
//! Pure arithmetic with no hidden state; identical inputs always produce
//! identical output.
//!
//! Each weighted term is floored individually before summing, so the
//! probability moves in whole-point steps as a slider moves.

use crate::config::SensitivityTable;
use crate::model::{RiskAssessment, RiskLevel, SensorReading};
use crate::zones::{Zone, ZONE_REGISTRY};

// ---------------------------------------------------------------------------
// Formula constants
// ---------------------------------------------------------------------------

/// Baseline probability with all sensors at zero.
pub const BASE_PROBABILITY: i64 = 15;
/// Points per millimetre of rainfall (before sensitivity).
pub const RAINFALL_WEIGHT: f64 = 0.25;
/// Points per millimetre of displacement (before sensitivity).
pub const DISPLACEMENT_WEIGHT: f64 = 2.0;
/// Points per mm/m of strain (before sensitivity).
pub const STRAIN_WEIGHT: f64 = 6.0;

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Probability of rockfall for one zone, clamped into [0, 100].
///
/// The reading is range-clamped first, so out-of-range inputs degrade to
/// the nearest slider bound instead of skewing the score.
pub fn zone_probability(reading: &SensorReading, sensitivity: f64) -> u8 {
    let reading = reading.clamped();
    let raw = BASE_PROBABILITY
        + (reading.rainfall_mm * RAINFALL_WEIGHT * sensitivity).floor() as i64
        + (reading.displacement_mm * DISPLACEMENT_WEIGHT * sensitivity).floor() as i64
        + (reading.strain_mm_per_m * STRAIN_WEIGHT * sensitivity).floor() as i64;
    raw.clamp(0, 100) as u8
}

/// Assessment for a single zone.
pub fn assess_zone(zone: &Zone, reading: &SensorReading, sensitivity: f64) -> RiskAssessment {
    let probability = zone_probability(reading, sensitivity);
    RiskAssessment {
        zone: zone.name.to_string(),
        latitude: zone.latitude,
        longitude: zone.longitude,
        probability,
        level: RiskLevel::from_probability(probability),
    }
}

/// One assessment per registered zone, in registry order.
pub fn assess_all(reading: &SensorReading, sensitivities: &SensitivityTable) -> Vec<RiskAssessment> {
    ZONE_REGISTRY
        .iter()
        .map(|zone| assess_zone(zone, reading, sensitivities.for_zone(zone)))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(rainfall: f64, displacement: f64, strain: f64) -> SensorReading {
        SensorReading {
            rainfall_mm: rainfall,
            displacement_mm: displacement,
            strain_mm_per_m: strain,
        }
    }

    #[test]
    fn test_reference_reading_scores_53_medium() {
        // 15 + floor(50*0.25) + floor(10*2) + floor(1*6) = 15+12+20+6 = 53
        let p = zone_probability(&reading(50.0, 10.0, 1.0), 1.0);
        assert_eq!(p, 53);
        assert_eq!(RiskLevel::from_probability(p), RiskLevel::Medium);
    }

    #[test]
    fn test_quiet_sensors_score_baseline_low() {
        let p = zone_probability(&reading(0.0, 0.0, 0.0), 1.0);
        assert_eq!(p, BASE_PROBABILITY as u8);
        assert_eq!(RiskLevel::from_probability(p), RiskLevel::Low);
    }

    #[test]
    fn test_saturated_sensors_clamp_to_100_high() {
        // Raw value is 15 + 75 + 150 + 45 = 285, well past the ceiling.
        let p = zone_probability(&reading(200.0, 50.0, 5.0), 1.5);
        assert_eq!(p, 100);
        assert_eq!(RiskLevel::from_probability(p), RiskLevel::High);
    }

    #[test]
    fn test_terms_floor_individually() {
        // floor(3*0.25) + floor(0.9*6) = 0 + 5, not floor(0.75 + 5.4) = 6.
        let p = zone_probability(&reading(3.0, 0.0, 0.9), 1.0);
        assert_eq!(p as i64, BASE_PROBABILITY + 0 + 0 + 5);
    }

    #[test]
    fn test_sensitivity_scales_every_term() {
        // At 0.5: floor(12.5*0.5=6.25)=6 rainfall points... the multiplier
        // applies inside each floor, not to the summed total.
        let half = zone_probability(&reading(50.0, 10.0, 1.0), 0.5);
        assert_eq!(half as i64, 15 + 6 + 10 + 3);

        let double = zone_probability(&reading(50.0, 10.0, 1.0), 2.0);
        assert_eq!(double as i64, 15 + 25 + 40 + 12);
    }

    #[test]
    fn test_out_of_range_reading_is_clamped_not_rejected() {
        let wild = zone_probability(&reading(10_000.0, -5.0, 99.0), 1.0);
        let bounded = zone_probability(&reading(200.0, 0.0, 5.0), 1.0);
        assert_eq!(wild, bounded);
    }

    #[test]
    fn test_assess_all_covers_registry_in_order() {
        let table = crate::config::SensitivityTable::registry_defaults();
        let assessments = assess_all(&SensorReading::default(), &table);

        assert_eq!(assessments.len(), ZONE_REGISTRY.len());
        for (assessment, zone) in assessments.iter().zip(ZONE_REGISTRY) {
            assert_eq!(assessment.zone, zone.name);
            assert_eq!(assessment.latitude, zone.latitude);
            assert_eq!(assessment.longitude, zone.longitude);
        }
    }

    #[test]
    fn test_assessment_level_matches_probability() {
        let table = crate::config::SensitivityTable::registry_defaults();
        for assessment in assess_all(&reading(120.0, 30.0, 3.0), &table) {
            assert_eq!(
                assessment.level,
                RiskLevel::from_probability(assessment.probability),
                "level must be derived from the clamped probability for '{}'",
                assessment.zone
            );
        }
    }
}
