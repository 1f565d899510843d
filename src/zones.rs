//! Zone registry for the rockfall risk dashboard.
//!
//! Defines the canonical list of monitored slope zones, fixed at startup and
//! immutable for the process lifetime. This is the single source of truth
//! for zone names — the sensitivity table in `zones.toml` is validated
//! against this registry, and all other modules should reference zones from
//! here rather than hardcoding names.

// ---------------------------------------------------------------------------
// Zone metadata
// ---------------------------------------------------------------------------

/// Metadata for a single monitored zone.
pub struct Zone {
    /// Display name, also the key used in `zones.toml`.
    pub name: &'static str,
    /// Human-readable description of the zone's role in slope monitoring.
    pub description: &'static str,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
    /// Sensitivity multiplier applied when `zones.toml` carries no override.
    pub default_sensitivity: f64,
}

/// All monitored zones, ordered south to north along the quarry benches.
///
/// Coordinates cover a ~3 km stretch of cut slopes on the Aravalli ridge
/// south-east of Delhi.
pub static ZONE_REGISTRY: &[Zone] = &[
    Zone {
        name: "Zone 1",
        description: "Lower bench above the haul road. Closest to the \
                      crusher and the first to shed debris after heavy rain.",
        latitude: 28.50,
        longitude: 77.00,
        default_sensitivity: 1.0,
    },
    Zone {
        name: "Zone 2",
        description: "Mid-bench cut slope with a mapped joint set dipping \
                      out of the face. Historically the most active zone.",
        latitude: 28.51,
        longitude: 77.01,
        default_sensitivity: 1.0,
    },
    Zone {
        name: "Zone 3",
        description: "Vegetated upper slope. Sheds less rock but drains \
                      toward Zone 2 during sustained rainfall.",
        latitude: 28.52,
        longitude: 77.02,
        default_sensitivity: 1.0,
    },
    Zone {
        name: "Zone 4",
        description: "Northern headwall above the access ramp. Monitored \
                      for block toppling rather than ravelling.",
        latitude: 28.53,
        longitude: 77.03,
        default_sensitivity: 1.0,
    },
];

/// Returns the names of all monitored zones, in registry order.
pub fn all_zone_names() -> Vec<&'static str> {
    ZONE_REGISTRY.iter().map(|z| z.name).collect()
}

/// Looks up a zone by name. Returns `None` if not found.
pub fn find_zone(name: &str) -> Option<&'static Zone> {
    ZONE_REGISTRY.iter().find(|z| z.name == name)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_four_zones() {
        assert_eq!(ZONE_REGISTRY.len(), 4);
    }

    #[test]
    fn test_no_duplicate_zone_names() {
        let mut seen = std::collections::HashSet::new();
        for zone in ZONE_REGISTRY {
            assert!(
                seen.insert(zone.name),
                "duplicate zone name '{}' found in ZONE_REGISTRY",
                zone.name
            );
        }
    }

    #[test]
    fn test_coordinates_are_plausible() {
        for zone in ZONE_REGISTRY {
            assert!(
                zone.latitude >= -90.0 && zone.latitude <= 90.0,
                "latitude out of range for '{}'",
                zone.name
            );
            assert!(
                zone.longitude >= -180.0 && zone.longitude <= 180.0,
                "longitude out of range for '{}'",
                zone.name
            );
        }
    }

    #[test]
    fn test_default_sensitivities_are_in_range() {
        // The engine assumes multipliers in (0, 2]; registry defaults must
        // satisfy the same bound the config loader enforces.
        for zone in ZONE_REGISTRY {
            assert!(
                zone.default_sensitivity > 0.0 && zone.default_sensitivity <= 2.0,
                "default sensitivity out of range for '{}'",
                zone.name
            );
        }
    }

    #[test]
    fn test_find_zone_returns_correct_entry() {
        let zone = find_zone("Zone 2").expect("Zone 2 should be in registry");
        assert_eq!(zone.latitude, 28.51);
        assert_eq!(zone.longitude, 77.01);
    }

    #[test]
    fn test_find_zone_returns_none_for_unknown_name() {
        assert!(find_zone("Zone 99").is_none());
    }

    #[test]
    fn test_all_zone_names_matches_registry_order() {
        assert_eq!(all_zone_names(), vec!["Zone 1", "Zone 2", "Zone 3", "Zone 4"]);
    }
}
