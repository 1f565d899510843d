//! Sensitivity configuration loader - parses zones.toml
//!
//! Separates the per-zone sensitivity multipliers from code, making it easy
//! to retune a slope without recompiling the service. The loaded table is
//! validated against the zone registry at startup: every registered zone
//! must appear exactly once with an in-range multiplier, and no unknown
//! zones are accepted. After validation, lookups are total — a lookup can
//! no longer surface a configuration mistake at evaluation time.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::zones::{Zone, ZONE_REGISTRY};

/// Multipliers must sit in (0.0, SENSITIVITY_MAX].
pub const SENSITIVITY_MAX: f64 = 2.0;

/// Expected configuration file in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "zones.toml";

// ---------------------------------------------------------------------------
// TOML structures
// ---------------------------------------------------------------------------

/// One `[[zone]]` entry from zones.toml.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneEntry {
    pub name: String,
    pub sensitivity: f64,
}

/// Root structure for TOML parsing.
#[derive(Debug, Deserialize)]
struct ZonesFile {
    zone: Vec<ZoneEntry>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Sensitivity configuration validation error
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file could not be read
    Unreadable(String, std::io::Error),
    /// Configuration file is not valid TOML
    Malformed(String, toml::de::Error),
    /// A registered zone has no entry in the file
    MissingZone(String),
    /// The file names a zone that is not in the registry
    UnknownZone(String),
    /// The file names the same zone twice
    DuplicateZone(String),
    /// Multiplier outside (0, SENSITIVITY_MAX]
    SensitivityOutOfRange { zone: String, sensitivity: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Unreadable(path, e) => {
                write!(f, "Failed to read sensitivity configuration '{}'.\n\n", path)?;
                write!(f, "  Error: {}\n\n", e)?;
                write!(f, "  The service expects zones.toml in the working directory\n")?;
                write!(f, "  (the project root when running via `cargo run`).")
            }
            ConfigError::Malformed(path, e) => {
                write!(f, "Failed to parse '{}' as TOML.\n\n", path)?;
                write!(f, "  Error: {}\n\n", e)?;
                write!(f, "  Expected format:\n")?;
                write!(f, "  [[zone]]\n")?;
                write!(f, "  name = \"Zone 1\"\n")?;
                write!(f, "  sensitivity = 1.0")
            }
            ConfigError::MissingZone(name) => {
                write!(f, "Registered zone '{}' has no entry in zones.toml.\n\n", name)?;
                write!(f, "  Every zone in the registry needs an explicit multiplier —\n")?;
                write!(f, "  add a [[zone]] entry for '{}' rather than relying on a\n", name)?;
                write!(f, "  default that could hide a misspelled name.")
            }
            ConfigError::UnknownZone(name) => {
                write!(f, "zones.toml names unknown zone '{}'.\n\n", name)?;
                write!(f, "  Known zones:\n")?;
                for zone in ZONE_REGISTRY {
                    write!(f, "    - {}\n", zone.name)?;
                }
                write!(f, "\n  Check for a typo, or register the zone in src/zones.rs first.")
            }
            ConfigError::DuplicateZone(name) => {
                write!(f, "zones.toml names zone '{}' more than once.\n\n", name)?;
                write!(f, "  Remove the duplicate entry; each zone takes exactly one multiplier.")
            }
            ConfigError::SensitivityOutOfRange { zone, sensitivity } => {
                write!(
                    f,
                    "Sensitivity {} for zone '{}' is outside (0.0, {}].\n\n",
                    sensitivity, zone, SENSITIVITY_MAX
                )?;
                write!(f, "  Multipliers must be positive; {} is the permitted maximum.", SENSITIVITY_MAX)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Sensitivity table
// ---------------------------------------------------------------------------

/// Validated per-zone sensitivity multipliers.
///
/// Construction guarantees an entry for every zone in `ZONE_REGISTRY`, so
/// `for_zone` is total for registry zones.
#[derive(Debug, Clone)]
pub struct SensitivityTable {
    multipliers: HashMap<String, f64>,
}

impl SensitivityTable {
    /// Loads and validates the sensitivity table from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_display = path.as_ref().display().to_string();
        let contents = fs::read_to_string(&path)
            .map_err(|e| ConfigError::Unreadable(path_display.clone(), e))?;
        Self::from_toml_str(&contents, &path_display)
    }

    /// Parses and validates TOML content. `source` is used in error messages.
    pub fn from_toml_str(contents: &str, source: &str) -> Result<Self, ConfigError> {
        let file: ZonesFile = toml::from_str(contents)
            .map_err(|e| ConfigError::Malformed(source.to_string(), e))?;
        Self::validate(file.zone)
    }

    /// Builds the table from the registry defaults, bypassing zones.toml.
    /// Used where a configured table is not meaningful (tests, the
    /// fixed-weight classic dashboard).
    pub fn registry_defaults() -> Self {
        let multipliers = ZONE_REGISTRY
            .iter()
            .map(|z| (z.name.to_string(), z.default_sensitivity))
            .collect();
        Self { multipliers }
    }

    fn validate(entries: Vec<ZoneEntry>) -> Result<Self, ConfigError> {
        let mut multipliers = HashMap::new();

        for entry in entries {
            if crate::zones::find_zone(&entry.name).is_none() {
                return Err(ConfigError::UnknownZone(entry.name));
            }
            if !(entry.sensitivity > 0.0 && entry.sensitivity <= SENSITIVITY_MAX) {
                return Err(ConfigError::SensitivityOutOfRange {
                    zone: entry.name,
                    sensitivity: entry.sensitivity,
                });
            }
            if multipliers.insert(entry.name.clone(), entry.sensitivity).is_some() {
                return Err(ConfigError::DuplicateZone(entry.name));
            }
        }

        for zone in ZONE_REGISTRY {
            if !multipliers.contains_key(zone.name) {
                return Err(ConfigError::MissingZone(zone.name.to_string()));
            }
        }

        Ok(Self { multipliers })
    }

    /// Multiplier for a zone. Total for registry zones; the registry default
    /// only applies to a `Zone` value constructed outside the registry.
    pub fn for_zone(&self, zone: &Zone) -> f64 {
        self.multipliers
            .get(zone.name)
            .copied()
            .unwrap_or(zone.default_sensitivity)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipped_config_loads_and_validates() {
        let table = SensitivityTable::load(DEFAULT_CONFIG_PATH)
            .expect("shipped zones.toml should validate against the registry");
        for zone in ZONE_REGISTRY {
            let s = table.for_zone(zone);
            assert!(
                s > 0.0 && s <= SENSITIVITY_MAX,
                "shipped multiplier for '{}' out of range: {}",
                zone.name,
                s
            );
        }
    }

    #[test]
    fn test_valid_table_parses() {
        let table = SensitivityTable::from_toml_str(
            r#"
            [[zone]]
            name = "Zone 1"
            sensitivity = 1.0

            [[zone]]
            name = "Zone 2"
            sensitivity = 0.5

            [[zone]]
            name = "Zone 3"
            sensitivity = 2.0

            [[zone]]
            name = "Zone 4"
            sensitivity = 1.5
            "#,
            "inline",
        )
        .expect("complete in-range table should validate");

        let zone2 = crate::zones::find_zone("Zone 2").unwrap();
        assert_eq!(table.for_zone(zone2), 0.5);
    }

    #[test]
    fn test_missing_zone_is_rejected() {
        let result = SensitivityTable::from_toml_str(
            r#"
            [[zone]]
            name = "Zone 1"
            sensitivity = 1.0
            "#,
            "inline",
        );
        match result {
            Err(ConfigError::MissingZone(name)) => {
                assert_eq!(name, "Zone 2", "first uncovered registry zone should be reported");
            }
            other => panic!("expected MissingZone, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_zone_is_rejected() {
        let result = SensitivityTable::from_toml_str(
            r#"
            [[zone]]
            name = "Zone 9"
            sensitivity = 1.0
            "#,
            "inline",
        );
        assert!(
            matches!(result, Err(ConfigError::UnknownZone(ref name)) if name == "Zone 9"),
            "unregistered zone names must not be silently accepted"
        );
    }

    #[test]
    fn test_duplicate_zone_is_rejected() {
        let result = SensitivityTable::from_toml_str(
            r#"
            [[zone]]
            name = "Zone 1"
            sensitivity = 1.0

            [[zone]]
            name = "Zone 1"
            sensitivity = 1.5
            "#,
            "inline",
        );
        assert!(matches!(result, Err(ConfigError::DuplicateZone(_))));
    }

    #[test]
    fn test_out_of_range_sensitivity_is_rejected() {
        for bad in [0.0, -1.0, 2.01] {
            let toml = format!(
                r#"
                [[zone]]
                name = "Zone 1"
                sensitivity = {}
                "#,
                bad
            );
            let result = SensitivityTable::from_toml_str(&toml, "inline");
            assert!(
                matches!(result, Err(ConfigError::SensitivityOutOfRange { .. })),
                "sensitivity {} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_malformed_toml_is_rejected() {
        let result = SensitivityTable::from_toml_str("zone = not toml [", "inline");
        assert!(matches!(result, Err(ConfigError::Malformed(_, _))));
    }

    #[test]
    fn test_registry_defaults_cover_every_zone() {
        let table = SensitivityTable::registry_defaults();
        for zone in ZONE_REGISTRY {
            assert_eq!(table.for_zone(zone), zone.default_sensitivity);
        }
    }

    #[test]
    fn test_error_messages_name_the_offending_zone() {
        let err = ConfigError::MissingZone("Zone 3".to_string());
        assert!(err.to_string().contains("Zone 3"));

        let err = ConfigError::SensitivityOutOfRange {
            zone: "Zone 4".to_string(),
            sensitivity: 3.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("Zone 4") && msg.contains("3"));
    }
}
