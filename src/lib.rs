//! rockmon_service: rockfall risk dashboard service.
//!
//! # Module structure
//!
//! ```text
//! rockmon_service
//! ├── model     — shared data types (SensorReading, RiskAssessment, RiskLevel)
//! ├── zones     — monitored zone registry (names, coordinates, default sensitivity)
//! ├── config    — sensitivity table loader (zones.toml), validated at startup
//! ├── risk      — deterministic risk scoring engine (probability + level per zone)
//! ├── session   — dashboard session state: stale/fresh update trigger policy
//! ├── dashboard — page template, legend, summary metrics (presentation glue)
//! └── endpoint  — HTTP server wiring sliders and triggers to the risk engine
//! ```

pub mod config;
pub mod dashboard;
pub mod endpoint;
pub mod model;
pub mod risk;
pub mod session;
pub mod zones;
