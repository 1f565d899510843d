//! Dashboard session state and the update trigger policy.
//!
//! The presentation shell owns exactly one of these per dashboard. It holds
//! the cached assessment set and its timestamp, and decides on each render
//! pass whether the cache is still usable or must be recomputed. This is
//! the only temporal logic in the system.
//!
//! Recomputation happens when:
//!   1. an explicit update is requested (the "Update Risk" button),
//!   2. no assessment set has ever been computed, or
//!   3. auto-refresh is enabled, which treats every pass as a trigger.
//!
//! Otherwise the cached set is reused unchanged — including when the
//! sliders have moved since it was computed. Moving a slider alone does not
//! invalidate the cache; that is the button's job.

use chrono::{DateTime, Utc};

use crate::config::SensitivityTable;
use crate::model::{RiskAssessment, SensorReading};
use crate::risk;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Whether the cached assessment set reflects the most recent trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Nothing cached yet, or an update has been requested.
    Stale,
    /// The cache was computed by the latest trigger and is reusable.
    Fresh,
}

/// What a render pass did with the assessment set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// The engine ran and the cache was replaced wholesale.
    Computed,
    /// The cached set was served unchanged.
    Cached,
}

impl Evaluation {
    pub fn label(&self) -> &'static str {
        match self {
            Evaluation::Computed => "computed",
            Evaluation::Cached => "cached",
        }
    }
}

/// Session state for one dashboard: the cached assessment set, when it was
/// last recomputed, and the auto-refresh flag. Owned and passed around by
/// the presentation shell — there are no ambient globals behind this.
pub struct DashboardSession {
    assessments: Option<Vec<RiskAssessment>>,
    last_updated: Option<DateTime<Utc>>,
    auto_refresh: bool,
}

impl DashboardSession {
    pub fn new() -> Self {
        Self {
            assessments: None,
            last_updated: None,
            auto_refresh: false,
        }
    }

    pub fn auto_refresh(&self) -> bool {
        self.auto_refresh
    }

    pub fn set_auto_refresh(&mut self, enabled: bool) {
        self.auto_refresh = enabled;
    }

    /// When the cached set was last recomputed. `None` until the first pass.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Cache state as seen by an incoming render pass.
    pub fn freshness(&self, update_requested: bool) -> Freshness {
        if update_requested || self.assessments.is_none() || self.auto_refresh {
            Freshness::Stale
        } else {
            Freshness::Fresh
        }
    }

    /// One render pass: applies the trigger policy, recomputing the whole
    /// assessment set when stale and serving the cache otherwise.
    pub fn render_pass(
        &mut self,
        reading: &SensorReading,
        sensitivities: &SensitivityTable,
        update_requested: bool,
    ) -> (&[RiskAssessment], Evaluation) {
        let evaluation = match self.freshness(update_requested) {
            Freshness::Stale => {
                self.assessments = Some(risk::assess_all(reading, sensitivities));
                self.last_updated = Some(Utc::now());
                Evaluation::Computed
            }
            Freshness::Fresh => Evaluation::Cached,
        };

        // The Stale arm always fills the cache; the empty fallback is unreachable.
        let assessments = self.assessments.as_deref().unwrap_or_default();
        (assessments, evaluation)
    }
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
