//! Engine-wide tunables: placement scoring weights and CSV import defaults.
//!
//! Not part of the distilled spec's algorithmic core, but the ambient
//! configuration layer a complete crate in this ecosystem carries around it
//! (§1): the handful of numbers the spec bakes into its formulas and default
//! columns are exactly what a real deployment ends up wanting to retune
//! without a recompile. Defaults reproduce the spec's own constants exactly;
//! nothing behaves differently until a caller overrides them.

use serde::{Deserialize, Serialize};

/// Weights for the placement candidate scoring formula (spec §4.2 step 3):
///
/// `score = priority_weight * priorityFactor * (1 - ds/D) + zone_weight * zoneMatch + volume_weight * volumeFactor`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub priority_weight: f64,
    pub zone_weight: f64,
    pub volume_weight: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            priority_weight: 10.0,
            zone_weight: 5.0,
            volume_weight: 2.0,
        }
    }
}

/// Defaults applied to optional CSV columns on import (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvDefaults {
    pub mass: f64,
    pub priority: u8,
    pub usage_limit: u32,
    pub preferred_zone: String,
}

impl Default for CsvDefaults {
    fn default() -> Self {
        Self {
            mass: 0.0,
            priority: 50,
            usage_limit: 1,
            preferred_zone: "General".to_string(),
        }
    }
}

/// Top-level engine configuration: everything that shapes planner behavior
/// without being part of the geometric contract itself. Constructed once
/// alongside the [`Engine`](crate::engine::Engine) and shared read-only for
/// its lifetime — config is not hot-reloaded mid-process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub scoring: ScoringWeights,
    pub csv_defaults: CsvDefaults,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_match_the_spec_formula_constants() {
        let w = ScoringWeights::default();
        assert_eq!(w.priority_weight, 10.0);
        assert_eq!(w.zone_weight, 5.0);
        assert_eq!(w.volume_weight, 2.0);
    }

    #[test]
    fn default_csv_defaults_match_the_spec_table() {
        let d = CsvDefaults::default();
        assert_eq!(d.mass, 0.0);
        assert_eq!(d.priority, 50);
        assert_eq!(d.usage_limit, 1);
        assert_eq!(d.preferred_zone, "General");
    }
}
