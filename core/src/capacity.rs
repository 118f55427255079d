//! Capacity advisor — compares a device's standard against a customer's
//! own usage and produces an advisory note.
//!
//! Advisory only. The single gating outcome is `Unknown`: a rollup whose
//! LAG type resolves to no standard is never recommended for upgrade.

use crate::{
    aggregation::DeviceRollup,
    standards::{OversubscriptionStandard, OversubscriptionStandards},
};

#[derive(Debug, Clone, PartialEq)]
pub enum CapacityAssessment<'a> {
    /// No standard for the rollup's dominant LAG type.
    Unknown,
    Healthy {
        standard: &'a OversubscriptionStandard,
    },
    /// The standard's ceiling is below what this customer already draws.
    Warning {
        standard: &'a OversubscriptionStandard,
        note:     &'a str,
    },
}

impl<'a> CapacityAssessment<'a> {
    pub fn standard(&self) -> Option<&'a OversubscriptionStandard> {
        match self {
            CapacityAssessment::Unknown => None,
            CapacityAssessment::Healthy { standard }
            | CapacityAssessment::Warning { standard, .. } => Some(*standard),
        }
    }

    pub fn note(&self) -> Option<&'a str> {
        match self {
            CapacityAssessment::Warning { note, .. } => Some(*note),
            _ => None,
        }
    }
}

pub struct CapacityAdvisor;

impl CapacityAdvisor {
    pub fn assess<'a>(
        rollup: &DeviceRollup,
        standards: &'a OversubscriptionStandards,
        customer_usage_pct: f64,
    ) -> CapacityAssessment<'a> {
        let Some(standard) = standards.standard_for(&rollup.dominant_lag_type) else {
            log::debug!(
                "capacity: no standard for LAG type {} on {}",
                rollup.dominant_lag_type,
                rollup.device_id
            );
            return CapacityAssessment::Unknown;
        };

        if standard.max_utilization_pct < customer_usage_pct {
            CapacityAssessment::Warning {
                standard,
                note: &standard.notes,
            }
        } else {
            CapacityAssessment::Healthy { standard }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rollup(lag: &str) -> DeviceRollup {
        DeviceRollup {
            device_id:            "OLT-1".into(),
            avg_utilization_pct:  40.0,
            max_utilization_pct:  55.0,
            total_bandwidth_gbps: 40.0,
            dominant_lag_type:    lag.into(),
            edge_count:           4,
            mixed_lag_types:      false,
        }
    }

    fn standards(max: f64) -> OversubscriptionStandards {
        OversubscriptionStandards::new([OversubscriptionStandard {
            lag_type:            "LAG-A".into(),
            max_utilization_pct: max,
            notes:               "augment LAG-A".into(),
        }])
    }

    #[test]
    fn missing_standard_is_unknown() {
        let s = standards(80.0);
        assert_eq!(CapacityAdvisor::assess(&rollup("LAG-X"), &s, 75.0), CapacityAssessment::Unknown);
    }

    #[test]
    fn ceiling_below_customer_usage_warns() {
        let s = standards(30.0);
        let a = CapacityAdvisor::assess(&rollup("LAG-A"), &s, 75.0);
        assert_eq!(a.note(), Some("augment LAG-A"));
    }

    #[test]
    fn ceiling_at_or_above_usage_is_healthy() {
        let s = standards(75.0);
        let a = CapacityAdvisor::assess(&rollup("LAG-A"), &s, 75.0);
        assert!(matches!(a, CapacityAssessment::Healthy { .. }));
        assert_eq!(a.note(), None);
    }
}
