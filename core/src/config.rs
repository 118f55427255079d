use crate::standards::OversubscriptionStandard;
use serde::{Deserialize, Serialize};

// ── Eligibility policy ─────────────────────────────────────────────

/// How a device's access utilization is compared against its standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdComparison {
    /// utilization < max
    Strict,
    /// utilization <= max
    Inclusive,
}

impl ThresholdComparison {
    pub fn admits(self, value: f64, limit: f64) -> bool {
        match self {
            ThresholdComparison::Strict    => value < limit,
            ThresholdComparison::Inclusive => value <= limit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityPolicy {
    /// Hard floor: customer usage must be strictly above this.
    pub usage_floor_pct: f64,
    /// Uplink saturation ceiling. `None` drops the uplink check entirely.
    pub uplink_ceiling_pct: Option<f64>,
    pub upgrade_cooldown_months: u32,
    pub promo_cooldown_months: u32,
    pub standard_comparison: ThresholdComparison,
    pub supported_technologies: Vec<String>,
    /// Budget for reading one evaluation snapshot from the data sources.
    pub fetch_timeout_ms: u64,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            usage_floor_pct:         50.0,
            uplink_ceiling_pct:      Some(91.0),
            upgrade_cooldown_months: 6,
            promo_cooldown_months:   2,
            standard_comparison:     ThresholdComparison::Strict,
            supported_technologies:  vec!["XGS-PON".into(), "25XGS-PON".into()],
            fetch_timeout_ms:        5_000,
        }
    }
}

impl EligibilityPolicy {
    pub fn supports_technology(&self, technology: &str) -> bool {
        self.supported_technologies.iter().any(|t| t == technology)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct StandardsFile {
    standards: Vec<OversubscriptionStandard>,
}

// ── Top-level config ───────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub policy:    EligibilityPolicy,
    pub standards: Vec<OversubscriptionStandard>,
}

impl EngineConfig {
    /// Load from the data/ directory.
    /// In tests, use EngineConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let policy_path = format!("{data_dir}/policy/eligibility_policy.json");
        let policy_content = std::fs::read_to_string(&policy_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {policy_path}: {e}"))?;
        let policy: EligibilityPolicy = serde_json::from_str(&policy_content)?;

        let standards_path = format!("{data_dir}/standards/oversubscription_standards.json");
        let standards_content = std::fs::read_to_string(&standards_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {standards_path}: {e}"))?;
        let standards_file: StandardsFile = serde_json::from_str(&standards_content)?;

        if let Some(ceiling) = policy.uplink_ceiling_pct {
            if !(0.0..=100.0).contains(&ceiling) {
                anyhow::bail!("uplink_ceiling_pct must be within [0, 100], got {ceiling}");
            }
        }

        Ok(Self {
            policy,
            standards: standards_file.standards,
        })
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            policy: EligibilityPolicy::default(),
            standards: vec![
                OversubscriptionStandard {
                    lag_type:            "LAG-2x10G".into(),
                    max_utilization_pct: 70.0,
                    notes:               "2x10G LAG: plan augment before adding premium tiers".into(),
                },
                OversubscriptionStandard {
                    lag_type:            "LAG-4x10G".into(),
                    max_utilization_pct: 80.0,
                    notes:               "4x10G LAG: monitor peak-hour utilization".into(),
                },
                OversubscriptionStandard {
                    lag_type:            "LAG-2x100G".into(),
                    max_utilization_pct: 85.0,
                    notes:               "2x100G LAG: shared aggregation headroom limited".into(),
                },
            ],
        }
    }
}
