//! Filter criteria and the composable eligibility rules built from them.
//!
//! Every eligibility condition is a named `Rule` over a `Candidate`.
//! The evaluator applies rules in order and records the first one a
//! candidate fails, so each exclusion is explainable and every rule is
//! testable on its own.

use crate::{
    aggregation::DeviceRollup,
    capacity::CapacityAssessment,
    clock::{days_before, months_before},
    config::EligibilityPolicy,
    customer::{AccountStatus, Customer},
    error::{EngineError, EngineResult},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub device_id:              Option<String>,
    pub technology:             Option<String>,
    /// Inclusive lower bound; only ever raises the policy floor.
    pub min_usage_percentage:   Option<f64>,
    /// Replaces the default promo cooldown with an inclusion window.
    pub offered_within_days:    Option<u32>,
    pub min_current_speed_mbps: Option<f64>,
    /// With a speed given: match it exactly instead of as a minimum.
    pub exact_speed_match:      bool,
}

impl FilterCriteria {
    /// Parse string key/value input, e.g. a query string already split
    /// into pairs. Empty values count as absent.
    pub fn from_pairs<'a, I>(pairs: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut c = FilterCriteria::default();
        for (key, raw) in pairs {
            let value = raw.trim();
            if value.is_empty() {
                continue;
            }
            match key {
                "device_id" => c.device_id = Some(value.to_string()),
                "technology" => c.technology = Some(value.to_string()),
                "min_usage" | "min_usage_percentage" => {
                    c.min_usage_percentage = Some(parse_f64(key, value)?);
                }
                "last_offer_days" | "offered_within_days" => {
                    let days = value.parse::<u32>().map_err(|_| {
                        EngineError::validation(key, format!("expected a whole number of days, got '{value}'"))
                    })?;
                    c.offered_within_days = Some(days);
                }
                "current_speed" | "min_current_speed_mbps" => {
                    c.min_current_speed_mbps = Some(parse_f64(key, value)?);
                }
                "exact_speed_match" => {
                    c.exact_speed_match = match value {
                        "true" | "1" => true,
                        "false" | "0" => false,
                        other => {
                            return Err(EngineError::validation(
                                key,
                                format!("expected true or false, got '{other}'"),
                            ))
                        }
                    };
                }
                other => log::debug!("filter: ignoring unrecognized key '{other}'"),
            }
        }
        Ok(c)
    }

    /// Reject malformed or out-of-range values before any computation.
    pub fn validate(&self, policy: &EligibilityPolicy) -> EngineResult<()> {
        if let Some(d) = &self.device_id {
            if d.trim().is_empty() {
                return Err(EngineError::validation("device_id", "must not be blank"));
            }
        }
        if let Some(t) = &self.technology {
            if !policy.supports_technology(t) {
                return Err(EngineError::validation(
                    "technology",
                    format!(
                        "'{t}' is not one of the supported technologies {:?}",
                        policy.supported_technologies
                    ),
                ));
            }
        }
        if let Some(u) = self.min_usage_percentage {
            if !u.is_finite() || !(0.0..=100.0).contains(&u) {
                return Err(EngineError::validation(
                    "min_usage_percentage",
                    format!("must be within [0, 100], got {u}"),
                ));
            }
        }
        if let Some(s) = self.min_current_speed_mbps {
            if !s.is_finite() || s < 0.0 {
                return Err(EngineError::validation(
                    "min_current_speed_mbps",
                    format!("must be a non-negative number, got {s}"),
                ));
            }
        }
        Ok(())
    }
}

fn parse_f64(key: &str, value: &str) -> EngineResult<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| EngineError::validation(key, format!("expected a number, got '{value}'")))
}

// ── Rules ──────────────────────────────────────────────────────────

/// One customer joined with its device's rollups and capacity assessment.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub customer:   &'a Customer,
    pub access:     Option<&'a DeviceRollup>,
    pub uplink:     Option<&'a DeviceRollup>,
    pub assessment: CapacityAssessment<'a>,
}

type Predicate = Box<dyn Fn(&Candidate<'_>) -> bool + Send + Sync>;

pub struct Rule {
    pub name: &'static str,
    test:     Predicate,
}

impl Rule {
    pub fn new<F>(name: &'static str, test: F) -> Self
    where
        F: Fn(&Candidate<'_>) -> bool + Send + Sync + 'static,
    {
        Self { name, test: Box::new(test) }
    }

    pub fn admits(&self, c: &Candidate<'_>) -> bool {
        (self.test)(c)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

pub fn account_active() -> Rule {
    Rule::new("account_active", |c| c.customer.account_status == AccountStatus::Active)
}

pub fn supported_technology(policy: &EligibilityPolicy) -> Rule {
    let allowed = policy.supported_technologies.clone();
    Rule::new("supported_technology", move |c| {
        allowed.iter().any(|t| *t == c.customer.olt_technology)
    })
}

pub fn usage_above_floor(policy: &EligibilityPolicy) -> Rule {
    let floor = policy.usage_floor_pct;
    Rule::new("usage_floor", move |c| c.customer.avg_usage_percentage > floor)
}

/// The OLT's upstream link must have headroom. No rollup, no headroom.
pub fn uplink_below_ceiling(ceiling: f64) -> Rule {
    Rule::new("uplink_ceiling", move |c| {
        c.uplink.is_some_and(|u| u.avg_utilization_pct < ceiling)
    })
}

pub fn upgrade_cooldown_elapsed(policy: &EligibilityPolicy, today: NaiveDate) -> Rule {
    let cutoff = months_before(today, policy.upgrade_cooldown_months);
    Rule::new("upgrade_cooldown", move |c| {
        c.customer.last_upgrade_date.map_or(true, |d| d < cutoff)
    })
}

/// Default promo cooldown, or the caller's inclusion window when given.
pub fn promo_window(
    policy: &EligibilityPolicy,
    offered_within_days: Option<u32>,
    today: NaiveDate,
) -> Rule {
    match offered_within_days {
        None => {
            let cutoff = months_before(today, policy.promo_cooldown_months);
            Rule::new("promo_cooldown", move |c| {
                c.customer.last_promo_offer_date.map_or(true, |d| d < cutoff)
            })
        }
        Some(days) => {
            let since = days_before(today, days);
            Rule::new("offered_within_days", move |c| {
                c.customer.last_promo_offer_date.is_some_and(|d| d >= since)
            })
        }
    }
}

/// Access rollup exists, its LAG type resolves to a standard, and its
/// average utilization is admitted by the policy comparison.
pub fn access_within_standard(policy: &EligibilityPolicy) -> Rule {
    let comparison = policy.standard_comparison;
    Rule::new("access_capacity", move |c| {
        match (c.access, c.assessment.standard()) {
            (Some(r), Some(s)) => comparison.admits(r.avg_utilization_pct, s.max_utilization_pct),
            _ => false,
        }
    })
}

pub fn device_is(device_id: String) -> Rule {
    Rule::new("device_id", move |c| c.customer.device_id == device_id)
}

pub fn technology_is(technology: String) -> Rule {
    Rule::new("technology", move |c| c.customer.olt_technology == technology)
}

pub fn usage_at_least(min: f64) -> Rule {
    Rule::new("min_usage_percentage", move |c| c.customer.avg_usage_percentage >= min)
}

pub fn speed_matches(mbps: f64, exact: bool) -> Rule {
    Rule::new("current_speed", move |c| {
        if exact {
            c.customer.current_download_mbps == mbps
        } else {
            c.customer.current_download_mbps >= mbps
        }
    })
}

/// The full, ordered rule set for one evaluation.
///
/// Rules over the customer record run before rules over topology, so a
/// customer the caller filtered out is tallied under that filter and
/// never under a rollup it was not computed for.
pub fn eligibility_rules(
    policy: &EligibilityPolicy,
    criteria: &FilterCriteria,
    today: NaiveDate,
) -> Vec<Rule> {
    let mut rules = vec![account_active(), supported_technology(policy)];

    if let Some(d) = &criteria.device_id {
        rules.push(device_is(d.clone()));
    }
    if let Some(t) = &criteria.technology {
        rules.push(technology_is(t.clone()));
    }
    rules.push(usage_above_floor(policy));
    if let Some(u) = criteria.min_usage_percentage {
        rules.push(usage_at_least(u));
    }
    if let Some(s) = criteria.min_current_speed_mbps {
        rules.push(speed_matches(s, criteria.exact_speed_match));
    }
    rules.push(upgrade_cooldown_elapsed(policy, today));
    rules.push(promo_window(policy, criteria.offered_within_days, today));

    if let Some(ceiling) = policy.uplink_ceiling_pct {
        rules.push(uplink_below_ceiling(ceiling));
    }
    rules.push(access_within_standard(policy));
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::ContactPreference;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn customer() -> Customer {
        Customer {
            customer_id:             "C1".into(),
            device_id:               "OLT-1".into(),
            account_status:          AccountStatus::Active,
            olt_technology:          "XGS-PON".into(),
            avg_usage_percentage:    75.0,
            avg_download_usage_mbps: 600.0,
            current_download_mbps:   1000.0,
            last_upgrade_date:       None,
            last_promo_offer_date:   None,
            contact_preference:      Some(ContactPreference::Text),
            first_name:              None,
            last_name:               None,
            email:                   None,
            phone:                   None,
            address:                 None,
        }
    }

    fn candidate(c: &Customer) -> Candidate<'_> {
        Candidate {
            customer:   c,
            access:     None,
            uplink:     None,
            assessment: CapacityAssessment::Unknown,
        }
    }

    #[test]
    fn from_pairs_reads_recognized_keys() {
        let c = FilterCriteria::from_pairs([
            ("device_id", "OLT-7"),
            ("min_usage", "65.5"),
            ("last_offer_days", "30"),
            ("current_speed", "500"),
            ("exact_speed_match", "true"),
            ("technology", ""),
        ])
        .unwrap();
        assert_eq!(c.device_id.as_deref(), Some("OLT-7"));
        assert_eq!(c.technology, None);
        assert_eq!(c.min_usage_percentage, Some(65.5));
        assert_eq!(c.offered_within_days, Some(30));
        assert_eq!(c.min_current_speed_mbps, Some(500.0));
        assert!(c.exact_speed_match);
    }

    #[test]
    fn non_numeric_usage_is_a_validation_error() {
        let err = FilterCriteria::from_pairs([("min_usage", "lots")]).unwrap_err();
        assert!(matches!(err, EngineError::Validation { ref field, .. } if field == "min_usage"));
    }

    #[test]
    fn out_of_range_and_unsupported_values_fail_validation() {
        let policy = EligibilityPolicy::default();
        let high = FilterCriteria { min_usage_percentage: Some(140.0), ..Default::default() };
        assert!(high.validate(&policy).is_err());
        let tech = FilterCriteria { technology: Some("GPON".into()), ..Default::default() };
        assert!(tech.validate(&policy).is_err());
        let ok = FilterCriteria { technology: Some("25XGS-PON".into()), ..Default::default() };
        assert!(ok.validate(&policy).is_ok());
    }

    #[test]
    fn promo_window_inverts_when_days_given() {
        let policy = EligibilityPolicy::default();
        let mut c = customer();
        let default_rule = promo_window(&policy, None, today());
        let window_rule = promo_window(&policy, Some(30), today());

        assert!(default_rule.admits(&candidate(&c)));
        assert!(!window_rule.admits(&candidate(&c)));

        c.last_promo_offer_date = NaiveDate::from_ymd_opt(2025, 6, 1);
        assert!(!default_rule.admits(&candidate(&c)));
        assert!(window_rule.admits(&candidate(&c)));
    }

    #[test]
    fn usage_floor_is_strict() {
        let policy = EligibilityPolicy::default();
        let mut c = customer();
        c.avg_usage_percentage = 50.0;
        assert!(!usage_above_floor(&policy).admits(&candidate(&c)));
        c.avg_usage_percentage = 50.01;
        assert!(usage_above_floor(&policy).admits(&candidate(&c)));
    }

    #[test]
    fn speed_rule_minimum_versus_exact() {
        let c = customer();
        assert!(speed_matches(500.0, false).admits(&candidate(&c)));
        assert!(!speed_matches(500.0, true).admits(&candidate(&c)));
        assert!(speed_matches(1000.0, true).admits(&candidate(&c)));
    }

    #[test]
    fn missing_uplink_fails_ceiling() {
        let c = customer();
        assert!(!uplink_below_ceiling(91.0).admits(&candidate(&c)));
    }

    #[test]
    fn uplink_check_is_dropped_when_ceiling_disabled() {
        let policy = EligibilityPolicy { uplink_ceiling_pct: None, ..Default::default() };
        let rules = eligibility_rules(&policy, &FilterCriteria::default(), today());
        assert!(rules.iter().all(|r| r.name != "uplink_ceiling"));
    }

    #[test]
    fn record_rules_run_before_topology_rules() {
        let criteria = FilterCriteria {
            device_id:  Some("OLT-1".into()),
            technology: Some("XGS-PON".into()),
            ..Default::default()
        };
        let rules = eligibility_rules(&EligibilityPolicy::default(), &criteria, today());
        let pos = |name: &str| rules.iter().position(|r| r.name == name).unwrap();
        assert!(pos("device_id") < pos("uplink_ceiling"));
        assert!(pos("technology") < pos("access_capacity"));
    }
}
