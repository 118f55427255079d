//! Eligibility evaluator — joins customers with their device rollups and
//! capacity assessment, applies the rule set, and ranks the survivors.
//!
//! Ranking (total order, stable on input order beyond these keys):
//!   1. access-rollup avg utilization ascending (least-saturated first)
//!   2. device id ascending
//!   3. customer avg usage descending (heaviest users first per device)

use crate::{
    aggregation::{AggregationEngine, DeviceRollup},
    capacity::{CapacityAdvisor, CapacityAssessment},
    clock::Clock,
    config::EligibilityPolicy,
    customer::Customer,
    error::EngineResult,
    filter::{eligibility_rules, Candidate, FilterCriteria},
    repository::{CustomerRepository, StandardsSource, TopologySource},
    snapshot::EvaluationSnapshot,
    types::DeviceId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{collections::{BTreeMap, HashSet}, time::Duration};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub customer:                     Customer,
    pub access_rollup:                DeviceRollup,
    /// Absent only when the policy runs without an uplink ceiling.
    pub uplink_rollup:                Option<DeviceRollup>,
    pub standard_max_utilization_pct: f64,
    pub capacity_note:                Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EligibilityReport {
    pub count:      usize,
    pub results:    Vec<EligibilityResult>,
    /// Rule name → number of customers that rule excluded first.
    pub exclusions: BTreeMap<String, usize>,
}

pub struct EligibilityEvaluator<'a> {
    customers: &'a dyn CustomerRepository,
    topology:  &'a dyn TopologySource,
    standards: &'a dyn StandardsSource,
    policy:    &'a EligibilityPolicy,
    clock:     &'a dyn Clock,
}

impl<'a> EligibilityEvaluator<'a> {
    pub fn new(
        customers: &'a dyn CustomerRepository,
        topology: &'a dyn TopologySource,
        standards: &'a dyn StandardsSource,
        policy: &'a EligibilityPolicy,
        clock: &'a dyn Clock,
    ) -> Self {
        Self { customers, topology, standards, policy, clock }
    }

    /// Validate, load one snapshot, evaluate. Fails as a whole or not at all.
    pub fn evaluate(&self, criteria: &FilterCriteria) -> EngineResult<EligibilityReport> {
        criteria.validate(self.policy)?;
        let snapshot = EvaluationSnapshot::load(
            self.customers,
            self.topology,
            self.standards,
            Duration::from_millis(self.policy.fetch_timeout_ms),
        )?;
        Ok(evaluate_snapshot(&snapshot, self.policy, criteria, self.clock.today()))
    }
}

/// Pure evaluation over an already loaded snapshot.
pub fn evaluate_snapshot(
    snapshot: &EvaluationSnapshot,
    policy: &EligibilityPolicy,
    criteria: &FilterCriteria,
    today: NaiveDate,
) -> EligibilityReport {
    let rules = eligibility_rules(policy, criteria, today);

    let mut seen: HashSet<&str> = HashSet::new();
    let devices: Vec<DeviceId> = snapshot
        .customers
        .iter()
        .filter(|c| criteria.device_id.as_ref().map_or(true, |d| *d == c.device_id))
        .filter(|c| seen.insert(c.device_id.as_str()))
        .map(|c| c.device_id.clone())
        .collect();
    let rollups = AggregationEngine::rollup_devices(&snapshot.graph, &devices);

    let mut results = Vec::new();
    let mut exclusions: BTreeMap<String, usize> = BTreeMap::new();

    for customer in &snapshot.customers {
        let access = rollups.access.get(&customer.device_id);
        let uplink = rollups.uplink.get(&customer.device_id);
        let assessment = access
            .map(|r| CapacityAdvisor::assess(r, &snapshot.standards, customer.avg_usage_percentage))
            .unwrap_or(CapacityAssessment::Unknown);

        let candidate = Candidate { customer, access, uplink, assessment };

        if let Some(failed) = rules.iter().find(|r| !r.admits(&candidate)) {
            *exclusions.entry(failed.name.to_string()).or_default() += 1;
            continue;
        }

        // access_capacity admitted the candidate, so both are present.
        let (Some(access), Some(standard)) = (candidate.access, candidate.assessment.standard())
        else {
            continue;
        };

        results.push(EligibilityResult {
            customer:                     customer.clone(),
            access_rollup:                access.clone(),
            uplink_rollup:                candidate.uplink.cloned(),
            standard_max_utilization_pct: standard.max_utilization_pct,
            capacity_note:                candidate.assessment.note().map(str::to_string),
        });
    }

    rank(&mut results);

    log::info!(
        "eligibility: {} of {} customers eligible ({} devices rolled up)",
        results.len(),
        snapshot.customers.len(),
        devices.len()
    );
    for (rule, n) in &exclusions {
        log::debug!("eligibility: {n} excluded by {rule}");
    }

    EligibilityReport {
        count: results.len(),
        results,
        exclusions,
    }
}

/// Stable sort; ties beyond the three keys keep input order.
pub fn rank(results: &mut [EligibilityResult]) {
    results.sort_by(|a, b| {
        a.access_rollup
            .avg_utilization_pct
            .total_cmp(&b.access_rollup.avg_utilization_pct)
            .then_with(|| a.customer.device_id.cmp(&b.customer.device_id))
            .then_with(|| {
                b.customer
                    .avg_usage_percentage
                    .total_cmp(&a.customer.avg_usage_percentage)
            })
    });
}
