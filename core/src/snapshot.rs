//! Evaluation snapshot — one consistent read of customers, topology, and
//! standards for a single evaluation pass.
//!
//! RULE: A snapshot is complete or it does not exist. Any collaborator
//! failure, or a fetch that overruns the budget, aborts the load with
//! DataUnavailable. Nothing stale or partial is ever substituted.

use crate::{
    customer::Customer,
    error::{EngineError, EngineResult},
    repository::{CustomerRepository, StandardsSource, TopologySource},
    standards::OversubscriptionStandards,
    topology::TopologyGraph,
};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct EvaluationSnapshot {
    pub customers: Vec<Customer>,
    pub graph:     TopologyGraph,
    pub standards: OversubscriptionStandards,
}

impl EvaluationSnapshot {
    pub fn new(
        customers: Vec<Customer>,
        graph: TopologyGraph,
        standards: OversubscriptionStandards,
    ) -> Self {
        Self { customers, graph, standards }
    }

    pub fn load(
        customers: &dyn CustomerRepository,
        topology: &dyn TopologySource,
        standards: &dyn StandardsSource,
        budget: Duration,
    ) -> EngineResult<Self> {
        let started = Instant::now();

        let customer_rows = fetch("customer source", started, budget, || customers.all_customers())?;
        let edges = fetch("topology source", started, budget, || topology.all_edges())?;
        let standard_rows = fetch("standards source", started, budget, || standards.standards())?;

        log::debug!(
            "snapshot: {} customers, {} edges, {} standards in {:?}",
            customer_rows.len(),
            edges.len(),
            standard_rows.len(),
            started.elapsed()
        );

        Ok(Self {
            customers: customer_rows,
            graph:     TopologyGraph::from_edges(edges),
            standards: OversubscriptionStandards::new(standard_rows),
        })
    }
}

/// Run one collaborator fetch against the shared budget.
pub(crate) fn fetch<T>(
    collaborator: &'static str,
    started: Instant,
    budget: Duration,
    f: impl FnOnce() -> EngineResult<T>,
) -> EngineResult<T> {
    let value = f().map_err(|e| match e {
        EngineError::DataUnavailable { .. } => e,
        other => EngineError::DataUnavailable {
            collaborator,
            reason: other.to_string(),
        },
    })?;
    let elapsed = started.elapsed();
    if elapsed > budget {
        return Err(EngineError::DataUnavailable {
            collaborator,
            reason: format!("fetch exceeded budget of {budget:?} (took {elapsed:?})"),
        });
    }
    Ok(value)
}
