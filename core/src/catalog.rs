//! Lookup lists for filter inputs, and single-customer details.

use crate::{
    config::EligibilityPolicy,
    customer::Customer,
    error::EngineResult,
    repository::{CustomerRepository, TopologySource},
    topology::TopologyGraph,
    types::DeviceId,
};
use std::collections::BTreeSet;

/// Distinct child devices with at least one Up link, ascending.
pub fn list_devices(topology: &dyn TopologySource) -> EngineResult<Vec<DeviceId>> {
    let graph = TopologyGraph::from_edges(topology.all_edges()?);
    Ok(graph.devices_with_up_links())
}

/// Supported technologies that at least one customer is on, ascending.
pub fn list_technologies(
    customers: &dyn CustomerRepository,
    policy: &EligibilityPolicy,
) -> EngineResult<Vec<String>> {
    let techs: BTreeSet<String> = customers
        .all_customers()?
        .into_iter()
        .map(|c| c.olt_technology)
        .filter(|t| policy.supports_technology(t))
        .collect();
    Ok(techs.into_iter().collect())
}

pub fn customer_details(
    customers: &dyn CustomerRepository,
    customer_id: &str,
) -> EngineResult<Option<Customer>> {
    let found = customers.customer(customer_id)?;
    if found.is_none() {
        log::debug!("catalog: customer {customer_id} not found");
    }
    Ok(found)
}
