//! Read-only view of one device: its edges, access rollup, link
//! statistics, and the customers it serves.
//!
//! Unknown devices are a normal case and produce an empty view.

use crate::{
    aggregation::{AggregationEngine, DeviceRollup},
    capacity::CapacityAdvisor,
    error::EngineResult,
    repository::{CustomerRepository, StandardsSource, TopologySource},
    snapshot::fetch,
    standards::OversubscriptionStandards,
    topology::{Edge, TopologyGraph},
    types::{CustomerId, DeviceId},
};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, time::{Duration, Instant}};

/// Link statistics over every edge where the device is the child,
/// regardless of link status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatistics {
    pub device_id:            DeviceId,
    pub connected_parents:    usize,
    pub total_links:          usize,
    pub links_up:             usize,
    pub links_down:           usize,
    pub avg_utilization_pct:  f64,
    pub max_utilization_pct:  f64,
    pub total_bandwidth_gbps: f64,
    /// Lexically greatest LAG type among the links.
    pub lag_type:             String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerCapacityNote {
    pub customer_id:          CustomerId,
    pub avg_usage_percentage: f64,
    pub note:                 String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceTopology {
    pub device_id:      DeviceId,
    pub edges:          Vec<Edge>,
    pub access_rollup:  Option<DeviceRollup>,
    pub statistics:     Option<DeviceStatistics>,
    pub customer_count: usize,
    pub capacity_notes: Vec<CustomerCapacityNote>,
}

pub struct DeviceViewService<'a> {
    customers: &'a dyn CustomerRepository,
    topology:  &'a dyn TopologySource,
    standards: &'a dyn StandardsSource,
    budget:    Duration,
}

impl<'a> DeviceViewService<'a> {
    pub fn new(
        customers: &'a dyn CustomerRepository,
        topology: &'a dyn TopologySource,
        standards: &'a dyn StandardsSource,
        budget: Duration,
    ) -> Self {
        Self { customers, topology, standards, budget }
    }

    pub fn fetch_topology(&self, device_id: &str) -> EngineResult<DeviceTopology> {
        let started = Instant::now();
        let edges = fetch("topology source", started, self.budget, || {
            self.topology.edges_touching(device_id)
        })?;
        let customers = fetch("customer source", started, self.budget, || {
            self.customers.customers_on_device(device_id)
        })?;
        let standards = OversubscriptionStandards::new(fetch(
            "standards source",
            started,
            self.budget,
            || self.standards.standards(),
        )?);

        let graph = TopologyGraph::from_edges(edges);
        let access_rollup = AggregationEngine::access_rollup(&graph, device_id);
        let statistics = device_statistics(&graph, device_id);

        let capacity_notes = match &access_rollup {
            Some(rollup) => customers
                .iter()
                .filter_map(|c| {
                    CapacityAdvisor::assess(rollup, &standards, c.avg_usage_percentage)
                        .note()
                        .map(|note| CustomerCapacityNote {
                            customer_id:          c.customer_id.clone(),
                            avg_usage_percentage: c.avg_usage_percentage,
                            note:                 note.to_string(),
                        })
                })
                .collect(),
            None => Vec::new(),
        };

        log::debug!(
            "device view: {device_id} has {} edges, {} customers",
            graph.len(),
            customers.len()
        );

        Ok(DeviceTopology {
            device_id: device_id.to_string(),
            edges: graph.edges().to_vec(),
            access_rollup,
            statistics,
            customer_count: customers.len(),
            capacity_notes,
        })
    }
}

pub fn device_statistics(graph: &TopologyGraph, device_id: &str) -> Option<DeviceStatistics> {
    let edges = graph.edges_where_child(device_id);
    if edges.is_empty() {
        return None;
    }
    let parents: HashSet<&str> = edges.iter().map(|e| e.parent_device_id.as_str()).collect();
    let links_up = edges.iter().filter(|e| e.link_status.is_up()).count();

    let mut utilization: Vec<f64> = edges.iter().map(|e| e.utilization_pct).collect();
    utilization.sort_by(f64::total_cmp);
    let mut bandwidth: Vec<f64> = edges.iter().map(|e| e.bandwidth_gbps).collect();
    bandwidth.sort_by(f64::total_cmp);

    Some(DeviceStatistics {
        device_id:            device_id.to_string(),
        connected_parents:    parents.len(),
        total_links:          edges.len(),
        links_up,
        links_down:           edges.len() - links_up,
        avg_utilization_pct:  utilization.iter().sum::<f64>() / utilization.len() as f64,
        max_utilization_pct:  utilization.last().copied().unwrap_or(0.0),
        total_bandwidth_gbps: bandwidth.iter().sum(),
        lag_type:             edges
            .iter()
            .map(|e| e.lag_type.as_str())
            .max()
            .unwrap_or_default()
            .to_string(),
    })
}
