//! Per-device utilization rollups at two hierarchy levels.
//!
//! ACCESS rollup: Up edges where the OLT is the child (uplink device → OLT).
//! UPLINK rollup: Up edges one hop further, where each of the OLT's
//! access-layer parents is itself the child (aggregation → uplink device).
//!
//! The two rollups answer different capacity questions and are kept in
//! separate maps. A device with no contributing Up edges has no rollup.

use crate::{
    topology::{Edge, TopologyGraph},
    types::{DeviceId, LagType},
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRollup {
    pub device_id:            DeviceId,
    pub avg_utilization_pct:  f64,
    pub max_utilization_pct:  f64,
    pub total_bandwidth_gbps: f64,
    pub dominant_lag_type:    LagType,
    pub edge_count:           usize,
    /// More than one LAG type contributed; `dominant_lag_type` is lossy.
    pub mixed_lag_types:      bool,
}

/// Both rollup levels for a set of devices.
#[derive(Debug, Clone, Default)]
pub struct DeviceRollups {
    pub access: HashMap<DeviceId, DeviceRollup>,
    pub uplink: HashMap<DeviceId, DeviceRollup>,
}

pub struct AggregationEngine;

impl AggregationEngine {
    /// Access rollup for a device acting as an OLT.
    pub fn access_rollup(graph: &TopologyGraph, device_id: &str) -> Option<DeviceRollup> {
        let edges = graph.up_edges_where_child(device_id);
        rollup(device_id, &edges)
    }

    /// Uplink rollup for an OLT: aggregates the Up edges feeding each
    /// distinct parent of the OLT's Up access edges.
    pub fn uplink_rollup(graph: &TopologyGraph, device_id: &str) -> Option<DeviceRollup> {
        let mut parents: Vec<&str> = Vec::new();
        for e in graph.up_edges_where_child(device_id) {
            if !parents.contains(&e.parent_device_id.as_str()) {
                parents.push(&e.parent_device_id);
            }
        }
        let edges: Vec<&Edge> = parents
            .into_iter()
            .flat_map(|p| graph.up_edges_where_child(p))
            .collect();
        rollup(device_id, &edges)
    }

    /// Compute both rollups for every device id, in parallel. No device's
    /// rollup depends on another's.
    pub fn rollup_devices(graph: &TopologyGraph, device_ids: &[DeviceId]) -> DeviceRollups {
        let pairs: Vec<(Option<DeviceRollup>, Option<DeviceRollup>)> = device_ids
            .par_iter()
            .map(|id| {
                (
                    Self::access_rollup(graph, id),
                    Self::uplink_rollup(graph, id),
                )
            })
            .collect();

        let mut out = DeviceRollups::default();
        for (access, uplink) in pairs {
            if let Some(r) = access {
                out.access.insert(r.device_id.clone(), r);
            }
            if let Some(r) = uplink {
                out.uplink.insert(r.device_id.clone(), r);
            }
        }
        log::debug!(
            "aggregation: {} devices → {} access / {} uplink rollups",
            device_ids.len(),
            out.access.len(),
            out.uplink.len()
        );
        out
    }
}

fn rollup(device_id: &str, edges: &[&Edge]) -> Option<DeviceRollup> {
    if edges.is_empty() {
        return None;
    }

    let mut utilization: Vec<f64> = edges.iter().map(|e| e.utilization_pct).collect();
    let mut bandwidth: Vec<f64> = edges.iter().map(|e| e.bandwidth_gbps).collect();
    // Summed in sorted order so permutations of the same edges agree bit-for-bit.
    utilization.sort_by(f64::total_cmp);
    bandwidth.sort_by(f64::total_cmp);

    let avg = utilization.iter().sum::<f64>() / utilization.len() as f64;
    let max = utilization.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let total_bw = bandwidth.iter().sum::<f64>();

    let (dominant, distinct) = dominant_lag_type(edges);
    if distinct > 1 {
        log::warn!(
            "aggregation: device {device_id} has {distinct} LAG types across {} links; using {dominant}",
            edges.len()
        );
    }

    Some(DeviceRollup {
        device_id:            device_id.to_string(),
        avg_utilization_pct:  avg,
        max_utilization_pct:  max,
        total_bandwidth_gbps: total_bw,
        dominant_lag_type:    dominant,
        edge_count:           edges.len(),
        mixed_lag_types:      distinct > 1,
    })
}

/// Most frequent LAG type; ties go to the one seen first.
/// Returns (dominant, number of distinct LAG types).
fn dominant_lag_type(edges: &[&Edge]) -> (LagType, usize) {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for e in edges {
        match counts.iter_mut().find(|(lag, _)| *lag == e.lag_type) {
            Some((_, n)) => *n += 1,
            None => counts.push((e.lag_type.as_str(), 1)),
        }
    }
    let mut best = counts[0];
    for &(lag, n) in &counts[1..] {
        if n > best.1 {
            best = (lag, n);
        }
    }
    (best.0.to_string(), counts.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::LinkStatus;

    fn edge(parent: &str, child: &str, status: LinkStatus, util: f64, bw: f64, lag: &str) -> Edge {
        Edge {
            parent_device_id: parent.into(),
            child_device_id:  child.into(),
            link_status:      status,
            utilization_pct:  util,
            bandwidth_gbps:   bw,
            lag_type:         lag.into(),
        }
    }

    fn sample_graph() -> TopologyGraph {
        TopologyGraph::from_edges(vec![
            edge("ULT-1", "OLT-1", LinkStatus::Up, 20.0, 10.0, "LAG-A"),
            edge("ULT-1", "OLT-1", LinkStatus::Up, 60.0, 10.0, "LAG-A"),
            edge("ULT-1", "OLT-1", LinkStatus::Down, 99.0, 40.0, "LAG-A"),
            edge("AGG-1", "ULT-1", LinkStatus::Up, 30.0, 100.0, "LAG-B"),
            edge("AGG-2", "ULT-1", LinkStatus::Up, 50.0, 100.0, "LAG-B"),
            edge("AGG-3", "ULT-1", LinkStatus::Down, 95.0, 100.0, "LAG-B"),
        ])
    }

    #[test]
    fn access_rollup_ignores_down_links() {
        let r = AggregationEngine::access_rollup(&sample_graph(), "OLT-1").unwrap();
        assert_eq!(r.avg_utilization_pct, 40.0);
        assert_eq!(r.max_utilization_pct, 60.0);
        assert_eq!(r.total_bandwidth_gbps, 20.0);
        assert_eq!(r.dominant_lag_type, "LAG-A");
        assert_eq!(r.edge_count, 2);
        assert!(!r.mixed_lag_types);
    }

    #[test]
    fn uplink_rollup_looks_one_hop_up() {
        let r = AggregationEngine::uplink_rollup(&sample_graph(), "OLT-1").unwrap();
        assert_eq!(r.device_id, "OLT-1");
        assert_eq!(r.avg_utilization_pct, 40.0);
        assert_eq!(r.max_utilization_pct, 50.0);
        assert_eq!(r.total_bandwidth_gbps, 200.0);
        assert_eq!(r.dominant_lag_type, "LAG-B");
    }

    #[test]
    fn no_up_edges_means_no_rollup() {
        let g = TopologyGraph::from_edges(vec![edge(
            "ULT-9", "OLT-9", LinkStatus::Down, 10.0, 10.0, "LAG-A",
        )]);
        assert!(AggregationEngine::access_rollup(&g, "OLT-9").is_none());
        assert!(AggregationEngine::uplink_rollup(&g, "OLT-9").is_none());
        assert!(AggregationEngine::access_rollup(&g, "nowhere").is_none());
    }

    #[test]
    fn dominant_lag_tie_goes_to_first_seen() {
        let g = TopologyGraph::from_edges(vec![
            edge("U", "O", LinkStatus::Up, 10.0, 1.0, "LAG-Z"),
            edge("U", "O", LinkStatus::Up, 10.0, 1.0, "LAG-A"),
            edge("U", "O", LinkStatus::Up, 10.0, 1.0, "LAG-A"),
            edge("U", "O", LinkStatus::Up, 10.0, 1.0, "LAG-Z"),
        ]);
        let r = AggregationEngine::access_rollup(&g, "O").unwrap();
        assert_eq!(r.dominant_lag_type, "LAG-Z");
        assert!(r.mixed_lag_types);
    }

    #[test]
    fn rollup_devices_matches_single_device_calls() {
        let g = sample_graph();
        let all = AggregationEngine::rollup_devices(&g, &["OLT-1".into(), "OLT-404".into()]);
        assert_eq!(all.access.len(), 1);
        assert_eq!(all.uplink.len(), 1);
        assert_eq!(
            all.access.get("OLT-1"),
            AggregationEngine::access_rollup(&g, "OLT-1").as_ref()
        );
    }
}
