//! In-memory topology graph of directed parent → child links.
//!
//! Edges are immutable facts from the topology source. The graph indexes
//! them by child and by parent; it never mutates an edge after ingestion.

use crate::types::{DeviceId, LagType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkStatus {
    Up,
    Down,
    Other(String),
}

impl LinkStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "Up"   => LinkStatus::Up,
            "Down" => LinkStatus::Down,
            other  => LinkStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LinkStatus::Up       => "Up",
            LinkStatus::Down     => "Down",
            LinkStatus::Other(s) => s,
        }
    }

    pub fn is_up(&self) -> bool {
        matches!(self, LinkStatus::Up)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub parent_device_id: DeviceId,
    pub child_device_id:  DeviceId,
    pub link_status:      LinkStatus,
    pub utilization_pct:  f64,
    pub bandwidth_gbps:   f64,
    pub lag_type:         LagType,
}

#[derive(Debug, Clone, Default)]
pub struct TopologyGraph {
    edges:     Vec<Edge>,
    by_child:  HashMap<DeviceId, Vec<usize>>,
    by_parent: HashMap<DeviceId, Vec<usize>>,
}

impl TopologyGraph {
    /// Build the graph. Edge order is preserved and is the order every
    /// query returns edges in.
    pub fn from_edges(edges: Vec<Edge>) -> Self {
        let mut by_child: HashMap<DeviceId, Vec<usize>> = HashMap::new();
        let mut by_parent: HashMap<DeviceId, Vec<usize>> = HashMap::new();
        for (idx, e) in edges.iter().enumerate() {
            by_child.entry(e.child_device_id.clone()).or_default().push(idx);
            by_parent.entry(e.parent_device_id.clone()).or_default().push(idx);
        }
        Self { edges, by_child, by_parent }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Every edge where the device is parent or child. Unknown devices
    /// yield an empty sequence.
    pub fn edges_for(&self, device_id: &str) -> Vec<&Edge> {
        let mut idx: Vec<usize> = self
            .by_child
            .get(device_id)
            .into_iter()
            .chain(self.by_parent.get(device_id))
            .flatten()
            .copied()
            .collect();
        // A self-loop is indexed on both sides.
        idx.sort_unstable();
        idx.dedup();
        idx.into_iter().map(|i| &self.edges[i]).collect()
    }

    pub fn edges_where_child(&self, device_id: &str) -> Vec<&Edge> {
        self.by_child
            .get(device_id)
            .map(|idx| idx.iter().map(|&i| &self.edges[i]).collect())
            .unwrap_or_default()
    }

    pub fn up_edges_where_child(&self, device_id: &str) -> Vec<&Edge> {
        self.by_child
            .get(device_id)
            .map(|idx| {
                idx.iter()
                    .map(|&i| &self.edges[i])
                    .filter(|e| e.link_status.is_up())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Distinct child device ids that have at least one Up link, ascending.
    pub fn devices_with_up_links(&self) -> Vec<DeviceId> {
        let mut ids: Vec<DeviceId> = self
            .by_child
            .iter()
            .filter(|(_, idx)| idx.iter().any(|&i| self.edges[i].link_status.is_up()))
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(parent: &str, child: &str, status: &str) -> Edge {
        Edge {
            parent_device_id: parent.into(),
            child_device_id:  child.into(),
            link_status:      LinkStatus::parse(status),
            utilization_pct:  10.0,
            bandwidth_gbps:   10.0,
            lag_type:         "LAG-A".into(),
        }
    }

    #[test]
    fn unknown_device_has_no_edges() {
        let g = TopologyGraph::from_edges(vec![edge("ULT-1", "OLT-1", "Up")]);
        assert!(g.edges_for("OLT-404").is_empty());
        assert!(g.up_edges_where_child("OLT-404").is_empty());
    }

    #[test]
    fn edges_for_covers_both_directions() {
        let g = TopologyGraph::from_edges(vec![
            edge("AGG-1", "ULT-1", "Up"),
            edge("ULT-1", "OLT-1", "Up"),
            edge("ULT-1", "OLT-2", "Down"),
        ]);
        assert_eq!(g.edges_for("ULT-1").len(), 3);
        assert_eq!(g.edges_where_child("OLT-2").len(), 1);
        assert!(g.up_edges_where_child("OLT-2").is_empty());
        assert_eq!(g.devices_with_up_links(), vec!["OLT-1".to_string(), "ULT-1".to_string()]);
    }
}
