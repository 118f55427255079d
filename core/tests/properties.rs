//! Property tests: rollup determinism, Down-link exclusion, filter monotonicity.

mod common;

use boost_core::{
    aggregation::{AggregationEngine, DeviceRollup},
    config::EligibilityPolicy,
    eligibility::evaluate_snapshot,
    filter::FilterCriteria,
    snapshot::EvaluationSnapshot,
    standards::OversubscriptionStandards,
    topology::{Edge, LinkStatus, TopologyGraph},
};
use common::*;
use proptest::prelude::*;

fn arb_edge(
    parent_prefix: &'static str,
    children: &'static [&'static str],
) -> impl Strategy<Value = Edge> {
    (
        0..3usize,
        prop::sample::select(children),
        prop::bool::weighted(0.8),
        0.0..=100.0f64,
        prop::sample::select(vec![1.0, 10.0, 25.0, 100.0]),
        prop::sample::select(vec!["LAG-S", "LAG-T"]),
    )
        .prop_map(move |(parent, child, up, util, bw, lag)| Edge {
            parent_device_id: format!("{parent_prefix}-{parent}"),
            child_device_id:  child.to_string(),
            link_status:      if up { LinkStatus::Up } else { LinkStatus::Down },
            utilization_pct:  util,
            bandwidth_gbps:   bw,
            lag_type:         lag.to_string(),
        })
}

const OLTS: &[&str] = &["OLT-1", "OLT-2", "OLT-3"];
const ULTS: &[&str] = &["ULT-0", "ULT-1", "ULT-2"];

/// Access links (ULT → OLT) mixed with uplink links (AGG → ULT).
fn arb_topology(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<Edge>> {
    prop::collection::vec(prop_oneof![arb_edge("ULT", OLTS), arb_edge("AGG", ULTS)], len)
}

fn numbers(r: Option<&DeviceRollup>) -> Option<(f64, f64, f64, usize)> {
    r.map(|r| (r.avg_utilization_pct, r.max_utilization_pct, r.total_bandwidth_gbps, r.edge_count))
}

proptest! {
    /// Any permutation of the same edges produces identical rollups.
    #[test]
    fn rollup_ignores_edge_order(
        edges in arb_topology(1..60).prop_shuffle(),
        seed in any::<u64>(),
    ) {
        let mut shuffled = edges.clone();
        // Rotate by a seed-derived amount, then reverse.
        let k = (seed as usize) % shuffled.len();
        shuffled.rotate_left(k);
        shuffled.reverse();

        let a = TopologyGraph::from_edges(edges);
        let b = TopologyGraph::from_edges(shuffled);
        for olt in OLTS {
            prop_assert_eq!(
                numbers(AggregationEngine::access_rollup(&a, olt).as_ref()),
                numbers(AggregationEngine::access_rollup(&b, olt).as_ref())
            );
            prop_assert_eq!(
                numbers(AggregationEngine::uplink_rollup(&a, olt).as_ref()),
                numbers(AggregationEngine::uplink_rollup(&b, olt).as_ref())
            );
        }
    }

    /// Adding Down links, at any utilization, never changes a rollup.
    #[test]
    fn down_links_never_contribute(
        edges in arb_topology(0..40),
        extra in arb_topology(1..15),
    ) {
        let base = TopologyGraph::from_edges(edges.clone());
        let mut with_down = edges;
        with_down.extend(extra.into_iter().map(|mut e| {
            e.link_status = LinkStatus::Down;
            e
        }));
        let padded = TopologyGraph::from_edges(with_down);

        for olt in OLTS {
            prop_assert_eq!(
                AggregationEngine::access_rollup(&base, olt),
                AggregationEngine::access_rollup(&padded, olt)
            );
            prop_assert_eq!(
                AggregationEngine::uplink_rollup(&base, olt),
                AggregationEngine::uplink_rollup(&padded, olt)
            );
        }
    }

    /// Raising min_usage_percentage only ever removes customers.
    #[test]
    fn raising_min_usage_shrinks_results(
        usages in prop::collection::vec(0.0..=100.0f64, 1..20),
        low in 0.0..=100.0f64,
        delta in 0.0..=50.0f64,
    ) {
        let high = (low + delta).min(100.0);
        let edges = vec![
            edge("ULT-1", "OLT-1", 35.0, STANDARD_LAG),
            edge("ULT-1", "OLT-1", 45.0, STANDARD_LAG),
            edge("AGG-1", "ULT-1", 30.0, "LAG-UP"),
        ];
        let customers = usages
            .iter()
            .enumerate()
            .map(|(i, u)| {
                let mut c = customer(&format!("C{i}"), "OLT-1");
                c.avg_usage_percentage = *u;
                c
            })
            .collect();
        let snapshot = EvaluationSnapshot::new(
            customers,
            TopologyGraph::from_edges(edges),
            OversubscriptionStandards::new([standard(STANDARD_LAG, 80.0, "n")]),
        );
        let policy = EligibilityPolicy::default();

        let ids = |min: f64| -> Vec<String> {
            let criteria = FilterCriteria { min_usage_percentage: Some(min), ..Default::default() };
            evaluate_snapshot(&snapshot, &policy, &criteria, today())
                .results
                .into_iter()
                .map(|r| r.customer.customer_id)
                .collect()
        };

        let loose = ids(low);
        let strict = ids(high);
        prop_assert!(strict.len() <= loose.len());
        prop_assert!(strict.iter().all(|id| loose.contains(id)));
    }
}
