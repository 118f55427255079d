//! Integration tests: device topology view and catalog lookups.

mod common;

use common::*;

#[test]
fn topology_view_reports_rollup_and_statistics() {
    let engine = scenario_a(80.0);
    engine
        .store
        .insert_edge(&down_edge("ULT-SPARE", "OLT-A", 0.0, STANDARD_LAG))
        .unwrap();

    let view = engine.fetch_topology("OLT-A").unwrap();

    assert_eq!(view.device_id, "OLT-A");
    assert_eq!(view.edges.len(), 3);
    assert_eq!(view.customer_count, 1);
    assert!(view.capacity_notes.is_empty(), "80% standard covers 75% usage");

    let rollup = view.access_rollup.expect("access rollup");
    assert_eq!(rollup.avg_utilization_pct, 40.0);
    assert_eq!(rollup.edge_count, 2);
    assert_eq!(rollup.total_bandwidth_gbps, 20.0);
    assert_eq!(rollup.dominant_lag_type, STANDARD_LAG);

    let stats = view.statistics.expect("statistics");
    assert_eq!(stats.connected_parents, 2);
    assert_eq!(stats.total_links, 3);
    assert_eq!(stats.links_up, 2);
    assert_eq!(stats.links_down, 1);
    assert_eq!(stats.max_utilization_pct, 45.0);
}

/// Scenario B: the device view carries the standard's note for a
/// customer whose usage exceeds the standard's ceiling.
#[test]
fn topology_view_attaches_capacity_notes() {
    let engine = scenario_a(30.0);

    let view = engine.fetch_topology("OLT-A").unwrap();

    assert_eq!(view.capacity_notes.len(), 1);
    let note = &view.capacity_notes[0];
    assert_eq!(note.customer_id, "C1");
    assert_eq!(note.avg_usage_percentage, 75.0);
    assert_eq!(note.note, "LAG-S near capacity");
}

#[test]
fn unknown_device_yields_an_empty_view() {
    let engine = scenario_a(80.0);

    let view = engine.fetch_topology("OLT-NOWHERE").unwrap();

    assert!(view.edges.is_empty());
    assert!(view.access_rollup.is_none());
    assert!(view.statistics.is_none());
    assert_eq!(view.customer_count, 0);
}

#[test]
fn device_list_holds_children_with_up_links() {
    let engine = scenario_a(80.0);
    engine
        .store
        .insert_edge(&down_edge("ULT-X", "OLT-DEAD", 10.0, STANDARD_LAG))
        .unwrap();

    let devices = engine.list_devices().unwrap();
    assert_eq!(devices, vec!["OLT-A".to_string(), "ULT-OLT-A".to_string()]);
}

#[test]
fn technology_list_is_supported_and_in_use() {
    let engine = engine();
    let mut gpon = customer("C1", "OLT-A");
    gpon.olt_technology = "GPON".into();
    let mut fast = customer("C2", "OLT-A");
    fast.olt_technology = "25XGS-PON".into();
    for c in [gpon, fast, customer("C3", "OLT-A"), customer("C4", "OLT-A")] {
        engine.store.insert_customer(&c).unwrap();
    }

    assert_eq!(
        engine.list_technologies().unwrap(),
        vec!["25XGS-PON".to_string(), "XGS-PON".to_string()]
    );
}

#[test]
fn customer_details_round_trip_through_the_store() {
    let engine = engine();
    let mut c = customer("C1", "OLT-A");
    c.email = Some("test.c1@example.net".into());
    c.last_upgrade_date = Some(months_ago(9));
    engine.store.insert_customer(&c).unwrap();

    assert_eq!(engine.customer_details("C1").unwrap(), Some(c));
    assert_eq!(engine.customer_details("C404").unwrap(), None);
}

#[test]
fn usage_is_clamped_on_ingestion() {
    let engine = engine();
    let mut c = customer("C1", "OLT-A");
    c.avg_usage_percentage = 130.0;
    engine.store.insert_customer(&c).unwrap();

    let stored = engine.customer_details("C1").unwrap().unwrap();
    assert_eq!(stored.avg_usage_percentage, 100.0);
}
