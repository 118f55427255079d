//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use boost_core::{
    customer::{AccountStatus, ContactPreference, Customer},
    engine::UpgradeEngine,
    standards::OversubscriptionStandard,
    topology::{Edge, LinkStatus},
};
use chrono::{Months, NaiveDate};

pub const STANDARD_LAG: &str = "LAG-S";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

pub fn months_ago(n: u32) -> NaiveDate {
    today().checked_sub_months(Months::new(n)).unwrap()
}

pub fn days_ago(n: u64) -> NaiveDate {
    today().checked_sub_days(chrono::Days::new(n)).unwrap()
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn engine() -> UpgradeEngine {
    init_logging();
    UpgradeEngine::build_test(today()).expect("test engine")
}

pub fn edge(parent: &str, child: &str, util: f64, lag: &str) -> Edge {
    Edge {
        parent_device_id: parent.into(),
        child_device_id:  child.into(),
        link_status:      LinkStatus::Up,
        utilization_pct:  util,
        bandwidth_gbps:   10.0,
        lag_type:         lag.into(),
    }
}

pub fn down_edge(parent: &str, child: &str, util: f64, lag: &str) -> Edge {
    Edge { link_status: LinkStatus::Down, ..edge(parent, child, util, lag) }
}

/// Scenario A baseline customer: active, XGS-PON, 75% usage, never
/// upgraded or offered.
pub fn customer(id: &str, device: &str) -> Customer {
    Customer {
        customer_id:             id.into(),
        device_id:               device.into(),
        account_status:          AccountStatus::Active,
        olt_technology:          "XGS-PON".into(),
        avg_usage_percentage:    75.0,
        avg_download_usage_mbps: 750.0,
        current_download_mbps:   1000.0,
        last_upgrade_date:       None,
        last_promo_offer_date:   None,
        contact_preference:      Some(ContactPreference::Email),
        first_name:              Some("Test".into()),
        last_name:               Some(id.into()),
        email:                   None,
        phone:                   None,
        address:                 None,
    }
}

pub fn standard(lag: &str, max: f64, notes: &str) -> OversubscriptionStandard {
    OversubscriptionStandard {
        lag_type:            lag.into(),
        max_utilization_pct: max,
        notes:               notes.into(),
    }
}

/// Wire an OLT under its own uplink device: two Up access links averaging
/// `access_util`, and two Up uplink links averaging `uplink_util`.
pub fn wire_device(engine: &UpgradeEngine, olt: &str, access_util: f64, uplink_util: f64) {
    let ult = format!("ULT-{olt}");
    let agg = format!("AGG-{olt}");
    for e in [
        edge(&ult, olt, access_util - 5.0, STANDARD_LAG),
        edge(&ult, olt, access_util + 5.0, STANDARD_LAG),
        edge(&agg, &ult, uplink_util - 2.0, "LAG-UP"),
        edge(&agg, &ult, uplink_util + 2.0, "LAG-UP"),
    ] {
        engine.store.insert_edge(&e).unwrap();
    }
}

/// Scenario A: standard max 80, access 40, uplink 30, one customer.
pub fn scenario_a(max_utilization_pct: f64) -> UpgradeEngine {
    let engine = engine();
    engine
        .store
        .upsert_standard(&standard(STANDARD_LAG, max_utilization_pct, "LAG-S near capacity"))
        .unwrap();
    wire_device(&engine, "OLT-A", 40.0, 30.0);
    engine.store.insert_customer(&customer("C1", "OLT-A")).unwrap();
    engine
}
