//! Demo dataset generation.
//!
//! Builds a three-level topology (aggregation → uplink → OLT), a
//! population of subscribers on the OLTs, and loads both plus the
//! configured standards into a store. Same seed, same dataset.

use crate::{
    customer::{AccountStatus, ContactPreference, Customer},
    error::EngineResult,
    name_generator::NameGenerator,
    rng::{RngBank, SeedRng, SeedStream},
    standards::OversubscriptionStandard,
    store::BoostStore,
    topology::{Edge, LinkStatus},
};
use chrono::{Days, NaiveDate};

#[derive(Debug, Clone)]
pub struct SeedPlan {
    pub aggregation_devices:     usize,
    pub uplinks_per_aggregation: usize,
    pub olts_per_uplink:         usize,
    pub links_per_olt:           usize,
    pub customers_per_olt:       usize,
    /// Reference date that upgrade and offer dates count back from.
    pub as_of:                   NaiveDate,
}

impl SeedPlan {
    pub fn small(as_of: NaiveDate) -> Self {
        Self {
            aggregation_devices:     2,
            uplinks_per_aggregation: 2,
            olts_per_uplink:         3,
            links_per_olt:           4,
            customers_per_olt:       8,
            as_of,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DemoDataset {
    pub edges:     Vec<Edge>,
    pub customers: Vec<Customer>,
}

const TECHNOLOGIES: &[&str] = &["XGS-PON", "XGS-PON", "25XGS-PON", "GPON"];
const PLAN_SPEEDS_MBPS: &[f64] = &[300.0, 500.0, 1000.0, 2000.0, 5000.0];

impl DemoDataset {
    pub fn generate(seed: u64, plan: &SeedPlan, standards: &[OversubscriptionStandard]) -> Self {
        let bank = RngBank::new(seed);
        let mut topo_rng = bank.for_stream(SeedStream::Topology);
        let mut cust_rng = bank.for_stream(SeedStream::Customer);
        let mut contact_rng = bank.for_stream(SeedStream::Contact);

        let mut lag_types: Vec<String> = standards.iter().map(|s| s.lag_type.clone()).collect();
        // One LAG type with no standard, so some devices resolve to nothing.
        lag_types.push("LAG-UNRATED".into());

        let mut edges = Vec::new();
        let mut olts = Vec::new();

        for a in 1..=plan.aggregation_devices {
            let agg = format!("AGG-{a:02}");
            for u in 1..=plan.uplinks_per_aggregation {
                let ult = format!("ULT-{a:02}{u:02}");
                let uplink_lag = topo_rng.pick(&lag_types).clone();
                let uplink_base = topo_rng.range_f64(20.0, 98.0);
                for _ in 0..2 {
                    edges.push(random_edge(&mut topo_rng, &agg, &ult, uplink_base, 100.0, &uplink_lag));
                }

                for o in 1..=plan.olts_per_uplink {
                    let olt = format!("OLT-{a:02}{u:02}{o:02}");
                    let lag = topo_rng.pick(&lag_types).clone();
                    let base = topo_rng.range_f64(15.0, 85.0);
                    for _ in 0..plan.links_per_olt {
                        let link_lag = if topo_rng.chance(0.08) {
                            topo_rng.pick(&lag_types).clone()
                        } else {
                            lag.clone()
                        };
                        edges.push(random_edge(&mut topo_rng, &ult, &olt, base, 10.0, &link_lag));
                    }
                    olts.push(olt);
                }
            }
        }

        let mut customers = Vec::new();
        let mut next_id = 100_000_001u64;
        for olt in &olts {
            for _ in 0..plan.customers_per_olt {
                let id = next_id.to_string();
                next_id += 1;
                customers.push(random_customer(&mut cust_rng, &mut contact_rng, id, olt, plan.as_of));
            }
        }

        log::info!(
            "seed: generated {} edges over {} OLTs and {} customers (seed={seed})",
            edges.len(),
            olts.len(),
            customers.len()
        );
        Self { edges, customers }
    }

    /// Write standards, edges, and customers into a migrated store.
    pub fn load_into(
        &self,
        store: &BoostStore,
        standards: &[OversubscriptionStandard],
    ) -> EngineResult<()> {
        store.seed_standards(standards)?;
        for e in &self.edges {
            store.insert_edge(e)?;
        }
        for c in &self.customers {
            store.insert_customer(c)?;
        }
        Ok(())
    }
}

fn random_edge(
    rng: &mut SeedRng,
    parent: &str,
    child: &str,
    base_utilization: f64,
    bandwidth_gbps: f64,
    lag_type: &str,
) -> Edge {
    let link_status = if rng.chance(0.92) { LinkStatus::Up } else { LinkStatus::Down };
    Edge {
        parent_device_id: parent.to_string(),
        child_device_id:  child.to_string(),
        link_status,
        utilization_pct:  (base_utilization + rng.range_f64(-10.0, 10.0)).clamp(0.0, 100.0),
        bandwidth_gbps,
        lag_type:         lag_type.to_string(),
    }
}

fn random_customer(
    rng: &mut SeedRng,
    contact_rng: &mut SeedRng,
    customer_id: String,
    device_id: &str,
    as_of: NaiveDate,
) -> Customer {
    let roll = rng.next_f64();
    let account_status = if roll < 0.90 {
        AccountStatus::Active
    } else if roll < 0.97 {
        AccountStatus::Suspended
    } else {
        AccountStatus::Closed
    };

    let current = *rng.pick(PLAN_SPEEDS_MBPS);
    let usage = rng.range_f64(20.0, 98.0);

    let last_upgrade_date = if rng.chance(0.4) {
        as_of.checked_sub_days(Days::new(rng.next_u64_below(720)))
    } else {
        None
    };
    let last_promo_offer_date = if rng.chance(0.3) {
        as_of.checked_sub_days(Days::new(rng.next_u64_below(180)))
    } else {
        None
    };

    let first = NameGenerator::first_name(rng);
    let last = NameGenerator::last_name(rng);

    Customer {
        email:                   Some(NameGenerator::email(first, last, &customer_id)),
        phone:                   Some(NameGenerator::phone(rng)),
        address:                 Some(NameGenerator::address(rng)),
        first_name:              Some(first.to_string()),
        last_name:               Some(last.to_string()),
        customer_id,
        device_id:               device_id.to_string(),
        account_status,
        olt_technology:          rng.pick(TECHNOLOGIES).to_string(),
        avg_usage_percentage:    usage,
        avg_download_usage_mbps: current * usage / 100.0,
        current_download_mbps:   current,
        last_upgrade_date,
        last_promo_offer_date,
        contact_preference:      Some(contact_preference(contact_rng)),
    }
}

/// Phone on the first draw under 0.30, else email on a second
/// independent draw under 0.60, else text.
fn contact_preference(rng: &mut SeedRng) -> ContactPreference {
    if rng.chance(0.30) {
        ContactPreference::Phone
    } else if rng.chance(0.60) {
        ContactPreference::Email
    } else {
        ContactPreference::Text
    }
}
