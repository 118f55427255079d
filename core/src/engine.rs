//! The upgrade engine — entry point for every external operation.
//!
//! OPERATIONS:
//!   - evaluate_eligibility  (read-only, one snapshot per call)
//!   - fetch_topology        (read-only, unknown devices → empty view)
//!   - record_offer          (the only write: last_promo_offer_date)
//!   - list_devices / list_technologies / customer_details
//!
//! RULES:
//!   - Components reach data only through the repository traits.
//!   - "Today" comes from the injected clock, never the wall clock.
//!   - A failed evaluation returns an error and no results.

use crate::{
    campaign::{CampaignNotifier, OfferReceipt},
    catalog,
    clock::{Clock, FixedClock},
    config::EngineConfig,
    customer::Customer,
    device_view::{DeviceTopology, DeviceViewService},
    eligibility::{EligibilityEvaluator, EligibilityReport},
    error::EngineResult,
    filter::FilterCriteria,
    store::BoostStore,
    types::{CustomerId, DeviceId},
};
use chrono::NaiveDate;
use std::time::Duration;

pub struct UpgradeEngine {
    pub store:  BoostStore,
    pub config: EngineConfig,
    clock:      Box<dyn Clock>,
}

impl UpgradeEngine {
    pub fn new(store: BoostStore, config: EngineConfig, clock: Box<dyn Clock>) -> Self {
        Self { store, config, clock }
    }

    /// Migrate the store, seed the configured standards, and wire the engine.
    pub fn build(store: BoostStore, config: EngineConfig, clock: Box<dyn Clock>) -> EngineResult<Self> {
        store.migrate()?;
        store.set_busy_timeout(Duration::from_millis(config.policy.fetch_timeout_ms))?;
        store.seed_standards(&config.standards)?;
        Ok(Self::new(store, config, clock))
    }

    /// In-memory engine with test defaults and a pinned date.
    pub fn build_test(today: NaiveDate) -> EngineResult<Self> {
        Self::build(
            BoostStore::in_memory()?,
            EngineConfig::default_test(),
            Box::new(FixedClock(today)),
        )
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn evaluate_eligibility(&self, criteria: &FilterCriteria) -> EngineResult<EligibilityReport> {
        EligibilityEvaluator::new(
            &self.store,
            &self.store,
            &self.store,
            &self.config.policy,
            self.clock.as_ref(),
        )
        .evaluate(criteria)
    }

    pub fn fetch_topology(&self, device_id: &str) -> EngineResult<DeviceTopology> {
        DeviceViewService::new(
            &self.store,
            &self.store,
            &self.store,
            Duration::from_millis(self.config.policy.fetch_timeout_ms),
        )
        .fetch_topology(device_id)
    }

    pub fn record_offer(&self, customer_ids: &[CustomerId]) -> EngineResult<OfferReceipt> {
        CampaignNotifier::new(&self.store, self.clock.as_ref()).record_offer(customer_ids)
    }

    pub fn list_devices(&self) -> EngineResult<Vec<DeviceId>> {
        catalog::list_devices(&self.store)
    }

    pub fn list_technologies(&self) -> EngineResult<Vec<String>> {
        catalog::list_technologies(&self.store, &self.config.policy)
    }

    pub fn customer_details(&self, customer_id: &str) -> EngineResult<Option<Customer>> {
        catalog::customer_details(&self.store, customer_id)
    }
}
