//! Data-source seams.
//!
//! RULE: The evaluator, notifier, and topology service reach customer,
//! topology, and standards data only through these traits. The caller
//! owns the concrete source and its lifecycle.

use crate::{
    customer::Customer,
    error::EngineResult,
    standards::OversubscriptionStandard,
    topology::Edge,
    types::CustomerId,
};
use chrono::NaiveDate;

pub trait CustomerRepository {
    /// Every customer, in a stable source order.
    fn all_customers(&self) -> EngineResult<Vec<Customer>>;

    fn customer(&self, customer_id: &str) -> EngineResult<Option<Customer>>;

    fn customers_on_device(&self, device_id: &str) -> EngineResult<Vec<Customer>>;

    /// Set `last_promo_offer_date` for every existing id, reading the
    /// affected rows in the same transaction. Unknown ids are skipped.
    /// Returns the updated customers in request order.
    fn record_promo_offers(
        &self,
        customer_ids: &[CustomerId],
        offered_on: NaiveDate,
    ) -> EngineResult<Vec<Customer>>;
}

pub trait TopologySource {
    /// Every edge, in ingestion order.
    fn all_edges(&self) -> EngineResult<Vec<Edge>>;

    /// Edges where the device is parent or child.
    fn edges_touching(&self, device_id: &str) -> EngineResult<Vec<Edge>>;
}

pub trait StandardsSource {
    fn standards(&self) -> EngineResult<Vec<OversubscriptionStandard>>;
}
