//! Campaign notifier — records that an upgrade offer went out.
//!
//! No message is sent. The only state change is
//! `last_promo_offer_date = today` for each existing customer, which is
//! idempotent within a day and last-write-wins across concurrent calls.

use crate::{
    clock::Clock,
    customer::{ContactPreference, Customer},
    error::{EngineError, EngineResult},
    repository::CustomerRepository,
    types::CustomerId,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferReceipt {
    /// Distinct ids asked for.
    pub requested:         usize,
    pub recorded:          Vec<Customer>,
    pub channel_breakdown: BTreeMap<ContactPreference, usize>,
}

impl OfferReceipt {
    pub fn recorded_count(&self) -> usize {
        self.recorded.len()
    }

    /// Requested ids that matched no customer.
    pub fn missing_count(&self) -> usize {
        self.requested.saturating_sub(self.recorded.len())
    }
}

pub struct CampaignNotifier<'a> {
    customers: &'a dyn CustomerRepository,
    clock:     &'a dyn Clock,
}

impl<'a> CampaignNotifier<'a> {
    pub fn new(customers: &'a dyn CustomerRepository, clock: &'a dyn Clock) -> Self {
        Self { customers, clock }
    }

    pub fn record_offer(&self, customer_ids: &[CustomerId]) -> EngineResult<OfferReceipt> {
        let mut seen = HashSet::new();
        let ids: Vec<CustomerId> = customer_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .filter(|id| seen.insert(*id))
            .map(str::to_string)
            .collect();
        if ids.is_empty() {
            return Err(EngineError::validation("customer_ids", "at least one customer id is required"));
        }

        let today = self.clock.today();
        let recorded = self.customers.record_promo_offers(&ids, today)?;
        let channel_breakdown = channel_breakdown(&recorded);

        for c in &recorded {
            log::info!(
                "campaign: offer recorded for {} ({}) via {}",
                c.display_name(),
                c.customer_id,
                c.offer_channel()
            );
        }
        if recorded.len() < ids.len() {
            log::warn!(
                "campaign: {} of {} requested customers not found",
                ids.len() - recorded.len(),
                ids.len()
            );
        }

        Ok(OfferReceipt {
            requested: ids.len(),
            recorded,
            channel_breakdown,
        })
    }
}

/// Tally offer channels. Every channel is present, zero or not.
pub fn channel_breakdown(customers: &[Customer]) -> BTreeMap<ContactPreference, usize> {
    let mut out: BTreeMap<ContactPreference, usize> =
        ContactPreference::ALL.iter().map(|p| (*p, 0)).collect();
    for c in customers {
        *out.entry(c.offer_channel()).or_default() += 1;
    }
    out
}
