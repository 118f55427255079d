//! Customer records as read from the customer source.
//!
//! The engine only ever writes `last_promo_offer_date`; every other field
//! is owned by the upstream customer system.

use crate::types::{CustomerId, DeviceId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountStatus {
    Active,
    Suspended,
    Closed,
    Other(String),
}

impl AccountStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "Active"    => AccountStatus::Active,
            "Suspended" => AccountStatus::Suspended,
            "Closed"    => AccountStatus::Closed,
            other       => AccountStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AccountStatus::Active    => "Active",
            AccountStatus::Suspended => "Suspended",
            AccountStatus::Closed    => "Closed",
            AccountStatus::Other(s)  => s,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactPreference {
    Email,
    Phone,
    Text,
}

impl ContactPreference {
    pub const ALL: [ContactPreference; 3] = [
        ContactPreference::Email,
        ContactPreference::Phone,
        ContactPreference::Text,
    ];

    /// Unknown or empty values are treated as unset.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" => Some(ContactPreference::Email),
            "phone" => Some(ContactPreference::Phone),
            "text"  => Some(ContactPreference::Text),
            _       => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactPreference::Email => "email",
            ContactPreference::Phone => "phone",
            ContactPreference::Text  => "text",
        }
    }
}

impl fmt::Display for ContactPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id:             CustomerId,
    pub device_id:               DeviceId,
    pub account_status:          AccountStatus,
    pub olt_technology:          String,
    pub avg_usage_percentage:    f64,
    pub avg_download_usage_mbps: f64,
    pub current_download_mbps:   f64,
    pub last_upgrade_date:       Option<NaiveDate>,
    pub last_promo_offer_date:   Option<NaiveDate>,
    pub contact_preference:      Option<ContactPreference>,
    // Display-only contact fields.
    pub first_name:              Option<String>,
    pub last_name:               Option<String>,
    pub email:                   Option<String>,
    pub phone:                   Option<String>,
    pub address:                 Option<String>,
}

impl Customer {
    /// The channel an offer would go out on. Unset preference means email.
    pub fn offer_channel(&self) -> ContactPreference {
        self.contact_preference.unwrap_or(ContactPreference::Email)
    }

    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(f), Some(l)) => format!("{f} {l}"),
            (Some(n), None) | (None, Some(n)) => n.clone(),
            (None, None) => self.customer_id.clone(),
        }
    }
}
