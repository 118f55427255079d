//! Broadband upgrade eligibility engine.
//!
//! Combines per-customer usage, a two-level topology utilization rollup,
//! and oversubscription standards to find subscribers who can take a
//! faster plan, and records when an offer was made to them.

pub mod aggregation;
pub mod campaign;
pub mod capacity;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod customer;
pub mod device_view;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod filter;
pub mod name_generator;
pub mod repository;
pub mod rng;
pub mod seed;
pub mod snapshot;
pub mod standards;
pub mod store;
pub mod topology;
pub mod types;
pub mod view;
