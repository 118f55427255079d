//! Shared primitive types used across the engine.

/// A network device identifier (OLT, uplink, or aggregation device).
pub type DeviceId = String;

/// A stable, unique customer identifier.
pub type CustomerId = String;

/// A link-aggregation-group classification, e.g. "LAG-4x10G".
pub type LagType = String;
