//! Oversubscription standards — max tolerable utilization per LAG type.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OversubscriptionStandard {
    pub lag_type:            String,
    pub max_utilization_pct: f64,
    pub notes:               String,
}

/// Immutable lookup for one evaluation batch.
#[derive(Debug, Clone, Default)]
pub struct OversubscriptionStandards {
    by_lag: HashMap<String, OversubscriptionStandard>,
}

impl OversubscriptionStandards {
    /// Later rows with a duplicate LAG type replace earlier ones.
    pub fn new(rows: impl IntoIterator<Item = OversubscriptionStandard>) -> Self {
        let by_lag = rows
            .into_iter()
            .map(|s| (s.lag_type.clone(), s))
            .collect();
        Self { by_lag }
    }

    pub fn standard_for(&self, lag_type: &str) -> Option<&OversubscriptionStandard> {
        self.by_lag.get(lag_type)
    }

    pub fn len(&self) -> usize {
        self.by_lag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_lag.is_empty()
    }
}
