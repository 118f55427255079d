//! Stateless presentation transforms over an already ranked result list.
//!
//! These never re-derive eligibility: they only reorder and slice what
//! the evaluator returned.

use crate::eligibility::EligibilityResult;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    AccessUtilization,
    UplinkUtilization,
    UsagePercentage,
    DownloadUsage,
    CurrentSpeed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortColumn {
    fn key(self, r: &EligibilityResult) -> Option<f64> {
        match self {
            SortColumn::AccessUtilization => Some(r.access_rollup.avg_utilization_pct),
            SortColumn::UplinkUtilization => r.uplink_rollup.as_ref().map(|u| u.avg_utilization_pct),
            SortColumn::UsagePercentage => Some(r.customer.avg_usage_percentage),
            SortColumn::DownloadUsage => Some(r.customer.avg_download_usage_mbps),
            SortColumn::CurrentSpeed => Some(r.customer.current_download_mbps),
        }
    }
}

/// Re-sort by one column. Stable, so equal keys keep the ranked order.
/// Rows missing the column sort last in either direction.
pub fn sorted_by(
    results: &[EligibilityResult],
    column: SortColumn,
    direction: SortDirection,
) -> Vec<&EligibilityResult> {
    let mut out: Vec<&EligibilityResult> = results.iter().collect();
    out.sort_by(|a, b| match (column.key(a), column.key(b)) {
        (Some(x), Some(y)) => match direction {
            SortDirection::Asc => x.total_cmp(&y),
            SortDirection::Desc => y.total_cmp(&x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a, T> {
    /// 1-based.
    pub page:        usize,
    pub per_page:    usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub items:       &'a [T],
}

/// Slice out one 1-based page. Pages past the end are empty.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let total_pages = items.len().div_ceil(per_page);
    let start = (page - 1).saturating_mul(per_page).min(items.len());
    let end = start.saturating_add(per_page).min(items.len());
    Page {
        page,
        per_page,
        total_items: items.len(),
        total_pages,
        items: &items[start..end],
    }
}
