//! Expense aggregation over a receipt collection.
//!
//! Both reductions are fail-soft: records with a missing or unusable date or
//! amount are skipped and counted, never reported as errors.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::models::receipt::ReceiptCollection;

/// Date format expected for receipt dates and range bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date, returning `None` on any mismatch.
///
/// The text must be exactly four year digits, two month digits and two day
/// digits separated by `-`, with no surrounding whitespace.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Records left out of a range total, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RangeSkips {
    /// Date missing or not `YYYY-MM-DD`.
    pub no_date: usize,
    /// Date before the start or after the end.
    pub out_of_range: usize,
    /// Amount missing after normalization.
    pub no_amount: usize,
}

/// Sum of expenses inside an inclusive date range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RangeTotal {
    pub total: f64,
    /// Records that contributed to `total`.
    pub counted: usize,
    pub skipped: RangeSkips,
}

/// Total the amounts of records dated within `start..=end`.
///
/// Bounds are `YYYY-MM-DD` strings. If either fails to parse the result is a
/// zero total with nothing counted.
pub fn range_total(collection: &ReceiptCollection, start: &str, end: &str) -> RangeTotal {
    match (parse_date(start), parse_date(end)) {
        (Some(start), Some(end)) => total_between(collection, start, end),
        _ => {
            debug!("Invalid date range {} to {}, total is zero", start, end);
            RangeTotal::default()
        }
    }
}

/// Total the amounts of records dated within `start..=end`.
pub fn total_between(collection: &ReceiptCollection, start: NaiveDate, end: NaiveDate) -> RangeTotal {
    let mut result = RangeTotal::default();

    for (name, record) in collection.iter() {
        let Some(date) = record.parsed_date() else {
            debug!("Skipping {}: no usable date", name);
            result.skipped.no_date += 1;
            continue;
        };

        if date < start || date > end {
            result.skipped.out_of_range += 1;
            continue;
        }

        let Some(amount) = record.amount else {
            debug!("Skipping {}: no usable amount", name);
            result.skipped.no_amount += 1;
            continue;
        };

        result.total += amount;
        result.counted += 1;
    }

    result
}

/// Expense totals keyed by category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryTotals {
    /// Category name to summed amount. Only categories with at least one
    /// counted record appear.
    pub totals: BTreeMap<String, f64>,
    /// Records left out because their amount was missing.
    pub skipped_no_amount: usize,
}

impl CategoryTotals {
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.totals.get(category).copied()
    }

    /// Sum over every category.
    pub fn grand_total(&self) -> f64 {
        self.totals.values().sum()
    }
}

/// Sum amounts per category. Missing categories count as `"Other"`;
/// names are kept verbatim with no case folding.
pub fn category_totals(collection: &ReceiptCollection) -> CategoryTotals {
    let mut result = CategoryTotals::default();

    for (name, record) in collection.iter() {
        let Some(amount) = record.amount else {
            debug!("Skipping {}: no usable amount", name);
            result.skipped_no_amount += 1;
            continue;
        };

        *result
            .totals
            .entry(record.category_or_default().to_string())
            .or_insert(0.0) += amount;
    }

    result
}
