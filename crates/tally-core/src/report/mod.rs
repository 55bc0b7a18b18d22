//! Output formats for a processed collection.

mod chart;

pub use chart::{pie_slices, render_pie_chart, ChartOutcome, PieSlice, PALETTE};

use crate::models::receipt::ReceiptCollection;

/// Serialize the whole collection as 2-space indented JSON.
pub fn to_json(collection: &ReceiptCollection) -> serde_json::Result<String> {
    serde_json::to_string_pretty(collection)
}

/// One-line summary of a range total, e.g. `Total expenses from A to B: $12.30`.
pub fn format_range_total(start: &str, end: &str, total: f64) -> String {
    format!("Total expenses from {start} to {end}: ${total:.2}")
}
