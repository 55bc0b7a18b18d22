//! Receipt data models.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::aggregate::parse_date;
use crate::normalize::normalize_amount;

/// Expense categories the extraction prompt offers to the model.
pub const CATEGORIES: [&str; 6] = [
    "Meals",
    "Transport",
    "Lodging",
    "Office Supplies",
    "Entertainment",
    "Other",
];

/// Bucket used when a record carries no category at all.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Check whether a category is one of [`CATEGORIES`] (exact, case-sensitive).
pub fn is_known_category(category: &str) -> bool {
    CATEGORIES.contains(&category)
}

/// Raw fields as returned by the extraction service, before normalization.
///
/// Every field may be missing or `null`. Text fields accept numbers and
/// booleans by taking their textual form; nested values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptFields {
    /// Receipt date, ideally `YYYY-MM-DD`.
    #[serde(deserialize_with = "lenient_text")]
    pub date: Option<String>,

    /// Total amount exactly as the model produced it.
    pub amount: Option<Value>,

    /// Merchant name.
    #[serde(deserialize_with = "lenient_text")]
    pub vendor: Option<String>,

    /// Expense category.
    #[serde(deserialize_with = "lenient_text")]
    pub category: Option<String>,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }))
}

/// A normalized receipt, one per processed file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    /// Receipt date string, unparsed.
    pub date: Option<String>,

    /// Amount coerced to a number, absent when it could not be.
    pub amount: Option<f64>,

    /// Merchant name.
    pub vendor: Option<String>,

    /// Category, accepted verbatim.
    pub category: Option<String>,
}

impl ReceiptRecord {
    /// Build a record from raw extraction output, normalizing the amount.
    pub fn from_fields(fields: ReceiptFields) -> Self {
        Self {
            amount: normalize_amount(fields.amount.as_ref()),
            date: fields.date,
            vendor: fields.vendor,
            category: fields.category,
        }
    }

    /// The record's date parsed as `YYYY-MM-DD`, if present and valid.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_date)
    }

    /// Category used for aggregation; only a missing value maps to [`DEFAULT_CATEGORY`].
    pub fn category_or_default(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }
}

impl From<ReceiptFields> for ReceiptRecord {
    fn from(fields: ReceiptFields) -> Self {
        Self::from_fields(fields)
    }
}

/// All receipts of one run, keyed by file name.
///
/// Built once by the pipeline and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptCollection {
    records: BTreeMap<String, ReceiptRecord>,
}

impl ReceiptCollection {
    /// Look up the record for a file name.
    pub fn get(&self, filename: &str) -> Option<&ReceiptRecord> {
        self.records.get(filename)
    }

    /// Iterate over `(filename, record)` pairs in file name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReceiptRecord)> {
        self.records.iter().map(|(name, record)| (name.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<BTreeMap<String, ReceiptRecord>> for ReceiptCollection {
    fn from(records: BTreeMap<String, ReceiptRecord>) -> Self {
        Self { records }
    }
}

impl<K: Into<String>> FromIterator<(K, ReceiptRecord)> for ReceiptCollection {
    fn from_iter<I: IntoIterator<Item = (K, ReceiptRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
