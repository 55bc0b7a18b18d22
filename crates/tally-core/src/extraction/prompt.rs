//! Instruction prompt and reply parsing.

use serde_json::Value;

use crate::error::ExtractionError;
use crate::models::receipt::{ReceiptFields, CATEGORIES};

use super::Result;

/// Build the fixed instruction sent alongside every receipt image.
///
/// Changing the field list, the category enumeration, or the "one JSON
/// object only" wording changes what the model returns.
pub fn extraction_prompt() -> String {
    format!(
        r#"
You are an information extraction system.
Extract ONLY the following fields from the receipt image:

date: the receipt date as a string
amount: the total amount paid as it appears on the receipt
vendor: the merchant or vendor name
category: one of [{}]

Return EXACTLY one JSON object with these four keys and NOTHING ELSE.
Do not include explanations, comments, or formatting.
Do not wrap the JSON in markdown.
If a field cannot be determined, use null.

The output must be valid JSON.
"#,
        CATEGORIES.join(", ")
    )
}

/// Parse the model's textual reply into receipt fields.
///
/// The reply must be a single JSON object. Missing keys are absent fields;
/// anything else (prose, fenced markdown, arrays) is an error.
pub fn parse_reply(content: &str) -> Result<ReceiptFields> {
    let value: Value =
        serde_json::from_str(content).map_err(|source| ExtractionError::InvalidJson {
            source,
            content: content.to_string(),
        })?;

    if !value.is_object() {
        return Err(ExtractionError::NotAnObject(content.to_string()));
    }

    serde_json::from_value(value).map_err(|source| ExtractionError::InvalidJson {
        source,
        content: content.to_string(),
    })
}
