//! Receipt field extraction through a vision-capable language model.

mod openai;
mod prompt;

pub use openai::OpenAiExtractor;
pub use prompt::{extraction_prompt, parse_reply};

use std::future::Future;

use crate::error::ExtractionError;
use crate::models::receipt::ReceiptFields;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for receipt field extractors.
pub trait ReceiptExtractor {
    /// Extract the four receipt fields from a base64-encoded image.
    fn extract(&self, image_b64: &str) -> impl Future<Output = Result<ReceiptFields>>;
}
