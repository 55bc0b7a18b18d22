//! Core library for receipt extraction and expense reports.
//!
//! This crate provides:
//! - Directory collection and base64 encoding of receipt images
//! - Field extraction through a vision-capable language model
//! - Amount normalization for noisy model output
//! - Date-range and per-category expense aggregation
//! - JSON, text, and pie chart reports

pub mod aggregate;
pub mod error;
pub mod extraction;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod source;

pub use aggregate::{category_totals, range_total, CategoryTotals, RangeTotal};
pub use error::{ChartError, ExtractionError, Result, TallyError};
pub use extraction::{OpenAiExtractor, ReceiptExtractor};
pub use models::config::TallyConfig;
pub use models::receipt::{ReceiptCollection, ReceiptFields, ReceiptRecord, CATEGORIES};
pub use normalize::normalize_amount;
pub use pipeline::{collect_files, process_directory, process_files};
pub use source::ReceiptFile;
