//! Receipt image sources: directory listing and payload encoding.

mod collector;
mod encoder;

pub use collector::{list_files, ReceiptFile};
pub use encoder::{encode_bytes, encode_file};
