//! BSON value conversion utilities
//!
//! Two conversion strategies share the `BsonConverter` trait:
//! - [`PlainTextConverter`]: text for spreadsheet and CSV cells
//! - [`JsonConverter`]: `serde_json::Value` for JSON responses
//!
//! Both flatten BSON-only types the same way (ObjectId as hex, dates as
//! RFC 3339, binary as base64 or hex) so a value reads the same in either
//! output.

mod converter;
mod helpers;
mod strategies;

pub use converter::BsonConverter;
pub use helpers::datetime_to_iso_string;
pub use strategies::{JsonConverter, PlainTextConverter};

#[cfg(test)]
mod tests;
