//! Output representations of query results
//!
//! - [`json`]: records as JSON text for query and resource responses
//! - [`table`]: records projected to a rectangular [`Table`] for export
//! - [`bson_utils`]: shared BSON-to-JSON and BSON-to-text conversion

pub mod bson_utils;
pub mod json;
pub mod table;

pub use json::JsonFormatter;
pub use table::{Cell, Table, project};
