//! JSON serialization of query results
//!
//! Result documents are flattened to plain JSON (see [`JsonConverter`]) and
//! rendered as a single pretty-printed array with two-space indentation.

use mongodb::bson::Document;
use serde_json::Value;

use super::bson_utils::{BsonConverter, JsonConverter};
use crate::error::{ExecutionError, Result};

/// JSON formatter for record sequences
pub struct JsonFormatter {
    /// Enable pretty printing
    pretty: bool,

    /// Converter for BSON to JSON
    converter: JsonConverter,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(pretty: bool) -> Self {
        Self {
            pretty,
            converter: JsonConverter::new(),
        }
    }

    /// Convert records to a JSON array value
    pub fn to_value(&self, docs: &[Document]) -> Value {
        Value::Array(docs.iter().map(|d| self.converter.convert_document(d)).collect())
    }

    /// Render records as JSON text
    pub fn format_documents(&self, docs: &[Document]) -> Result<String> {
        let value = self.to_value(docs);
        let text = if self.pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        };
        text.map_err(|e| ExecutionError::Conversion(e.to_string()).into())
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new(true)
    }
}
