//! Strategy implementations for BSON conversion

use mongodb::bson::{Binary, Bson, DateTime, Decimal128, Document, Regex, Timestamp, oid::ObjectId};
use serde_json::{Value as JsonValue, json};

use super::converter::{BsonConverter, BsonJsonConverter, BsonStringConverter};
use super::helpers::*;

/// Plain text converter for spreadsheet cells
///
/// Scalars become their natural text; arrays and documents become compact
/// JSON built with [`JsonConverter`]; null becomes the empty string.
#[derive(Default)]
pub struct PlainTextConverter {
    json: JsonConverter,
}

impl PlainTextConverter {
    pub fn new() -> Self {
        Self::default()
    }

    fn compact_json(&self, value: &Bson) -> String {
        serde_json::to_string(&self.json.convert(value)).unwrap_or_default()
    }
}

impl BsonConverter for PlainTextConverter {
    type Output = String;

    fn convert(&self, value: &Bson) -> String {
        self.convert_to_string(value)
    }
}

impl BsonStringConverter for PlainTextConverter {
    fn format_string(&self, s: &str) -> String {
        s.to_string()
    }

    fn format_int32(&self, n: i32) -> String {
        n.to_string()
    }

    fn format_int64(&self, n: i64) -> String {
        n.to_string()
    }

    fn format_double(&self, f: f64) -> String {
        format_double_smart(f)
    }

    fn format_boolean(&self, b: bool) -> String {
        b.to_string()
    }

    fn format_null(&self) -> String {
        String::new()
    }

    fn format_object_id(&self, oid: &ObjectId) -> String {
        oid.to_hex()
    }

    fn format_datetime(&self, dt: &DateTime) -> String {
        datetime_to_iso_string(dt)
    }

    fn format_decimal128(&self, d: &Decimal128) -> String {
        d.to_string()
    }

    fn format_array(&self, arr: &[Bson]) -> String {
        self.compact_json(&Bson::Array(arr.to_vec()))
    }

    fn format_document(&self, doc: &Document) -> String {
        self.compact_json(&Bson::Document(doc.clone()))
    }

    fn format_binary(&self, bin: &Binary) -> String {
        binary_to_hex(bin)
    }

    fn format_regex(&self, regex: &Regex) -> String {
        format!("/{}/{}", regex.pattern, regex.options)
    }

    fn format_timestamp(&self, ts: &Timestamp) -> String {
        format!("Timestamp({}, {})", ts.time, ts.increment)
    }

    fn format_unknown(&self, value: &Bson) -> String {
        self.compact_json(value)
    }
}

/// JSON value converter
///
/// Flattens BSON-specific types into plain JSON: ObjectId → hex string,
/// DateTime → RFC 3339 string, Binary → base64 string.
#[derive(Default)]
pub struct JsonConverter;

impl JsonConverter {
    pub fn new() -> Self {
        Self
    }
}

impl BsonConverter for JsonConverter {
    type Output = JsonValue;

    fn convert(&self, value: &Bson) -> JsonValue {
        self.convert_to_json(value)
    }
}

impl BsonJsonConverter for JsonConverter {
    fn convert_object_id(&self, oid: &ObjectId) -> JsonValue {
        JsonValue::String(oid.to_hex())
    }

    fn convert_datetime(&self, dt: &DateTime) -> JsonValue {
        JsonValue::String(datetime_to_iso_string(dt))
    }

    // Exact decimal text, never an f64.
    fn convert_decimal128(&self, d: &Decimal128) -> JsonValue {
        JsonValue::String(d.to_string())
    }

    fn convert_binary(&self, bin: &Binary) -> JsonValue {
        JsonValue::String(binary_to_base64(bin))
    }

    fn convert_regex(&self, regex: &Regex) -> JsonValue {
        JsonValue::String(format!("/{}/{}", regex.pattern, regex.options))
    }

    fn convert_timestamp(&self, ts: &Timestamp) -> JsonValue {
        json!({ "t": ts.time, "i": ts.increment })
    }
}
