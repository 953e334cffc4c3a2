//! Core converter traits for BSON value conversion

use mongodb::bson::{Binary, Bson, DateTime, Decimal128, Document, Regex, Timestamp, oid::ObjectId};
use serde_json::Value as JsonValue;

/// Core trait for BSON value conversion
pub trait BsonConverter {
    /// Output type of the conversion
    type Output;

    /// Convert a BSON value to the output type
    fn convert(&self, value: &Bson) -> Self::Output;

    /// Convert an optional BSON value, using the output's default for `None`
    fn convert_optional(&self, value: Option<&Bson>) -> Self::Output
    where
        Self::Output: Default,
    {
        value.map(|v| self.convert(v)).unwrap_or_default()
    }

    /// Convert a BSON document
    fn convert_document(&self, doc: &Document) -> Self::Output {
        self.convert(&Bson::Document(doc.clone()))
    }
}

/// String-producing converter with one hook per BSON type
pub trait BsonStringConverter {
    fn format_string(&self, s: &str) -> String;
    fn format_int32(&self, n: i32) -> String;
    fn format_int64(&self, n: i64) -> String;
    fn format_double(&self, f: f64) -> String;
    fn format_boolean(&self, b: bool) -> String;
    fn format_null(&self) -> String;
    fn format_object_id(&self, oid: &ObjectId) -> String;
    fn format_datetime(&self, dt: &DateTime) -> String;
    fn format_decimal128(&self, d: &Decimal128) -> String;
    fn format_array(&self, arr: &[Bson]) -> String;
    fn format_document(&self, doc: &Document) -> String;
    fn format_binary(&self, bin: &Binary) -> String;
    fn format_regex(&self, regex: &Regex) -> String;
    fn format_timestamp(&self, ts: &Timestamp) -> String;
    fn format_unknown(&self, value: &Bson) -> String;

    /// Convert BSON value to string (provided implementation)
    fn convert_to_string(&self, value: &Bson) -> String {
        match value {
            Bson::String(s) => self.format_string(s),
            Bson::Int32(n) => self.format_int32(*n),
            Bson::Int64(n) => self.format_int64(*n),
            Bson::Double(f) => self.format_double(*f),
            Bson::Boolean(b) => self.format_boolean(*b),
            Bson::Null | Bson::Undefined => self.format_null(),
            Bson::ObjectId(oid) => self.format_object_id(oid),
            Bson::DateTime(dt) => self.format_datetime(dt),
            Bson::Decimal128(d) => self.format_decimal128(d),
            Bson::Array(arr) => self.format_array(arr),
            Bson::Document(doc) => self.format_document(doc),
            Bson::Binary(bin) => self.format_binary(bin),
            Bson::RegularExpression(regex) => self.format_regex(regex),
            Bson::Timestamp(ts) => self.format_timestamp(ts),
            _ => self.format_unknown(value),
        }
    }
}

/// JSON-producing converter with hooks for the BSON-only types
pub trait BsonJsonConverter {
    fn convert_object_id(&self, oid: &ObjectId) -> JsonValue;
    fn convert_datetime(&self, dt: &DateTime) -> JsonValue;
    fn convert_decimal128(&self, d: &Decimal128) -> JsonValue;
    fn convert_binary(&self, bin: &Binary) -> JsonValue;
    fn convert_regex(&self, regex: &Regex) -> JsonValue;
    fn convert_timestamp(&self, ts: &Timestamp) -> JsonValue;

    /// Convert BSON value to JSON (provided implementation)
    fn convert_to_json(&self, value: &Bson) -> JsonValue {
        match value {
            Bson::String(s) => JsonValue::String(s.clone()),
            Bson::Int32(n) => JsonValue::Number((*n).into()),
            Bson::Int64(n) => JsonValue::Number((*n).into()),
            Bson::Double(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Bson::Boolean(b) => JsonValue::Bool(*b),
            Bson::Null | Bson::Undefined => JsonValue::Null,
            Bson::ObjectId(oid) => self.convert_object_id(oid),
            Bson::DateTime(dt) => self.convert_datetime(dt),
            Bson::Decimal128(d) => self.convert_decimal128(d),
            Bson::Array(arr) => {
                JsonValue::Array(arr.iter().map(|v| self.convert_to_json(v)).collect())
            }
            Bson::Document(doc) => JsonValue::Object(
                doc.iter()
                    .map(|(k, v)| (k.clone(), self.convert_to_json(v)))
                    .collect(),
            ),
            Bson::Binary(bin) => self.convert_binary(bin),
            Bson::RegularExpression(regex) => self.convert_regex(regex),
            Bson::Timestamp(ts) => self.convert_timestamp(ts),
            Bson::MinKey => JsonValue::String("MinKey".to_string()),
            Bson::MaxKey => JsonValue::String("MaxKey".to_string()),
            _ => JsonValue::String(format!("{:?}", value)),
        }
    }
}
