//! Tests for BSON conversion utilities

use super::helpers::*;
use super::*;
use mongodb::bson::{Binary, Bson, DateTime, doc, oid::ObjectId, spec::BinarySubtype};
use serde_json::{Value as JsonValue, json};

// ===== Helper Function Tests =====

#[test]
fn test_datetime_to_iso_string() {
    let dt = DateTime::from_millis(0);
    assert!(datetime_to_iso_string(&dt).starts_with("1970-01-01T00:00:00"));
}

#[test]
fn test_binary_conversions() {
    let bin = Binary {
        subtype: BinarySubtype::Generic,
        bytes: vec![0x01, 0x02, 0x03, 0xff],
    };

    assert_eq!(binary_to_hex(&bin), "010203ff");
    assert_eq!(binary_to_base64(&bin), "AQID/w==");
}

#[test]
fn test_format_double_smart() {
    assert_eq!(format_double_smart(3.0), "3");
    assert_eq!(format_double_smart(2.5), "2.5");
    assert_eq!(format_double_smart(-0.125), "-0.125");
}

// ===== PlainTextConverter Tests =====

#[test]
fn test_plain_text_scalars() {
    let converter = PlainTextConverter::new();
    assert_eq!(converter.convert(&Bson::String("test".to_string())), "test");
    assert_eq!(converter.convert(&Bson::Int32(42)), "42");
    assert_eq!(converter.convert(&Bson::Int64(100)), "100");
    assert_eq!(converter.convert(&Bson::Double(1.5)), "1.5");
    assert_eq!(converter.convert(&Bson::Boolean(true)), "true");
    assert_eq!(converter.convert(&Bson::Null), "");
    assert_eq!(converter.convert_optional(None), "");
}

#[test]
fn test_plain_text_object_id_is_hex() {
    let converter = PlainTextConverter::new();
    let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
    assert_eq!(
        converter.convert(&Bson::ObjectId(oid)),
        "507f1f77bcf86cd799439011"
    );
}

#[test]
fn test_plain_text_nested_values_are_compact_json() {
    let converter = PlainTextConverter::new();

    let arr = Bson::Array(vec![Bson::Int32(1), Bson::String("a".into())]);
    assert_eq!(converter.convert(&arr), r#"[1,"a"]"#);

    let nested = doc! { "k": 1, "inner": { "x": true } };
    assert_eq!(
        converter.convert_document(&nested),
        r#"{"k":1,"inner":{"x":true}}"#
    );
}

// ===== JsonConverter Tests =====

#[test]
fn test_json_converter_scalars() {
    let converter = JsonConverter::new();
    assert_eq!(converter.convert(&Bson::Int32(42)), json!(42));
    assert_eq!(converter.convert(&Bson::Int64(1 << 40)), json!(1_i64 << 40));
    assert_eq!(converter.convert(&Bson::Boolean(false)), json!(false));
    assert_eq!(converter.convert(&Bson::Null), JsonValue::Null);
    assert_eq!(converter.convert(&Bson::Double(f64::NAN)), JsonValue::Null);
}

#[test]
fn test_json_converter_bson_types() {
    let converter = JsonConverter::new();

    let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
    assert_eq!(
        converter.convert(&Bson::ObjectId(oid)),
        json!("507f1f77bcf86cd799439011")
    );

    let dt = DateTime::from_millis(86_400_000);
    let JsonValue::String(iso) = converter.convert(&Bson::DateTime(dt)) else {
        panic!("Expected date string");
    };
    assert!(iso.starts_with("1970-01-02T00:00:00"));
}

#[test]
fn test_json_converter_preserves_field_order() {
    let converter = JsonConverter::new();
    let value = converter.convert_document(&doc! { "z": 1, "a": [1, 2], "m": { "n": null } });

    let JsonValue::Object(map) = value else {
        panic!("Expected JSON object");
    };
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    assert_eq!(map["a"], json!([1, 2]));
    assert_eq!(map["m"], json!({ "n": null }));
}
