//! OTLP utility functions
//!
//! Provides reusable functions for working with OTLP protobuf types:
//! - Attribute lookup by key (typed accessors)
//! - Attribute insertion with replace-on-existing-key semantics
//! - Number data point value access

use opentelemetry_proto::tonic::common::v1::{AnyValue, KeyValue, any_value};
use opentelemetry_proto::tonic::metrics::v1::{NumberDataPoint, number_data_point};

// ============================================================================
// SHARED ATTRIBUTE KEYS
// ============================================================================

/// Data point attribute keys read from host-metrics input
pub mod keys {
    pub const STATE: &str = "state";
    pub const DIRECTION: &str = "direction";
    pub const DATA_STREAM_DATASET: &str = "data_stream.dataset";
}

// ============================================================================
// ATTRIBUTE LOOKUP
// ============================================================================

/// Find the raw value stored under `key`
pub fn get_attribute<'a>(attrs: &'a [KeyValue], key: &str) -> Option<&'a any_value::Value> {
    attrs
        .iter()
        .find(|kv| kv.key == key)
        .and_then(|kv| kv.value.as_ref())
        .and_then(|v| v.value.as_ref())
}

/// String attribute value, `None` when absent or not a string
pub fn get_str<'a>(attrs: &'a [KeyValue], key: &str) -> Option<&'a str> {
    match get_attribute(attrs, key) {
        Some(any_value::Value::StringValue(s)) => Some(s.as_str()),
        _ => None,
    }
}

/// Integer attribute value, `None` when absent or not an integer
pub fn get_int(attrs: &[KeyValue], key: &str) -> Option<i64> {
    match get_attribute(attrs, key) {
        Some(any_value::Value::IntValue(i)) => Some(*i),
        _ => None,
    }
}

/// Convert AnyValue payload to a short string for log fields
pub fn value_to_string(value: &any_value::Value) -> String {
    match value {
        any_value::Value::StringValue(s) => s.clone(),
        any_value::Value::BoolValue(b) => b.to_string(),
        any_value::Value::IntValue(i) => i.to_string(),
        any_value::Value::DoubleValue(d) => d.to_string(),
        any_value::Value::ArrayValue(arr) => format!("[{} values]", arr.values.len()),
        any_value::Value::KvlistValue(kv) => format!("{{{} entries}}", kv.values.len()),
        any_value::Value::BytesValue(b) => format!("<{} bytes>", b.len()),
    }
}

// ============================================================================
// ATTRIBUTE INSERTION
// ============================================================================

/// Insert or replace `key` with `value`
pub fn put_attribute(attrs: &mut Vec<KeyValue>, key: &str, value: any_value::Value) {
    let value = Some(AnyValue { value: Some(value) });
    match attrs.iter_mut().find(|kv| kv.key == key) {
        Some(existing) => existing.value = value,
        None => attrs.push(KeyValue {
            key: key.to_string(),
            value,
        }),
    }
}

pub fn put_str(attrs: &mut Vec<KeyValue>, key: &str, value: &str) {
    put_attribute(attrs, key, any_value::Value::StringValue(value.to_string()));
}

pub fn put_int(attrs: &mut Vec<KeyValue>, key: &str, value: i64) {
    put_attribute(attrs, key, any_value::Value::IntValue(value));
}

// ============================================================================
// DATA POINT VALUES
// ============================================================================

/// Integer view of a number data point (doubles are truncated, missing is 0)
pub fn point_int(dp: &NumberDataPoint) -> i64 {
    match dp.value {
        Some(number_data_point::Value::AsInt(i)) => i,
        Some(number_data_point::Value::AsDouble(d)) => d as i64,
        None => {
            tracing::debug!(
                time_unix_nano = dp.time_unix_nano,
                "Data point without a value, reading 0"
            );
            0
        }
    }
}

/// Floating view of a number data point (ints are widened, missing is 0)
pub fn point_double(dp: &NumberDataPoint) -> f64 {
    match dp.value {
        Some(number_data_point::Value::AsDouble(d)) => d,
        Some(number_data_point::Value::AsInt(i)) => i as f64,
        None => {
            tracing::debug!(
                time_unix_nano = dp.time_unix_nano,
                "Data point without a value, reading 0"
            );
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_str(key: &str, value: &str) -> KeyValue {
        KeyValue {
            key: key.to_string(),
            value: Some(AnyValue {
                value: Some(any_value::Value::StringValue(value.to_string())),
            }),
        }
    }

    fn make_int(key: &str, value: i64) -> KeyValue {
        KeyValue {
            key: key.to_string(),
            value: Some(AnyValue {
                value: Some(any_value::Value::IntValue(value)),
            }),
        }
    }

    #[test]
    fn test_get_str_present() {
        let attrs = vec![make_str(keys::STATE, "user")];
        assert_eq!(get_str(&attrs, keys::STATE), Some("user"));
    }

    #[test]
    fn test_get_str_wrong_type() {
        let attrs = vec![make_int(keys::STATE, 3)];
        assert_eq!(get_str(&attrs, keys::STATE), None);
    }

    #[test]
    fn test_get_int_absent() {
        let attrs = vec![make_str("other", "x")];
        assert_eq!(get_int(&attrs, "process.parent_pid"), None);
    }

    #[test]
    fn test_get_attribute_none_value() {
        let attrs = vec![KeyValue {
            key: "missing".to_string(),
            value: None,
        }];
        assert!(get_attribute(&attrs, "missing").is_none());
    }

    #[test]
    fn test_put_str_appends() {
        let mut attrs = Vec::new();
        put_str(&mut attrs, "user.name", "root");
        assert_eq!(attrs.len(), 1);
        assert_eq!(get_str(&attrs, "user.name"), Some("root"));
    }

    #[test]
    fn test_put_replaces_existing_key() {
        let mut attrs = vec![make_int("process.parent.pid", 1)];
        put_int(&mut attrs, "process.parent.pid", 42);
        assert_eq!(attrs.len(), 1);
        assert_eq!(get_int(&attrs, "process.parent.pid"), Some(42));
    }

    #[test]
    fn test_point_int_truncates_double() {
        let dp = NumberDataPoint {
            value: Some(number_data_point::Value::AsDouble(7.9)),
            ..Default::default()
        };
        assert_eq!(point_int(&dp), 7);
    }

    #[test]
    fn test_point_double_widens_int() {
        let dp = NumberDataPoint {
            value: Some(number_data_point::Value::AsInt(3)),
            ..Default::default()
        };
        assert_eq!(point_double(&dp), 3.0);
    }

    #[test]
    fn test_point_missing_value_is_zero() {
        let dp = NumberDataPoint::default();
        assert_eq!(point_int(&dp), 0);
        assert_eq!(point_double(&dp), 0.0);
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(
            value_to_string(&any_value::Value::StringValue("idle".to_string())),
            "idle"
        );
        assert_eq!(value_to_string(&any_value::Value::IntValue(5)), "5");
        assert_eq!(
            value_to_string(&any_value::Value::BytesValue(vec![1, 2])),
            "<2 bytes>"
        );
    }
}
