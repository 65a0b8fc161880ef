//! OTLP metrics encoding and decoding
//!
//! Supports both protobuf (binary `ExportMetricsServiceRequest`) and JSON
//! (OTLP/JSON) captures, per the OpenTelemetry Protocol specification.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use opentelemetry_proto::tonic::collector::metrics::v1::ExportMetricsServiceRequest;
use prost::Message;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Wire encoding of a captured OTLP metrics export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum OtlpEncoding {
    Protobuf,
    Json,
}

impl OtlpEncoding {
    /// Infer encoding from a file extension.
    /// Returns `None` for unrecognized or missing extensions.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "pb" | "bin" | "proto" | "protobuf" => Some(Self::Protobuf),
            _ => None,
        }
    }

    /// Lowercase name, as accepted in config files and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Protobuf => "protobuf",
            Self::Json => "json",
        }
    }

    /// File extension written for remapped output
    pub fn extension(self) -> &'static str {
        match self {
            Self::Protobuf => "pb",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OtlpEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OtlpEncoding {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "proto" | "pb" => Ok(Self::Protobuf),
            name => [Self::Protobuf, Self::Json]
                .into_iter()
                .find(|e| e.as_str() == name)
                .ok_or_else(|| {
                    format!(
                        "Invalid output format '{}'. Valid options: protobuf, json",
                        s
                    )
                }),
        }
    }
}

impl TryFrom<String> for OtlpEncoding {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Error returned when decoding or encoding fails
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("protobuf decode error: {0}")]
    ProtobufDecode(#[from] prost::DecodeError),

    #[error("JSON decode error: {0}")]
    JsonDecode(serde_json::Error),

    #[error("JSON encode error: {0}")]
    JsonEncode(serde_json::Error),

    #[error("invalid asInt value: {0}")]
    InvalidInt(String),
}

/// OTLP/JSON number data point field carrying a 64-bit integer
const INT_FIELD: &str = "asInt";

/// Decode a metrics export from bytes
pub fn decode_request(
    body: &[u8],
    encoding: OtlpEncoding,
) -> Result<ExportMetricsServiceRequest, CodecError> {
    match encoding {
        OtlpEncoding::Protobuf => Ok(ExportMetricsServiceRequest::decode(body)?),
        OtlpEncoding::Json => {
            let mut value: Value = serde_json::from_slice(body).map_err(CodecError::JsonDecode)?;
            parse_int_fields(&mut value)?;
            serde_json::from_value(value).map_err(CodecError::JsonDecode)
        }
    }
}

/// Encode a metrics export to bytes
pub fn encode_request(
    request: &ExportMetricsServiceRequest,
    encoding: OtlpEncoding,
    pretty: bool,
) -> Result<Vec<u8>, CodecError> {
    match encoding {
        OtlpEncoding::Protobuf => Ok(request.encode_to_vec()),
        OtlpEncoding::Json => {
            let mut value = serde_json::to_value(request).map_err(CodecError::JsonEncode)?;
            stringify_int_fields(&mut value);
            let bytes = if pretty {
                serde_json::to_vec_pretty(&value)
            } else {
                serde_json::to_vec(&value)
            };
            bytes.map_err(CodecError::JsonEncode)
        }
    }
}

/// Turn string-encoded `asInt` values into JSON numbers.
/// The generated serde types only read numbers and drop the value otherwise.
fn parse_int_fields(value: &mut Value) -> Result<(), CodecError> {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if key != INT_FIELD {
                    parse_int_fields(field)?;
                    continue;
                }
                if let Value::String(s) = field {
                    let parsed: i64 = s
                        .trim()
                        .parse()
                        .map_err(|_| CodecError::InvalidInt(s.clone()))?;
                    *field = Value::from(parsed);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                parse_int_fields(item)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Write `asInt` values as decimal strings, per the OTLP/JSON encoding
fn stringify_int_fields(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if key != INT_FIELD {
                    stringify_int_fields(field);
                } else if let Value::Number(n) = field {
                    *field = Value::String(n.to_string());
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(stringify_int_fields),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry_proto::tonic::metrics::v1::{
        Metric, NumberDataPoint, ResourceMetrics, ScopeMetrics, Sum, metric::Data,
        number_data_point,
    };

    fn sample_request() -> ExportMetricsServiceRequest {
        ExportMetricsServiceRequest {
            resource_metrics: vec![ResourceMetrics {
                scope_metrics: vec![ScopeMetrics {
                    metrics: vec![Metric {
                        name: "process.threads".to_string(),
                        data: Some(Data::Sum(Sum {
                            data_points: vec![NumberDataPoint {
                                time_unix_nano: 1_704_067_200_000_000_000,
                                value: Some(number_data_point::Value::AsInt(4)),
                                ..Default::default()
                            }],
                            aggregation_temporality: 2,
                            is_monotonic: false,
                        })),
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            OtlpEncoding::from_path(Path::new("batch.json")),
            Some(OtlpEncoding::Json)
        );
        assert_eq!(
            OtlpEncoding::from_path(Path::new("dump/batch.PB")),
            Some(OtlpEncoding::Protobuf)
        );
        assert_eq!(OtlpEncoding::from_path(Path::new("batch.txt")), None);
        assert_eq!(OtlpEncoding::from_path(Path::new("batch")), None);
    }

    #[test]
    fn test_encoding_display() {
        assert_eq!(OtlpEncoding::Protobuf.to_string(), "protobuf");
        assert_eq!(OtlpEncoding::Json.to_string(), "json");
    }

    #[test]
    fn test_protobuf_preserves_request() {
        let request = sample_request();
        let bytes = encode_request(&request, OtlpEncoding::Protobuf, false).unwrap();
        let decoded = decode_request(&bytes, OtlpEncoding::Protobuf).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn test_json_preserves_metric_name() {
        let request = sample_request();
        let bytes = encode_request(&request, OtlpEncoding::Json, true).unwrap();
        let decoded = decode_request(&bytes, OtlpEncoding::Json).unwrap();
        let metric = &decoded.resource_metrics[0].scope_metrics[0].metrics[0];
        assert_eq!(metric.name, "process.threads");
    }

    #[test]
    fn test_encoding_from_str() {
        assert_eq!("JSON".parse(), Ok(OtlpEncoding::Json));
        assert_eq!("protobuf".parse(), Ok(OtlpEncoding::Protobuf));
        assert_eq!("pb".parse(), Ok(OtlpEncoding::Protobuf));
        assert!("yaml".parse::<OtlpEncoding>().is_err());
    }

    #[test]
    fn test_encoding_deserialize_uses_names() {
        let parsed: OtlpEncoding = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(parsed, OtlpEncoding::Json);
        let parsed: OtlpEncoding = serde_json::from_str(r#""Protobuf""#).unwrap();
        assert_eq!(parsed, OtlpEncoding::Protobuf);
        assert!(serde_json::from_str::<OtlpEncoding>(r#""yaml""#).is_err());
    }

    #[test]
    fn test_json_decode_string_int() {
        let body = br#"{"resourceMetrics":[{"scopeMetrics":[{"metrics":[{
            "name":"process.threads",
            "sum":{
                "dataPoints":[{"startTimeUnixNano":"100000000","timeUnixNano":"1000000000","asInt":"4"}],
                "aggregationTemporality":2
            }
        }]}]}]}"#;
        let decoded = decode_request(body, OtlpEncoding::Json).unwrap();
        let metric = &decoded.resource_metrics[0].scope_metrics[0].metrics[0];
        let Some(Data::Sum(sum)) = &metric.data else {
            panic!("expected sum, got {:?}", metric.data);
        };
        assert_eq!(
            sum.data_points[0].value,
            Some(number_data_point::Value::AsInt(4))
        );
        assert_eq!(sum.data_points[0].time_unix_nano, 1_000_000_000);
    }

    #[test]
    fn test_json_decode_invalid_string_int() {
        let body = br#"{"resourceMetrics":[{"scopeMetrics":[{"metrics":[{
            "name":"process.threads",
            "sum":{"dataPoints":[{"asInt":"four"}]}
        }]}]}]}"#;
        let err = decode_request(body, OtlpEncoding::Json).unwrap_err();
        assert!(matches!(err, CodecError::InvalidInt(ref s) if s == "four"));
    }

    #[test]
    fn test_json_encode_writes_string_int() {
        let bytes = encode_request(&sample_request(), OtlpEncoding::Json, false).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains(r#""asInt":"4""#), "{}", text);

        let decoded = decode_request(&bytes, OtlpEncoding::Json).unwrap();
        let metric = &decoded.resource_metrics[0].scope_metrics[0].metrics[0];
        let Some(Data::Sum(sum)) = &metric.data else {
            panic!("expected sum, got {:?}", metric.data);
        };
        assert_eq!(
            sum.data_points[0].value,
            Some(number_data_point::Value::AsInt(4))
        );
    }

    #[test]
    fn test_json_decode_error() {
        let err = decode_request(b"{not json", OtlpEncoding::Json).unwrap_err();
        assert!(matches!(err, CodecError::JsonDecode(_)));
        assert!(err.to_string().starts_with("JSON decode error"));
    }

    #[test]
    fn test_protobuf_decode_error() {
        let err = decode_request(&[0xff, 0xff, 0xff], OtlpEncoding::Protobuf).unwrap_err();
        assert!(matches!(err, CodecError::ProtobufDecode(_)));
    }
}
