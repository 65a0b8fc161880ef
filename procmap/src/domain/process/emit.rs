//! Conversion of projected outputs into OTLP metrics

use opentelemetry_proto::tonic::common::v1::KeyValue;
use opentelemetry_proto::tonic::metrics::v1::{
    AggregationTemporality, Gauge, Metric, NumberDataPoint, Sum, metric::Data, number_data_point,
};

use super::catalog::{MetricKind, MetricValue, OutputMetric};
use super::enrich::enrich_process_attributes;
use crate::utils::otlp::{keys, put_str};

/// Attributes stamped on every emitted data point
#[derive(Debug, Clone, Copy, Default)]
pub struct EmitOptions<'a> {
    /// Written as `data_stream.dataset` when non-empty
    pub dataset: &'a str,
    /// Copy process identity from the resource
    pub enrich: bool,
}

/// Append outputs to `target`, one single-point metric per output
pub fn emit_metrics(
    target: &mut Vec<Metric>,
    resource: &[KeyValue],
    outputs: &[OutputMetric],
    options: &EmitOptions<'_>,
) {
    target.reserve(outputs.len());
    target.extend(
        outputs
            .iter()
            .map(|output| to_otlp_metric(output, resource, options)),
    );
}

fn to_otlp_metric(output: &OutputMetric, resource: &[KeyValue], options: &EmitOptions<'_>) -> Metric {
    let mut dp = NumberDataPoint {
        time_unix_nano: output.timestamp,
        value: Some(match output.value {
            MetricValue::Int(i) => number_data_point::Value::AsInt(i),
            MetricValue::Float(f) => number_data_point::Value::AsDouble(f),
        }),
        ..Default::default()
    };

    if options.enrich {
        enrich_process_attributes(resource, &mut dp.attributes);
    }
    if !options.dataset.is_empty() {
        put_str(&mut dp.attributes, keys::DATA_STREAM_DATASET, options.dataset);
    }

    let data = match output.kind() {
        MetricKind::Sum => Data::Sum(Sum {
            data_points: vec![dp],
            aggregation_temporality: AggregationTemporality::Cumulative as i32,
            is_monotonic: false,
        }),
        MetricKind::Gauge => Data::Gauge(Gauge {
            data_points: vec![dp],
        }),
    };

    Metric {
        name: output.name().to_string(),
        data: Some(data),
        ..Default::default()
    }
}
