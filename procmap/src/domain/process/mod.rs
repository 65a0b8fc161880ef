//! Process Metrics Remap
//!
//! Turns one process's host-metrics scraper output into the `system.process`
//! catalog: extraction into a [`ProcessSample`], projection onto the fixed
//! output list, then emission back into the same metric list.

pub mod catalog;
mod emit;
pub mod enrich;
mod project;
mod sample;

pub use catalog::{MetricKind, MetricValue, OutputMetric, ProcessInput, ProcessOutput};
pub use emit::{EmitOptions, emit_metrics};
pub use enrich::enrich_process_attributes;
pub use project::{Derived, project};
pub use sample::ProcessSample;

use opentelemetry_proto::tonic::common::v1::KeyValue;
use opentelemetry_proto::tonic::metrics::v1::Metric;

/// Remap one process batch in place.
/// Returns the number of metrics appended.
pub fn remap_process_metrics(
    metrics: &mut Vec<Metric>,
    resource: &[KeyValue],
    options: &EmitOptions<'_>,
) -> usize {
    let sample = ProcessSample::from_metrics(metrics.iter());
    let outputs = project(&sample);
    emit_metrics(metrics, resource, &outputs, options);
    outputs.len()
}
