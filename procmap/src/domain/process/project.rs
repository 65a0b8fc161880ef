//! Derivation and projection of a process sample into the output catalog

use super::catalog::{MetricValue, OutputMetric, ProcessOutput};
use super::sample::ProcessSample;
use crate::utils::time::nanos_to_millis;

const MILLIS_PER_SECOND: f64 = 1000.0;
const PERCENT_SCALE: f64 = 100.0;

/// Quantities computed from a sample rather than copied from it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derived {
    /// 0-1 fraction
    pub memory_pct: f64,
    /// Milliseconds between start time and sample timestamp
    pub runtime_ms: i64,
    pub cpu_total_ms: f64,
    pub cpu_system_ms: f64,
    pub cpu_user_ms: f64,
    /// CPU time over runtime; 0.0 when the runtime is not positive
    pub cpu_pct: f64,
}

impl Derived {
    pub fn from_sample(sample: &ProcessSample) -> Self {
        let runtime_ms = nanos_to_millis(sample.timestamp) - sample.start_time_ms;
        let cpu_total_ms = sample.cpu_total * MILLIS_PER_SECOND;

        let cpu_pct = if runtime_ms > 0 {
            cpu_total_ms / runtime_ms as f64
        } else {
            tracing::debug!(
                runtime_ms,
                timestamp = sample.timestamp,
                start_time_ms = sample.start_time_ms,
                "Non-positive process runtime, reporting zero CPU percentage"
            );
            0.0
        };

        Self {
            memory_pct: sample.memory_utilization / PERCENT_SCALE,
            runtime_ms,
            cpu_total_ms,
            cpu_system_ms: sample.cpu_system * MILLIS_PER_SECOND,
            cpu_user_ms: sample.cpu_user * MILLIS_PER_SECOND,
            cpu_pct,
        }
    }
}

/// Project a sample onto the full output catalog.
/// Every output carries the sample timestamp; absent inputs project as zero.
pub fn project(sample: &ProcessSample) -> Vec<OutputMetric> {
    use MetricValue::{Float, Int};

    let derived = Derived::from_sample(sample);

    ProcessOutput::ALL
        .iter()
        .map(|&output| {
            let value = match output {
                ProcessOutput::CpuStartTime => Int(sample.start_time_ms),
                ProcessOutput::NumThreads => Int(sample.threads),
                ProcessOutput::MemoryRssPct => Float(derived.memory_pct),
                ProcessOutput::MemoryRssBytes => Int(sample.memory_usage),
                ProcessOutput::MemorySize => Int(sample.memory_virtual),
                ProcessOutput::FdOpen => Int(sample.open_fds),
                ProcessOutput::MemoryPct => Float(derived.memory_pct),
                ProcessOutput::CpuTotalValue => Float(derived.cpu_total_ms),
                ProcessOutput::CpuSystemTicks => Float(derived.cpu_system_ms),
                ProcessOutput::CpuUserTicks => Float(derived.cpu_user_ms),
                ProcessOutput::CpuTotalTicks => Float(derived.cpu_total_ms),
                ProcessOutput::IoReadBytes => Int(sample.io_read_bytes),
                ProcessOutput::IoWriteBytes => Int(sample.io_write_bytes),
                ProcessOutput::IoReadOps => Int(sample.io_read_ops),
                ProcessOutput::IoWriteOps => Int(sample.io_write_ops),
                ProcessOutput::CpuTotalPct => Float(derived.cpu_pct),
            };
            OutputMetric {
                output,
                timestamp: sample.timestamp,
                value,
            }
        })
        .collect()
}
