//! Process sample extraction
//!
//! Folds one process's scraper metrics into a [`ProcessSample`]. Dispatch is by
//! metric name only; unrecognized metrics are dropped so new scraper metrics do
//! not break the remap.
//!
//! Every slot defaults to zero, so an absent input is indistinguishable from a
//! genuinely zero reading. `timestamp` and `start_time_ms` are bootstrapped
//! from the first recognized data point that carries a non-zero value and are
//! never overwritten afterwards.

use opentelemetry_proto::tonic::common::v1::KeyValue;
use opentelemetry_proto::tonic::metrics::v1::{Metric, NumberDataPoint, metric::Data};

use super::catalog::ProcessInput;
use crate::utils::otlp::{get_attribute, get_str, keys, point_double, point_int, value_to_string};
use crate::utils::time::{nanos_to_iso, nanos_to_millis};

/// Values extracted from one process batch
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProcessSample {
    /// Nanoseconds since Unix epoch, 0 when no data point carried one
    pub timestamp: u64,
    /// Milliseconds since Unix epoch, 0 when no data point carried one
    pub start_time_ms: i64,
    pub threads: i64,
    /// Resident memory in bytes
    pub memory_usage: i64,
    /// Resident memory share on a 0-100 scale
    pub memory_utilization: f64,
    pub memory_virtual: i64,
    pub open_fds: i64,
    /// Seconds
    pub cpu_system: f64,
    /// Seconds
    pub cpu_user: f64,
    /// Seconds across system, user and wait
    pub cpu_total: f64,
    pub io_read_bytes: i64,
    pub io_write_bytes: i64,
    pub io_read_ops: i64,
    pub io_write_ops: i64,
}

impl ProcessSample {
    /// Extract a sample from a process's metric list
    pub fn from_metrics<'a, I>(metrics: I) -> Self
    where
        I: IntoIterator<Item = &'a Metric>,
    {
        let sample = metrics
            .into_iter()
            .fold(Self::default(), |sample, metric| sample.absorb(metric));

        tracing::trace!(
            timestamp = %nanos_to_iso(sample.timestamp),
            start_time_ms = sample.start_time_ms,
            threads = sample.threads,
            cpu_total = sample.cpu_total,
            "Extracted process sample"
        );
        sample
    }

    fn absorb(mut self, metric: &Metric) -> Self {
        let Some(input) = ProcessInput::from_name(&metric.name) else {
            tracing::trace!(metric = %metric.name, "Ignoring unrecognized metric");
            return self;
        };

        let points = number_points(metric);
        let Some(first) = points.first() else {
            tracing::debug!(metric = %metric.name, "Skipping metric without data points");
            return self;
        };

        match input {
            ProcessInput::Threads => {
                self.bootstrap(first);
                self.threads = point_int(first);
            }
            ProcessInput::MemoryUtilization => {
                self.bootstrap(first);
                self.memory_utilization = point_double(first);
            }
            ProcessInput::MemoryUsage => {
                self.bootstrap(first);
                self.memory_usage = point_int(first);
            }
            ProcessInput::MemoryVirtual => {
                self.bootstrap(first);
                self.memory_virtual = point_int(first);
            }
            ProcessInput::OpenFileDescriptors => {
                self.bootstrap(first);
                self.open_fds = point_int(first);
            }
            ProcessInput::CpuTime => {
                for dp in points {
                    self.bootstrap(dp);
                    self.add_cpu_time(dp);
                }
            }
            ProcessInput::DiskIo => {
                for dp in points {
                    self.bootstrap(dp);
                    match Direction::of(dp) {
                        Some(Direction::Read) => self.io_read_bytes = point_int(dp),
                        Some(Direction::Write) => self.io_write_bytes = point_int(dp),
                        None => {}
                    }
                }
            }
            ProcessInput::DiskOperations => {
                for dp in points {
                    self.bootstrap(dp);
                    match Direction::of(dp) {
                        Some(Direction::Read) => self.io_read_ops = point_int(dp),
                        Some(Direction::Write) => self.io_write_ops = point_int(dp),
                        None => {}
                    }
                }
            }
        }

        self
    }

    /// First non-zero value wins, independently for each field
    fn bootstrap(&mut self, dp: &NumberDataPoint) {
        if self.timestamp == 0 {
            self.timestamp = dp.time_unix_nano;
        }
        if self.start_time_ms == 0 {
            self.start_time_ms = nanos_to_millis(dp.start_time_unix_nano);
        }
    }

    fn add_cpu_time(&mut self, dp: &NumberDataPoint) {
        let value = point_double(dp);
        match CpuState::of(dp) {
            Some(CpuState::System) => {
                self.cpu_system = value;
                self.cpu_total += value;
            }
            Some(CpuState::User) => {
                self.cpu_user = value;
                self.cpu_total += value;
            }
            Some(CpuState::Wait) => self.cpu_total += value,
            None => {}
        }
    }
}

/// Number data points of a sum or gauge, empty for any other shape
fn number_points(metric: &Metric) -> &[NumberDataPoint] {
    match &metric.data {
        Some(Data::Sum(sum)) => &sum.data_points,
        Some(Data::Gauge(gauge)) => &gauge.data_points,
        _ => &[],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CpuState {
    System,
    User,
    Wait,
}

impl CpuState {
    fn of(dp: &NumberDataPoint) -> Option<Self> {
        match get_str(&dp.attributes, keys::STATE) {
            Some("system") => Some(Self::System),
            Some("user") => Some(Self::User),
            Some("wait") => Some(Self::Wait),
            _ => {
                log_unroutable(&dp.attributes, keys::STATE);
                None
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Read,
    Write,
}

impl Direction {
    fn of(dp: &NumberDataPoint) -> Option<Self> {
        match get_str(&dp.attributes, keys::DIRECTION) {
            Some("read") => Some(Self::Read),
            Some("write") => Some(Self::Write),
            _ => {
                log_unroutable(&dp.attributes, keys::DIRECTION);
                None
            }
        }
    }
}

fn log_unroutable(attrs: &[KeyValue], key: &str) {
    let value = get_attribute(attrs, key).map(value_to_string);
    tracing::trace!(attribute = key, value = ?value, "Data point not routed");
}
