//! Fixed input and output metric catalog
//!
//! Input names are the host-metrics process scraper's; output names and their
//! kinds form the `system.process` catalog. Kinds are fixed per output and do
//! not follow the kind of the input they were derived from.

use std::fmt;

/// Recognized process scraper input metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessInput {
    Threads,
    MemoryUtilization,
    MemoryUsage,
    MemoryVirtual,
    OpenFileDescriptors,
    /// Multi-point, routed by the `state` attribute
    CpuTime,
    /// Multi-point, routed by the `direction` attribute
    DiskIo,
    /// Multi-point, routed by the `direction` attribute
    DiskOperations,
}

impl ProcessInput {
    pub const ALL: [ProcessInput; 8] = [
        Self::Threads,
        Self::MemoryUtilization,
        Self::MemoryUsage,
        Self::MemoryVirtual,
        Self::OpenFileDescriptors,
        Self::CpuTime,
        Self::DiskIo,
        Self::DiskOperations,
    ];

    /// Look up an input by its exact (case-sensitive) metric name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "process.threads" => Some(Self::Threads),
            "process.memory.utilization" => Some(Self::MemoryUtilization),
            "process.memory.usage" => Some(Self::MemoryUsage),
            "process.memory.virtual" => Some(Self::MemoryVirtual),
            "process.open_file_descriptors" => Some(Self::OpenFileDescriptors),
            "process.cpu.time" => Some(Self::CpuTime),
            "process.disk.io" => Some(Self::DiskIo),
            "process.disk.operations" => Some(Self::DiskOperations),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Threads => "process.threads",
            Self::MemoryUtilization => "process.memory.utilization",
            Self::MemoryUsage => "process.memory.usage",
            Self::MemoryVirtual => "process.memory.virtual",
            Self::OpenFileDescriptors => "process.open_file_descriptors",
            Self::CpuTime => "process.cpu.time",
            Self::DiskIo => "process.disk.io",
            Self::DiskOperations => "process.disk.operations",
        }
    }
}

/// Output metric kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Cumulative counter
    Sum,
    /// Instantaneous value
    Gauge,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Gauge => "gauge",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output metric value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
}

/// Output catalog entries, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessOutput {
    CpuStartTime,
    NumThreads,
    MemoryRssPct,
    MemoryRssBytes,
    MemorySize,
    FdOpen,
    MemoryPct,
    CpuTotalValue,
    CpuSystemTicks,
    CpuUserTicks,
    CpuTotalTicks,
    IoReadBytes,
    IoWriteBytes,
    IoReadOps,
    IoWriteOps,
    CpuTotalPct,
}

impl ProcessOutput {
    pub const ALL: [ProcessOutput; 16] = [
        Self::CpuStartTime,
        Self::NumThreads,
        Self::MemoryRssPct,
        Self::MemoryRssBytes,
        Self::MemorySize,
        Self::FdOpen,
        Self::MemoryPct,
        Self::CpuTotalValue,
        Self::CpuSystemTicks,
        Self::CpuUserTicks,
        Self::CpuTotalTicks,
        Self::IoReadBytes,
        Self::IoWriteBytes,
        Self::IoReadOps,
        Self::IoWriteOps,
        Self::CpuTotalPct,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::CpuStartTime => "process.cpu.start_time",
            Self::NumThreads => "system.process.num_threads",
            Self::MemoryRssPct => "system.process.memory.rss.pct",
            Self::MemoryRssBytes => "system.process.memory.rss.bytes",
            Self::MemorySize => "system.process.memory.size",
            Self::FdOpen => "system.process.fd.open",
            Self::MemoryPct => "process.memory.pct",
            Self::CpuTotalValue => "system.process.cpu.total.value",
            Self::CpuSystemTicks => "system.process.cpu.system.ticks",
            Self::CpuUserTicks => "system.process.cpu.user.ticks",
            Self::CpuTotalTicks => "system.process.cpu.total.ticks",
            Self::IoReadBytes => "system.process.io.read_bytes",
            Self::IoWriteBytes => "system.process.io.write_bytes",
            Self::IoReadOps => "system.process.io.read_ops",
            Self::IoWriteOps => "system.process.io.write_ops",
            Self::CpuTotalPct => "system.process.cpu.total.pct",
        }
    }

    pub fn kind(self) -> MetricKind {
        match self {
            Self::MemoryRssPct | Self::MemoryPct | Self::CpuTotalPct => MetricKind::Gauge,
            Self::CpuStartTime
            | Self::NumThreads
            | Self::MemoryRssBytes
            | Self::MemorySize
            | Self::FdOpen
            | Self::CpuTotalValue
            | Self::CpuSystemTicks
            | Self::CpuUserTicks
            | Self::CpuTotalTicks
            | Self::IoReadBytes
            | Self::IoWriteBytes
            | Self::IoReadOps
            | Self::IoWriteOps => MetricKind::Sum,
        }
    }
}

/// One projected output value, stamped with the batch timestamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputMetric {
    pub output: ProcessOutput,
    /// Nanoseconds since Unix epoch
    pub timestamp: u64,
    pub value: MetricValue,
}

impl OutputMetric {
    pub fn name(&self) -> &'static str {
        self.output.name()
    }

    pub fn kind(&self) -> MetricKind {
        self.output.kind()
    }
}
