//! Batch remapper
//!
//! Walks an OTLP metrics export and remaps every scope produced by the
//! host-metrics process scraper. Each matching scope is one process batch and
//! is remapped with its own resource attributes, sharing nothing with others.

use opentelemetry_proto::tonic::collector::metrics::v1::ExportMetricsServiceRequest;
use opentelemetry_proto::tonic::common::v1::KeyValue;
use opentelemetry_proto::tonic::metrics::v1::ScopeMetrics;

use super::process::{EmitOptions, remap_process_metrics};

/// Scope name suffix of the host-metrics process scraper
pub const DEFAULT_SCRAPER: &str = "processscraper";

/// Dataset written to remapped data points
pub const DEFAULT_DATASET: &str = "system.process";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapConfig {
    /// Last `/`-separated segment of the instrumentation scope name to match
    pub scraper: String,
    /// Empty disables the dataset attribute
    pub dataset: String,
    pub enrich: bool,
}

impl Default for RemapConfig {
    fn default() -> Self {
        Self {
            scraper: DEFAULT_SCRAPER.to_string(),
            dataset: DEFAULT_DATASET.to_string(),
            enrich: true,
        }
    }
}

/// Counters from one remap pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemapStats {
    pub resources: usize,
    pub scopes_remapped: usize,
    pub metrics_emitted: usize,
}

pub struct Remapper {
    config: RemapConfig,
}

impl Remapper {
    pub fn new(config: RemapConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RemapConfig {
        &self.config
    }

    /// Remap all process scraper scopes of `request` in place
    pub fn remap(&self, request: &mut ExportMetricsServiceRequest) -> RemapStats {
        let options = EmitOptions {
            dataset: &self.config.dataset,
            enrich: self.config.enrich,
        };
        let mut stats = RemapStats::default();

        for resource_metrics in &mut request.resource_metrics {
            stats.resources += 1;
            let resource: &[KeyValue] = resource_metrics
                .resource
                .as_ref()
                .map(|r| r.attributes.as_slice())
                .unwrap_or_default();

            for scope_metrics in &mut resource_metrics.scope_metrics {
                if !self.matches_scope(scope_metrics) {
                    continue;
                }
                let emitted = remap_process_scope(scope_metrics, resource, &options);
                stats.scopes_remapped += 1;
                stats.metrics_emitted += emitted;
            }
        }

        tracing::debug!(
            resources = stats.resources,
            scopes = stats.scopes_remapped,
            emitted = stats.metrics_emitted,
            "Remapped process metrics"
        );
        stats
    }

    fn matches_scope(&self, scope_metrics: &ScopeMetrics) -> bool {
        scope_metrics
            .scope
            .as_ref()
            .and_then(|s| s.name.rsplit('/').next())
            .is_some_and(|segment| segment == self.config.scraper)
    }
}

/// Remap a single process scraper scope
pub fn remap_process_scope(
    scope_metrics: &mut ScopeMetrics,
    resource: &[KeyValue],
    options: &EmitOptions<'_>,
) -> usize {
    let emitted = remap_process_metrics(&mut scope_metrics.metrics, resource, options);
    tracing::trace!(
        scope = scope_metrics.scope.as_ref().map(|s| s.name.as_str()),
        emitted,
        "Remapped process scope"
    );
    emitted
}
