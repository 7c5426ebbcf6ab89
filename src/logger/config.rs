use serde::{Deserialize, Serialize};

/// Logger configuration for tracing output.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct LoggerConfig {
    /// Log level filter (e.g. "info", or per-crate like
    /// "oracle_watchtower=debug,watchtower_chain=info")
    pub level: String,
    /// Output format: "pretty" for human-readable, "json" for structured JSON logs
    pub format: LogFormat,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct TelemetryConfig {
    /// Metrics exporter configuration.
    pub metrics: TelemetryMetricsConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct TelemetryMetricsConfig {
    /// Whether to expose Prometheus metrics.
    pub enabled: bool,
    /// Bind address for the Prometheus metrics endpoint.
    pub bind_address: String,
}
