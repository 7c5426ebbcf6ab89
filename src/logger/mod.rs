//! Tracing subscriber and Prometheus exporter set-up.
//!
//! `RUST_LOG` overrides the configured level filter when it is set.

mod config;

use std::net::SocketAddr;

pub(crate) use config::{LogFormat, LoggerConfig, TelemetryConfig, TelemetryMetricsConfig};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

pub(crate) fn initialize(logger_config: &LoggerConfig, telemetry_config: &TelemetryConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level_filter(&logger_config.level));

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match logger_config.format {
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .init();

    initialize_metrics(&telemetry_config.metrics);
}

/// Filter for the configured level; an invalid directive falls back to `info`.
fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|error| {
        eprintln!("Invalid log level '{}': {}; using 'info'", level, error);
        EnvFilter::new("info")
    })
}

fn initialize_metrics(metrics_config: &TelemetryMetricsConfig) {
    if !metrics_config.enabled {
        return;
    }

    let bind_address: SocketAddr = match metrics_config.bind_address.parse() {
        Ok(address) => address,
        Err(error) => {
            tracing::warn!(
                bind_address = %metrics_config.bind_address,
                error = %error,
                "Invalid metrics bind address; metrics exporter disabled"
            );
            return;
        }
    };

    if let Err(error) = PrometheusBuilder::new()
        .with_http_listener(bind_address)
        .install()
    {
        tracing::warn!(
            bind_address = %bind_address,
            error = %error,
            "Failed to start Prometheus metrics exporter"
        );
        return;
    }

    tracing::info!(bind_address = %bind_address, "Prometheus metrics exporter enabled");
}
