//! # Observability
//!
//! Tracing + Prometheus metrics.
//!
//! - Tracing initialisation: console in JSON/pretty/compact, optional JSON log file
//! - Prometheus exporter on an HTTP port
//! - Pipeline-level metric helpers
//!
//! ```ignore
//! let _guard = observability::init_with_config(ObservabilityConfig {
//!     log_dir: Some("logs".into()),
//!     ..Default::default()
//! })?;
//! ```

pub mod metrics;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

pub use crate::metrics::{record_evaluation_metrics, record_run_outcome, RunOutcome};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Console log format
    pub log_format: LogFormat,
    /// Prometheus port (None = disabled)
    pub metrics_port: Option<u16>,
    /// Level used when RUST_LOG is unset
    pub default_log_level: String,
    /// Directory for a timestamped JSON log file (None = console only)
    pub log_dir: Option<PathBuf>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            metrics_port: None,
            default_log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

/// Log format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logs
    Json,
    /// Human readable
    #[default]
    Pretty,
    /// Compact single line
    Compact,
}

/// Keeps the file writer flushing; hold it until the process exits.
#[derive(Debug, Default)]
pub struct ObservabilityGuard {
    _file: Option<WorkerGuard>,
    log_file: Option<PathBuf>,
}

impl ObservabilityGuard {
    /// Path of the log file, when file logging is enabled
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

/// Name of the log file opened at `now`
pub fn log_file_name(now: chrono::DateTime<Local>) -> String {
    format!("{}.log", now.format("%Y-%m-%d--%H-%M-%S"))
}

fn console_layer(format: LogFormat) -> BoxedLayer {
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
    }
}

/// Initialise tracing (and Prometheus when a port is set)
pub fn init_with_config(config: ObservabilityConfig) -> Result<ObservabilityGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_log_level));

    let mut layers = vec![console_layer(config.log_format)];
    let mut guard = ObservabilityGuard::default();

    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        let file_name = log_file_name(Local::now());
        let appender = tracing_appender::rolling::never(dir, &file_name);
        let (writer, worker) = tracing_appender::non_blocking(appender);
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed(),
        );
        guard = ObservabilityGuard {
            _file: Some(worker),
            log_file: Some(dir.join(file_name)),
        };
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    if let Some(port) = config.metrics_port {
        init_metrics_only(port)?;
    }

    tracing::info!(
        log_format = ?config.log_format,
        metrics_port = ?config.metrics_port,
        log_file = ?guard.log_file(),
        "Observability initialized"
    );

    Ok(guard)
}

/// Install only the Prometheus recorder (tracing set up elsewhere)
pub fn init_metrics_only(port: u16) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("Failed to install Prometheus recorder")?;

    tracing::info!(port = port, "Prometheus metrics endpoint initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.metrics_port, None);
        assert_eq!(config.default_log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_log_file_name_is_timestamped() {
        let now = Local.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(log_file_name(now), "2024-03-05--07-08-09.log");
    }

    #[test]
    fn test_init_with_log_dir_creates_file_layer() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        let guard = init_with_config(ObservabilityConfig {
            log_dir: Some(logs.clone()),
            ..Default::default()
        })
        .unwrap();

        assert!(logs.is_dir());
        assert!(guard.log_file().unwrap().starts_with(&logs));
    }
}
