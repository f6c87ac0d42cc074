use serde::Deserialize;
use url::Url;

/// Logging and OTLP export configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Service name for telemetry metadata
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// `tracing` filter directive, e.g. `info,story=debug`
    #[serde(default)]
    pub log_filter: Option<String>,
    /// Emit logs as JSON lines
    #[serde(default)]
    pub json_logs: bool,
    /// OTLP exporter shared by traces and metrics
    #[serde(default)]
    pub exporter: Option<ExporterConfig>,
}

/// OTLP exporter configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    /// OTLP endpoint URL
    pub endpoint: Url,
    /// Export protocol
    #[serde(default)]
    pub protocol: ExportProtocol,
    /// Metric export interval in seconds
    #[serde(default = "default_export_interval")]
    pub export_interval: u64,
    /// Fraction of traces to sample, 0.0 to 1.0
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate: f64,
}

/// OTLP export protocol
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportProtocol {
    /// gRPC (default)
    #[default]
    Grpc,
    /// HTTP/protobuf
    HttpProto,
}

fn default_service_name() -> String {
    "literai".to_string()
}

const fn default_export_interval() -> u64 {
    30
}

const fn default_sampling_rate() -> f64 {
    1.0
}
