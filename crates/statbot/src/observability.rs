//! Tracing subscriber setup.
//!
//! Logs always go to stdout through a `fmt` layer, as text or JSON. With the
//! `observability` feature, spans are also exported through OpenTelemetry's
//! stdout exporter.

#[cfg(feature = "observability")]
use opentelemetry::{KeyValue, global, trace::TracerProvider};
#[cfg(feature = "observability")]
use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
#[cfg(feature = "observability")]
use opentelemetry_stdout::SpanExporter;
use std::env;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for logging and tracing.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Service name for telemetry attribution
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Log level filter (e.g., "info", "statbot_social=debug")
    pub log_level: String,
    /// Enable JSON-formatted logs for structured logging
    pub json_logs: bool,
    /// Export spans through OpenTelemetry (requires the `observability` feature)
    pub export_spans: bool,
}

impl ObservabilityConfig {
    /// Create a new configuration with the given service name.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            json_logs: false,
            export_spans: cfg!(feature = "observability"),
        }
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable JSON-formatted logs.
    pub fn with_json_logs(mut self, enabled: bool) -> Self {
        self.json_logs = enabled;
        self
    }

    /// Enable or disable span export.
    pub fn with_span_export(mut self, enabled: bool) -> Self {
        self.export_spans = enabled;
        self
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"))
    }
}

/// Initialize tracing with default configuration.
pub fn init_observability() -> Result<(), Box<dyn std::error::Error>> {
    init_observability_with_config(ObservabilityConfig::default())
}

/// Initialize tracing with custom configuration.
///
/// This sets up:
/// - an `EnvFilter` from `RUST_LOG`, falling back to `config.log_level`
/// - a text or JSON `fmt` layer
/// - with the `observability` feature, an OpenTelemetry bridge exporting
///   spans to stdout, tagged with service name and version
pub fn init_observability_with_config(
    config: ObservabilityConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_level(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .boxed()
    };

    #[cfg(feature = "observability")]
    let otel_layer = config.export_spans.then(|| {
        let resource = Resource::builder()
            .with_service_name(config.service_name.clone())
            .with_attributes(vec![KeyValue::new(
                "service.version",
                config.service_version.clone(),
            )])
            .build();

        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(SpanExporter::default())
            .with_resource(resource)
            .build();
        global::set_tracer_provider(provider.clone());

        let tracer = provider.tracer(config.service_name.clone());
        tracing_opentelemetry::layer().with_tracer(tracer)
    });
    #[cfg(not(feature = "observability"))]
    let otel_layer: Option<tracing_subscriber::layer::Identity> = None;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()?;

    Ok(())
}

/// Shutdown tracing gracefully.
///
/// Providers flush on drop; this exists so callers have one place to hook
/// exporter shutdown.
pub fn shutdown_observability() {}
