//! Tracing subscriber initialization with structured logging and optional
//! OpenTelemetry trace export.
//!
//! # Usage
//!
//! ```no_run
//! use joseph_observe::tracing_setup::{TracingConfig, init_tracing};
//!
//! // Human-readable logs, OTel/JSON toggled by JOSEPH_OTEL / JOSEPH_LOG_FORMAT
//! init_tracing(&TracingConfig::from_env("info")).unwrap();
//! ```

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use std::sync::OnceLock;

/// Stores the OTel tracer provider so it can be shut down cleanly on exit.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// How the global subscriber should be assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Bridge spans to OpenTelemetry (stdout exporter).
    pub otel: bool,
    /// Emit newline-delimited JSON instead of human-readable lines.
    pub json: bool,
    /// Filter used when `RUST_LOG` is unset or invalid.
    pub default_filter: String,
}

impl TracingConfig {
    /// Read `JOSEPH_OTEL=1` and `JOSEPH_LOG_FORMAT=json` from the environment.
    pub fn from_env(default_filter: &str) -> Self {
        Self::from_values(
            std::env::var("JOSEPH_OTEL").ok().as_deref(),
            std::env::var("JOSEPH_LOG_FORMAT").ok().as_deref(),
            default_filter,
        )
    }

    fn from_values(otel: Option<&str>, format: Option<&str>, default_filter: &str) -> Self {
        Self {
            otel: matches!(otel, Some("1" | "true")),
            json: format.is_some_and(|f| f.eq_ignore_ascii_case("json")),
            default_filter: default_filter.to_string(),
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// - Installs a `fmt` layer (plain or JSON) with target visibility and span
///   close timing.
/// - When `config.otel` is set, additionally bridges tracing spans to
///   OpenTelemetry using a stdout exporter (suitable for local development;
///   swap the exporter for OTLP in production).
/// - `RUST_LOG` wins over `config.default_filter` when it parses.
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set.
pub fn init_tracing(config: &TracingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let fmt_layer = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .boxed()
    };

    let otel_layer = if config.otel {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("joseph");

        // Store the provider for shutdown and register it globally.
        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);

        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()?;

    Ok(())
}

/// Flush pending traces and shut down the OpenTelemetry tracer provider.
///
/// Safe to call even when OTel was not enabled (no-op in that case).
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: OTel tracer provider shutdown error: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_to_plain_logs() {
        let config = TracingConfig::from_values(None, None, "info");
        assert!(!config.otel);
        assert!(!config.json);
        assert_eq!(config.default_filter, "info");
    }

    #[test]
    fn test_config_flags() {
        let config = TracingConfig::from_values(Some("1"), Some("JSON"), "debug");
        assert!(config.otel);
        assert!(config.json);

        let config = TracingConfig::from_values(Some("0"), Some("pretty"), "debug");
        assert!(!config.otel);
        assert!(!config.json);
    }
}
