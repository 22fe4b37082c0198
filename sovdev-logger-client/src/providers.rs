//! OpenTelemetry provider construction
//!
//! Builds the three SDK providers against OTLP/HTTP exporters, one per
//! configured signal endpoint. A signal without an endpoint simply has no
//! provider; the rest of the pipeline functions without it.
//!
//! Construction order is meter, tracer, logger. The meter and tracer
//! providers are also installed as process globals so SDK consumers
//! resolve them the usual way.
//!
//! # Temporality
//!
//! The metric exporter is pinned to CUMULATIVE temporality for Prometheus
//! Remote Write compatibility. This is a per-exporter preference, not the
//! SDK default, and must not be left to defaults.
//!
//! # Failure policy
//!
//! Exporter construction failure is soft: the error is reported on stderr
//! and that pipeline stays absent. Initialization itself never fails on
//! exporter problems.

use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::{
    LogExporter, MetricExporter, Protocol, SpanExporter, WithExportConfig, WithHttpConfig,
};
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider, Temporality};
use opentelemetry_sdk::trace::{RandomIdGenerator, Sampler, SdkTracerProvider};
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use sovdev_logger_core::{OtlpSettings, ServiceIdentity};
use std::time::Duration;

/// Metric export interval for the periodic reader
const METRIC_EXPORT_INTERVAL: Duration = Duration::from_secs(10);

/// The per-signal SDK providers, absent when the signal has no endpoint
pub struct TelemetryProviders {
    pub tracer: Option<SdkTracerProvider>,
    pub meter: Option<SdkMeterProvider>,
    pub logger: Option<SdkLoggerProvider>,
}

/// Build the resource shared by all three providers
///
/// Carries the service identity, the deployment environment and the
/// session id, so every exported signal is attributable to one process
/// lifetime.
pub fn build_resource(identity: &ServiceIdentity, environment: &str) -> Resource {
    Resource::builder_empty()
        .with_attributes(vec![
            KeyValue::new(SERVICE_NAME, identity.service_name.clone()),
            KeyValue::new(SERVICE_VERSION, identity.service_version.clone()),
            KeyValue::new("deployment.environment", environment.to_string()),
            KeyValue::new("session.id", identity.session_id.clone()),
        ])
        .build()
}

/// Construct providers for every configured signal, meter first
pub fn init_providers(resource: &Resource, otlp: &OtlpSettings) -> TelemetryProviders {
    let meter = init_meter_provider(resource, otlp);
    let tracer = init_tracer_provider(resource, otlp);
    let logger = init_logger_provider(resource, otlp);

    TelemetryProviders {
        tracer,
        meter,
        logger,
    }
}

fn init_meter_provider(resource: &Resource, otlp: &OtlpSettings) -> Option<SdkMeterProvider> {
    let endpoint = otlp.resolved_metrics_endpoint()?;

    let exporter = MetricExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(endpoint)
        .with_headers(otlp.headers.clone())
        .with_temporality(Temporality::Cumulative)
        .build();
    let exporter = match exporter {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Sovdev Logger failed to create OTLP metric exporter: {e}");
            return None;
        }
    };

    let reader = PeriodicReader::builder(exporter)
        .with_interval(METRIC_EXPORT_INTERVAL)
        .build();

    let provider = SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(resource.clone())
        .build();

    global::set_meter_provider(provider.clone());
    Some(provider)
}

fn init_tracer_provider(resource: &Resource, otlp: &OtlpSettings) -> Option<SdkTracerProvider> {
    let endpoint = otlp.resolved_traces_endpoint()?;

    let exporter = SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(endpoint)
        .with_headers(otlp.headers.clone())
        .build();
    let exporter = match exporter {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Sovdev Logger failed to create OTLP span exporter: {e}");
            return None;
        }
    };

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource.clone())
        .with_sampler(Sampler::AlwaysOn)
        .with_id_generator(RandomIdGenerator::default())
        .build();

    global::set_tracer_provider(provider.clone());
    Some(provider)
}

fn init_logger_provider(resource: &Resource, otlp: &OtlpSettings) -> Option<SdkLoggerProvider> {
    let endpoint = otlp.resolved_logs_endpoint()?;

    let exporter = LogExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(endpoint)
        .with_headers(otlp.headers.clone())
        .build();
    let exporter = match exporter {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Sovdev Logger failed to create OTLP log exporter: {e}");
            return None;
        }
    };

    Some(
        SdkLoggerProvider::builder()
            .with_batch_exporter(exporter)
            .with_resource(resource.clone())
            .build(),
    )
}
