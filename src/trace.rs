use std::time::Instant;

use axum::{
	extract::{MatchedPath, Request},
	middleware::Next,
	response::Response,
};
use opentelemetry::{
	global,
	metrics::{MetricsError, Unit},
	trace::TraceError,
	KeyValue,
};
use opentelemetry_sdk::{
	metrics::{
		reader::{DefaultAggregationSelector, DefaultTemporalitySelector},
		Aggregation, Instrument, MeterProviderBuilder, PeriodicReader, SdkMeterProvider, Stream,
	},
	runtime,
	trace::{BatchConfig, Sampler, Tracer},
	Resource,
};
use opentelemetry_semantic_conventions::{
	resource::{DEPLOYMENT_ENVIRONMENT, SERVICE_NAME, SERVICE_VERSION},
	SCHEMA_URL,
};
use tracing::level_filters::LevelFilter;
use tracing_opentelemetry::MetricsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

const REQUEST_DURATION: &str = "http_request_duration_ms";

/// Histogram boundaries for request latency, in milliseconds.
const LATENCY_BUCKETS: [f64; 10] = [
	5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0,
];

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("failed to build metrics exporter: {0}")]
	Metrics(#[from] MetricsError),
	#[error("failed to install tracer: {0}")]
	Trace(#[from] TraceError),
}

/// Constructs a [`Resource`] which describes the service.
fn resource() -> Resource {
	Resource::from_schema_url(
		[
			KeyValue::new(SERVICE_NAME, env!("CARGO_PKG_NAME")),
			KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
			KeyValue::new(
				DEPLOYMENT_ENVIRONMENT,
				if cfg!(debug_assertions) {
					"development"
				} else {
					"production"
				},
			),
		],
		SCHEMA_URL,
	)
}

/// Constructs an [`SdkMeterProvider`] with a custom view for request latency.
fn init_meter_provider() -> Result<SdkMeterProvider, MetricsError> {
	let exporter = opentelemetry_otlp::new_exporter()
		.tonic()
		.build_metrics_exporter(
			Box::new(DefaultAggregationSelector::new()),
			Box::new(DefaultTemporalitySelector::new()),
		)?;

	let reader = PeriodicReader::builder(exporter, runtime::Tokio)
		.with_interval(std::time::Duration::from_secs(5))
		.build();

	// For debugging in development
	#[cfg(debug_assertions)]
	let stdout_reader = PeriodicReader::builder(
		opentelemetry_stdout::MetricsExporter::default(),
		runtime::Tokio,
	)
	.build();

	let view_latency = |instrument: &Instrument| -> Option<Stream> {
		if instrument.name == REQUEST_DURATION {
			Some(
				Stream::new()
					.name(REQUEST_DURATION)
					.unit(Unit::new("ms"))
					.aggregation(Aggregation::ExplicitBucketHistogram {
						boundaries: LATENCY_BUCKETS.to_vec(),
						record_min_max: true,
					}),
			)
		} else {
			None
		}
	};

	let meter_provider = MeterProviderBuilder::default();
	#[cfg(debug_assertions)]
	let meter_provider = meter_provider.with_reader(stdout_reader);

	let meter_provider = meter_provider
		.with_resource(resource())
		.with_reader(reader)
		.with_view(view_latency)
		.build();

	global::set_meter_provider(meter_provider.clone());

	Ok(meter_provider)
}

/// Constructs a [`Tracer`] with a custom sampling strategy and exporter.
fn init_tracer() -> Result<Tracer, TraceError> {
	opentelemetry_otlp::new_pipeline()
		.tracing()
		.with_trace_config(
			opentelemetry_sdk::trace::Config::default()
				.with_sampler(Sampler::TraceIdRatioBased(1.0))
				.with_resource(resource()),
		)
		.with_batch_config(BatchConfig::default())
		.with_exporter(opentelemetry_otlp::new_exporter().tonic())
		.install_batch(runtime::Tokio)
}

/// Initializes the tracing subscriber.
///
/// With telemetry enabled, spans and metrics are also exported over OTLP
/// and the returned guard flushes them when dropped.
pub fn init_tracing_subscriber(config: &Config) -> Result<Option<OtelGuard>, Error> {
	let registry = tracing_subscriber::registry()
		.with(LevelFilter::from_level(config.log_level))
		.with(tracing_subscriber::fmt::layer().with_ansi(true));

	if !config.telemetry {
		registry.init();
		return Ok(None);
	}

	let meter_provider = init_meter_provider()?;

	registry
		.with(MetricsLayer::new(meter_provider.clone()))
		.with(tracing_opentelemetry::layer().with_tracer(init_tracer()?))
		.init();

	Ok(Some(OtelGuard { meter_provider }))
}

pub struct OtelGuard {
	meter_provider: SdkMeterProvider,
}

impl Drop for OtelGuard {
	fn drop(&mut self) {
		if let Err(err) = self.meter_provider.shutdown() {
			eprintln!("{err:?}");
		}

		opentelemetry::global::shutdown_tracer_provider();
	}
}

/// Records a request count and latency for every routed request.
pub async fn record_request(request: Request, next: Next) -> Response {
	let method = request.method().clone();
	let path = request
		.extensions()
		.get::<MatchedPath>()
		.map_or_else(|| request.uri().path().to_owned(), |path| path.as_str().to_owned());

	let start = Instant::now();
	let response = next.run(request).await;

	tracing::info!(
		monotonic_counter.http_requests = 1_u64,
		histogram.http_request_duration_ms = start.elapsed().as_secs_f64() * 1000.0,
		method = %method,
		path = %path,
		status = response.status().as_u16(),
		"handled request"
	);

	response
}
