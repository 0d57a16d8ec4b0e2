#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod ingest;
mod model;
mod openapi;
mod ratelimit;
mod render;
mod route;
mod security;
mod store;
mod trace;


use std::{net::SocketAddr, sync::Arc};

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{extract::DefaultBodyLimit, Extension, Router};
use tower::ServiceBuilder;
use tower_http::{
	compression::CompressionLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	services::ServeDir,
	trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Config;

/// Largest request body accepted, form or JSON.
const BODY_LIMIT: usize = 10 * 1024 * 1024;

pub type Database = Arc<dyn store::ArticleStore>;
pub type AppState = State;

/// The shared application state.
///
/// Handlers that only need one part of it can extract that part directly,
/// e.g. `State<Database>`.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub templates: render::Templates,
}

/// Builds the whole site. Without `limits`, nothing is rate limited.
pub fn app(state: AppState, config: &Config, limits: Option<&ratelimit::Limits>) -> Router {
	let mut api = OpenApi::default();

	let json = match limits {
		Some(limits) => route::post::api().layer(ratelimit::layer(&limits.api)),
		None => route::post::api(),
	};

	let site = ApiRouter::new()
		.merge(route::post::listing())
		.merge(ratelimit::limit(
			route::post::pages(),
			limits.map(|limits| &limits.post),
		))
		.nest("/api", json)
		.finish_api_with(&mut api, openapi::docs)
		.merge(route::docs::routes())
		.layer(Extension(Arc::new(api)))
		.route_layer(axum::middleware::from_fn(trace::record_request))
		.fallback_service(ServeDir::new(&config.static_dir));

	let app = ratelimit::limit(site, limits.map(|limits| &limits.global))
		.merge(route::health::routes())
		.with_state(state);

	security::headers(app)
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(
					TraceLayer::new_for_http()
						.make_span_with(DefaultMakeSpan::new().level(Level::INFO))
						.on_response(DefaultOnResponse::new().level(Level::INFO)),
				)
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CompressionLayer::new()),
		)
		.layer(DefaultBodyLimit::max(BODY_LIMIT))
}

#[tokio::main]
async fn main() {
	dotenvy::dotenv().ok();

	let config = Config::from_env().expect("invalid configuration");
	let _guard = trace::init_tracing_subscriber(&config).expect("failed to initialize tracing");

	let state = State {
		database: Arc::new(
			store::PgStore::connect(&config.database_url)
				.await
				.expect("failed to connect to database"),
		),
		templates: Arc::new(render::templates().expect("failed to load templates")),
	};

	let limits = config.rate_limit.then(ratelimit::Limits::default);

	if let Some(limits) = &limits {
		ratelimit::cleanup_old_limits(&limits.all());
	}

	let app = app(state, &config, limits.as_ref());

	let listener = tokio::net::TcpListener::bind((config.host, config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on {}:{}", config.host, config.port);

	axum::serve(
		listener,
		app.into_make_service_with_connect_info::<SocketAddr>(),
	)
	.await
	.expect("server error");
}
