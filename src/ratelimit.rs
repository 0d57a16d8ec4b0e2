use std::{sync::Arc, time::Duration};

use axum::{
	body::Body,
	http::StatusCode,
	response::{IntoResponse, Response},
	Router,
};
use governor::{
	clock::QuantaInstant,
	middleware::{RateLimitingMiddleware, StateInformationMiddleware},
};
use tower_governor::{
	governor::{GovernorConfig, GovernorConfigBuilder},
	key_extractor::{KeyExtractor, PeerIpKeyExtractor},
	GovernorError, GovernorLayer,
};

pub type Config = Arc<GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>>;

/// Length of the window the quotas below are spread over.
const WINDOW: Duration = Duration::from_secs(15 * 60);

/// The limiters in front of the site, keyed by peer address.
pub struct Limits {
	/// Every route except the health checks.
	pub global: Config,
	/// The JSON API under `/api`.
	pub api: Config,
	/// The form and article pages under `/post`.
	pub post: Config,
}

impl Default for Limits {
	fn default() -> Self {
		Self {
			global: quota(
				100,
				"Too many requests from this IP, please try again later.",
			),
			api: quota(
				10,
				"Too many API requests from this IP, please try again later.",
			),
			post: quota(
				20,
				"Too many post requests from this IP, please try again later.",
			),
		}
	}
}

impl Limits {
	pub fn all(&self) -> [&Config; 3] {
		[&self.global, &self.api, &self.post]
	}
}

/// Allows `max` requests per [`WINDOW`], replenished evenly.
fn quota(max: u32, message: &'static str) -> Config {
	let period = WINDOW.as_secs() / u64::from(max);

	Arc::new(
		GovernorConfigBuilder::default()
			.per_second(period)
			.burst_size(max)
			.use_headers()
			.error_handler(move |error| error_handler(message, error))
			.finish()
			.expect("quota period and burst size are non-zero"),
	)
}

fn error_handler(message: &'static str, error: GovernorError) -> Response<Body> {
	match error {
		GovernorError::TooManyRequests { headers, .. } => {
			let mut response = (StatusCode::TOO_MANY_REQUESTS, message).into_response();

			if let Some(headers) = headers {
				response.headers_mut().extend(headers);
			}

			response
		}
		error => crate::error::AppError::from(error).into_response(),
	}
}

/// Wraps every route of `router` in the limiter, if there is one.
pub fn limit<S>(router: Router<S>, config: Option<&Config>) -> Router<S>
where
	S: Clone + Send + Sync + 'static,
{
	match config {
		Some(config) => router.layer(layer(config)),
		None => router,
	}
}

pub fn layer(config: &Config) -> GovernorLayer<PeerIpKeyExtractor, StateInformationMiddleware> {
	GovernorLayer {
		config: Arc::clone(config),
	}
}

/// Periodically drops limiter state for peers that have not been seen recently.
pub fn cleanup_old_limits<T, M>(configs: &[&Arc<GovernorConfig<T, M>>])
where
	T: KeyExtractor,
	<T as KeyExtractor>::Key: Send + Sync + 'static,
	M: RateLimitingMiddleware<QuantaInstant> + Send + Sync + 'static,
{
	let limiters = configs
		.iter()
		.map(|config| config.limiter().clone())
		.collect::<Vec<_>>();
	let interval = Duration::from_secs(60);

	std::thread::spawn(move || loop {
		std::thread::sleep(interval);

		for limiter in &limiters {
			tracing::debug!("rate limiting storage size: {}", limiter.len());

			limiter.retain_recent();
		}
	});
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_rejection_carries_message() {
		let response = error_handler(
			"slow down",
			GovernorError::TooManyRequests {
				wait_time: 9,
				headers: None,
			},
		);

		assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
	}

	#[test]
	fn test_missing_peer_address_is_server_error() {
		let response = error_handler("slow down", GovernorError::UnableToExtractKey);

		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	}

	mod limits {
		use crate::test::*;

		#[tokio::test]
		async fn test_api_limit() {
			let app = limited_app();

			for _ in 0..10 {
				let response = app
					.post("/api/post")
					.json(&json!({ "artigos": [] }))
					.await;

				assert_eq!(response.status_code(), 400);
			}

			let response = app
				.post("/api/post")
				.json(&json!({ "artigos": [] }))
				.await;

			assert_eq!(response.status_code(), 429);
			assert_eq!(
				response.text(),
				"Too many API requests from this IP, please try again later."
			);

			assert_eq!(app.get("/").await.status_code(), 200);
		}

		#[tokio::test]
		async fn test_post_limit() {
			let app = limited_app();

			for _ in 0..20 {
				assert_eq!(app.get("/post").await.status_code(), 200);
			}

			let response = app.get("/post/1").await;

			assert_eq!(response.status_code(), 429);
			assert_eq!(
				response.text(),
				"Too many post requests from this IP, please try again later."
			);

			assert_eq!(app.get("/").await.status_code(), 200);
		}

		#[tokio::test]
		async fn test_global_limit_spares_probes() {
			let app = limited_app();

			for _ in 0..100 {
				assert_eq!(app.get("/").await.status_code(), 200);
			}

			let response = app.get("/style.css").await;

			assert_eq!(response.status_code(), 429);
			assert_eq!(
				response.text(),
				"Too many requests from this IP, please try again later."
			);

			for _ in 0..5 {
				assert_eq!(app.get("/health").await.status_code(), 200);
				assert_eq!(app.get("/ready").await.status_code(), 200);
			}
		}
	}
}
