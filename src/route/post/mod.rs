use std::borrow::Cow;

use aide::axum::{routing::post_with, ApiRouter};
use axum::{http::StatusCode, routing::get, Router};

use crate::{
	error::{self, Format},
	ingest::BatchError,
	AppState,
};

pub mod model;
pub mod route;

/// An error raised by the HTML pages.
///
/// Clients only see [`error::ErrorShape::message`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid post id {0:?}")]
	InvalidId(String),
	#[error("unknown post {0}")]
	UnknownPost(String),
}

pub type RouteError = error::RouteError<Error>;
pub type ApiError = error::RouteError<BatchError>;

/// The article listing at `/`.
pub fn listing() -> Router<AppState> {
	Router::new().route("/", get(route::list_posts))
}

/// The submission form and article pages under `/post`.
pub fn pages() -> Router<AppState> {
	use route::*;

	Router::new()
		.route("/post", get(new_post).post(create_post))
		.route("/post/:id", get(get_post))
}

/// The JSON API, nested under `/api`.
pub fn api() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route("/post", post_with(create_posts, create_posts_docs))
}

impl error::ErrorShape for Error {
	const FORMAT: Format = Format::Text;

	fn status(&self) -> StatusCode {
		match self {
			Self::InvalidId(..) => StatusCode::BAD_REQUEST,
			Self::UnknownPost(..) => StatusCode::NOT_FOUND,
		}
	}

	fn message(&self) -> Cow<'static, str> {
		match self {
			Self::InvalidId(..) => "Invalid post ID".into(),
			Self::UnknownPost(..) => "Post not found".into(),
		}
	}
}

impl error::ErrorShape for BatchError {
	fn status(&self) -> StatusCode {
		StatusCode::BAD_REQUEST
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	fn article(title: &str) -> serde_json::Value {
		json!({
			"title": title,
			"description": "Body of the article",
			"resumo": "Short summary",
		})
	}

	#[tokio::test]
	async fn test_form_round_trip() {
		let (app, store) = app();

		let response = app.get("/post").await;

		assert_eq!(response.status_code(), 200);
		assert!(response.text().contains("name=\"resumo\""));

		let response = app
			.post("/post")
			.form(&[("title", "T"), ("resumo", "S"), ("description", "C")])
			.await;

		assert_eq!(response.status_code(), 303);
		assert_eq!(response.header("location"), "/");
		assert_eq!(store.len(), 1);

		let response = app.get("/post/1").await;

		assert_eq!(response.status_code(), 200);

		let html = response.text();

		assert!(html.contains("<h1>T</h1>"));
		assert!(html.contains(">S</p>"));
		assert!(html.contains(">C</div>"));

		let response = app.get("/").await;

		assert_eq!(response.status_code(), 200);
		assert!(response.text().contains("<a href=\"/post/1\">T</a>"));
	}

	#[tokio::test]
	async fn test_invalid_form_is_shown_again() {
		let (app, store) = app();
		let title = "t".repeat(31);

		let response = app
			.post("/post")
			.form(&[("title", title.as_str()), ("resumo", "S")])
			.await;

		assert_eq!(response.status_code(), 200);

		let html = response.text();

		assert!(html.contains("class=\"invalid\""));
		assert!(html.contains(&format!("value=\"{title}\"")));
		assert!(html.contains("value=\"S\""));
		assert_eq!(store.len(), 0);
	}

	#[tokio::test]
	async fn test_get_post_errors() {
		let (app, _) = app();

		let response = app.get("/post/abc").await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(response.text(), "Invalid post ID");

		for id in ["0", "-4", "1.5", "+7"] {
			assert_eq!(app.get(&format!("/post/{id}")).await.status_code(), 400);
		}

		for id in ["99999999", "99999999999"] {
			let response = app.get(&format!("/post/{id}")).await;

			assert_eq!(response.status_code(), 404);
			assert_eq!(response.text(), "Post not found");
		}
	}

	#[tokio::test]
	async fn test_form_without_body_is_empty_submission() {
		let (app, store) = app();

		let response = app.post("/post").await;

		assert_eq!(response.status_code(), 200);
		assert!(response.text().contains("class=\"invalid\""));

		let response = app.post("/post").json(&json!({ "title": "T" })).await;

		assert_eq!(response.status_code(), 200);
		assert!(response.text().contains("class=\"invalid\""));
		assert_eq!(store.len(), 0);
	}

	#[tokio::test]
	async fn test_batch_without_body_is_not_an_array() {
		let (app, store) = app();

		let response = app.post("/api/post").await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(
			response.json::<serde_json::Value>(),
			json!({ "error": "artigos must be an array" })
		);

		let response = app.post("/api/post").text("artigos").await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(
			response.json::<serde_json::Value>(),
			json!({ "error": "artigos must be an array" })
		);
		assert_eq!(store.len(), 0);
	}

	#[tokio::test]
	async fn test_batch_failure_keeps_earlier_articles() {
		let store = Arc::new(CappedStore::new(2));
		let app = app_with(store.clone());

		let response = app
			.post("/api/post")
			.json(&json!({ "artigos": [article("a"), article("b"), article("c")] }))
			.await;

		assert_eq!(response.status_code(), 500);
		assert_eq!(
			response.json::<serde_json::Value>(),
			json!({ "error": "Internal server error" })
		);
		assert_eq!(store.store.len(), 2);

		let response = app.get("/").await;

		assert!(response.text().contains("<a href=\"/post/2\">b</a>"));
		assert!(!response.text().contains(">c</a>"));
	}

	#[tokio::test]
	async fn test_batch_created() {
		let (app, store) = app();
		let artigos = (0..100)
			.map(|index| article(&format!("article {index}")))
			.collect::<Vec<_>>();

		let response = app
			.post("/api/post")
			.json(&json!({ "artigos": artigos }))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(
			response.json::<serde_json::Value>(),
			json!({ "message": "Successfully created 100 articles" })
		);
		assert_eq!(store.len(), 100);

		let response = app.get("/post/100").await;

		assert_eq!(response.status_code(), 200);
		assert!(response.text().contains("article 99"));
	}

	#[tokio::test]
	async fn test_batch_rejections() {
		let (app, store) = app();
		let cases = [
			(json!({}), "artigos must be an array"),
			(json!({ "artigos": "nope" }), "artigos must be an array"),
			(json!({ "artigos": [] }), "artigos array cannot be empty"),
			(
				json!({ "artigos": vec![article("t"); 101] }),
				"Maximum 100 articles allowed per request",
			),
			(
				json!({ "artigos": [article("ok"), { "title": "x" }] }),
				"Each article must have title, description, and resumo",
			),
			(
				json!({ "artigos": [article("ok"), article(&"x".repeat(31))] }),
				"Title must be a string between 1 and 30 characters",
			),
		];

		for (body, message) in cases {
			let response = app.post("/api/post").json(&body).await;

			assert_eq!(response.status_code(), 400);
			assert_eq!(
				response.json::<serde_json::Value>(),
				json!({ "error": message })
			);
		}

		assert_eq!(store.len(), 0);
	}

	#[tokio::test]
	async fn test_storage_failure() {
		let app = app_with(Arc::new(BrokenStore));

		let response = app
			.post("/api/post")
			.json(&json!({ "artigos": [article("t")] }))
			.await;

		assert_eq!(response.status_code(), 500);
		assert_eq!(
			response.json::<serde_json::Value>(),
			json!({ "error": "Internal server error" })
		);

		let response = app
			.post("/post")
			.form(&[("title", "T"), ("resumo", "S"), ("description", "C")])
			.await;

		assert_eq!(response.status_code(), 500);
		assert_eq!(response.text(), "Internal server error");

		assert_eq!(app.get("/").await.status_code(), 500);
		assert_eq!(app.get("/post/1").await.status_code(), 500);
	}
}
