use std::sync::Arc;

use aide::openapi::OpenApi;
use axum::{response::IntoResponse, routing::get, Extension, Router};

use crate::{extract::Json, AppState};

/// The OpenAPI document of the JSON API, served at `/docs/api.json`.
pub fn routes() -> Router<AppState> {
	Router::new().route("/docs/api.json", get(serve_docs))
}

async fn serve_docs(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoResponse {
	Json(api.as_ref()).into_response()
}
