use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::{AppState, Database};

/// Liveness and readiness probes. These are never rate limited.
pub fn routes() -> Router<AppState> {
	Router::new()
		.route("/health", get(health))
		.route("/ready", get(ready))
}

async fn health() -> Json<Value> {
	Json(json!({ "status": "ok" }))
}

async fn ready(State(database): State<Database>) -> (StatusCode, Json<Value>) {
	match database.ping().await {
		Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
		Err(error) => {
			tracing::warn!(%error, "store is not ready");

			(
				StatusCode::SERVICE_UNAVAILABLE,
				Json(json!({ "status": "unavailable" })),
			)
		}
	}
}
