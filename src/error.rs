use std::borrow::Cow;

use axum::{
	body::Body,
	extract::rejection::{FormRejection, JsonRejection},
	http::{Response, StatusCode},
	response::IntoResponse,
};
use schemars::JsonSchema;
use serde::Serialize;
use tower_governor::GovernorError;

use crate::extract::Json;

pub const INTERNAL_ERROR: &str = "Internal server error";

/// Error type shared by every route.
///
/// The Display trait is not sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("json error: {0}")]
	Json(#[from] JsonRejection),
	#[error("form error: {0}")]
	Form(#[from] FormRejection),
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("template error: {0}")]
	Template(#[from] tera::Error),
	#[error("rate limit error: {0}")]
	RateLimit(#[from] GovernorError),
}

impl AppError {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::Json(rejection) => rejection.status(),
			Self::Form(rejection) => rejection.status(),
			Self::Validation(..) => StatusCode::BAD_REQUEST,
			Self::Database(..) | Self::Template(..) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::RateLimit(error) => match error {
				GovernorError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
				GovernorError::UnableToExtractKey => StatusCode::INTERNAL_SERVER_ERROR,
				GovernorError::Other { code, .. } => *code,
			},
		}
	}

	pub fn message(&self) -> Cow<'static, str> {
		match self {
			Self::Json(rejection) => rejection.body_text().into(),
			Self::Form(rejection) => rejection.body_text().into(),
			Self::Validation(errors) => errors.to_string().into(),
			Self::RateLimit(GovernorError::TooManyRequests { .. }) => {
				"Too many requests, please try again later.".into()
			}
			Self::RateLimit(GovernorError::Other { msg: Some(msg), .. }) => msg.clone().into(),
			_ => INTERNAL_ERROR.into(),
		}
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		let status = self.status();

		if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
		}

		respond(Format::Json, status, self.message())
	}
}

/// The body of every JSON error response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorBody {
	/// A human-readable description of the problem.
	pub error: String,
}

/// How an error is written to the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
	/// `{"error": "..."}`
	Json,
	/// The bare message, for routes that serve HTML pages.
	Text,
}

/// An error specific to a group of routes.
pub trait ErrorShape: std::error::Error {
	const FORMAT: Format = Format::Json;

	fn status(&self) -> StatusCode;

	/// The message presented to the client.
	fn message(&self) -> Cow<'static, str> {
		self.to_string().into()
	}
}

/// Error returned by route handlers: either a shared [`AppError`] or one
/// specific to the route group. Both are written in `T`'s format.
#[derive(Debug)]
pub enum RouteError<T> {
	App(AppError),
	Route(T),
}

impl<T: ErrorShape> From<T> for RouteError<T> {
	fn from(error: T) -> Self {
		Self::Route(error)
	}
}

impl<T> From<AppError> for RouteError<T> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<T> From<sqlx::Error> for RouteError<T> {
	fn from(error: sqlx::Error) -> Self {
		Self::App(error.into())
	}
}

impl<T> From<tera::Error> for RouteError<T> {
	fn from(error: tera::Error) -> Self {
		Self::App(error.into())
	}
}

impl<T: ErrorShape> IntoResponse for RouteError<T> {
	fn into_response(self) -> Response<Body> {
		let (status, message) = match &self {
			Self::App(error) => {
				if error.status().is_server_error() {
					tracing::error!(%error, "request failed");
				}

				(error.status(), error.message())
			}
			Self::Route(error) => (error.status(), error.message()),
		};

		respond(T::FORMAT, status, message)
	}
}

impl<T> aide::OperationOutput for RouteError<T> {
	type Inner = ErrorBody;
}

fn respond(format: Format, status: StatusCode, message: Cow<'static, str>) -> Response<Body> {
	match format {
		Format::Json => (
			status,
			Json(ErrorBody {
				error: message.into_owned(),
			}),
		)
			.into_response(),
		Format::Text => (status, message).into_response(),
	}
}
