use axum::{
	extract::{
		rejection::{FormRejection, JsonRejection},
		Path, State,
	},
	response::{Html, IntoResponse, Redirect, Response},
	Form,
};
use macros::route;

use crate::{
	error::AppError,
	extract::Json,
	ingest::{self, Draft, Submission},
	openapi::tag,
	render::{self, Templates},
	AppState, Database,
};

use super::{model, ApiError, Error, RouteError};

#[derive(Debug, PartialEq, Eq)]
enum PostId {
	Stored(i32),
	/// A positive integer beyond any id the store can assign.
	OutOfRange,
	Invalid,
}

/// Parses a path segment into a store id. Only positive integers are ids.
fn parse_id(raw: &str) -> PostId {
	if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
		return PostId::Invalid;
	}

	if raw.bytes().all(|byte| byte == b'0') {
		return PostId::Invalid;
	}

	raw.parse().map_or(PostId::OutOfRange, PostId::Stored)
}

/// Lists every published article.
pub async fn list_posts(State(state): State<AppState>) -> Result<Html<String>, RouteError> {
	let posts = state.database.find_all().await?;

	Ok(render::page(
		&state.templates,
		"index.html",
		&model::IndexPage { posts: &posts },
	)?)
}

/// Shows an empty submission form.
pub async fn new_post(State(templates): State<Templates>) -> Result<Html<String>, RouteError> {
	Ok(render::page(
		&templates,
		"post/new.html",
		&model::EditPage {
			post: &Draft::default(),
			valid: true,
		},
	)?)
}

/// Publishes a single article from the form and goes back to the listing.
///
/// A rejected submission shows the form again with the submitted values.
/// A request without a form body is an empty submission.
pub async fn create_post(
	State(state): State<AppState>,
	submission: Result<Form<Submission>, FormRejection>,
) -> Result<Response, RouteError> {
	let submission = match submission {
		Ok(Form(submission)) => submission,
		Err(FormRejection::InvalidFormContentType(..)) => Submission::default(),
		Err(rejection) => return Err(AppError::from(rejection).into()),
	};

	match submission.check() {
		Ok(draft) => {
			ingest::publish(state.database.as_ref(), draft).await?;

			Ok(Redirect::to("/").into_response())
		}
		Err(draft) => {
			tracing::debug!("rejected article submission");

			let page = render::page(
				&state.templates,
				"post/new.html",
				&model::EditPage {
					post: &draft,
					valid: false,
				},
			)?;

			Ok(page.into_response())
		}
	}
}

/// Shows a single article.
pub async fn get_post(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Html<String>, RouteError> {
	let post_id = match parse_id(&id) {
		PostId::Stored(post_id) => post_id,
		PostId::OutOfRange => return Err(Error::UnknownPost(id).into()),
		PostId::Invalid => return Err(Error::InvalidId(id).into()),
	};

	let post = state
		.database
		.find_by_id(post_id)
		.await?
		.ok_or_else(|| Error::UnknownPost(id))?;

	Ok(render::page(
		&state.templates,
		"post/show.html",
		&model::ShowPage { post: &post },
	)?)
}

/// Create articles
/// Publishes a batch of 1 to 100 articles. Every article is validated before any is stored, and the first invalid article rejects the whole batch. A request without a JSON body is treated as an empty object.
#[route(
	tag = tag::ARTICLE,
	response(status = 200, description = "The articles were published.", shape = "Json<model::Created>"),
	response(status = 400, description = "The batch or one of its articles is invalid.", shape = "Json<crate::error::ErrorBody>"),
)]
pub async fn create_posts(
	State(database): State<Database>,
	input: Result<Json<model::BatchInput>, AppError>,
) -> Result<Json<model::Created>, ApiError> {
	let input = match input {
		Ok(Json(input)) => input,
		Err(AppError::Json(JsonRejection::MissingJsonContentType(..))) => {
			model::BatchInput::default()
		}
		Err(error) => return Err(error.into()),
	};

	let drafts = ingest::batch::validate(input.artigos.as_ref()).inspect_err(|error| {
		tracing::debug!(reason = %error, article = error.index(), "rejected batch");
	})?;

	let created = ingest::publish_batch(database.as_ref(), drafts).await?;

	Ok(Json(model::Created {
		message: format!("Successfully created {} articles", created.len()),
	}))
}

#[cfg(test)]
mod test {
	use super::{parse_id, PostId};

	#[test]
	fn test_parse_id() {
		assert_eq!(parse_id("1"), PostId::Stored(1));
		assert_eq!(parse_id("007"), PostId::Stored(7));
		assert_eq!(parse_id("2147483647"), PostId::Stored(i32::MAX));
		assert_eq!(parse_id("2147483648"), PostId::OutOfRange);
		assert_eq!(parse_id("99999999999999999999999"), PostId::OutOfRange);
		assert_eq!(parse_id("0"), PostId::Invalid);
		assert_eq!(parse_id("000"), PostId::Invalid);
		assert_eq!(parse_id("-1"), PostId::Invalid);
		assert_eq!(parse_id("+1"), PostId::Invalid);
		assert_eq!(parse_id("1.5"), PostId::Invalid);
		assert_eq!(parse_id("12abc"), PostId::Invalid);
		assert_eq!(parse_id(""), PostId::Invalid);
	}
}
