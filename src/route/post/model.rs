use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{ingest::Draft, model::Article};

/// A batch of articles to publish.
///
/// `artigos` is taken as-is so that a missing or malformed batch can be
/// reported with a specific message.
#[derive(Debug, Default, Deserialize, JsonSchema, Validate)]
pub struct BatchInput {
	/// Between 1 and 100 articles.
	#[serde(default)]
	#[schemars(with = "Option<Vec<ArticleInput>>")]
	pub artigos: Option<serde_json::Value>,
}

/// The expected shape of each article in a batch.
///
/// Only used to describe `artigos` in the API document; items are read
/// from the raw JSON by [`crate::ingest::batch::validate`].
#[derive(JsonSchema)]
#[allow(dead_code)]
struct ArticleInput {
	/// Between 1 and 30 characters.
	title: String,
	/// The summary, between 1 and 50 characters.
	resumo: String,
	/// The text of the article, between 1 and 2000 characters.
	description: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct Created {
	/// `Successfully created N articles`
	pub message: String,
}

/// Context of the submission form.
#[derive(Serialize)]
pub struct EditPage<'a> {
	pub post: &'a Draft,
	/// `false` when re-showing a rejected submission.
	pub valid: bool,
}

#[derive(Serialize)]
pub struct ShowPage<'a> {
	pub post: &'a Article,
}

#[derive(Serialize)]
pub struct IndexPage<'a> {
	pub posts: &'a [Article],
}
