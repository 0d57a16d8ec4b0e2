//! Validation and persistence of submitted articles.
//!
//! Submissions arrive either one at a time from the HTML form ([`form`])
//! or as a JSON batch ([`batch`]). Both validators produce [`Valid`]
//! drafts, which are the only input the publishing functions accept.

pub mod batch;
pub mod form;

pub use batch::BatchError;
pub use form::Submission;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
	model::{Article, NewArticle},
	store::ArticleStore,
};

pub const TITLE_MAX: usize = 30;
pub const SUMMARY_MAX: usize = 50;
pub const CONTENT_MAX: usize = 2000;

/// The largest batch accepted by a single request.
pub const BATCH_MAX: usize = 100;

/// The text fields of an article, as submitted.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Draft {
	pub title: String,
	pub summary: String,
	pub content: String,
}

/// A draft whose fields are non-empty and within their maximum lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Valid(Draft);

impl Valid {
	fn stamp(self, publish_date: DateTime<Utc>) -> NewArticle {
		let Draft {
			title,
			summary,
			content,
		} = self.0;

		NewArticle {
			title,
			summary,
			content,
			publish_date,
		}
	}
}

/// Persists a single validated article.
#[tracing::instrument(skip_all)]
pub async fn publish(store: &dyn ArticleStore, draft: Valid) -> Result<Article, sqlx::Error> {
	let article = store.create(draft.stamp(Utc::now())).await?;

	tracing::info!(id = article.id, "published article");

	Ok(article)
}

/// Persists a validated batch, one article at a time in submission order.
///
/// There is no rollback: if the store fails part way, the articles created
/// before the failure stay published.
#[tracing::instrument(skip_all, fields(count = drafts.len()))]
pub async fn publish_batch(
	store: &dyn ArticleStore,
	drafts: Vec<Valid>,
) -> Result<Vec<Article>, sqlx::Error> {
	let mut created = Vec::with_capacity(drafts.len());

	for draft in drafts {
		match store.create(draft.stamp(Utc::now())).await {
			Ok(article) => created.push(article),
			Err(error) => {
				tracing::warn!(published = created.len(), "batch stopped part way");

				return Err(error);
			}
		}
	}

	tracing::info!(
		first = created.first().map(|article| article.id),
		"published batch"
	);

	Ok(created)
}
