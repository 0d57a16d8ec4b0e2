use chrono::{DateTime, Utc};
use serde::Serialize;

/// A published article.
///
/// Use this when reading from the store and rendering to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Article {
	/// Assigned by the store on insert, never changed afterwards.
	pub id: i32,
	pub title: String,
	pub summary: String,
	pub content: String,
	/// Server time at which the article was accepted.
	pub publish_date: DateTime<Utc>,
}

/// A validated article that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
	pub title: String,
	pub summary: String,
	pub content: String,
	pub publish_date: DateTime<Utc>,
}
