pub mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::PgStore;

use crate::model::{Article, NewArticle};

/// Persistence for articles.
///
/// Implementations assign the identifier of each created article and
/// never reassign it.
#[axum::async_trait]
pub trait ArticleStore: Send + Sync {
	/// Inserts a single article, returning it with its assigned id.
	async fn create(&self, article: NewArticle) -> Result<Article, sqlx::Error>;

	async fn find_by_id(&self, id: i32) -> Result<Option<Article>, sqlx::Error>;

	async fn find_all(&self) -> Result<Vec<Article>, sqlx::Error>;

	/// Checks that the store can serve requests.
	async fn ping(&self) -> Result<(), sqlx::Error>;
}
