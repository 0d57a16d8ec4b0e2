use std::sync::Mutex;

use crate::model::{Article, NewArticle};

use super::ArticleStore;

/// In-process store used by the test suite.
#[derive(Default)]
pub struct MemoryStore {
	articles: Mutex<Vec<Article>>,
}

impl MemoryStore {
	pub fn len(&self) -> usize {
		self.articles.lock().unwrap().len()
	}
}

fn push(articles: &mut Vec<Article>, article: NewArticle) -> Article {
	let article = Article {
		id: i32::try_from(articles.len()).unwrap() + 1,
		title: article.title,
		summary: article.summary,
		content: article.content,
		publish_date: article.publish_date,
	};

	articles.push(article.clone());
	article
}

#[axum::async_trait]
impl ArticleStore for MemoryStore {
	async fn create(&self, article: NewArticle) -> Result<Article, sqlx::Error> {
		Ok(push(&mut self.articles.lock().unwrap(), article))
	}

	async fn find_by_id(&self, id: i32) -> Result<Option<Article>, sqlx::Error> {
		Ok(self
			.articles
			.lock()
			.unwrap()
			.iter()
			.find(|article| article.id == id)
			.cloned())
	}

	async fn find_all(&self) -> Result<Vec<Article>, sqlx::Error> {
		Ok(self.articles.lock().unwrap().clone())
	}

	async fn ping(&self) -> Result<(), sqlx::Error> {
		Ok(())
	}
}

/// A store whose every call fails, as if the pool were gone.
pub struct BrokenStore;

#[axum::async_trait]
impl ArticleStore for BrokenStore {
	async fn create(&self, _: NewArticle) -> Result<Article, sqlx::Error> {
		Err(sqlx::Error::PoolClosed)
	}

	async fn find_by_id(&self, _: i32) -> Result<Option<Article>, sqlx::Error> {
		Err(sqlx::Error::PoolClosed)
	}

	async fn find_all(&self) -> Result<Vec<Article>, sqlx::Error> {
		Err(sqlx::Error::PoolClosed)
	}

	async fn ping(&self) -> Result<(), sqlx::Error> {
		Err(sqlx::Error::PoolClosed)
	}
}

/// A [`MemoryStore`] that refuses to create more than `capacity` articles.
///
/// Reads keep working, so whatever was stored before the failure can be inspected.
pub struct CappedStore {
	pub store: MemoryStore,
	capacity: usize,
}

impl CappedStore {
	pub fn new(capacity: usize) -> Self {
		Self {
			store: MemoryStore::default(),
			capacity,
		}
	}
}

#[axum::async_trait]
impl ArticleStore for CappedStore {
	async fn create(&self, article: NewArticle) -> Result<Article, sqlx::Error> {
		if self.store.len() >= self.capacity {
			return Err(sqlx::Error::PoolClosed);
		}

		self.store.create(article).await
	}

	async fn find_by_id(&self, id: i32) -> Result<Option<Article>, sqlx::Error> {
		self.store.find_by_id(id).await
	}

	async fn find_all(&self) -> Result<Vec<Article>, sqlx::Error> {
		self.store.find_all().await
	}

	async fn ping(&self) -> Result<(), sqlx::Error> {
		Ok(())
	}
}
