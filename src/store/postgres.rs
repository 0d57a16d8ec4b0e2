use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::model::{Article, NewArticle};

use super::ArticleStore;

const MAX_CONNECTIONS: u32 = 10;

/// An error that can occur while opening the database.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
	#[error("failed to connect to database: {0}")]
	Connect(#[from] sqlx::Error),
	#[error("failed to run migrations: {0}")]
	Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Article storage backed by Postgres.
#[derive(Clone)]
pub struct PgStore {
	pool: PgPool,
}

impl PgStore {
	/// Connects to the database and brings its schema up to date.
	///
	/// This must complete before the server accepts requests.
	pub async fn connect(url: &str) -> Result<Self, InitError> {
		let pool = PgPoolOptions::new()
			.max_connections(MAX_CONNECTIONS)
			.connect(url)
			.await?;

		sqlx::migrate!().run(&pool).await?;

		tracing::info!("database ready");

		Ok(Self { pool })
	}
}

#[axum::async_trait]
impl ArticleStore for PgStore {
	async fn create(&self, article: NewArticle) -> Result<Article, sqlx::Error> {
		sqlx::query_as::<_, Article>(
			r#"
				INSERT INTO article (title, summary, content, publish_date)
				VALUES ($1, $2, $3, $4)
				RETURNING *
			"#,
		)
		.bind(article.title)
		.bind(article.summary)
		.bind(article.content)
		.bind(article.publish_date)
		.fetch_one(&self.pool)
		.await
	}

	async fn find_by_id(&self, id: i32) -> Result<Option<Article>, sqlx::Error> {
		sqlx::query_as::<_, Article>(
			r#"
				SELECT * FROM article
				WHERE id = $1
			"#,
		)
		.bind(id)
		.fetch_optional(&self.pool)
		.await
	}

	async fn find_all(&self) -> Result<Vec<Article>, sqlx::Error> {
		sqlx::query_as::<_, Article>(
			r#"
				SELECT * FROM article
				ORDER BY id
			"#,
		)
		.fetch_all(&self.pool)
		.await
	}

	async fn ping(&self) -> Result<(), sqlx::Error> {
		sqlx::query("SELECT 1").execute(&self.pool).await?;

		Ok(())
	}
}
