use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use std::str::FromStr;
use std::time::Duration;

use crate::models::document::Document;

#[derive(Clone)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let connect_options = PgConnectOptions::from_str(database_url)?;

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect_with(connect_options)
            .await?;

        Ok(Database { pool })
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        let migrations = vec![include_str!("../migrations/postgres/001_initial.sql")];

        for (idx, migration_sql) in migrations.iter().enumerate() {
            tracing::info!("Running migration {}", idx + 1);

            // Execute statement by statement so a pre-existing object does
            // not abort the rest of the migration.
            for statement in migration_sql.split(';') {
                let trimmed = statement.trim();
                if trimmed.is_empty() || trimmed.starts_with("--") {
                    continue;
                }
                if let Err(e) = sqlx::query(trimmed).execute(&self.pool).await {
                    if e.to_string().contains("already exists") {
                        tracing::debug!("Skipping existing object in migration {}: {}", idx + 1, e);
                    } else {
                        return Err(e.into());
                    }
                }
            }
        }

        tracing::info!("All migrations completed");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert one document row per chunk inside a single transaction.
    /// Either every chunk is persisted or none are.
    pub async fn insert_documents(&self, contents: &[String]) -> Result<Vec<Document>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let now = chrono::Utc::now().timestamp();

        let mut documents = Vec::with_capacity(contents.len());
        for content in contents {
            let id = uuid::Uuid::new_v4().to_string();
            sqlx::query("INSERT INTO document (id, content, created_at) VALUES ($1, $2, $3)")
                .bind(&id)
                .bind(content)
                .bind(now)
                .execute(&mut *tx)
                .await?;

            documents.push(Document {
                id,
                content: content.clone(),
                created_at: now,
            });
        }

        tx.commit().await?;
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires a Postgres instance with pgvector (set DATABASE_URL)
    async fn insert_documents_round_trips_every_chunk() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let db = Database::new(&url).await.unwrap();
        db.run_migrations().await.unwrap();

        let chunks = vec![
            "first chunk of text".to_string(),
            "second chunk of text".to_string(),
            "third chunk of text".to_string(),
        ];
        let documents = db.insert_documents(&chunks).await.unwrap();

        // One row per chunk, content preserved byte for byte.
        assert_eq!(documents.len(), chunks.len());
        for (document, chunk) in documents.iter().zip(&chunks) {
            assert_eq!(&document.content, chunk);

            let (stored,): (String,) =
                sqlx::query_as("SELECT content FROM document WHERE id = $1")
                    .bind(&document.id)
                    .fetch_one(db.pool())
                    .await
                    .unwrap();
            assert_eq!(&stored, chunk);
        }

        for document in &documents {
            sqlx::query("DELETE FROM document WHERE id = $1")
                .bind(&document.id)
                .execute(db.pool())
                .await
                .unwrap();
        }
    }
}
