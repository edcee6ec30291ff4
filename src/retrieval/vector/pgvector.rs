use async_trait::async_trait;
use pgvector::Vector;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::debug;

use super::types::{NewRecord, RetrievedRecord, VectorError, VectorStore};
use crate::retrieval::embeddings::EmbeddingProvider;

/// Vector store backed by the same Postgres database that holds the
/// document rows: embeddings are written into the `embedding` column of
/// the row they belong to, and similarity search is a cosine-distance
/// (`<=>`) query over that column.
pub struct PgVectorStore {
    pool: PgPool,
    embeddings: Arc<dyn EmbeddingProvider>,
}

impl PgVectorStore {
    pub fn new(pool: PgPool, embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        Self { pool, embeddings }
    }
}

#[async_trait]
impl VectorStore for PgVectorStore {
    async fn add_records(&self, records: Vec<NewRecord>) -> Result<(), VectorError> {
        if records.is_empty() {
            return Ok(());
        }

        let contents: Vec<String> = records.iter().map(|r| r.content.clone()).collect();
        let vectors = self
            .embeddings
            .embed(contents)
            .await
            .map_err(|e| VectorError::Embedding(e.to_string()))?;

        if vectors.len() != records.len() {
            return Err(VectorError::Operation(format!(
                "Expected {} embeddings, got {}",
                records.len(),
                vectors.len()
            )));
        }

        debug!("Indexing {} records", records.len());

        for (record, vector) in records.iter().zip(vectors) {
            sqlx::query("UPDATE document SET embedding = $1 WHERE id = $2")
                .bind(Vector::from(vector))
                .bind(&record.id)
                .execute(&self.pool)
                .await
                .map_err(|e| VectorError::Database(e.to_string()))?;
        }

        Ok(())
    }

    async fn retrieve_similar(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RetrievedRecord>, VectorError> {
        let mut vectors = self
            .embeddings
            .embed(vec![query.to_string()])
            .await
            .map_err(|e| VectorError::Embedding(e.to_string()))?;

        let query_vector = vectors
            .pop()
            .ok_or_else(|| VectorError::Embedding("No embedding returned for query".to_string()))?;

        let records = sqlx::query_as::<_, RetrievedRecord>(
            r#"
            SELECT id, content, (embedding <=> $1)::float8 AS distance
            FROM document
            WHERE embedding IS NOT NULL
            ORDER BY embedding <=> $1
            LIMIT $2
            "#,
        )
        .bind(Vector::from(query_vector))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| VectorError::Database(e.to_string()))?;

        debug!("Retrieved {} records for query", records.len());
        Ok(records)
    }
}
