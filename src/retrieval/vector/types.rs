use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A freshly persisted document awaiting embedding and indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecord {
    pub id: String,
    pub content: String,
}

/// A stored record returned by similarity search, closest first.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RetrievedRecord {
    pub id: String,
    pub content: String,
    pub distance: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum VectorError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}

/// Indexes embeddings for stored records and returns the nearest matches
/// to a text query. Implementations own their embedding provider, so
/// callers only ever deal in text.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Embed each record's content and index the vectors.
    async fn add_records(&self, records: Vec<NewRecord>) -> Result<(), VectorError>;

    /// Return the `limit` records most similar to `query`, ranked by
    /// ascending distance.
    async fn retrieve_similar(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RetrievedRecord>, VectorError>;
}
