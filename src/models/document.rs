use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted chunk of ingested text. The embedding column is written by
/// the vector store after insertion and is not carried on this model.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: String,
    pub content: String,
    pub created_at: i64,
}
