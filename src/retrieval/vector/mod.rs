pub mod pgvector;
pub mod types;

pub use self::pgvector::PgVectorStore;
pub use self::types::{NewRecord, RetrievedRecord, VectorError, VectorStore};
