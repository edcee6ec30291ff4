pub mod chunking;
pub mod embeddings;
pub mod vector;
