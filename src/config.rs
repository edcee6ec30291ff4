use anyhow::Context;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Application configuration, loaded once at startup and injected into
/// handlers through `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub cors_allow_origin: String,
    pub database_url: String,

    /// When set, the ingest endpoint rejects all writes with 403.
    pub demo_mode: bool,

    /// Maximum chunk size in graphemes.
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in graphemes. Must be smaller
    /// than `chunk_size`.
    pub chunk_overlap: usize,
    /// Number of records returned by similarity search.
    pub top_k: usize,

    pub llm_api_base: String,
    pub llm_api_key: String,
    pub llm_model: String,
    pub llm_temperature: f32,

    pub embedding_api_base: Option<String>,
    pub embedding_api_key: String,
    pub embedding_model: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_parse("PORT", 8080),
            cors_allow_origin: env_or("CORS_ALLOW_ORIGIN", "*"),
            database_url: std::env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,

            demo_mode: env_or("DEMO_MODE", "false").to_lowercase() == "true",

            chunk_size: env_parse("CHUNK_SIZE", 256),
            chunk_overlap: env_parse("CHUNK_OVERLAP", 20),
            top_k: env_parse("RAG_TOP_K", 4),

            // Defaults target a local Ollama instance through its
            // OpenAI-compatible endpoint; point LLM_API_BASE_URL at any
            // other compatible server to swap models.
            llm_api_base: env_or("LLM_API_BASE_URL", "http://localhost:11434/v1"),
            llm_api_key: env_or("LLM_API_KEY", "ollama"),
            llm_model: env_or("LLM_MODEL", "llama2"),
            llm_temperature: env_parse("LLM_TEMPERATURE", 0.0),

            embedding_api_base: std::env::var("EMBEDDING_API_BASE_URL").ok(),
            embedding_api_key: std::env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY must be set")?,
            embedding_model: env_or("RAG_EMBEDDING_MODEL", "text-embedding-3-small"),
        };

        if config.chunk_overlap >= config.chunk_size {
            anyhow::bail!(
                "CHUNK_OVERLAP ({}) must be smaller than CHUNK_SIZE ({})",
                config.chunk_overlap,
                config.chunk_size
            );
        }

        Ok(config)
    }
}

#[cfg(test)]
impl Config {
    /// A fixed configuration for handler tests; no environment reads.
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_allow_origin: "*".to_string(),
            database_url: "postgres://localhost/test".to_string(),
            demo_mode: false,
            chunk_size: 256,
            chunk_overlap: 20,
            top_k: 4,
            llm_api_base: "http://localhost:11434/v1".to_string(),
            llm_api_key: "test".to_string(),
            llm_model: "llama2".to_string(),
            llm_temperature: 0.0,
            embedding_api_base: None,
            embedding_api_key: "test".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
        }
    }
}
