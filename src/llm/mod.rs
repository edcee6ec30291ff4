pub mod openai;

use bytes::Bytes;
use futures::stream::BoxStream;

pub use openai::OpenAIChatModel;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Stream error: {0}")]
    Stream(String),
}

/// Incrementally produced answer tokens, as raw bytes ready to relay to
/// the HTTP caller.
pub type TokenStream = BoxStream<'static, Result<Bytes, LlmError>>;

/// A prompt-in/text-out language model. `complete` runs to completion
/// before returning (used for question condensation); `complete_stream`
/// yields output as it is generated (used for the final answer).
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    async fn complete_stream(&self, prompt: &str) -> Result<TokenStream, LlmError>;
}
