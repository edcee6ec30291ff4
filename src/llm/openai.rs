use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    },
    Client,
};
use bytes::Bytes;
use futures::StreamExt;

use super::{LanguageModel, LlmError, TokenStream};
use crate::config::Config;

/// Language model speaking the OpenAI chat-completions protocol. The base
/// URL is configurable, so this covers OpenAI itself as well as local
/// servers with compatible endpoints (Ollama, vLLM, ...).
pub struct OpenAIChatModel {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAIChatModel {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(&config.llm_api_base)
            .with_api_key(&config.llm_api_key);

        Self {
            client: Client::with_config(openai_config),
            model: config.llm_model.clone(),
            temperature: config.llm_temperature,
        }
    }

    fn build_request(&self, prompt: &str, stream: bool) -> Result<CreateChatCompletionRequest, LlmError> {
        let message: ChatCompletionRequestMessage = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| LlmError::Api(e.to_string()))?
            .into();

        CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .temperature(self.temperature)
            .messages(vec![message])
            .stream(stream)
            .build()
            .map_err(|e| LlmError::Api(e.to_string()))
    }
}

#[async_trait::async_trait]
impl LanguageModel for OpenAIChatModel {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request = self.build_request(prompt, false)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LlmError::Api(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(content)
    }

    async fn complete_stream(&self, prompt: &str) -> Result<TokenStream, LlmError> {
        let request = self.build_request(prompt, true)?;

        let stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e| LlmError::Api(e.to_string()))?;

        let tokens = stream.map(|item| match item {
            Ok(chunk) => {
                let token = chunk
                    .choices
                    .first()
                    .and_then(|choice| choice.delta.content.clone())
                    .unwrap_or_default();
                Ok(Bytes::from(token))
            }
            Err(e) => Err(LlmError::Stream(e.to_string())),
        });

        Ok(Box::pin(tokens))
    }
}
