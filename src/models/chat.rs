use serde::{Deserialize, Serialize};

/// One turn of conversation history, as supplied by the caller.
/// The message order in the request is the conversational order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}
