use crate::models::chat::ChatMessage;
use crate::retrieval::vector::RetrievedRecord;

/// Render conversation history one message per line, in original order.
/// "user" and "assistant" get conventional labels; any other role is
/// rendered verbatim.
pub fn format_chat_history(history: &[ChatMessage]) -> String {
    history
        .iter()
        .map(|message| match message.role.as_str() {
            "user" => format!("Human: {}", message.content),
            "assistant" => format!("Assistant: {}", message.content),
            other => format!("{}: {}", other, message.content),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Concatenate retrieved record contents into a single context block,
/// separated by blank lines.
pub fn combine_documents(records: &[RetrievedRecord]) -> String {
    records
        .iter()
        .map(|record| record.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(role: &str, content: &str) -> ChatMessage {
        ChatMessage {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn history_maps_roles_and_preserves_order() {
        let history = vec![
            message("user", "hello"),
            message("assistant", "hi there"),
            message("system", "be brief"),
        ];

        assert_eq!(
            format_chat_history(&history),
            "Human: hello\nAssistant: hi there\nsystem: be brief"
        );
    }

    #[test]
    fn empty_history_formats_to_empty_string() {
        assert_eq!(format_chat_history(&[]), "");
    }

    #[test]
    fn documents_join_with_blank_lines() {
        let records = vec![
            RetrievedRecord {
                id: "1".to_string(),
                content: "first".to_string(),
                distance: 0.1,
            },
            RetrievedRecord {
                id: "2".to_string(),
                content: "second".to_string(),
                distance: 0.2,
            },
        ];

        assert_eq!(combine_documents(&records), "first\n\nsecond");
        assert_eq!(combine_documents(&[]), "");
    }
}
