/// Rewrites a follow-up question plus prior conversation into a
/// standalone question with no unresolved references.
pub const CONDENSE_QUESTION_TEMPLATE: &str = r#"Given the following conversation and a follow up question, rephrase the follow up question to be a standalone question, in its original language.

Chat History:
{chat_history}
Follow Up Input: {question}
Standalone question:"#;

/// Answers a question from retrieved context only.
pub const ANSWER_TEMPLATE: &str = r#"Answer the question based only on the following context:{context}

Question: {question}
"#;

/// Fill `{name}` placeholders in a prompt template.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut rendered = template.to_string();
    for (name, value) in vars {
        rendered = rendered.replace(&format!("{{{}}}", name), value);
    }
    rendered
}
