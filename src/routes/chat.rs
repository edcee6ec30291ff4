use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::chat::ChatMessage;
use crate::utils::chat::{combine_documents, format_chat_history};
use crate::utils::templates::{render, ANSWER_TEMPLATE, CONDENSE_QUESTION_TEMPLATE};
use crate::AppState;

#[derive(Debug, Deserialize)]
struct ChatForm {
    messages: Vec<ChatMessage>,
}

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/retrieval", web::post().to(retrieval_chat));
}

/// Conversational retrieval: condense the latest message plus history into
/// a standalone question, retrieve the closest stored chunks, then stream
/// the generated answer back to the caller.
async fn retrieval_chat(
    state: web::Data<AppState>,
    form: web::Json<ChatForm>,
) -> AppResult<HttpResponse> {
    let mut messages = form.into_inner().messages;
    let question = match messages.pop() {
        Some(latest) => latest.content,
        None => {
            return Err(AppError::BadRequest(
                "messages must contain at least one entry".to_string(),
            ))
        }
    };
    let chat_history = format_chat_history(&messages);

    // The condensation call completes in full before retrieval starts.
    let condense_prompt = render(
        CONDENSE_QUESTION_TEMPLATE,
        &[("chat_history", chat_history.as_str()), ("question", question.as_str())],
    );
    let standalone_question = state.llm.complete(&condense_prompt).await?.trim().to_string();
    tracing::debug!(question = %standalone_question, "Condensed standalone question");

    let records = state
        .vector_store
        .retrieve_similar(&standalone_question, state.config.top_k)
        .await?;
    let context = combine_documents(&records);

    let answer_prompt = render(
        ANSWER_TEMPLATE,
        &[("context", context.as_str()), ("question", standalone_question.as_str())],
    );
    let stream = state.llm.complete_stream(&answer_prompt).await?;

    // Relay tokens as they arrive; nothing is buffered server-side.
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .streaming(stream))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use serde_json::json;

    use crate::config::Config;
    use crate::retrieval::vector::RetrievedRecord;
    use crate::routes::testing::{test_state, MockLanguageModel, MockVectorStore};

    fn record(id: &str, content: &str, distance: f64) -> RetrievedRecord {
        RetrievedRecord {
            id: id.to_string(),
            content: content.to_string(),
            distance,
        }
    }

    macro_rules! spawn_app {
        ($store:expr, $llm:expr) => {{
            let state = test_state(Config::for_tests(), $store, $llm);
            test::init_service(
                App::new()
                    .app_data(web::Data::new(state))
                    .service(web::scope("/api").configure(crate::routes::create_routes)),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn streams_answer_built_from_condensed_question_and_context() {
        let store = Arc::new(MockVectorStore {
            records: vec![
                record("1", "Paris is the capital of France.", 0.05),
                record("2", "France is in Europe.", 0.21),
            ],
            ..Default::default()
        });
        let llm = Arc::new(MockLanguageModel::new(
            " What is the capital of France? ",
            vec!["Paris", " is", " the capital."],
        ));

        let app = spawn_app!(store.clone(), llm.clone());
        let req = test::TestRequest::post()
            .uri("/api/chat/retrieval")
            .set_json(json!({
                "messages": [
                    { "role": "user", "content": "Tell me about France" },
                    { "role": "assistant", "content": "France is a country in Europe." },
                    { "role": "user", "content": "And its capital?" }
                ]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp
            .headers()
            .get(actix_web::http::header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(content_type.starts_with("text/plain"));

        // Reassembling the emitted chunks in order yields the full answer.
        let body = test::read_body(resp).await;
        assert_eq!(body.as_ref(), b"Paris is the capital.");

        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);

        // Condense prompt carries the formatted history and the raw latest
        // message.
        assert!(prompts[0].contains("Human: Tell me about France"));
        assert!(prompts[0].contains("Assistant: France is a country in Europe."));
        assert!(prompts[0].contains("Follow Up Input: And its capital?"));

        // The retrieval query is the trimmed standalone question.
        let queries = store.queries.lock().unwrap();
        assert_eq!(queries.as_slice(), ["What is the capital of France?"]);

        // Answer prompt carries the blank-line-joined context.
        assert!(prompts[1]
            .contains("Paris is the capital of France.\n\nFrance is in Europe."));
        assert!(prompts[1].contains("Question: What is the capital of France?"));
    }

    #[actix_web::test]
    async fn single_message_conversation_has_empty_history() {
        let store = Arc::new(MockVectorStore::default());
        let llm = Arc::new(MockLanguageModel::new("What is X?", vec!["An answer."]));

        let app = spawn_app!(store, llm.clone());
        let req = test::TestRequest::post()
            .uri("/api/chat/retrieval")
            .set_json(json!({
                "messages": [ { "role": "user", "content": "What is X?" } ]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(body.as_ref(), b"An answer.");

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("Chat History:\n\nFollow Up Input: What is X?"));
    }

    #[actix_web::test]
    async fn empty_message_list_is_rejected() {
        let store = Arc::new(MockVectorStore::default());
        let llm = Arc::new(MockLanguageModel::new("", vec![]));

        let app = spawn_app!(store, llm.clone());
        let req = test::TestRequest::post()
            .uri("/api/chat/retrieval")
            .set_json(json!({ "messages": [] }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(llm.prompts.lock().unwrap().is_empty());
    }
}
