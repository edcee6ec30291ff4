use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::retrieval::chunking::TextSplitter;
use crate::retrieval::vector::NewRecord;
use crate::AppState;

const DEMO_MODE_MESSAGE: &str = "Ingest is not supported in demo mode.";

#[derive(Debug, Deserialize)]
struct IngestForm {
    text: String,
}

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/ingest", web::post().to(ingest));
}

/// Split the input text into chunks, persist them in one transaction, then
/// embed and index each stored row.
async fn ingest(
    state: web::Data<AppState>,
    form: web::Json<IngestForm>,
) -> AppResult<HttpResponse> {
    if state.config.demo_mode {
        return Err(AppError::Forbidden(DEMO_MODE_MESSAGE.to_string()));
    }

    let splitter = TextSplitter::new(state.config.chunk_size, state.config.chunk_overlap);
    let chunks = splitter.split(&form.text);
    tracing::debug!("Split input into {} chunks", chunks.len());

    let documents = state.db.insert_documents(&chunks).await?;

    let records: Vec<NewRecord> = documents
        .into_iter()
        .map(|doc| NewRecord {
            id: doc.id,
            content: doc.content,
        })
        .collect();
    state.vector_store.add_records(records).await?;

    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}
