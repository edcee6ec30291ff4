mod config;
mod db;
mod error;
mod llm;
mod models;
mod retrieval;
mod routes;
mod utils;

use actix_cors::Cors;
use actix_web::{
    middleware::{Logger, NormalizePath},
    web, App, HttpResponse, HttpServer,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;
use crate::db::Database;
use crate::llm::{LanguageModel, OpenAIChatModel};
use crate::retrieval::embeddings::{EmbeddingProvider, OpenAIEmbeddings};
use crate::retrieval::vector::{PgVectorStore, VectorStore};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
    pub vector_store: Arc<dyn VectorStore>,
    pub llm: Arc<dyn LanguageModel>,
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": true }))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let log_level = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info".to_string())
        .parse()
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting RAG gateway");

    let config = Config::from_env()?;
    if config.demo_mode {
        info!("Demo mode is enabled; ingest requests will be rejected");
    }

    let db = Database::new(&config.database_url).await?;
    info!("Database connected");

    db.run_migrations().await?;

    let embeddings: Arc<dyn EmbeddingProvider> = Arc::new(OpenAIEmbeddings::new(&config));
    info!("Embedding provider ready: {}", embeddings.model_name());

    let vector_store: Arc<dyn VectorStore> =
        Arc::new(PgVectorStore::new(db.pool().clone(), embeddings));
    let llm: Arc<dyn LanguageModel> = Arc::new(OpenAIChatModel::new(&config));
    info!(
        "Language model client ready: {} @ {}",
        config.llm_model, config.llm_api_base
    );

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    let cors_allow_origin = config.cors_allow_origin.clone();

    let state = web::Data::new(AppState {
        db,
        config: Arc::new(config),
        vector_store,
        llm,
    });

    info!("Server running at http://{}", addr);

    HttpServer::new(move || {
        let cors = if cors_allow_origin == "*" {
            Cors::permissive()
        } else {
            let mut cors = Cors::default()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);
            for origin in cors_allow_origin.split(',').map(|s| s.trim()) {
                cors = cors.allowed_origin(origin);
            }
            cors
        };

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .route("/health", web::get().to(health_check))
            .service(web::scope("/api").configure(routes::create_routes))
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
