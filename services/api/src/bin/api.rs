//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        db::PgStore, grader::OpenAiGraderAdapter, image::JpegPreprocessor, memory::MemoryStore,
    },
    config::Config,
    error::ApiError,
    web::{
        create_session_handler, deck_overview_handler, list_responses_handler, rest::ApiDoc,
        session_summary_handler, state::AppState, submit_image_handler, submit_mcq_handler,
        update_session_handler,
    },
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use quiz_core::{catalog::Catalog, deck::Deck, ports::SessionStore};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Choose the Session Store Backend ---
    let store: Arc<dyn SessionStore> = match &config.database_url {
        Some(database_url) => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            let pg_store = PgStore::new(db_pool);
            info!("Running database migrations...");
            pg_store.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(pg_store)
        }
        None => {
            info!("DATABASE_URL not set; using the in-memory session store.");
            Arc::new(MemoryStore::new())
        }
    };

    // --- 3. Initialize Service Adapters ---
    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY not set; grading will always fall back to canned feedback.");
    }
    let openai_config = OpenAIConfig::new()
        .with_api_key(config.openai_api_key.clone().unwrap_or_default());
    let openai_client = Client::with_config(openai_config);

    let grader = Arc::new(OpenAiGraderAdapter::new(
        openai_client,
        config.grader_model.clone(),
        config.vision_model.clone(),
    ));
    let preprocessor = Arc::new(JpegPreprocessor::new());

    // --- 4. Build the Deck & Shared AppState ---
    let catalog = Arc::new(Catalog::builtin());
    let deck = Arc::new(Deck::build(&catalog));
    info!(
        "Deck built: {} slides, {} questions.",
        deck.len(),
        deck.question_count()
    );

    let app_state = Arc::new(AppState {
        store,
        grader,
        preprocessor,
        catalog,
        deck,
        config: config.clone(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // --- 5. Create the Web Router ---
    let api_router = Router::new()
        .route("/api/sessions", post(create_session_handler))
        .route("/api/sessions/{id}", patch(update_session_handler))
        .route("/api/sessions/{id}/responses", get(list_responses_handler))
        .route("/api/sessions/{id}/summary", get(session_summary_handler))
        .route("/api/questions/mcq", post(submit_mcq_handler))
        .route("/api/questions/image", post(submit_image_handler))
        .route("/api/questions", get(deck_overview_handler))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
