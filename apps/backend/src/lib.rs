pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use swiftspeak_core::Sm2;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, StoreBackend};
use crate::db::Database;
use crate::services::audio::{AudioCache, BlobAudioCache, GoogleTtsSynthesizer, NoAudioCache};
use crate::services::hints::{GeminiHintGenerator, HintGenerator, StaticHintGenerator};
use crate::services::memory::MemoryStore;
use crate::services::storage::StorageService;
use crate::services::store::{PhraseStore, ProgressStore};
use crate::services::transcriber::{DisabledTranscriber, HttpTranscriber, Transcriber};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub scheduler: Sm2,
    pub phrases: Arc<dyn PhraseStore>,
    pub progress: Arc<dyn ProgressStore>,
    pub transcriber: Arc<dyn Transcriber>,
    pub hints: Arc<dyn HintGenerator>,
    pub audio: Arc<dyn AudioCache>,
}

impl AppState {
    /// State backed by an in-memory store seeded with the built-in catalog
    /// and with every external collaborator disabled.
    pub fn in_memory(config: Config) -> Self {
        let store = Arc::new(MemoryStore::seeded());
        Self {
            config: Arc::new(config),
            scheduler: Sm2::default(),
            phrases: store.clone(),
            progress: store,
            transcriber: Arc::new(DisabledTranscriber),
            hints: Arc::new(StaticHintGenerator),
            audio: Arc::new(NoAudioCache),
        }
    }

    /// Construct stores and collaborators selected by `config`.
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let (phrases, progress): (Arc<dyn PhraseStore>, Arc<dyn ProgressStore>) = match config.store {
            StoreBackend::Memory => {
                tracing::info!("Using in-memory store");
                let store = Arc::new(MemoryStore::seeded());
                (store.clone(), store)
            }
            StoreBackend::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;

                tracing::info!("Connecting to database...");
                let db = Database::connect(database_url).await?;

                tracing::info!("Running migrations...");
                db.run_migrations().await?;

                let db = Arc::new(db);
                (db.clone(), db)
            }
        };

        let transcriber: Arc<dyn Transcriber> = match &config.transcriber_url {
            Some(url) => Arc::new(HttpTranscriber::new(url, config.transcribe_timeout)?),
            None => {
                tracing::warn!("TRANSCRIBER_URL not set, audio attempts will not be scored");
                Arc::new(DisabledTranscriber)
            }
        };

        let hints: Arc<dyn HintGenerator> = match &config.gcp_api_key {
            Some(key) => Arc::new(GeminiHintGenerator::new(
                key,
                &config.gemini_model,
                config.hint_timeout,
            )?),
            None => {
                tracing::warn!("GCP_API_KEY not set, using static hints");
                Arc::new(StaticHintGenerator)
            }
        };

        let audio: Arc<dyn AudioCache> = match (&config.audio_bucket, &config.gcp_api_key) {
            (Some(bucket), Some(key)) => {
                tracing::info!("Initializing S3 storage...");
                let storage = StorageService::new(bucket).await?;
                let synthesizer = GoogleTtsSynthesizer::new(key, config.audio_timeout)?;
                Arc::new(BlobAudioCache::new(Arc::new(storage), Arc::new(synthesizer)))
            }
            _ => {
                tracing::warn!("AUDIO_BUCKET or GCP_API_KEY not set, phrase audio disabled");
                Arc::new(NoAudioCache)
            }
        };

        Ok(Self {
            config: Arc::new(config),
            scheduler: Sm2::default(),
            phrases,
            progress,
            transcriber,
            hints,
            audio,
        })
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_audio_bytes;

    let api = Router::new()
        .route("/session/start", post(routes::session::start))
        .route("/attempt/text", post(routes::attempt::text))
        .route("/attempt", post(routes::attempt::audio))
        .route("/review/grade", post(routes::review::grade))
        .route("/review/next", get(routes::review::next))
        .route("/admin/seed", post(routes::admin::seed));

    Router::new()
        .route("/", get(routes::health::root))
        .route("/healthz", get(routes::health::healthz))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let addr = config.bind_addr();
    let state = AppState::from_config(config).await?;
    let app = build_router(state);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
