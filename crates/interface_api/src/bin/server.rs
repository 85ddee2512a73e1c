//! Loan Origination API Server Binary
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin loan-api
//!
//! # Run with environment variables
//! API_HOST=0.0.0.0 API_PORT=8080 DATABASE_URL=postgres://... cargo run --bin loan-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - JWT signing secret (required in production)
//! * `API_JWT_EXPIRATION_SECS` - JWT token expiration in seconds (default: 3600)
//! * `API_DATABASE_URL` / `DATABASE_URL` - PostgreSQL connection string
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_STORAGE_BACKEND` - `local` or `cloudinary` (default: local)
//! * `API_UPLOADS_DIR` - Local uploads directory (default: uploads)
//! * `API_UPLOADS_BASE_URL` - Public URL of the uploads directory
//! * `API_CLOUDINARY_CLOUD_NAME` / `API_CLOUDINARY_UPLOAD_PRESET` - Cloudinary account
//! * `API_MAIL_ENDPOINT` / `API_MAIL_API_KEY` / `API_MAIL_FROM` - Mail provider;
//!   email is disabled when endpoint or key is missing

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_loan::{DocumentStore, IntakeService, Notifier, ReviewService, UserDirectory};
use infra_db::{ApplicationRepository, UserRepository};
use infra_notify::{DisabledMailer, HttpApiMailer, QueuedNotifier};
use infra_storage::{CloudinaryConfig, CloudinaryStore, LocalDiskStore};
use interface_api::config::{ApiConfig, StorageBackend};
use interface_api::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config();

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting Loan Origination API Server"
    );

    // Database pool and migrations
    let pool = infra_db::create_pool_from_url(&config.database_url)
        .await
        .context("failed to connect to database")?;
    infra_db::run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    // Persistence adapters
    let store = Arc::new(ApplicationRepository::new(pool.clone()));
    let users: Arc<dyn UserDirectory> = Arc::new(UserRepository::new(pool.clone()));

    // Notification adapter: queued dispatch in front of the configured mailer
    let mailer: Arc<dyn Notifier> = match config.mail_config() {
        Some(mail) => {
            tracing::info!(endpoint = %mail.endpoint, "Email service initialized");
            Arc::new(HttpApiMailer::new(mail))
        }
        None => {
            tracing::warn!("Email credentials missing. Emails disabled.");
            Arc::new(DisabledMailer::new())
        }
    };
    let notifier: Arc<dyn Notifier> = Arc::new(QueuedNotifier::spawn(mailer, 256));

    // Blob-storage adapter
    let documents: Arc<dyn DocumentStore> = match config.storage_backend {
        StorageBackend::Local => Arc::new(
            LocalDiskStore::create(&config.uploads_dir, &config.uploads_base_url)
                .await
                .context("failed to prepare uploads directory")?,
        ),
        StorageBackend::Cloudinary => {
            let cloud_name = config
                .cloudinary_cloud_name
                .clone()
                .context("API_CLOUDINARY_CLOUD_NAME is required for cloudinary storage")?;
            let preset = config
                .cloudinary_upload_preset
                .clone()
                .context("API_CLOUDINARY_UPLOAD_PRESET is required for cloudinary storage")?;
            Arc::new(CloudinaryStore::new(CloudinaryConfig::new(cloud_name, preset)))
        }
    };

    let state = AppState {
        intake: Arc::new(IntakeService::new(
            store.clone(),
            users.clone(),
            notifier.clone(),
        )),
        review: Arc::new(ReviewService::new(
            store.clone(),
            users.clone(),
            notifier.clone(),
        )),
        users,
        documents,
        pool: Some(pool),
        config: config.clone(),
    };

    let mut app = create_router(state);

    // Serve locally stored uploads so their URLs resolve
    if config.storage_backend == StorageBackend::Local {
        app = app.nest_service("/uploads", ServeDir::new(&config.uploads_dir));
    }

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .context("invalid server address")?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads API configuration from environment variables.
///
/// Falls back to individual environment variables or defaults when the
/// prefixed form is incomplete.
fn load_config() -> ApiConfig {
    ApiConfig::from_env().unwrap_or_else(|_| {
        let defaults = ApiConfig::default();
        ApiConfig {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            jwt_secret: std::env::var("API_JWT_SECRET").unwrap_or(defaults.jwt_secret),
            jwt_expiration_secs: std::env::var("API_JWT_EXPIRATION_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.jwt_expiration_secs),
            database_url: std::env::var("DATABASE_URL")
                .or_else(|_| std::env::var("API_DATABASE_URL"))
                .unwrap_or(defaults.database_url),
            log_level: std::env::var("API_LOG_LEVEL")
                .or_else(|_| std::env::var("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            storage_backend: match std::env::var("API_STORAGE_BACKEND").as_deref() {
                Ok("cloudinary") => StorageBackend::Cloudinary,
                _ => StorageBackend::Local,
            },
            uploads_dir: std::env::var("API_UPLOADS_DIR").unwrap_or(defaults.uploads_dir),
            uploads_base_url: std::env::var("API_UPLOADS_BASE_URL")
                .unwrap_or(defaults.uploads_base_url),
            cloudinary_cloud_name: std::env::var("API_CLOUDINARY_CLOUD_NAME").ok(),
            cloudinary_upload_preset: std::env::var("API_CLOUDINARY_UPLOAD_PRESET").ok(),
            mail_endpoint: std::env::var("API_MAIL_ENDPOINT").ok(),
            mail_api_key: std::env::var("API_MAIL_API_KEY").ok(),
            mail_from: std::env::var("API_MAIL_FROM").unwrap_or(defaults.mail_from),
        }
    })
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// This enables graceful shutdown of the server, allowing in-flight
/// requests to complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
