mod candidates;
mod config;
mod db;
mod errors;
mod mailer;
mod models;
mod offers;
mod routes;
mod state;
mod storage;
mod templates;

#[cfg(test)]
mod testing;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::candidates::repository::PgCandidateRepository;
use crate::config::Config;
use crate::db::create_pool;
use crate::mailer::SmtpMailer;
use crate::offers::sender::OfferSender;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::S3FileStore;
use crate::templates::repository::PgTemplateRepository;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Offers API v{}", env!("CARGO_PKG_VERSION"));

    // PostgreSQL (runs pending migrations)
    let db = create_pool(&config.database_url).await?;

    // S3 / MinIO for offer-letter PDFs
    let s3 = build_s3_client(&config).await;
    let files = Arc::new(S3FileStore::new(s3, config.s3_bucket.clone()));
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    let mailer = Arc::new(SmtpMailer::new(&config.mailer())?);
    info!("SMTP relay configured ({}:{})", config.smtp_host, config.smtp_port);

    let candidates = Arc::new(PgCandidateRepository::new(db.clone()));
    let templates = Arc::new(PgTemplateRepository::new(db));

    let offers = OfferSender::new(
        candidates.clone(),
        templates.clone(),
        files.clone(),
        mailer,
        config.send_settings(),
    );

    let state = AppState {
        candidates,
        templates,
        files,
        offers,
        status_coupling: config.status_flag_coupling,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the dashboard host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "offers-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
