mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use grace_api::{AppState, AppStateInner};
use grace_content::{Guidance, Scripture};
use grace_db::{Database, MemoryStore, Store};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::{Config, StorageKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grace=debug,grace_api=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let store = match config.storage {
        StorageKind::Sqlite => Store::Sqlite(Database::open(&config.db_path)?),
        StorageKind::Memory => {
            warn!("Using in-memory storage; data is lost on restart");
            Store::Memory(MemoryStore::new())
        }
    };

    let client = reqwest::Client::builder()
        .user_agent(concat!("grace/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let scripture = Scripture::with_default_providers(client.clone(), config.provider_timeout, &config.verse_cache);
    if config.inference.is_none() {
        info!("No inference token configured; guidance uses templates");
    }
    let guidance = Guidance::new(client, config.inference.clone(), config.provider_timeout);

    let state: AppState = Arc::new(AppStateInner {
        store,
        jwt_secret: config.jwt_secret.clone(),
        admin_emails: config.admin_emails.clone(),
        scripture,
        guidance,
    });

    let mut app = grace_api::router(state);
    if config.production {
        let index = config.static_dir.join("index.html");
        info!("Serving static files from {}", config.static_dir.display());
        app = app.fallback_service(ServeDir::new(&config.static_dir).fallback(ServeFile::new(index)));
    }
    let app = app
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Grace server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
