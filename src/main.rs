//! Server binary: loads `.env`, creates the `pages` table if needed, serves the app.

use pages_web::{build_router, AppState, PageStore, PgPageStore, Settings};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.default_log_filter())),
        )
        .init();

    let store = PgPageStore::connect(&settings).await?;
    if let Err(e) = store.ensure_schema().await {
        tracing::error!(error = %e, "failed to create database tables");
        return Err(e.into());
    }
    tracing::info!("database tables created successfully");

    let state = AppState::new(Arc::new(store), settings.clone());
    let app = build_router(state);

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
