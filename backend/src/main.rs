use axum::http::Method;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};

mod advice;
mod config;
mod export;
mod mirror;
mod reports;
mod rest;
mod store;
mod transactions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let config = config::AppConfig::from_env()?;
    info!("Using data directory {}", config.data_dir.display());
    if config.advice_url.is_none() {
        info!("No advice endpoint configured; advice endpoints will serve fallbacks");
    }

    let store = Arc::new(store::RecordStore::new(config.data_dir.clone())?);
    let mirror = mirror::MirrorClient::new(config.http_timeout)?;
    let advice = advice::AdviceService::new(config.advice_url.clone(), config.http_timeout)?;
    let transactions = transactions::TransactionService::new(store.clone(), mirror);
    let state = rest::AppState::new(store, transactions, advice, export::ExportService::new());

    // CORS setup so a browser dashboard can talk to the API directly
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(Any);

    let app = rest::router(state).layer(cors);

    info!("Starting server on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
