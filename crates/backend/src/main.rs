pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod state;
pub mod system;
pub mod usecases;

use std::sync::Arc;

use crate::shared::sheets::{GoogleSheetsClient, SheetsApi, UnconfiguredSheets};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, HeaderValue, Method};
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::CorsLayer;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file_path = log_dir.join("backend.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                // Keep application logs, silence per-query SQL noise
                "info,sqlx=warn,sea_orm=warn".into()
            }),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    let config = shared::config::load_config()?;

    shared::data::db::initialize_database(Some(&config.database.path))
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    system::initialization::initialize_system_tables().await?;

    // A missing credentials file disables the spreadsheet mirror but never
    // the service itself.
    let credentials = shared::config::resolve_path(&config.google.credentials_path);
    let sheets: Arc<dyn SheetsApi> = match GoogleSheetsClient::new(&credentials) {
        Ok(client) => {
            tracing::info!("Google Sheets client ready ({})", client.client_email());
            Arc::new(client)
        }
        Err(e) => {
            tracing::warn!(
                "Google Sheets client unavailable ({}): {}",
                credentials.display(),
                e
            );
            Arc::new(UnconfiguredSheets)
        }
    };

    let mut origins = Vec::new();
    for origin in &config.server.allowed_origins {
        match origin.parse::<HeaderValue>() {
            Ok(value) => origins.push(value),
            Err(_) => tracing::warn!("Ignoring invalid CORS origin: {}", origin),
        }
    }

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    let app = routes::configure_routes(AppState::new(sheets)).layer(cors);

    let addr: SocketAddr = ([0, 0, 0, 0], config.server.port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    config.server.port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", config.server.port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
