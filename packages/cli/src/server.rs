// ABOUTME: HTTP server assembly and lifecycle
// ABOUTME: Layers middleware over the API, serves the client app, and runs until shutdown

use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;

use axum::{
    extract::Request,
    http::{HeaderValue, Method},
    response::IntoResponse,
    Router,
};
use colored::*;
use tokio::net::TcpListener;
use tower::ServiceExt;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::api::{self, API_ROOT};
use crate::config::{Config, ConfigError};
use crate::middleware::{create_panic_handler, SecurityHeadersLayer};
use todo_api::AppState;
use todo_storage::Database;

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the complete application: API routes, client fallback and middleware
pub fn build_app(state: AppState, config: &Config) -> Result<Router, ConfigError> {
    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .map_err(|_| ConfigError::InvalidCorsOrigin(config.cors_origin.clone()))?,
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    if !config.static_dir.join("index.html").is_file() {
        warn!(
            "Client app not found at {}, only the API will be served",
            config.static_dir.display()
        );
    }
    let client = client_service(&config.static_dir);

    let app = api::create_router(state)
        .fallback(move |request: Request| {
            let client = client.clone();
            async move {
                if request.uri().path().starts_with(API_ROOT) {
                    return api::api_not_found(request.uri()).into_response();
                }
                match client.oneshot(request).await {
                    Ok(response) => response.into_response(),
                    Err(never) => match never {},
                }
            }
        })
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(SecurityHeadersLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(create_panic_handler());

    Ok(app)
}

/// Static files with `index.html` as the fallback for client-side routes
fn client_service(static_dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")))
}

/// Serve `app` on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Connect storage, bind the configured address, and serve until Ctrl-C
pub async fn run(config: Config) -> anyhow::Result<()> {
    let database = Database::connect(&config.storage_config()).await?;
    let app = build_app(AppState::from_database(&database), &config)?;

    let addr = SocketAddr::new(config.host, config.port);
    let listener = TcpListener::bind(addr).await?;

    println!("{}", "Starting todo server...".green().bold());
    println!("{} http://{}", "Listening on".cyan(), addr);
    println!("{} {}", "Database:".cyan(), config.database_path.display());
    println!("{} {}", "CORS origin:".cyan(), config.cors_origin);
    info!("Server listening on {}", addr);

    serve(listener, app, shutdown_signal()).await?;

    database.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
