use axum::{middleware, routing::get, Router};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tunetrivia::{auth, catalog::JsonCatalog, config::TriviaConfig, state::AppState, ws};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tunetrivia=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Tune Trivia...");

    let config = match TriviaConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let auth_config = Arc::new(auth::AuthConfig::from_env());
    let catalog = Arc::new(JsonCatalog::new(config.songs_path.clone()));
    let port = config.port;
    let auto_start = config.auto_start;

    let state = Arc::new(AppState::new(config, catalog));

    if auto_start {
        match state.start_game().await {
            Ok(running) => tracing::info!("Auto-started game {}", running.game.id()),
            Err(e) => tracing::warn!("Auto-start failed: {}", e),
        }
    }

    // Protected host socket (with HTTP Basic Auth)
    let host_routes = Router::new()
        .route("/ws/host", get(ws::host_ws_handler))
        .layer(middleware::from_fn_with_state(
            auth_config.clone(),
            auth::host_auth_middleware,
        ));

    let app = Router::new()
        .route("/ws", get(ws::ws_handler))
        .merge(host_routes)
        .fallback_service(ServeDir::new("static"))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
