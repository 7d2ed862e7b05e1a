use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use homecarpent_core::ports::IdentityGateway;
use homecarpent_db::PgProfileRepository;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use homecarpent_api::auth::gateway::PgIdentityGateway;
use homecarpent_api::config::{Backend, ServerConfig};
use homecarpent_api::router::build_app_router;
use homecarpent_api::state::{build_blob_store, AppState};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "homecarpent_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        backend = ?config.backend,
        "Loaded server configuration"
    );

    // --- Blob storage ---
    let blobs = build_blob_store(&config.blob).await;
    tracing::info!(backend = blobs.backend_tag(), "Blob store ready");

    let cancel = CancellationToken::new();
    let mut background = Vec::new();

    // --- Persistence + identity ---
    let state = match config.backend {
        Backend::Memory => {
            tracing::warn!("Using in-memory backend; accounts and profiles are not persisted");
            AppState::in_memory(config.clone(), blobs)
        }
        Backend::Postgres => {
            let database_url = config
                .database_url
                .clone()
                .expect("DATABASE_URL must be set");
            let jwt = config.jwt.clone().expect("JWT_SECRET must be set");

            let pool = homecarpent_db::create_pool(&database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            homecarpent_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            homecarpent_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            background.push(tokio::spawn(
                homecarpent_api::background::session_cleanup::run(pool.clone(), cancel.clone()),
            ));

            let identity: Arc<dyn IdentityGateway> =
                Arc::new(PgIdentityGateway::new(pool.clone(), jwt));
            let profiles = Arc::new(PgProfileRepository::new(pool.clone()));
            AppState::new(config.clone(), Some(pool), identity, blobs, profiles)
        }
    };

    // --- Router ---
    let app = build_app_router(state);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    cancel.cancel();
    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    for handle in background {
        let _ = tokio::time::timeout(grace, handle).await;
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
