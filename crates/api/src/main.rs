use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use khub_api::config::ServerConfig;
use khub_api::router::build_app_router;
use khub_api::state::AppState;
use khub_versioning::lookups::{PgCategoryResolver, PgIdentityProvider};
use khub_versioning::{PgVersionStore, VersioningEngine};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "khub_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Live store ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = khub_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Live-store connection pool created");

    khub_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Live-store health check passed");

    khub_db::run_migrations(&pool)
        .await
        .expect("Failed to run live-store migrations");
    tracing::info!("Live-store migrations applied");

    // --- Version store ---
    // Falls back to the live database when no dedicated store is configured;
    // the engine still treats the two as separate (no cross-store
    // transactions), so splitting them later is a config change.
    let version_database_url =
        std::env::var("VERSION_DATABASE_URL").unwrap_or_else(|_| database_url.clone());
    let version_store = PgVersionStore::connect(&version_database_url)
        .await
        .expect("Failed to connect to version store");
    tracing::info!("Version store ready");

    // --- Versioning engine ---
    let engine = Arc::new(VersioningEngine::new(
        pool.clone(),
        Arc::new(version_store),
        Arc::new(PgIdentityProvider::new(pool.clone())),
        Arc::new(PgCategoryResolver::new(pool.clone())),
    ));

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        engine,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

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

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
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
