use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use sqlx::postgres::PgPoolOptions;
use user_service::config::Config;
use user_service::domain::user::service::UserService;
use user_service::inbound::http::router::create_router;
use user_service::logging::init_logging;
use user_service::outbound::repositories::PostgresUserRepository;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::load()?;

    // Flushes the file writer on drop
    let _log_guard = init_logging(&config.log);

    tracing::info!(
        service = "user-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    tracing::info!(
        http_port = config.server.http_port,
        max_connections = config.database.max_connections,
        token_validity_secs = config.jwt.validity_secs,
        "Configuration loaded"
    );

    let authenticator = Arc::new(
        config
            .jwt
            .validity()
            .and_then(|validity| Authenticator::new(config.jwt.secret.as_bytes(), validity))
            .map_err(|e| anyhow::anyhow!("Invalid JWT configuration: {}", e))?,
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .max_lifetime(config.database.max_lifetime_secs.map(Duration::from_secs))
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));
    let user_service = Arc::new(UserService::new(
        user_repository,
        Arc::clone(&authenticator),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, authenticator);

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
