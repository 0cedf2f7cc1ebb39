// src/bin/api_server.rs

use std::sync::Arc;
use taqueria_backend::crypto::TokenIssuer;
use taqueria_backend::infra::telemetry::init_tracing;
use taqueria_backend::infra::{AppConfig, Mailer, SmtpMailer};
use taqueria_backend::storage::{MenuStore, PgStore, UserStore};
use taqueria_backend::transport;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    // --- Storage ---
    info!(max_connections = config.database_max_connections, "connecting to database");
    let store = PgStore::connect(&config.database_url, config.database_max_connections).await?;
    store.ensure_schema().await?;
    let store = Arc::new(store);
    let users: Arc<dyn UserStore> = store.clone();
    let menu: Arc<dyn MenuStore> = store;

    // --- Mail ---
    let smtp = SmtpMailer::new(&config.smtp)?;
    match smtp.test_connection().await {
        Ok(true) => info!(host = %config.smtp.host, "SMTP server reachable"),
        Ok(false) => warn!(host = %config.smtp.host, "SMTP server did not accept the connection"),
        Err(e) => warn!(host = %config.smtp.host, error = %e, "SMTP connection test failed"),
    }
    let mailer: Arc<dyn Mailer> = Arc::new(smtp);

    // --- HTTP ---
    let tokens = TokenIssuer::new(config.jwt_secret.as_bytes(), config.token_ttl);
    let app_state = transport::http::AppState::new(
        users,
        menu,
        mailer,
        tokens,
        config.service_settings(),
    );
    let app = transport::http::create_app(app_state, &config.frontend_origins);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, origins = ?config.frontend_origins, "API server listening");
    info!("Swagger UI available at http://localhost:{}/swagger-ui", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received, draining connections");
}
