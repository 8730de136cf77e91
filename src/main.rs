use nannyhub::config::Config;
use nannyhub::repository::PgUserStore;
use nannyhub::telemetry::init_tracing;
use nannyhub::utils::constant::DB_ACQUIRE_TIMEOUT;
use nannyhub::{app, build_state};
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.app_env);

    let db_pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(DB_ACQUIRE_TIMEOUT)
        .connect(config.database_url.expose_secret())
        .await?;

    sqlx::migrate!().run(&db_pool).await?;
    info!("Database migrations applied");

    let state = build_state(Arc::new(PgUserStore::new(db_pool)), &config);
    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("Server starting at http://{}", config.bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(?e, "Failed to listen for shutdown signal");
    }
}
