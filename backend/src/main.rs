//! Backend entry-point: wires REST endpoints, health probes, and OpenAPI docs.

mod server;

use actix_web::web;
use diesel::Connection;
use diesel_async::AsyncPgConnection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::config::AppConfig;
use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::DbPool;
use server::ServerConfig;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let db_pool = match config.pool_config() {
        Some(pool_config) => {
            run_migrations(pool_config.database_url().to_owned()).await?;
            let pool = DbPool::new(pool_config)
                .await
                .map_err(std::io::Error::other)?;
            Some(pool)
        }
        None => {
            warn!("no database configured; users endpoints are unavailable");
            None
        }
    };

    let health_state = web::Data::new(HealthState::new());
    let mut server_config = ServerConfig::new(config.bind_addr());
    if let Some(pool) = db_pool {
        server_config = server_config.with_db_pool(pool);
    }

    let server = server::create_server(health_state, server_config)?;
    info!(addr = %config.bind_addr(), "server listening");
    server.await
}

/// Apply pending migrations over a blocking connection off the runtime.
async fn run_migrations(database_url: String) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || {
        let mut conn = AsyncConnectionWrapper::<AsyncPgConnection>::establish(&database_url)
            .map_err(|e| std::io::Error::other(format!("database connection failed: {e}")))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|applied| {
                if !applied.is_empty() {
                    info!(count = applied.len(), "database migrations applied");
                }
            })
            .map_err(|e| std::io::Error::other(format!("database migrations failed: {e}")))
    })
    .await
    .map_err(|e| std::io::Error::other(format!("migration task panicked: {e}")))?
}
