//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use zeroize::Zeroizing;

use pulse_backend::inbound::http::health::HealthState;
use pulse_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pulse_backend::settings::{ServerSettings, ephemeral_token_secret, read_token_secret};
use server::{ServerConfig, create_server};

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

    let settings = ServerSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let token_secret = load_token_secret(&settings)?;
    let mut config = ServerConfig::new(
        settings.bind_addr()?,
        settings.allowed_origin(),
        token_secret,
        settings.token_ttl(),
    );
    if let Some(url) = settings.database_url() {
        config = config.with_db_pool(connect(&settings, url).await?);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %config.bind_addr, "starting server");
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}

fn load_token_secret(settings: &ServerSettings) -> std::io::Result<Zeroizing<Vec<u8>>> {
    match &settings.token_secret_file {
        Some(path) => read_token_secret(path),
        None if cfg!(debug_assertions) => {
            warn!("no token secret configured; using a temporary secret (dev only)");
            Ok(ephemeral_token_secret())
        }
        None => Err(std::io::Error::other(
            "PULSE_TOKEN_SECRET_FILE must name a file holding the token signing secret",
        )),
    }
}

async fn connect(settings: &ServerSettings, url: &str) -> std::io::Result<DbPool> {
    run_pending_migrations(url)
        .await
        .map_err(|e| std::io::Error::other(format!("database migrations failed: {e}")))?;
    let config = PoolConfig::new(url)
        .with_max_size(settings.pool_max_size())
        .with_connection_timeout(settings.pool_timeout());
    DbPool::new(config)
        .await
        .map_err(|e| std::io::Error::other(format!("database pool failed: {e}")))
}
