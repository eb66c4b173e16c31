//! Backend entry-point: loads settings, prepares storage and serves the API.

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use campus_auth::inbound::http::health::HealthState;
use campus_auth::outbound::persistence::{DbPool, PoolConfig, run_migrations_blocking};
use campus_auth::server::{ServerConfig, ServerSettings, create_server};
use ortho_config::OrthoConfig;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ServerSettings::load().map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let bind_addr = settings.bind_addr()?;
    let token_secret = settings.jwt_secret()?;
    let mut config = ServerConfig::new(bind_addr, token_secret)
        .with_token_lifetimes(settings.token_lifetimes()?);

    if let Some(database_url) = settings.database_url() {
        if settings.run_migrations() {
            let applied = run_migrations_blocking(database_url.to_owned())
                .await
                .wrap_err("database migrations failed")?;
            info!(applied, "database schema up to date");
        }
        let pool_config =
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections());
        info!(pool = ?pool_config, "connecting to database");
        let pool = DbPool::new(pool_config)
            .await
            .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting HTTP server");
    create_server(health_state, config)?.await?;
    Ok(())
}
