//! Backend entry-point: loads settings, applies migrations and serves the
//! REST API with its health probes and OpenAPI docs.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ortho_config::OrthoConfig;
use workout_backend::inbound::http::health::HealthState;
use workout_backend::outbound::persistence::{DbPool, run_pending_migrations};
use workout_backend::settings::AppSettings;

use server::{ServerConfig, create_server};

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

    let settings = AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let database_url = settings.database_url()?;

    if settings.run_migrations() {
        let applied = run_pending_migrations(database_url)
            .await
            .wrap_err("failed to apply database migrations")?;
        info!(count = applied.len(), migrations = ?applied, "database migrations applied");
    }

    let pool = DbPool::new(settings.pool_config()?)
        .await
        .wrap_err("failed to create database pool")?;
    let config = ServerConfig::from_settings(&settings, pool)?;
    let bind_addr = config.bind_addr();

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, "listening");

    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome.wrap_err("server terminated with an error")
}
