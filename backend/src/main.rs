//! Admin console entry-point: wires REST endpoints, the console socket, and
//! OpenAPI docs.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use admin_console::domain::ports::{DirectoryStore, FixtureLoginService};
use admin_console::inbound::http::health::HealthState;
use admin_console::outbound::memory::InMemoryDirectory;
use admin_console::settings::ConsoleSettings;
use server::{ServerConfig, create_server, load_session_key};

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

    let settings = ConsoleSettings::load().map_err(|e| eyre!("failed to load settings: {e}"))?;
    let key = load_session_key(&settings)?;

    let directory = Arc::new(InMemoryDirectory::new());
    if settings.seed_fixture_accounts {
        seed_fixture_accounts(directory.as_ref()).await?;
    }

    let config = ServerConfig::from_settings(&settings, key).with_directory(directory);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(make_metrics()?));

    let bind_addr = config.bind_addr();
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, "admin console listening");
    server.await.wrap_err("server terminated with an error")
}

async fn seed_fixture_accounts(directory: &dyn DirectoryStore) -> Result<()> {
    for user in FixtureLoginService::seed_users().map_err(|e| eyre!("{e}"))? {
        directory
            .put_user(&user)
            .await
            .wrap_err_with(|| format!("failed to seed user {}", user.id()))?;
        info!(user_id = %user.id(), "seeded fixture account");
    }
    Ok(())
}

#[cfg(feature = "metrics")]
fn make_metrics() -> Result<actix_web_prom::PrometheusMetrics> {
    PrometheusMetricsBuilder::new("admin_console")
        .endpoint("/metrics")
        .build()
        .map_err(|e| eyre!("configure Prometheus metrics: {e}"))
}
