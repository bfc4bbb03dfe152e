//! Association hub entry-point: loads settings, wires storage and starts the HTTP server.

use actix_web::web;
use color_eyre::eyre::{Context, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use association_hub::domain::BootstrapOutcome;
use association_hub::inbound::http::health::HealthState;
use association_hub::inbound::http::session_config::{BuildMode, session_settings_from_env};
use association_hub::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use association_hub::settings::HubSettings;

mod server;

use server::{Repositories, ServerConfig, build_publisher, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        HubSettings::load().map_err(|err| eyre!("failed to load hub settings: {err}"))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .context("invalid session configuration")?;

    let repositories = repositories_from(&settings).await?;
    let seed = settings.admin_seed()?;
    match repositories.bootstrap().run(seed.as_ref()).await {
        Ok(BootstrapOutcome::Seeded(user)) => {
            info!(user_id = %user.id(), "default administrator created");
        }
        Ok(BootstrapOutcome::AlreadyPopulated) => info!("user directory already populated"),
        Ok(BootstrapOutcome::NotConfigured) => {
            warn!("user directory empty and no default administrator configured");
        }
        Err(err) => return Err(eyre!("failed to seed the user directory: {err}")),
    }

    let publisher = build_publisher(
        settings.notification_endpoint(),
        settings.notification_timeout(),
    )?;
    let health_state = web::Data::new(HealthState::new(repositories.storage()));
    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr()?,
    )
    .with_repositories(repositories)
    .with_publisher(publisher)
    .with_frontend_url(settings.frontend_url());

    create_server(health_state, config)?.await?;
    Ok(())
}

async fn repositories_from(settings: &HubSettings) -> color_eyre::Result<Repositories> {
    let Some(url) = settings.database_url() else {
        warn!("HUB_DATABASE_URL not set; using the in-memory store");
        return Ok(Repositories::in_memory());
    };
    if settings.run_migrations {
        run_pending_migrations(url)
            .await
            .context("failed to apply database migrations")?;
    }
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_size()))
        .await
        .context("failed to build the connection pool")?;
    Ok(Repositories::diesel(&pool))
}
