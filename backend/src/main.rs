//! authgate entry-point: loads configuration, wires adapters, serves HTTP.

mod server;

use color_eyre::eyre::{Context, Result};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use authgate::config::{AuthSettings, BuildMode, signing_key_from_env};
use authgate::outbound::persistence::{DbPool, PoolConfig};
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

    let settings = AuthSettings::load().wrap_err("failed to load configuration")?;
    let bind_addr = settings.bind_addr()?;
    let signing_key = signing_key_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("failed to resolve token signing secret")?;

    let mut config = ServerConfig::new(
        bind_addr,
        signing_key,
        settings.token_ttl()?,
        settings.bcrypt_cost()?,
    );
    if let Some(url) = settings.database_url() {
        let pool = DbPool::new(PoolConfig::new(url))
            .await
            .wrap_err("failed to create database pool")?;
        config = config.with_db_pool(pool);
    }

    info!(%bind_addr, "starting authgate");
    create_server(config)?.await?;
    Ok(())
}
