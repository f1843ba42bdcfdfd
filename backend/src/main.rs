//! Ticketdesk server entry point.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ticketdesk::inbound::http::health::HealthState;
use ticketdesk::inbound::http::session_config::{BuildMode, session_settings_from_env};
use ticketdesk::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use ticketdesk::server::{ServerConfig, create_server};
use ticketdesk::settings::AppSettings;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| std::io::Error::other(err.to_string()))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|err| std::io::Error::other(err.to_string()))?;

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let mut config = ServerConfig::new(session, bind_addr, clock);

    if let Some(url) = settings.database_url() {
        let max_size = settings
            .pool_max_size()
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        run_pending_migrations(url)
            .await
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        let pool = DbPool::new(PoolConfig::new(url).with_max_size(max_size))
            .await
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        config = config.with_db_pool(pool);
    } else {
        info!("no database configured; data is kept in memory");
    }

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
