pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod services;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::infrastructure::postgres::postgres_connection;

pub async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let dotenvy_env = config::config_loader::load()?;
    info!("ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    let config = Arc::new(dotenvy_env);
    let db_pool = Arc::new(postgres_pool);

    services::sweeper::spawn(Arc::clone(&db_pool));

    infrastructure::axum_http::http_serve::start(config, db_pool).await?;

    Ok(())
}
