mod app;
mod cli;
mod error;
mod handlers;
mod model;
mod state;

use crate::app::App;
use crate::cli::{LogFormatArg, StorageBackendArg, CLI};
use crate::state::AppState;
use anyhow::Context;
use clap::Parser;
use hashlink_storage::{DurableTable, InMemoryTable, MySqlTable, UnavailableTable};
use hashlink_store::{StoreSettings, UrlStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    init_tracing(config.log_format);

    let settings = StoreSettings::builder()
        .cache_capacity(config.cache_capacity)
        .eviction(config.cache_eviction.into())
        .build();

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        cache_capacity = settings.cache_capacity,
        cache_eviction = %settings.eviction,
        "starting gateway server"
    );

    match config.storage {
        StorageBackendArg::InMemory => {
            run_server(&config, InMemoryTable::new(), &settings).await?;
        }
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when storage backend is mysql")?;
            let table = MySqlTable::connect(mysql_dsn)
                .await
                .context("failed to connect to mysql")?;
            table
                .ensure_schema()
                .await
                .context("failed to create url_records table")?;
            run_server(&config, table, &settings).await?;
        }
        StorageBackendArg::None => {
            run_server(&config, UnavailableTable::default(), &settings).await?;
        }
    }

    Ok(())
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormatArg::Text => builder.init(),
        LogFormatArg::Json => builder.json().init(),
    }
}

async fn run_server<T: DurableTable>(
    config: &CLI,
    table: T,
    settings: &StoreSettings,
) -> anyhow::Result<()> {
    let store = UrlStore::from_settings(table, settings);
    let state = AppState::new(Arc::new(store), config.public_base_url.clone());

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
