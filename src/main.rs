use anyhow::{Context, Result};
use chessgpt::{config::Config, server};
use clap::Parser;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::parse();

    let state = config.app_state().context("opening game store")?;
    info!(
        "engine {} (depth {}, timeout {} ms), claim draws: {}",
        config.engine, config.engine_depth, config.engine_timeout, config.claim_draws
    );

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, server::router(state)).await?;
    Ok(())
}
