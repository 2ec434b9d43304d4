mod api;
mod config;
mod error;
mod fetcher;
mod rules;
mod scrape;
mod stats;
mod types;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::api::routes::{router, ApiState};
use crate::config::Config;
use crate::error::Result;
use crate::fetcher::build_client;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let client = build_client(&cfg)?;
    info!(
        "Upstream {} ({}s timeout)",
        cfg.upstream_url, cfg.http_timeout_secs
    );

    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let app = router(ApiState::new(client, cfg));
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
