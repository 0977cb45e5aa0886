//! Gridmatch server binary.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gridmatch::cli::{Cli, Command};
use gridmatch::http::{self, AppState};
use gridmatch::player::PlayerRegistry;
use gridmatch::rate_limit::{RateLimitConfig, RateLimiter};
use gridmatch::service::GameService;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            port,
            host,
            rate_limit,
            rate_window_secs,
        } => serve(host, port, rate_limit, rate_window_secs).await,
    }
}

async fn serve(host: String, port: u16, rate_limit: u32, rate_window_secs: u64) -> Result<()> {
    info!(host = %host, port, "Starting gridmatch server");

    let players = Arc::new(PlayerRegistry::new());
    let service = Arc::new(GameService::new(players));
    let limiter = Arc::new(RateLimiter::new(RateLimitConfig {
        max_requests: rate_limit,
        window: Duration::from_secs(rate_window_secs),
        ..RateLimitConfig::default()
    }));

    let app = http::router(AppState { service, limiter });

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!("Server ready at http://{}:{}/", host, port);
    axum::serve(listener, app).await?;

    Ok(())
}
