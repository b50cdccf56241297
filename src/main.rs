//! Hogline, the digital curling match client binary.
//!
//! Joins the configured match with the illustrative draw-weight engine and
//! plays it to completion.

mod cli;

use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use hogline::{
    ClientFactory, ConnectCallbacks, ConnectSettings, DrawEngine, NormalDistFactoryCreator, Team,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let requested = if cli.team == 0 { Team::Team0 } else { Team::Team1 };

    let engine = Box::new(DrawEngine::new());
    let factories = Box::new(NormalDistFactoryCreator);

    info!(host = %cli.host, id = %cli.id, "creating client");
    let mut client = ClientFactory::create_client(&cli.host, &cli.id, engine, factories).await?;

    let assigned = client.join(requested, &cli.auth_id, &cli.auth_pw).await?;
    info!(
        match_name = %client.match_info().name,
        team = %assigned,
        "joined match"
    );

    let settings = ConnectSettings {
        max_retry_count: cli.max_retries,
        retry_interval: Duration::from_secs(cli.retry_wait),
        callbacks: ConnectCallbacks {
            on_connected: Some(Box::new(|| info!("game in progress"))),
            on_latest_state_update: Some(Box::new(|event| {
                info!(
                    end = event.game_state.end + 1,
                    shot = event.total_shot_number,
                    "match progress"
                );
            })),
            ..ConnectCallbacks::default()
        },
    };
    client.connect(settings).await?;

    info!("match finished");
    Ok(())
}
