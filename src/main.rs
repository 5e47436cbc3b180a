mod cli;
mod commands;
mod interactive;
mod render;

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use product_search_client::telemetry;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // Variables may come from the shell instead of a .env file.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(telemetry::env_filter_or(telemetry::DEFAULT_FILTER))
        .with(telemetry::layer())
        .init();

    let cli = Cli::parse();
    let client = commands::build_client(cli.api_url)?;
    commands::run(cli.command, client).await
}
