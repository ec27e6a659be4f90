//! vk-tracer: watch VK users, notify the operator on Telegram. Config from env and optional CLI args.

use anyhow::Result;
use clap::Parser;
use tracer_bot::{run_tracer, AppConfig, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token, vk_token } => {
            let config = AppConfig::load(token, vk_token)?;
            run_tracer(config).await
        }
    }
}
