//! CLI parser.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vk-tracer")]
#[command(about = "Tracks VK users and reports on Telegram when they come online", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the tracer (config from env; flags override TG_TOKEN / VK_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
        #[arg(long)]
        vk_token: Option<String>,
    },
}
