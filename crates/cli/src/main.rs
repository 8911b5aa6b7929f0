use clap::{Parser, Subcommand};

mod commands;
mod table;

use commands::{FetchArgs, ScreenArgs};

#[derive(Parser)]
#[command(name = "hl-screen")]
#[command(about = "Listing and leverage screener for Hyperliquid assets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download feed snapshots into the cache directory
    Fetch(FetchArgs),
    /// Score cached data and write the recommendation report
    Screen(ScreenArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Fetch(args) => commands::fetch::run_fetch(args).await,
        Commands::Screen(args) => commands::screen::run_screen(&args),
    }
}
