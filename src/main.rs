use chrono::Local;
use clap::Parser;
use dex_scrape::cli::{Cli, Commands};
use dex_scrape::config::CollectConfig;
use dex_scrape::logging::init_logging;
use dex_scrape::process::{collect_moves, collect_pokemon};
use dex_scrape::{info_time, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.command.pipeline_name())?;

    let start_time = Local::now();
    let report = match cli.command {
        Commands::Pokemon(args) => collect_pokemon(&args.into_config(CollectConfig::pokemon())).await?,
        Commands::Moves(args) => collect_moves(&args.into_config(CollectConfig::moves())).await?,
    };
    info_time!(start_time, "Full program time: {}", report);

    Ok(())
}
