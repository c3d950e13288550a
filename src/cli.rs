use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::{CollectConfig, BASE_URL, DEFAULT_DETAIL_DELAY_MS, DEFAULT_LISTING_DELAY_MS};

#[derive(Debug, Parser)]
#[command(name = "dex_scrape", version, about = "Collect creature and move tables into TSV files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Creatures with types, stats, evolution and dex entries
    Pokemon(CollectArgs),
    /// Moves with power, accuracy, PP and learners
    Moves(CollectArgs),
}

#[derive(Debug, Args)]
pub struct CollectArgs {
    /// Generations to collect, comma-separated (default: all for pokemon, 1 for moves)
    #[arg(short, long, value_delimiter = ',', value_parser = clap::value_parser!(u32).range(1..))]
    pub generations: Vec<u32>,

    /// Output TSV path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pause between listing pages, in milliseconds
    #[arg(long, default_value_t = DEFAULT_LISTING_DELAY_MS)]
    pub listing_delay_ms: u64,

    /// Pause between detail pages, in milliseconds
    #[arg(long, default_value_t = DEFAULT_DETAIL_DELAY_MS)]
    pub detail_delay_ms: u64,

    /// Site root that listing and detail links hang off
    #[arg(long, default_value = BASE_URL)]
    pub base_url: String,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl CollectArgs {
    /// Applies the flags on top of a pipeline's defaults.
    pub fn into_config(self, defaults: CollectConfig) -> CollectConfig {
        CollectConfig {
            generations: if self.generations.is_empty() {
                defaults.generations
            } else {
                self.generations
            },
            base_url: self.base_url.trim_end_matches('/').to_string(),
            output: self.output.unwrap_or(defaults.output),
            listing_delay: Duration::from_millis(self.listing_delay_ms),
            detail_delay: Duration::from_millis(self.detail_delay_ms),
            show_progress: !self.no_progress,
            ..defaults
        }
    }
}

impl Commands {
    pub fn pipeline_name(&self) -> &'static str {
        match self {
            Commands::Pokemon(_) => "pokemon",
            Commands::Moves(_) => "moves",
        }
    }
}
