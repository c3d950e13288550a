use std::path::PathBuf;
use std::time::Duration;

pub const BASE_URL: &str = "https://pokemondb.net";
pub const MOVE_INDEX_URL: &str = "https://bulbapedia.bulbagarden.net/wiki/List_of_moves";

pub const POKEMON_OUTPUT: &str = "data/raw/pokemon_basic.tsv";
pub const MOVE_OUTPUT: &str = "data/raw/move_basic.tsv";

pub const DEFAULT_LISTING_DELAY_MS: u64 = 500;
pub const DEFAULT_DETAIL_DELAY_MS: u64 = 200;

/// Every generation the site currently lists.
pub const ALL_GENERATIONS: [u32; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];

/// Settings for one collection run.
#[derive(Debug, Clone)]
pub struct CollectConfig {
    pub generations: Vec<u32>,
    pub base_url: String,
    pub move_index_url: String,
    pub output: PathBuf,
    /// Pause between listing pages.
    pub listing_delay: Duration,
    /// Pause between detail pages.
    pub detail_delay: Duration,
    pub show_progress: bool,
}

impl CollectConfig {
    fn with_defaults(generations: Vec<u32>, output: &str) -> Self {
        Self {
            generations,
            base_url: BASE_URL.to_string(),
            move_index_url: MOVE_INDEX_URL.to_string(),
            output: PathBuf::from(output),
            listing_delay: Duration::from_millis(DEFAULT_LISTING_DELAY_MS),
            detail_delay: Duration::from_millis(DEFAULT_DETAIL_DELAY_MS),
            show_progress: true,
        }
    }

    pub fn pokemon() -> Self {
        Self::with_defaults(ALL_GENERATIONS.to_vec(), POKEMON_OUTPUT)
    }

    pub fn moves() -> Self {
        Self::with_defaults(vec![1], MOVE_OUTPUT)
    }
}
