//! Collects creature and move reference tables from pokemondb.net.
//!
//! Each pipeline reads a generation listing, follows every row's detail
//! link, merges listing and detail values and writes one TSV file.

mod error;
mod macros;

pub mod cli;
pub mod config;
pub mod logging;
pub mod normalize;
pub mod output;
pub mod parse;
pub mod process;
pub mod record;
pub mod request;

pub use error::{Error, Result};
