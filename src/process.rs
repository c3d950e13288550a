use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use scraper::Html;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::CollectConfig;
use crate::output::{write_tsv, TsvRecord};
use crate::parse::detail::{parse_move_detail, parse_pokemon_detail};
use crate::parse::listing::{parse_move_index, parse_move_listing, parse_pokemon_listing};
use crate::parse::parse_off_thread;
use crate::record::{MoveDetail, MoveRecord, MoveStub, PokemonDetail, PokemonRecord, PokemonStub, Stub};
use crate::request::{build_client, Fetch};
use crate::{info_time, Error, Result};

/// Log a progress line every this many entities.
const PROGRESS_LOG_EVERY: usize = 50;

/// One kind of entity: where its listings live, how its pages parse and how
/// listing and detail values combine.
pub trait Pipeline {
    type Stub: Stub + Send + 'static;
    type Detail: Default + Send + 'static;
    type Record: TsvRecord;

    const NAME: &'static str;

    fn listing_url(base_url: &str, generation: u32) -> String;

    fn parse_listing(html: &str, base_url: &str, generation: u32) -> Result<Vec<Self::Stub>>;

    fn parse_detail(html: &str, link: &str) -> Self::Detail;

    fn merge(&self, stub: Self::Stub, detail: Self::Detail) -> Self::Record;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PokemonPipeline;

impl Pipeline for PokemonPipeline {
    type Stub = PokemonStub;
    type Detail = PokemonDetail;
    type Record = PokemonRecord;

    const NAME: &'static str = "pokemon";

    fn listing_url(base_url: &str, generation: u32) -> String {
        format!("{base_url}/pokedex/stats/gen{generation}")
    }

    fn parse_listing(html: &str, base_url: &str, generation: u32) -> Result<Vec<PokemonStub>> {
        parse_pokemon_listing(&Html::parse_document(html), base_url, generation)
    }

    fn parse_detail(html: &str, link: &str) -> PokemonDetail {
        parse_pokemon_detail(&Html::parse_document(html), link)
    }

    fn merge(&self, stub: PokemonStub, detail: PokemonDetail) -> PokemonRecord {
        PokemonRecord::merge(stub, detail)
    }
}

/// Moves carry no number on the listing; it comes from a separate index.
#[derive(Debug, Clone, Default)]
pub struct MovePipeline {
    ids: HashMap<String, String>,
}

impl MovePipeline {
    pub fn with_ids(ids: HashMap<String, String>) -> Self {
        Self { ids }
    }

    /// Fetches the move-number index. A failure only costs the `id` column.
    pub async fn prepare<F: Fetch>(fetcher: &F, config: &CollectConfig) -> Self {
        info!("Collecting move numbers from {}", config.move_index_url);
        let ids = match fetcher.fetch(&config.move_index_url).await {
            Ok(html) => match parse_off_thread(move || parse_move_index(&Html::parse_document(&html))).await {
                Ok(Ok(ids)) => ids,
                Ok(Err(err)) | Err(err) => {
                    warn!(%err, "Move number index unreadable, continuing without ids");
                    HashMap::new()
                }
            },
            Err(err) => {
                warn!(%err, "Move number index unavailable, continuing without ids");
                HashMap::new()
            }
        };
        info!("Move number index holds {} moves", ids.len());
        Self::with_ids(ids)
    }

    pub fn id_for(&self, name: &str) -> Option<String> {
        self.ids.get(&name.to_lowercase()).cloned()
    }
}

impl Pipeline for MovePipeline {
    type Stub = MoveStub;
    type Detail = MoveDetail;
    type Record = MoveRecord;

    const NAME: &'static str = "moves";

    fn listing_url(base_url: &str, generation: u32) -> String {
        format!("{base_url}/move/generation/{generation}")
    }

    fn parse_listing(html: &str, base_url: &str, generation: u32) -> Result<Vec<MoveStub>> {
        parse_move_listing(&Html::parse_document(html), base_url, generation)
    }

    fn parse_detail(html: &str, link: &str) -> MoveDetail {
        parse_move_detail(&Html::parse_document(html), link)
    }

    fn merge(&self, stub: MoveStub, detail: MoveDetail) -> MoveRecord {
        let id = self.id_for(&stub.name_en);
        MoveRecord::merge(id, stub, detail)
    }
}

/// Outcome counts of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionReport {
    pub records: usize,
    /// Detail page fetched and parsed.
    pub enriched: usize,
    /// Detail page could not be fetched; the record holds listing values only.
    pub failed: usize,
}

impl fmt::Display for CollectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records ({} with details, {} listing only)",
            self.records, self.enriched, self.failed
        )
    }
}

#[derive(Debug, Clone)]
pub struct Collection<R> {
    pub records: Vec<R>,
    pub report: CollectionReport,
}

/// Collects listings for every configured generation, then every detail page.
///
/// Returns [`Error::NoData`] when no listing produced a single stub.
pub async fn collect<P, F>(pipeline: &P, fetcher: &F, config: &CollectConfig) -> Result<Collection<P::Record>>
where
    P: Pipeline + 'static,
    F: Fetch,
{
    let start_time = Local::now();
    info_time!("Started collecting {} for generations {:?}", P::NAME, config.generations);

    let stubs = collect_stubs::<P, F>(fetcher, config).await?;
    if stubs.is_empty() {
        error!("No {} listing could be collected", P::NAME);
        return Err(Error::NoData { pipeline: P::NAME });
    }
    info_time!(start_time, "Collected {} {} listings", stubs.len(), P::NAME);

    let detail_time = Local::now();
    let collection = collect_details(pipeline, fetcher, config, stubs).await?;
    info_time!(detail_time, "Finished {} details: {}", P::NAME, collection.report);

    Ok(collection)
}

/// Listing stubs in generation then row order, links unique.
async fn collect_stubs<P, F>(fetcher: &F, config: &CollectConfig) -> Result<Vec<P::Stub>>
where
    P: Pipeline + 'static,
    F: Fetch,
{
    let mut stubs = Vec::new();
    let mut seen_links = HashSet::new();

    for (i, &generation) in config.generations.iter().enumerate() {
        if i > 0 {
            sleep(config.listing_delay).await;
        }
        let url = P::listing_url(&config.base_url, generation);
        debug!(generation, %url, "Requesting listing");

        let html = match fetcher.fetch(&url).await {
            Ok(html) => html,
            Err(err) => {
                error!(generation, %err, "Listing fetch failed");
                continue;
            }
        };

        let base_url = config.base_url.clone();
        let found = match parse_off_thread(move || P::parse_listing(&html, &base_url, generation)).await? {
            Ok(found) => found,
            Err(err) => {
                warn!(generation, %err, "Listing skipped");
                continue;
            }
        };

        let mut added = 0;
        for stub in found {
            if seen_links.insert(stub.link().to_string()) {
                stubs.push(stub);
                added += 1;
            } else {
                debug!(link = stub.link(), "Duplicate listing entry dropped");
            }
        }
        info!("Generation {generation}: {added} {} collected", P::NAME);
    }

    Ok(stubs)
}

/// True for positions 1, 51, 101, …
fn logs_progress_at(position: usize) -> bool {
    position % PROGRESS_LOG_EVERY == 1
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta}) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    pb.set_style(style);
    pb
}

async fn collect_details<P, F>(
    pipeline: &P,
    fetcher: &F,
    config: &CollectConfig,
    stubs: Vec<P::Stub>,
) -> Result<Collection<P::Record>>
where
    P: Pipeline + 'static,
    F: Fetch,
{
    let total = stubs.len();
    let pb = progress_bar(total, config.show_progress);
    let mut records = Vec::with_capacity(total);
    let mut report = CollectionReport::default();

    for (i, stub) in stubs.into_iter().enumerate() {
        if i > 0 {
            sleep(config.detail_delay).await;
        }
        let label = stub.label();
        pb.set_message(label.clone());

        let detail = match fetcher.fetch(stub.link()).await {
            Ok(html) => {
                let link = stub.link().to_string();
                report.enriched += 1;
                parse_off_thread(move || P::parse_detail(&html, &link)).await?
            }
            Err(err) => {
                report.failed += 1;
                warn!(link = stub.link(), %err, "Detail fetch failed, keeping listing values");
                P::Detail::default()
            }
        };

        if logs_progress_at(i + 1) {
            let pct = (i + 1) as f64 / total as f64 * 100.0;
            info!("Progress: {}/{} done ({:.1}%)", i + 1, total, pct);
        }
        debug!(entity = %label, "Merged");

        records.push(pipeline.merge(stub, detail));
        pb.inc(1);
    }
    pb.finish_and_clear();

    report.records = records.len();
    Ok(Collection { records, report })
}

/// Collects with `pipeline` and writes the TSV, returning the run's counts.
pub async fn run_pipeline<P, F>(pipeline: &P, fetcher: &F, config: &CollectConfig) -> Result<CollectionReport>
where
    P: Pipeline + 'static,
    F: Fetch,
{
    let collection = collect(pipeline, fetcher, config).await?;

    let write_time = Local::now();
    write_tsv(&config.output, &collection.records).await?;
    info_time!(write_time, "Wrote {} rows to {}", collection.records.len(), config.output.display());

    Ok(collection.report)
}

pub async fn collect_pokemon(config: &CollectConfig) -> Result<CollectionReport> {
    let client = build_client()?;
    run_pipeline(&PokemonPipeline, &client, config).await
}

pub async fn collect_moves(config: &CollectConfig) -> Result<CollectionReport> {
    let client = build_client()?;
    let pipeline = MovePipeline::prepare(&client, config).await;
    run_pipeline(&pipeline, &client, config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn move_ids_match_case_insensitively() {
        let pipeline = MovePipeline::with_ids(HashMap::from([("karate chop".to_string(), "2".to_string())]));
        assert_eq!(pipeline.id_for("Karate Chop").as_deref(), Some("2"));
        assert_eq!(pipeline.id_for("Pound"), None);
    }

    #[test]
    fn listing_urls() {
        assert_eq!(
            PokemonPipeline::listing_url("https://pokemondb.net", 3),
            "https://pokemondb.net/pokedex/stats/gen3"
        );
        assert_eq!(
            MovePipeline::listing_url("https://pokemondb.net", 1),
            "https://pokemondb.net/move/generation/1"
        );
    }

    #[test]
    fn progress_is_logged_from_the_first_entity_every_fifty() {
        let logged: Vec<usize> = (1..=120).filter(|&p| logs_progress_at(p)).collect();
        assert_eq!(logged, [1, 51, 101]);
    }

    #[test]
    fn report_reads_as_partial_success() {
        let report = CollectionReport {
            records: 3,
            enriched: 2,
            failed: 1,
        };
        assert_eq!(report.to_string(), "3 records (2 with details, 1 listing only)");
    }
}
