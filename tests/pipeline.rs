use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use dex_scrape::config::CollectConfig;
use dex_scrape::normalize::Numeric;
use dex_scrape::process::{collect, run_pipeline, CollectionReport, MovePipeline, PokemonPipeline};
use dex_scrape::request::Fetch;
use dex_scrape::{Error, Result};
use pretty_assertions::assert_eq;

const BASE: &str = "https://pokemondb.net";
const INDEX: &str = "https://bulbapedia.bulbagarden.net/wiki/List_of_moves";

/// Serves canned pages; anything else fails like a 404.
#[derive(Default)]
struct FixtureSite {
    pages: HashMap<String, String>,
}

impl FixtureSite {
    fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }
}

impl Fetch for FixtureSite {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| Error::Missing(format!("no fixture for {url}")))
    }
}

fn config(generations: Vec<u32>, output: &Path) -> CollectConfig {
    CollectConfig {
        generations,
        base_url: BASE.to_string(),
        move_index_url: INDEX.to_string(),
        output: output.to_path_buf(),
        listing_delay: Duration::ZERO,
        detail_delay: Duration::ZERO,
        show_progress: false,
    }
}

const POKEMON_LISTING: &str = r#"
<html><body>
<table id="pokedex" class="data-table">
  <thead><tr><th>#</th><th>Name</th><th>Type</th><th>Total</th></tr></thead>
  <tbody>
    <tr><td><span class="infocard-cell-data">0001</span></td>
        <td><a class="ent-name" href="/pokedex/bulbasaur">Bulbasaur</a></td>
        <td><a class="type-icon">Grass</a><br><a class="type-icon">Poison</a></td><td>318</td></tr>
    <tr><td>0002</td><td><a class="ent-name" href="/pokedex/ivysaur">Ivysaur</a></td>
        <td><a>Grass</a> <a>Poison</a></td><td>405</td></tr>
    <tr><td>0001</td><td><a class="ent-name" href="/pokedex/bulbasaur">Bulbasaur</a><small>Partner</small></td>
        <td><a>Grass</a></td><td>318</td></tr>
    <tr><td>Sponsored</td><td>No link here</td><td></td><td></td></tr>
  </tbody>
</table>
</body></html>"#;

const BULBASAUR: &str = r#"
<html><body><main>
<h2>Pokédex data</h2>
<table class="vitals-table">
  <tr><th>Species</th><td>Seed Pokémon</td></tr>
  <tr><th>Height</th><td>0.7 m (2′04″)</td></tr>
  <tr><th>Weight</th><td>6.9 kg (15.2 lbs)</td></tr>
</table>
<h2>Base stats</h2>
<table><tr><th>HP</th><td>45</td></tr><tr><th>Total</th><td class="cell-total">318</td></tr></table>
<h2>Evolution chart</h2>
<div class="infocard-list-evo">
  <div class="infocard"><small>#0001</small><a class="ent-name" href="/pokedex/bulbasaur">Bulbasaur</a></div>
  <span class="infocard infocard-arrow"><small>(Level 16)</small></span>
  <div class="infocard"><small>#0002</small><a class="ent-name" href="/pokedex/ivysaur">Ivysaur</a></div>
</div>
</main></body></html>"#;

fn tsv_line(cells: &[&str]) -> String {
    cells.join("\t")
}

#[tokio::test]
async fn pokemon_run_writes_partial_results() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("raw/pokemon_basic.tsv");
    let site = FixtureSite::default()
        .page(&format!("{BASE}/pokedex/stats/gen1"), POKEMON_LISTING)
        .page(&format!("{BASE}/pokedex/bulbasaur"), BULBASAUR);

    let report = run_pipeline(&PokemonPipeline, &site, &config(vec![1, 2], &output))
        .await
        .unwrap();
    assert_eq!(
        report,
        CollectionReport {
            records: 2,
            enriched: 1,
            failed: 1
        }
    );

    let written = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        tsv_line(&[
            "id", "generation", "name_en", "name_kr", "type1", "type2", "species", "height_m", "weight_kg",
            "base_exp", "catch_rate", "form", "evo_from_id", "evo_from_cond", "HP", "Atk", "Def", "SpAtk",
            "SpDef", "Spd", "Tot", "descriptions", "link",
        ])
    );
    assert_eq!(
        lines[1],
        tsv_line(&[
            "0001", "1", "Bulbasaur", "", "Grass", "Poison", "Seed Pokemon", "0.7", "6.9", "", "", "normal", "",
            "", "45", "", "", "", "", "", "318", "", "https://pokemondb.net/pokedex/bulbasaur",
        ])
    );
    assert_eq!(
        lines[2],
        tsv_line(&[
            "0002", "1", "Ivysaur", "", "Grass", "Poison", "", "", "", "", "", "normal", "", "", "", "", "", "",
            "", "", "", "", "https://pokemondb.net/pokedex/ivysaur",
        ])
    );
}

#[tokio::test]
async fn every_listing_failing_is_total_failure() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("pokemon.tsv");
    let site = FixtureSite::default().page(&format!("{BASE}/pokedex/stats/gen2"), "<p>No table today</p>");

    let result = run_pipeline(&PokemonPipeline, &site, &config(vec![1, 2], &output)).await;
    assert!(matches!(result, Err(Error::NoData { pipeline: "pokemon" })));
    assert!(!output.exists());
}

const MOVE_INDEX: &str = r#"
<table class="sortable roundy">
  <tr><th>#</th><th>Name</th><th>Type</th></tr>
  <tr><td>1</td><td><a href="/wiki/Pound_(move)">Pound</a></td><td>Normal</td></tr>
  <tr><td>45</td><td><a href="/wiki/Growl_(move)">Growl</a></td><td>Normal</td></tr>
</table>"#;

const MOVE_LISTING: &str = r#"
<table id="moves" class="data-table sticky-header block-wide">
  <thead><tr><th>Name</th><th>Type</th><th>Cat.</th><th>Power</th><th>Acc.</th><th>PP</th><th>Effect</th></tr></thead>
  <tbody>
    <tr><td><a class="ent-name" href="/move/pound">Pound</a></td><td><a>Normal</a></td>
        <td><img title="Physical" src="p.png"></td><td>40</td><td>100</td><td>35</td><td></td></tr>
    <tr><td><a class="ent-name" href="/move/growl">Growl</a></td><td><a>Normal</a></td>
        <td><img title="Status" src="s.png"></td><td>—</td><td>100</td><td>40</td><td>Lowers opponent's Attack.</td></tr>
  </tbody>
</table>"#;

const POUND: &str = r#"
<h2>Move data</h2>
<table class="vitals-table">
  <tr><th>Type</th><td><a>Normal</a></td></tr>
  <tr><th>Category</th><td><img title="Physical" src="p.png"> Physical</td></tr>
  <tr><th>Power</th><td>40</td></tr>
  <tr><th>Accuracy</th><td>100%</td></tr>
  <tr><th>PP</th><td>35 (max. 56)</td></tr>
</table>
<h2>Move target</h2>
<p>Targets a single adjacent Pokémon.</p>
<h2>Learnt by level up</h2>
<div class="infocard-list infocard-list-pkmn-md">
  <div class="infocard"><small>#0039</small></div>
  <div class="infocard"><small>#0035</small></div>
</div>
<h2>Other languages</h2>
<table class="vitals-table"><tr><th>Korean</th><td>막치기</td></tr></table>"#;

#[tokio::test]
async fn moves_take_ids_from_the_index_and_fall_back_to_listing_values() {
    let dir = tempfile::tempdir().unwrap();
    let site = FixtureSite::default()
        .page(INDEX, MOVE_INDEX)
        .page(&format!("{BASE}/move/generation/1"), MOVE_LISTING)
        .page(&format!("{BASE}/move/pound"), POUND);
    let config = config(vec![1], &dir.path().join("moves.tsv"));

    let pipeline = MovePipeline::prepare(&site, &config).await;
    let collection = collect(&pipeline, &site, &config).await.unwrap();
    assert_eq!(collection.report.failed, 1);

    let pound = &collection.records[0];
    assert_eq!(pound.id.as_deref(), Some("1"));
    assert_eq!(pound.name_kr.as_deref(), Some("막치기"));
    assert_eq!(pound.category.as_deref(), Some("Physical"));
    assert_eq!(pound.accuracy, Some(Numeric::Value(100)));
    assert_eq!(pound.pp, Some(35));
    assert_eq!(pound.target.as_deref(), Some("Targets a single adjacent Pokémon."));
    assert_eq!(pound.learnable.as_deref(), Some("0035,0039"));

    let growl = &collection.records[1];
    assert_eq!(growl.id.as_deref(), Some("45"));
    assert_eq!(growl.category.as_deref(), Some("Status"));
    assert_eq!(growl.power, None);
    assert_eq!(growl.pp, Some(40));
    assert_eq!(growl.effects, "Lowers opponent's Attack.");
    assert_eq!(growl.learnable, None);
}

#[tokio::test]
async fn moves_without_an_index_have_no_ids() {
    let dir = tempfile::tempdir().unwrap();
    let site = FixtureSite::default().page(&format!("{BASE}/move/generation/1"), MOVE_LISTING);
    let config = config(vec![1], &dir.path().join("moves.tsv"));

    let pipeline = MovePipeline::prepare(&site, &config).await;
    let report = run_pipeline(&pipeline, &site, &config).await.unwrap();
    assert_eq!(report.records, 2);
    assert_eq!(report.failed, 2);

    let written = std::fs::read_to_string(dir.path().join("moves.tsv")).unwrap();
    let growl = written.lines().nth(2).unwrap();
    assert_eq!(
        growl,
        "\tGrowl\t\tNormal\tStatus\t\t100\t40\tLowers opponent's Attack.\t\t\t\t1\thttps://pokemondb.net/move/growl"
    );
}
