//! Detail pages: vitals tables, heading-anchored sections and cross references.
//!
//! Each extraction step is independent. A step that cannot find what it needs
//! returns an error which is logged at debug level, and the fields it owns stay
//! unset. The public entry points never fail.

use scraper::{ElementRef, Html};
use tracing::debug;

use super::section::{sections_with_prefix, SectionIndex, SectionKind};
use super::{
    create_selector, element_text, has_class, labelled_rows, last_segment, normalization_miss, select_all,
    select_first, text_or_icon_title,
};
use crate::normalize::{
    canonicalize_cross_reference, join_cross_references, normalize_capacity, normalize_integer,
    normalize_measurement, normalize_optional_numeric, normalize_rate,
};
use crate::record::{BaseStats, Field, MoveDetail, PokemonDetail, DEFAULT_FORM};
use crate::{Error, Result};

const VITALS_TABLE: &str = "table.vitals-table";
const TARGET_LOCALE: &str = "korean";
const LEARNT_PREFIX: &str = "Learnt";
const EVOLUTION_CHAIN: &str = "div.infocard-list-evo";
const EVOLUTION_LINKS: &str = "div.infocard, div.infocard-arrow, span.infocard, span.infocard-arrow";
const LEARNER_LIST: &str = "div.infocard-list, div.infocard-list-pkmn-md";

const POKEMON_SECTIONS: &[SectionKind] = &[
    SectionKind::Training,
    SectionKind::BaseStats,
    SectionKind::PokedexEntries,
    SectionKind::EvolutionChart,
    SectionKind::OtherLanguages,
];

const MOVE_SECTIONS: &[SectionKind] = &[
    SectionKind::OtherLanguages,
    SectionKind::MoveTarget,
    SectionKind::GameDescriptions,
];

fn step<T>(link: &str, name: &'static str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(link, step = name, %err, "Detail step found nothing");
            None
        }
    }
}

pub fn parse_pokemon_detail(document: &Html, link: &str) -> PokemonDetail {
    let sections = SectionIndex::resolve(document, POKEMON_SECTIONS);
    let mut detail = PokemonDetail {
        form: Some(DEFAULT_FORM.to_string()),
        ..PokemonDetail::default()
    };

    step(link, "vitals", pokemon_vitals(document, &mut detail));
    step(link, "training", training(&sections, &mut detail));
    if let Some(stats) = step(link, "base stats", base_stats(&sections)) {
        detail.stats = stats;
    }
    detail.descriptions = step(link, "pokedex entries", pokedex_entries(&sections)).flatten();
    if let Some((id, condition)) = step(link, "evolution", evolution_predecessor(&sections, link)) {
        detail.evo_from_id = Some(id);
        detail.evo_from_cond = Some(condition);
    }
    detail.name_kr = step(link, "other languages", localized_name(&sections));
    detail
}

pub fn parse_move_detail(document: &Html, link: &str) -> MoveDetail {
    let sections = SectionIndex::resolve(document, MOVE_SECTIONS);
    let mut detail = MoveDetail::default();

    step(link, "vitals", move_vitals(document, &mut detail));
    detail.name_kr = step(link, "other languages", localized_name(&sections));
    detail.target = step(link, "move target", move_target(&sections));
    detail.description = step(link, "game descriptions", latest_description(&sections));
    detail.learnable = step(link, "learnable", learnable_by(document)).flatten();
    detail
}

fn vitals_table(document: &Html) -> Result<ElementRef<'_>> {
    select_first(document.root_element(), VITALS_TABLE)?.ok_or_else(|| Error::missing("vitals table"))
}

fn pokemon_vitals(document: &Html, detail: &mut PokemonDetail) -> Result<()> {
    for (label, values) in labelled_rows(vitals_table(document)?)? {
        let label = element_text(&label);
        let value = element_text(&values[0]);
        match label.as_str() {
            "Species" => detail.species = Some(value.replace("Pokémon", "Pokemon")),
            "Height" => {
                detail.height_m = normalize_measurement(&value, "m");
                if detail.height_m.is_none() {
                    normalization_miss(&label, &value);
                }
            }
            "Weight" => {
                detail.weight_kg = normalize_measurement(&value, "kg");
                if detail.weight_kg.is_none() {
                    normalization_miss(&label, &value);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn move_vitals(document: &Html, detail: &mut MoveDetail) -> Result<()> {
    for (label, values) in labelled_rows(vitals_table(document)?)? {
        let label = element_text(&label);
        let cell = values[0];
        let value = element_text(&cell);
        match label.as_str() {
            "Type" => detail.move_type = Field::from(Some(value).filter(|v| !v.is_empty())),
            "Category" => detail.category = Field::from(text_or_icon_title(cell)?),
            "Power" => {
                detail.power = Field::from(normalize_optional_numeric(&value).and_then(|p| p.as_integer()))
            }
            "Accuracy" => detail.accuracy = Field::from(normalize_optional_numeric(&value)),
            "PP" => {
                detail.pp = Field::from(normalize_capacity(&value));
                if matches!(detail.pp, Field::Null) {
                    normalization_miss(&label, &value);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn training(sections: &SectionIndex<'_>, detail: &mut PokemonDetail) -> Result<()> {
    let table = sections.require(SectionKind::Training)?.require_table()?;
    for (label, values) in labelled_rows(table)? {
        let label = element_text(&label);
        let value = element_text(&values[0]);
        if label.contains("Base Exp") {
            detail.base_exp = normalize_integer(&value.replace(',', ""));
            if detail.base_exp.is_none() {
                normalization_miss(&label, &value);
            }
        }
        if label.contains("Catch rate") {
            detail.catch_rate = normalize_rate(&value);
            if detail.catch_rate.is_none() {
                normalization_miss(&label, &value);
            }
        }
    }
    Ok(())
}

/// Destination of one row of the base stats table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatField {
    Hp,
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    Speed,
    Total,
}

impl StatField {
    fn from_label(label: &str) -> Option<Self> {
        match label {
            "HP" => Some(StatField::Hp),
            "Attack" => Some(StatField::Attack),
            "Defense" => Some(StatField::Defense),
            "Sp. Atk" => Some(StatField::SpAttack),
            "Sp. Def" => Some(StatField::SpDefense),
            "Speed" => Some(StatField::Speed),
            "Total" => Some(StatField::Total),
            _ => None,
        }
    }

    fn slot(self, stats: &mut BaseStats) -> &mut Option<i64> {
        match self {
            StatField::Hp => &mut stats.hp,
            StatField::Attack => &mut stats.attack,
            StatField::Defense => &mut stats.defense,
            StatField::SpAttack => &mut stats.sp_attack,
            StatField::SpDefense => &mut stats.sp_defense,
            StatField::Speed => &mut stats.speed,
            StatField::Total => &mut stats.total,
        }
    }
}

fn base_stats(sections: &SectionIndex<'_>) -> Result<BaseStats> {
    let table = sections.require(SectionKind::BaseStats)?.require_table()?;
    let mut stats = BaseStats::default();
    for (label, values) in labelled_rows(table)? {
        let label = element_text(&label);
        let Some(field) = StatField::from_label(&label) else {
            continue;
        };
        // The totals row marks its value cell; other rows use the first cell.
        let cell = match field {
            StatField::Total => values
                .iter()
                .find(|cell| has_class(cell, "cell-total"))
                .copied()
                .unwrap_or(values[0]),
            _ => values[0],
        };
        let raw = element_text(&cell);
        let value = normalize_integer(&raw);
        if value.is_none() {
            normalization_miss(&label, &raw);
        }
        *field.slot(&mut stats) = value;
    }
    Ok(stats)
}

/// `(Red&Blue)text, (Yellow)text` across every row of the entries table.
fn pokedex_entries(sections: &SectionIndex<'_>) -> Result<Option<String>> {
    let table = sections.require(SectionKind::PokedexEntries)?.require_table()?;
    let mut entries = Vec::new();
    for (label, values) in labelled_rows(table)? {
        let spans = select_all(label, "span")?;
        let games = if spans.is_empty() {
            element_text(&label)
        } else {
            spans.iter().map(element_text).collect::<Vec<_>>().join("&")
        };
        let text = element_text(&values[0])
            .replace("POKéMON", "POKEMON")
            .replace("Pokémon", "POKEMON");
        entries.push(format!("({games}){text}"));
    }
    Ok((!entries.is_empty()).then(|| entries.join(", ")))
}

/// Localized name from the "Other languages" table, transliteration dropped.
fn localized_name(sections: &SectionIndex<'_>) -> Result<String> {
    let table = sections.require(SectionKind::OtherLanguages)?.require_table()?;
    for (label, values) in labelled_rows(table)? {
        if element_text(&label).to_lowercase().contains(TARGET_LOCALE) {
            let value = element_text(&values[0]);
            let name = value.split('(').next().unwrap_or_default().trim();
            return Ok(name.to_string());
        }
    }
    Err(Error::missing(format!("{TARGET_LOCALE} row")))
}

fn move_target(sections: &SectionIndex<'_>) -> Result<String> {
    sections
        .require(SectionKind::MoveTarget)?
        .following_siblings_until_next_heading()
        .iter()
        .filter(|element| element.value().name() == "p")
        .map(element_text)
        .find(|text| !text.is_empty())
        .ok_or_else(|| Error::missing("move target paragraph"))
}

/// Value cell of the last row, which is the most recent game.
fn latest_description(sections: &SectionIndex<'_>) -> Result<String> {
    let table = sections.require(SectionKind::GameDescriptions)?.require_table()?;
    let last_row = select_all(table, "tr")?
        .pop()
        .ok_or_else(|| Error::missing("game description rows"))?;
    let cells = select_all(last_row, "th, td")?;
    cells
        .get(1)
        .map(element_text)
        .ok_or_else(|| Error::missing("game description text"))
}

/// Dex numbers of every card listed under the "Learnt ..." sections.
fn learnable_by(document: &Html) -> Result<Option<String>> {
    let list_sel = create_selector(LEARNER_LIST)?;
    let mut ids = Vec::new();
    for section in sections_with_prefix(document, LEARNT_PREFIX) {
        let Some(list) = section.next_matching(&list_sel) else {
            continue;
        };
        for card in select_all(list, "div.infocard")? {
            let Some(caption) = select_first(card, "small")? else {
                continue;
            };
            let text = element_text(&caption);
            let token = text.split('/').next().unwrap_or_default().trim();
            if token.starts_with('#') {
                ids.push(canonicalize_cross_reference(token));
            }
        }
    }
    Ok(join_cross_references(ids))
}

fn is_card(element: &ElementRef<'_>) -> bool {
    has_class(element, "infocard") && !has_class(element, "infocard-arrow")
}

/// Predecessor dex number and evolution condition from the evolution chart.
///
/// The chart flattens to `card, arrow, card, arrow, card, ...`. The current
/// page is found by the last path segment of its link; the arrow right before
/// it carries the condition and the card before that is the predecessor.
fn evolution_predecessor(sections: &SectionIndex<'_>, link: &str) -> Result<(String, String)> {
    let section = sections.require(SectionKind::EvolutionChart)?;
    let chain = section
        .next_matching(&create_selector(EVOLUTION_CHAIN)?)
        .ok_or_else(|| Error::missing("evolution chain"))?;
    let links = select_all(chain, EVOLUTION_LINKS)?;
    let identity = last_segment(link);

    let mut position = None;
    for (i, element) in links.iter().enumerate() {
        if !is_card(element) {
            continue;
        }
        let Some(name) = select_first(*element, "a.ent-name")? else {
            continue;
        };
        if name.value().attr("href").map(last_segment) == Some(identity) {
            position = Some(i);
            break;
        }
    }

    let position = position.ok_or_else(|| Error::missing(format!("{identity} in evolution chain")))?;
    if position < 2 {
        return Err(Error::missing("evolution predecessor"));
    }

    let arrow = links[position - 1];
    if !has_class(&arrow, "infocard-arrow") {
        return Err(Error::missing("evolution arrow"));
    }
    let condition = select_first(arrow, "small")?
        .map(|caption| {
            element_text(&caption).trim_matches(['(', ')']).to_string()
        })
        .ok_or_else(|| Error::missing("evolution condition"))?;

    let previous = links[position - 2];
    if !is_card(&previous) {
        return Err(Error::missing("evolution predecessor card"));
    }
    let id = select_first(previous, "small")?
        .map(|caption| canonicalize_cross_reference(&element_text(&caption)))
        .ok_or_else(|| Error::missing("predecessor number"))?;

    Ok((id, condition))
}
