//! Listing pages: one table per generation, one stub per row.

use std::collections::HashMap;

use scraper::{ElementRef, Html};
use tracing::debug;

use super::{checked, create_selector, element_text, select_all, select_first, text_or_icon_title};
use crate::normalize::{normalize_integer, normalize_optional_numeric, zero_fill};
use crate::record::{MoveStub, PokemonStub};
use crate::{Error, Result};

/// Where the data table lives on a listing page and how wide its rows are.
#[derive(Debug, Clone, Copy)]
pub struct ListingLayout {
    /// Tried in order; the first table matching any of them is used.
    pub table_candidates: &'static [&'static str],
    pub min_columns: usize,
}

pub const POKEMON_LAYOUT: ListingLayout = ListingLayout {
    table_candidates: &["table#pokedex", "table.data-table", "table"],
    min_columns: 3,
};

pub const MOVE_LAYOUT: ListingLayout = ListingLayout {
    table_candidates: &["table.data-table", "table.sticky-header", "table.block-wide"],
    min_columns: 7,
};

/// Move-number index tables carry one of these classes.
const MOVE_INDEX_TABLE: &str = "table.sortable, table.roundy";

const DEX_ID_WIDTH: usize = 3;

pub fn locate_table<'a>(document: &'a Html, candidates: &[&str]) -> Result<Option<ElementRef<'a>>> {
    for candidate in candidates {
        if let Some(table) = select_first(document.root_element(), candidate)? {
            return Ok(Some(table));
        }
    }
    Ok(None)
}

/// Data rows of the listing table. Header rows hold no `td` and fall out with
/// the other short rows.
fn data_rows<'a>(document: &'a Html, layout: &ListingLayout, generation: u32) -> Result<Vec<Vec<ElementRef<'a>>>> {
    let table = locate_table(document, layout.table_candidates)?.ok_or(Error::TableNotFound { generation })?;
    let row_sel = create_selector("tr")?;
    let cell_sel = create_selector("td")?;

    let rows = table
        .select(&row_sel)
        .map(|row| row.select(&cell_sel).collect::<Vec<_>>())
        .filter(|cells| cells.len() >= layout.min_columns)
        .collect();
    Ok(rows)
}

fn absolute_link(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}{}", base_url.trim_end_matches('/'), href)
    }
}

/// Name and link from the cell's first anchor matching `anchor_sel`.
fn name_and_link(cell: ElementRef<'_>, anchor_sel: &str, base_url: &str) -> Result<Option<(String, String)>> {
    let Some(anchor) = select_first(cell, anchor_sel)? else {
        return Ok(None);
    };
    let Some(href) = anchor.value().attr("href").filter(|href| !href.is_empty()) else {
        return Ok(None);
    };
    Ok(Some((element_text(&anchor), absolute_link(base_url, href))))
}

/// Creature listing: dex number, name anchor, type anchors.
pub fn parse_pokemon_listing(document: &Html, base_url: &str, generation: u32) -> Result<Vec<PokemonStub>> {
    let mut stubs = Vec::new();
    for cells in data_rows(document, &POKEMON_LAYOUT, generation)? {
        let Some((name_en, link)) = name_and_link(cells[1], "a[href*='/pokedex/']", base_url)? else {
            debug!(generation, "Listing row without a name link, skipping");
            continue;
        };
        let types: Vec<String> = select_all(cells[2], "a")?.iter().map(element_text).collect();
        let mut types = types.into_iter();

        stubs.push(PokemonStub {
            id: zero_fill(&element_text(&cells[0]), DEX_ID_WIDTH),
            name_en,
            link,
            type1: types.next(),
            type2: types.next(),
            generation,
        });
    }
    Ok(stubs)
}

/// Move listing: name anchor, type, category, power, accuracy, PP, effect.
pub fn parse_move_listing(document: &Html, base_url: &str, generation: u32) -> Result<Vec<MoveStub>> {
    let mut stubs = Vec::new();
    for cells in data_rows(document, &MOVE_LAYOUT, generation)? {
        let Some((name_en, link)) = name_and_link(cells[0], "a", base_url)? else {
            debug!(generation, "Listing row without a name link, skipping");
            continue;
        };
        let move_type = match select_first(cells[1], "a")? {
            Some(anchor) => Some(element_text(&anchor)),
            None => Some(element_text(&cells[1])),
        }
        .filter(|t| !t.is_empty());
        let power = element_text(&cells[3]);
        let accuracy = element_text(&cells[4]);
        let pp = element_text(&cells[5]);

        stubs.push(MoveStub {
            name_en,
            link,
            move_type,
            category: text_or_icon_title(cells[2])?,
            power: checked("Power", &power, normalize_optional_numeric(&power)).and_then(|p| p.as_integer()),
            accuracy: checked("Accuracy", &accuracy, normalize_optional_numeric(&accuracy)),
            pp: checked("PP", &pp, normalize_integer(&pp)),
            effects: element_text(&cells[6]),
            generation,
        });
    }
    Ok(stubs)
}

/// Move-number index, keyed by lowercase move name.
pub fn parse_move_index(document: &Html) -> Result<HashMap<String, String>> {
    let table = select_first(document.root_element(), MOVE_INDEX_TABLE)?
        .ok_or_else(|| Error::missing("move index table"))?;
    let row_sel = create_selector("tr")?;
    let cell_sel = create_selector("td, th")?;

    let mut ids = HashMap::new();
    for row in table.select(&row_sel).skip(1) {
        let cells: Vec<_> = row.select(&cell_sel).collect();
        if cells.len() < 2 {
            continue;
        }
        if let Some(anchor) = select_first(cells[1], "a")? {
            let id = element_text(&cells[0]);
            ids.insert(element_text(&anchor).to_lowercase(), id);
        }
    }
    Ok(ids)
}
