//! Locating heading-delimited sections of a detail page.
//!
//! Matching is plain case-sensitive substring containment over the heading
//! text, and the first matching heading always wins.

use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};

use super::{create_selector, element_text};
use crate::{Error, Result};

/// Section headings on the site are all `h2`.
pub const HEADING_TAG: &str = "h2";

/// Sections the detail parsers read, with the heading text that marks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Training,
    BaseStats,
    PokedexEntries,
    EvolutionChart,
    OtherLanguages,
    MoveTarget,
    GameDescriptions,
}

impl SectionKind {
    pub const fn fragment(self) -> &'static str {
        match self {
            SectionKind::Training => "Training",
            SectionKind::BaseStats => "Base stats",
            SectionKind::PokedexEntries => "Pokédex entries",
            SectionKind::EvolutionChart => "Evolution chart",
            SectionKind::OtherLanguages => "Other languages",
            SectionKind::MoveTarget => "Move target",
            SectionKind::GameDescriptions => "Game descriptions",
        }
    }
}

/// A heading and the content that follows it.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    document: &'a Html,
    heading: ElementRef<'a>,
}

impl<'a> Section<'a> {
    pub fn heading(&self) -> ElementRef<'a> {
        self.heading
    }

    /// First table after the heading in document order, wherever it is nested.
    pub fn next_table(&self) -> Option<ElementRef<'a>> {
        let selector = create_selector("table").ok()?;
        self.next_matching(&selector)
    }

    /// First element after the heading in document order matching `selector`.
    pub fn next_matching(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        let heading_id = self.heading.id();
        self.document
            .root_element()
            .descendants()
            .skip_while(|node| node.id() != heading_id)
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|element| selector.matches(element))
    }

    /// Sibling elements after the heading, up to (not including) the next heading.
    pub fn following_siblings_until_next_heading(&self) -> Vec<ElementRef<'a>> {
        self.heading
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .take_while(|element| element.value().name() != HEADING_TAG)
            .collect()
    }

    /// Like [`Section::next_table`], failing with a reason instead of `None`.
    pub fn require_table(&self) -> Result<ElementRef<'a>> {
        self.next_table()
            .ok_or_else(|| Error::missing(format!("table after {:?}", element_text(&self.heading))))
    }
}

fn headings(document: &Html) -> Vec<(ElementRef<'_>, String)> {
    let Ok(selector) = create_selector(HEADING_TAG) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .map(|heading| {
            let text = element_text(&heading);
            (heading, text)
        })
        .collect()
}

/// First section whose heading text contains `heading_fragment`.
pub fn find_section<'a>(document: &'a Html, heading_fragment: &str) -> Option<Section<'a>> {
    headings(document)
        .into_iter()
        .find(|(_, text)| text.contains(heading_fragment))
        .map(|(heading, _)| Section { document, heading })
}

/// Every section whose heading text starts with `prefix`, in document order.
pub fn sections_with_prefix<'a>(document: &'a Html, prefix: &str) -> Vec<Section<'a>> {
    headings(document)
        .into_iter()
        .filter(|(_, text)| text.starts_with(prefix))
        .map(|(heading, _)| Section { document, heading })
        .collect()
}

/// Sections of one document, each kind looked up once with [`find_section`].
#[derive(Debug, Default)]
pub struct SectionIndex<'a> {
    sections: HashMap<SectionKind, Section<'a>>,
}

impl<'a> SectionIndex<'a> {
    pub fn resolve(document: &'a Html, kinds: &[SectionKind]) -> Self {
        let sections = kinds
            .iter()
            .filter_map(|&kind| find_section(document, kind.fragment()).map(|section| (kind, section)))
            .collect();
        Self { sections }
    }

    pub fn get(&self, kind: SectionKind) -> Option<Section<'a>> {
        self.sections.get(&kind).copied()
    }

    pub fn require(&self, kind: SectionKind) -> Result<Section<'a>> {
        self.get(kind)
            .ok_or_else(|| Error::missing(format!("section {:?}", kind.fragment())))
    }
}
