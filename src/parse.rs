//! HTML extraction for listing and detail pages.
//!
//! Everything under here works on an already parsed [`scraper::Html`] and is
//! synchronous. The async side hands pages over through [`parse_off_thread`].

pub mod detail;
pub mod listing;
pub mod section;

use scraper::{ElementRef, Selector};
use tokio::task::spawn_blocking;
use tracing::debug;

use crate::normalize::{collapse_whitespace, SENTINELS};
use crate::{Error, Result};

/// Runs a parse on the blocking pool so the DOM never crosses an `.await`.
pub(crate) async fn parse_off_thread<T, F>(parse: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    Ok(spawn_blocking(parse).await?)
}

pub(crate) fn normalization_miss(label: &str, raw: &str) {
    debug!(label, raw, "Could not normalize value");
}

/// Passes `value` through, logging when `raw` held text that failed to normalize.
/// Empty cells and placeholder dashes are expected gaps.
pub(crate) fn checked<T>(label: &str, raw: &str, value: Option<T>) -> Option<T> {
    let raw = raw.trim();
    if value.is_none() && is_normalization_miss(raw) {
        normalization_miss(label, raw);
    }
    value
}

fn is_normalization_miss(raw: &str) -> bool {
    !raw.is_empty() && !SENTINELS.contains(&raw)
}

#[inline]
pub(crate) fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::Selector(sel_str.into()))
}

/// First descendant of `element` matching `sel_str`.
pub(crate) fn select_first<'a>(element: ElementRef<'a>, sel_str: &str) -> Result<Option<ElementRef<'a>>> {
    let selector = create_selector(sel_str)?;
    let found = element.select(&selector).next();
    Ok(found)
}

/// Every descendant of `element` matching `sel_str`, in document order.
pub(crate) fn select_all<'a>(element: ElementRef<'a>, sel_str: &str) -> Result<Vec<ElementRef<'a>>> {
    let selector = create_selector(sel_str)?;
    let found = element.select(&selector).collect();
    Ok(found)
}

/// Concatenated text of the element, trimmed.
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub(crate) fn has_class(element: &ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// Cell text, or the `title` of its icon when the cell only holds an image.
pub(crate) fn text_or_icon_title(cell: ElementRef<'_>) -> Result<Option<String>> {
    let text = collapse_whitespace(&element_text(&cell));
    if !text.is_empty() {
        return Ok(Some(text));
    }
    let title = select_first(cell, "img[title]")?
        .and_then(|img| img.value().attr("title"))
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty());
    Ok(title)
}

/// Rows of a two-column style table: the first `th` and every `td`.
/// Rows without a label or without a value are left out.
pub(crate) fn labelled_rows<'a>(table: ElementRef<'a>) -> Result<Vec<(ElementRef<'a>, Vec<ElementRef<'a>>)>> {
    let row_sel = create_selector("tr")?;
    let label_sel = create_selector("th")?;
    let value_sel = create_selector("td")?;

    let rows = table
        .select(&row_sel)
        .filter_map(|row| {
            let label = row.select(&label_sel).next()?;
            let values: Vec<_> = row.select(&value_sel).collect();
            (!values.is_empty()).then_some((label, values))
        })
        .collect();
    Ok(rows)
}

/// Last path segment of a link, used as a page identity.
pub(crate) fn last_segment(link: &str) -> &str {
    link.trim_end_matches('/').rsplit('/').next().unwrap_or(link)
}
