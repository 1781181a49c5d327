// src/services/titles.rs

//! Article title extraction from volume pages.

use std::sync::LazyLock;

use scraper::Selector;

use crate::utils::http::FetchedDocument;

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul.publ-list span.title").expect("valid title selector"));

/// Titles of every entry in the page's publication lists, in page order.
///
/// An empty result is a valid outcome (volume pages can be empty).
pub fn extract_titles(document: &FetchedDocument) -> Vec<String> {
    let html = document.parse();
    html.select(&TITLE)
        .map(|span| normalize_title(&span.text().collect::<String>()))
        .collect()
}

/// Collapse whitespace and strip one trailing `.` or `?`.
pub fn normalize_title(raw: &str) -> String {
    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let stripped = text
        .strip_suffix('.')
        .or_else(|| text.strip_suffix('?'))
        .unwrap_or(&text);
    stripped.trim_end().to_string()
}
