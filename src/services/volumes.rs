// src/services/volumes.rs

//! Volume link resolution.
//!
//! Catalog pages come in two layouts. Journals list their volumes in the
//! `<ul>` that follows the `#info-section` anchor; conferences group
//! proceedings under `<h2 id="...">` headings inside `#main`. Each layout has
//! its own [`VolumeResolver`], picked by the venue's [`VenueKind`].

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

use crate::error::VenueError;
use crate::models::{VenueKind, VolumeLinks};
use crate::utils::http::FetchedDocument;
use crate::utils::log::VenueTrace;
use crate::utils::resolve_href;

/// Suffix every volume page link carries.
const PAGE_SUFFIX: &str = ".html";

struct CatalogSelectors {
    info_section: Selector,
    main: Selector,
    heading: Selector,
    list_item: Selector,
    link: Selector,
    toc_link: Selector,
}

static SELECTORS: LazyLock<CatalogSelectors> = LazyLock::new(|| CatalogSelectors {
    info_section: Selector::parse("#info-section").expect("valid info-section selector"),
    main: Selector::parse("#main").expect("valid main selector"),
    heading: Selector::parse("h2").expect("valid heading selector"),
    list_item: Selector::parse("li").expect("valid list item selector"),
    link: Selector::parse("a[href]").expect("valid link selector"),
    toc_link: Selector::parse("a.toc-link[href]").expect("valid toc link selector"),
});

/// Finds volume page links on a catalog page for a set of years.
pub trait VolumeResolver: Send + Sync {
    /// Returns an entry for every requested year, in request order.
    ///
    /// A missing landmark is a [`VenueError::StructureMismatch`]; a year
    /// without volumes is an empty entry plus a warning in `trace`.
    fn resolve(
        &self,
        document: &FetchedDocument,
        years: &[String],
        trace: &mut VenueTrace,
    ) -> Result<VolumeLinks, VenueError>;
}

/// Resolver for journal catalog pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct JournalResolver;

/// Resolver for conference catalog pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConferenceResolver;

static JOURNAL: JournalResolver = JournalResolver;
static CONFERENCE: ConferenceResolver = ConferenceResolver;

/// Pick the resolver for a venue kind. `None` for unknown kinds.
pub fn resolver_for(kind: &VenueKind) -> Option<&'static dyn VolumeResolver> {
    match kind {
        VenueKind::Journal => Some(&JOURNAL),
        VenueKind::Conference => Some(&CONFERENCE),
        VenueKind::Unknown(_) => None,
    }
}

impl VolumeResolver for JournalResolver {
    fn resolve(
        &self,
        document: &FetchedDocument,
        years: &[String],
        trace: &mut VenueTrace,
    ) -> Result<VolumeLinks, VenueError> {
        let html = document.parse();
        let base = document.base_url();

        let info = html
            .select(&SELECTORS.info_section)
            .next()
            .ok_or_else(|| VenueError::structure(&document.url, "#info-section"))?;
        let volumes = next_sibling_named(info, "ul")
            .ok_or_else(|| VenueError::structure(&document.url, "volume list after #info-section"))?;

        let mut links = VolumeLinks::for_years(years);
        for year in years {
            let items: Vec<ElementRef> = volumes
                .select(&SELECTORS.list_item)
                .filter(|item| stripped_text(item).contains(year.as_str()))
                .collect();

            if items.is_empty() {
                trace.warn(format!("No volumes listed for year {year}"));
                continue;
            }

            for item in items {
                for href in page_hrefs(item, &SELECTORS.link) {
                    links.push(year, resolve_href(base.as_ref(), href));
                }
            }
        }

        Ok(links)
    }
}

impl VolumeResolver for ConferenceResolver {
    fn resolve(
        &self,
        document: &FetchedDocument,
        years: &[String],
        trace: &mut VenueTrace,
    ) -> Result<VolumeLinks, VenueError> {
        let html = document.parse();
        let base = document.base_url();

        let main = html
            .select(&SELECTORS.main)
            .next()
            .ok_or_else(|| VenueError::structure(&document.url, "#main"))?;
        let headings: Vec<ElementRef> = main.select(&SELECTORS.heading).collect();

        let mut links = VolumeLinks::for_years(years);
        for year in years {
            let mut matched = 0;
            for heading in &headings {
                let Some(id) = heading.value().id() else {
                    continue;
                };
                if !id.contains(year.as_str()) {
                    continue;
                }
                matched += 1;

                // Proceedings list sits beside the heading's wrapper, not the heading.
                let list = heading
                    .parent()
                    .and_then(ElementRef::wrap)
                    .and_then(|wrapper| next_sibling_named(wrapper, "ul"));
                let Some(list) = list else {
                    trace.debug(format!("Heading '{id}' has no proceedings list"));
                    continue;
                };

                for href in page_hrefs(list, &SELECTORS.toc_link) {
                    links.push(year, resolve_href(base.as_ref(), href));
                }
            }

            if matched == 0 {
                trace.warn(format!("No proceedings heading found for year {year}"));
            }
        }

        Ok(links)
    }
}

/// First following sibling element with the given tag name.
fn next_sibling_named<'a>(element: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == name)
}

/// Visible text with each text node trimmed and concatenated.
fn stripped_text(element: &ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// `href` values of matching anchors that point at volume pages.
fn page_hrefs<'a>(
    scope: ElementRef<'a>,
    selector: &'a Selector,
) -> impl Iterator<Item = &'a str> + 'a {
    scope
        .select(selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter(|href| href.ends_with(PAGE_SUFFIX))
}
