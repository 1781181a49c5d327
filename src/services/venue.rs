// src/services/venue.rs

//! Per-venue crawl worker.
//!
//! Fetches a venue's catalog, resolves the volume pages for the requested
//! years, pulls their titles and keeps the ones that pass the keyword filter.
//! Every failure is recorded in the venue's own trace and turned into an
//! empty or partial result; nothing escapes to the caller.

use std::time::{Duration, Instant};

use crate::error::VenueError;
use crate::models::{MatchRecord, QueryRequest, VenueDescriptor};
use crate::services::keywords::KeywordFilter;
use crate::services::titles::extract_titles;
use crate::services::volumes::resolver_for;
use crate::utils::http::Fetcher;
use crate::utils::log::VenueTrace;

/// Result of processing one venue.
#[derive(Debug)]
pub struct VenueOutcome {
    pub label: String,
    /// Matches in year, volume link, then page order
    pub records: Vec<MatchRecord>,
    pub trace: VenueTrace,
    /// Reason the venue produced nothing, if it was skipped
    pub error: Option<VenueError>,
    /// Volume pages that could not be fetched
    pub link_failures: usize,
    pub elapsed: Duration,
}

impl VenueOutcome {
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Process one venue end to end.
pub async fn process_venue(
    fetcher: &dyn Fetcher,
    venue: &VenueDescriptor,
    query: &QueryRequest,
) -> VenueOutcome {
    let started = Instant::now();
    let label = venue.label();
    let mut trace = VenueTrace::new();
    let mut records = Vec::new();

    trace.info(format!("Processing {label}"));

    let (link_failures, error) =
        match collect_matches(fetcher, venue, &label, query, &mut trace, &mut records).await {
            Ok(link_failures) => (link_failures, None),
            Err(error) => {
                trace.error(format!("Skipping {}: {}", venue.key, error));
                (0, Some(error))
            }
        };

    let elapsed = started.elapsed();
    trace.info(format!(
        "Finished {}: {} matches in {:.2}s",
        label,
        records.len(),
        elapsed.as_secs_f64()
    ));

    VenueOutcome {
        label,
        records,
        trace,
        error,
        link_failures,
        elapsed,
    }
}

/// Returns the number of volume pages that could not be fetched.
async fn collect_matches(
    fetcher: &dyn Fetcher,
    venue: &VenueDescriptor,
    label: &str,
    query: &QueryRequest,
    trace: &mut VenueTrace,
    records: &mut Vec<MatchRecord>,
) -> Result<usize, VenueError> {
    let resolver = resolver_for(&venue.kind)
        .ok_or_else(|| VenueError::UnknownVenueType(venue.kind.to_string()))?;

    let catalog = fetcher.fetch(&venue.url).await?;
    let links = resolver.resolve(&catalog, &query.years, trace)?;

    if links.is_empty() {
        trace.warn(format!(
            "No volume links found for years {}",
            query.years.join(", ")
        ));
        return Ok(0);
    }
    trace.info(format!("Found {} volume links", links.link_count()));

    let filter = KeywordFilter::new(&query.keywords);
    let mut link_failures = 0;
    for link in links.links() {
        let page = match fetcher.fetch(&link.url).await {
            Ok(page) => page,
            Err(error) => {
                link_failures += 1;
                trace.warn(format!("Failed to fetch volume {}: {}", link.url, error));
                continue;
            }
        };

        let titles = extract_titles(&page);
        if titles.is_empty() {
            trace.warn(format!("No titles found on {}", link.url));
            continue;
        }
        trace.debug(format!("{} titles on {}", titles.len(), link.url));

        records.extend(
            titles
                .into_iter()
                .filter(|title| filter.matches(title))
                .map(|title| MatchRecord {
                    year: link.year.clone(),
                    venue_label: label.to_string(),
                    title,
                }),
        );
    }

    Ok(link_failures)
}
