// src/models/record.rs

//! Volume links, match records and the run report.

use std::path::PathBuf;
use std::time::Duration;

/// A volume page discovered on a catalog page for one of the requested years.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeLink {
    pub year: String,
    pub url: String,
}

/// Volume page URLs grouped by year, in requested-year order.
///
/// Every requested year has an entry, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeLinks {
    by_year: Vec<(String, Vec<String>)>,
}

impl VolumeLinks {
    /// Create an entry for every year with no links yet.
    pub fn for_years(years: &[String]) -> Self {
        Self {
            by_year: years.iter().map(|y| (y.clone(), Vec::new())).collect(),
        }
    }

    /// Append a link to the entry for `year`. Years that were not requested are ignored.
    pub fn push(&mut self, year: &str, url: String) {
        if let Some((_, urls)) = self.by_year.iter_mut().find(|(y, _)| y == year) {
            urls.push(url);
        }
    }

    /// Links for `year`, if it was requested.
    pub fn get(&self, year: &str) -> Option<&[String]> {
        self.by_year
            .iter()
            .find(|(y, _)| y == year)
            .map(|(_, urls)| urls.as_slice())
    }

    /// Per-year entries in order.
    pub fn years(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.by_year
            .iter()
            .map(|(year, urls)| (year.as_str(), urls.as_slice()))
    }

    /// All links, flattened in year then discovery order.
    pub fn links(&self) -> impl Iterator<Item = VolumeLink> + '_ {
        self.by_year.iter().flat_map(|(year, urls)| {
            urls.iter().map(move |url| VolumeLink {
                year: year.clone(),
                url: url.clone(),
            })
        })
    }

    pub fn link_count(&self) -> usize {
        self.by_year.iter().map(|(_, urls)| urls.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.link_count() == 0
    }
}

/// A title that matched the keyword filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub year: String,
    pub venue_label: String,
    pub title: String,
}

impl MatchRecord {
    /// Line written to the result file.
    pub fn to_line(&self) -> String {
        format!("{}-{}  {}", self.year, self.venue_label, self.title)
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// All matches, venue blocks in completion order
    pub records: Vec<MatchRecord>,
    pub result_path: PathBuf,
    pub log_path: PathBuf,
    pub venue_total: usize,
    /// Venues that produced no results because of a fetch, structure or type problem
    pub venue_failures: usize,
    /// Volume pages that could not be fetched, across all venues
    pub link_failures: usize,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn match_count(&self) -> usize {
        self.records.len()
    }
}
