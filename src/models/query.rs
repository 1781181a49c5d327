// src/models/query.rs

//! Query parameters for a single run.

use std::path::PathBuf;

use chrono::{DateTime, Local};

/// Years, keywords and output location for one run.
///
/// Years and keywords keep their first-seen order; duplicates are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub years: Vec<String>,
    pub keywords: Vec<String>,
    pub output_dir: PathBuf,
}

impl QueryRequest {
    pub fn new<Y, K>(years: Y, keywords: K, output_dir: impl Into<PathBuf>) -> Self
    where
        Y: IntoIterator,
        Y::Item: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        Self {
            years: dedup(years.into_iter().map(|y| {
                let year: String = y.into();
                year.trim().to_string()
            })),
            keywords: dedup(keywords.into_iter().map(Into::into)),
            output_dir: output_dir.into(),
        }
    }

    /// Stem shared by the result file and the run log.
    ///
    /// `2025-2024-cluster_graph_neural(20250301_101500)`
    pub fn file_stem(&self, started_at: DateTime<Local>) -> String {
        let keywords = self
            .keywords
            .iter()
            .map(|k| k.replace(' ', "_"))
            .collect::<Vec<_>>()
            .join("_");
        format!(
            "{}-{}({})",
            self.years.join("-"),
            keywords,
            started_at.format("%Y%m%d_%H%M%S")
        )
    }

    /// Result file location, relative to `output_dir`.
    pub fn result_key(&self, started_at: DateTime<Local>) -> String {
        format!("{}.txt", self.file_stem(started_at))
    }

    /// Run log location, relative to `output_dir`.
    pub fn log_key(&self, started_at: DateTime<Local>) -> String {
        format!("logs/{}.log", self.file_stem(started_at))
    }
}

fn dedup(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
