// src/pipeline/crawl.rs

//! Venue crawling pipeline.
//!
//! One worker per venue runs on the multi-threaded runtime, at most
//! `crawler.max_concurrent` at a time. Workers hand back their matches and
//! trace by value; only this task touches the aggregate list and the run log.

use std::sync::Arc;

use chrono::Local;
use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::models::{Config, QueryRequest, RunReport, VenueDescriptor};
use crate::services::process_venue;
use crate::storage::LocalStorage;
use crate::utils::http::Fetcher;
use crate::utils::log::{LogLevel, TraceEntry};
use crate::utils::timer::Timer;

const TOTAL: &str = "total";

/// Run the query against every venue and write the match report.
///
/// Venue failures are logged and counted; only a failure to write the report
/// or the run log is returned as an error.
pub async fn run_crawler(
    config: &Config,
    fetcher: Arc<dyn Fetcher>,
    venues: &[VenueDescriptor],
    query: &QueryRequest,
) -> Result<RunReport> {
    let started_at = Local::now();
    let mut timer = Timer::new();
    timer.start(TOTAL);

    let storage = LocalStorage::new(&query.output_dir);
    let mut run_log = storage.open_log(&query.log_key(started_at)).await?;

    let total = venues.len();
    let pool_size = config.crawler.max_concurrent.max(1);
    run_log
        .write_entry(TraceEntry::new(
            LogLevel::Info,
            format!(
                "Querying {} venues for years [{}] with keywords [{}], {} at a time",
                total,
                query.years.join(", "),
                query.keywords.join(", "),
                pool_size
            ),
        ))
        .await?;

    let shared_query = Arc::new(query.clone());
    let mut completions = stream::iter(venues.iter().cloned())
        .map(|venue| {
            let fetcher = Arc::clone(&fetcher);
            let query = Arc::clone(&shared_query);
            async move {
                let label = venue.label();
                let handle =
                    tokio::spawn(async move { process_venue(fetcher.as_ref(), &venue, &query).await });
                (label, handle.await)
            }
        })
        .buffer_unordered(pool_size);

    let mut records = Vec::new();
    let mut venue_failures = 0;
    let mut link_failures = 0;
    let mut done = 0;

    while let Some((label, joined)) = completions.next().await {
        done += 1;
        match joined {
            Ok(outcome) => {
                if outcome.is_failure() {
                    venue_failures += 1;
                }
                link_failures += outcome.link_failures;
                run_log.append_trace(&outcome.label, &outcome.trace).await?;
                run_log
                    .write_entry(TraceEntry::new(
                        LogLevel::Info,
                        format!(
                            "[{}/{}] {}: {} matches in {:.2}s",
                            done,
                            total,
                            outcome.label,
                            outcome.records.len(),
                            outcome.elapsed.as_secs_f64()
                        ),
                    ))
                    .await?;
                records.extend(outcome.records);
            }
            Err(error) => {
                venue_failures += 1;
                run_log
                    .write_entry(TraceEntry::new(
                        LogLevel::Error,
                        format!("[{done}/{total}] Worker for {label} did not finish: {error}"),
                    ))
                    .await?;
            }
        }
    }

    let written = match storage
        .write_report(&query.result_key(started_at), &records)
        .await
    {
        Ok(written) => written,
        Err(error) => {
            // The log may live on the same broken filesystem; the original error wins.
            let _ = run_log
                .write_entry(TraceEntry::new(
                    LogLevel::Error,
                    format!("Failed to save results: {error}"),
                ))
                .await;
            return Err(error);
        }
    };

    run_log
        .write_entry(TraceEntry::new(
            LogLevel::Info,
            format!(
                "Saved results to {}, {} matches",
                written.location.display(),
                written.record_count
            ),
        ))
        .await?;

    let elapsed = timer.stop(TOTAL)?;
    run_log
        .write_entry(TraceEntry::new(
            LogLevel::Info,
            format!("Total time: {:.2}s", elapsed.as_secs_f64()),
        ))
        .await?;

    Ok(RunReport {
        records,
        result_path: written.location,
        log_path: run_log.path().to_path_buf(),
        venue_total: total,
        venue_failures,
        link_failures,
        elapsed,
    })
}
