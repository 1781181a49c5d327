//! Pipeline entry points.
//!
//! - `run_crawler`: Query every venue and write the match report

pub mod crawl;

pub use crawl::run_crawler;
