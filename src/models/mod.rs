// src/models/mod.rs

//! Domain models for the venue crawler.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod query;
mod record;
mod venue;

// Re-export all public types
pub use config::{Config, CrawlerConfig, PathsConfig};
pub use query::QueryRequest;
pub use record::{MatchRecord, RunReport, VolumeLink, VolumeLinks};
pub use venue::{VenueDescriptor, VenueKind};
