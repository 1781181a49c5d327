//! Service layer for the venue crawler.
//!
//! This module contains the business logic for:
//! - Volume link resolution per venue kind (`VolumeResolver`)
//! - Title extraction from volume pages (`extract_titles`)
//! - Keyword filtering (`KeywordFilter`)
//! - Processing a single venue (`process_venue`)

pub mod keywords;
pub mod titles;
pub mod venue;
pub mod volumes;

pub use keywords::{KeywordFilter, matches};
pub use titles::{extract_titles, normalize_title};
pub use venue::{VenueOutcome, process_venue};
pub use volumes::{ConferenceResolver, JournalResolver, VolumeResolver, resolver_for};
