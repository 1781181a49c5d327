// src/models/venue.rs

//! Venue descriptors as supplied by the venue list.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of venue. Selects the volume link strategy.
///
/// Unrecognised `type` strings are kept so the worker can report them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VenueKind {
    Journal,
    Conference,
    Unknown(String),
}

impl VenueKind {
    /// Tag used in the venue list.
    pub fn as_str(&self) -> &str {
        match self {
            VenueKind::Journal => "journal",
            VenueKind::Conference => "conference",
            VenueKind::Unknown(tag) => tag,
        }
    }

    /// Name used in report labels.
    pub fn display_name(&self) -> &'static str {
        match self {
            VenueKind::Journal => "期刊",
            VenueKind::Conference => "会议",
            VenueKind::Unknown(_) => "未知类型",
        }
    }
}

impl From<String> for VenueKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "journal" => VenueKind::Journal,
            "conference" => VenueKind::Conference,
            _ => VenueKind::Unknown(tag),
        }
    }
}

impl From<VenueKind> for String {
    fn from(kind: VenueKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for VenueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A journal or conference whose catalog page is crawled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueDescriptor {
    /// Short identifier, e.g. `AAAI`
    pub key: String,

    /// Full venue name
    #[serde(default)]
    pub full_name: String,

    /// Venue kind (`journal` or `conference`)
    #[serde(rename = "type")]
    pub kind: VenueKind,

    /// Rank letter, e.g. `A`
    pub rank: String,

    /// Catalog page URL
    pub url: String,
}

impl VenueDescriptor {
    /// Label used in match records and log groups: `KEY (A类 会议)`.
    pub fn label(&self) -> String {
        format!(
            "{} ({}类 {})",
            self.key,
            self.rank,
            self.kind.display_name()
        )
    }
}
