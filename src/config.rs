// src/config.rs

//! Venue list loading and building.
//!
//! The crawler reads a flat JSON array of venue descriptors. That array is
//! usually assembled from per-section files (one JSON object per research
//! area, keyed by groups such as `journal_A` or `conference_B`) with
//! [`import_sections`].

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::VenueDescriptor;

/// Load venue descriptors from a JSON array file.
pub fn load_venues(path: impl AsRef<Path>) -> Result<Vec<VenueDescriptor>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::config(format!("Cannot read venue list {}: {e}", path.display())))?;
    Ok(serde_json::from_str(&content)?)
}

/// Check that keys are present and unique and catalog URLs parse.
///
/// Unknown venue types are allowed here; the crawler skips them with a warning.
pub fn validate_venues(venues: &[VenueDescriptor]) -> Result<()> {
    if venues.is_empty() {
        return Err(AppError::validation("No venues defined"));
    }

    let mut seen = HashSet::new();
    for venue in venues {
        if venue.key.trim().is_empty() {
            return Err(AppError::validation(format!(
                "Venue with url {} has an empty key",
                venue.url
            )));
        }
        if !seen.insert(venue.key.as_str()) {
            return Err(AppError::validation(format!(
                "Duplicate venue key {}",
                venue.key
            )));
        }
        Url::parse(&venue.url).map_err(|e| {
            AppError::validation(format!("Venue {} has invalid url {}: {e}", venue.key, venue.url))
        })?;
    }
    Ok(())
}

/// Names (file stems) of every `.json` file in `dir`, sorted.
pub fn list_sections(dir: impl AsRef<Path>) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Which groups to take from which section file.
///
/// Written as a map of section name to group keys, in TOML
///
/// ```toml
/// artificial_intelligence = ["journal_A", "conference_A"]
/// ```
///
/// or JSON (`{"artificial_intelligence": ["journal_A"]}`). Sections keep the
/// order they appear in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSelection {
    pub sections: Vec<SectionImport>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionImport {
    /// Section file stem, e.g. `artificial_intelligence`
    pub section: String,
    /// Group keys inside the section, e.g. `journal_A`
    pub groups: Vec<String>,
}

impl ImportSelection {
    /// Load a selection file; `.json` is read as JSON, anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(toml::from_str(&content)?)
        }
    }
}

impl<'de> Deserialize<'de> for ImportSelection {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SelectionVisitor;

        impl<'de> Visitor<'de> for SelectionVisitor {
            type Value = ImportSelection;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of section name to a list of group keys")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut sections = Vec::new();
                while let Some((section, groups)) = map.next_entry::<String, Vec<String>>()? {
                    sections.push(SectionImport { section, groups });
                }
                Ok(ImportSelection { sections })
            }
        }

        deserializer.deserialize_map(SelectionVisitor)
    }
}

/// Merge the selected venue groups into one venue list written to `output`.
///
/// Missing section files and groups are skipped with a warning. Entries are
/// copied verbatim. Returns the number of venues written.
pub fn import_sections(
    sections_dir: impl AsRef<Path>,
    selection: &ImportSelection,
    output: impl AsRef<Path>,
) -> Result<usize> {
    let sections_dir = sections_dir.as_ref();
    let output = output.as_ref();
    let mut merged: Vec<Value> = Vec::new();

    for item in &selection.sections {
        let file = sections_dir.join(format!("{}.json", item.section));
        if !file.exists() {
            log::warn!("Section file not found: {}", file.display());
            continue;
        }

        let content = fs::read_to_string(&file)?;
        let groups: Map<String, Value> = serde_json::from_str(&content)?;
        for group in &item.groups {
            match groups.get(group) {
                Some(Value::Array(venues)) => merged.extend(venues.iter().cloned()),
                Some(_) => log::warn!("Group {} in {} is not a list", group, item.section),
                None => log::debug!("Group {} not present in {}", group, item.section),
            }
        }
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|e| AppError::persistence(parent, e))?;
    }
    let json = serde_json::to_string_pretty(&merged)?;
    fs::write(output, json).map_err(|e| AppError::persistence(output, e))?;

    log::info!("Imported {} venues -> {}", merged.len(), output.display());
    Ok(merged.len())
}
