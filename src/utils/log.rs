// src/utils/log.rs

//! Per-venue log traces with server-style formatting.
//!
//! A worker records into its own [`VenueTrace`] and hands it back when it is
//! done; nothing here touches global state. Lines look like
//! `[2025-03-01 10:15:00] [WARN] venue.rs:88 - message`.

use std::panic::Location;
use std::path::Path;

use chrono::{DateTime, Local};

/// Log level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Format a log line with timestamp, level and source location.
pub fn format_log(
    timestamp: DateTime<Local>,
    level: LogLevel,
    location: &Location<'_>,
    message: &str,
) -> String {
    let file = Path::new(location.file())
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_else(|| location.file());
    format!(
        "[{}] [{}] {}:{} - {}",
        timestamp.format("%Y-%m-%d %H:%M:%S"),
        level.as_str(),
        file,
        location.line(),
        message
    )
}

/// One recorded line.
#[derive(Debug, Clone)]
pub struct TraceEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub location: &'static Location<'static>,
    pub message: String,
}

impl TraceEntry {
    /// Entry stamped with the current time and the caller's location.
    #[track_caller]
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            location: Location::caller(),
            message: message.into(),
        }
    }

    pub fn render(&self) -> String {
        format_log(self.timestamp, self.level, self.location, &self.message)
    }
}

/// Ordered log lines of a single venue.
#[derive(Debug, Clone, Default)]
pub struct VenueTrace {
    entries: Vec<TraceEntry>,
}

impl VenueTrace {
    pub fn new() -> Self {
        Self::default()
    }

    #[track_caller]
    pub fn record(&mut self, level: LogLevel, message: impl Into<String>) {
        self.entries.push(TraceEntry::new(level, message));
    }

    #[track_caller]
    pub fn debug(&mut self, message: impl Into<String>) {
        self.record(LogLevel::Debug, message);
    }

    #[track_caller]
    pub fn info(&mut self, message: impl Into<String>) {
        self.record(LogLevel::Info, message);
    }

    #[track_caller]
    pub fn warn(&mut self, message: impl Into<String>) {
        self.record(LogLevel::Warn, message);
    }

    #[track_caller]
    pub fn error(&mut self, message: impl Into<String>) {
        self.record(LogLevel::Error, message);
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Number of entries at exactly `level`.
    pub fn count(&self, level: LogLevel) -> usize {
        self.entries.iter().filter(|e| e.level == level).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rendered lines in recording order.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(TraceEntry::render)
    }
}
