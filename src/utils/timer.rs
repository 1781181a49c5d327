// src/utils/timer.rs

//! Labelled wall-clock timers.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::error::{AppError, Result};

/// Tracks several running timers by label.
#[derive(Debug, Default)]
pub struct Timer {
    started: HashMap<String, Instant>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the timer for `label`.
    pub fn start(&mut self, label: impl Into<String>) {
        self.started.insert(label.into(), Instant::now());
    }

    /// Stop the timer for `label` and return the elapsed time.
    pub fn stop(&mut self, label: &str) -> Result<Duration> {
        self.started
            .remove(label)
            .map(|start| start.elapsed())
            .ok_or_else(|| AppError::validation(format!("timer '{label}' was not started")))
    }
}
