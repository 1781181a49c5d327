// src/lib.rs

//! Venue Crawler Library
//!
//! Scans journal and conference catalog pages for paper titles that match a
//! keyword set within a set of years.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
