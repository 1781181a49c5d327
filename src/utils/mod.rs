//! Utility functions and helpers.

pub mod http;
pub mod log;
pub mod timer;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Resolve `href` against an optional base, passing it through when there is none.
pub fn resolve_href(base: Option<&Url>, href: &str) -> String {
    match base {
        Some(base) => resolve_url(base, href),
        None => href.to_string(),
    }
}
