// src/services/keywords.rs

//! Keyword filtering of titles.

/// Case-insensitive substring filter over a keyword set.
///
/// An empty keyword set accepts every title.
#[derive(Debug, Clone, Default)]
pub struct KeywordFilter {
    keywords: Vec<String>,
}

impl KeywordFilter {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn matches(&self, title: &str) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let title = title.to_lowercase();
        self.keywords.iter().any(|k| title.contains(k.as_str()))
    }
}

/// Whether `title` contains any of `keywords`, ignoring case.
pub fn matches<S: AsRef<str>>(title: &str, keywords: &[S]) -> bool {
    KeywordFilter::new(keywords).matches(title)
}
