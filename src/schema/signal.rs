//! Raw job signals as returned by web search

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a signal was found, e.g. `linkedin_post` or `indeed`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceKey(String);

impl SourceKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for SourceKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Unstructured job posting reference (URL plus search snippets).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSignal {
    pub source: SourceKey,
    pub url: String,
    #[serde(default)]
    pub title_snippet: String,
    #[serde(default)]
    pub description_snippet: String,
    /// Location used in the search query that produced this result
    #[serde(default)]
    pub searched_location: String,
}

impl RawSignal {
    pub fn new(source: impl Into<SourceKey>, url: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            url: url.into(),
            title_snippet: String::new(),
            description_snippet: String::new(),
            searched_location: String::new(),
        }
    }
}
