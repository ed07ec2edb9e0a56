//! Structured job records produced by LLM extraction

use crate::schema::signal::SourceKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredJob {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub experience_required: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub description_summary: Option<String>,
    pub source: SourceKey,
    /// Original URL of the posting; doubles as the job id in the vector index
    pub source_url: String,
    /// False for reposts, fake or irrelevant pages
    pub is_valid_job: bool,
    #[serde(default)]
    pub posted_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub posted_days_ago: Option<u32>,
    #[serde(default)]
    pub searched_location: Option<String>,
}

impl StructuredJob {
    /// Minimal valid job, mostly useful for building fixtures
    pub fn new(source: impl Into<SourceKey>, source_url: impl Into<String>) -> Self {
        Self {
            title: None,
            company: None,
            location: None,
            employment_type: None,
            experience_required: None,
            skills: Vec::new(),
            salary: None,
            contact_email: None,
            description_summary: None,
            source: source.into(),
            source_url: source_url.into(),
            is_valid_job: true,
            posted_date: None,
            posted_days_ago: None,
            searched_location: None,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.source_url
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().filter(|t| !t.trim().is_empty()).unwrap_or("Untitled")
    }
}
