//! Candidate profile extracted from a CV

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default)]
    pub skills: Vec<String>,
    /// Free-form, e.g. "5" or "2-3"
    #[serde(default)]
    pub experience_years: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub tools: Vec<String>,
}

impl CandidateProfile {
    pub fn with_skills<I, S>(skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            skills: skills.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}
