//! Ranking report structures shared by all output formats

use crate::config::RankingWeights;
use crate::processing::gap_analyzer::{SkillFrequency, SkillGaps};
use crate::processing::ranker::{RankedResult, ScoreBreakdown};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything a formatter needs to render one ranking run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    pub metadata: ReportMetadata,

    pub summary: RankingSummary,

    /// Ranked jobs, best first; formatters keep this order
    pub results: Vec<RankedJobEntry>,

    pub skill_gaps: SkillGaps,

    /// Most requested skills across the ranked pool
    pub top_skills: Vec<SkillFrequency>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,

    pub tool_version: String,

    pub jobs_file: String,

    pub profile_file: String,

    /// Embedding provider used for the similarity sub-score
    pub embedding_model: String,

    pub processing_time_ms: u64,
}

/// Counts and settings of the pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingSummary {
    pub jobs_loaded: usize,
    pub jobs_after_dedup: usize,
    pub jobs_after_filters: usize,
    pub weights: RankingWeights,
    pub locations: Vec<String>,
    pub sources: Vec<String>,
    pub days_limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedJobEntry {
    /// 1-based position
    pub rank: usize,
    pub score: f32,
    pub breakdown: ScoreBreakdown,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub source: String,
    pub source_url: String,
    pub posted_days_ago: Option<u32>,
    pub employment_type: Option<String>,
    pub salary: Option<String>,
    pub skills: Vec<String>,
    pub description_summary: Option<String>,
}

impl RankedJobEntry {
    pub fn from_result(rank: usize, result: &RankedResult) -> Self {
        let job = &result.job;
        Self {
            rank,
            score: result.score,
            breakdown: result.breakdown,
            title: job.display_title().to_string(),
            company: job.company.clone(),
            location: job.location.clone(),
            source: job.source.to_string(),
            source_url: job.source_url.clone(),
            posted_days_ago: job.posted_days_ago,
            employment_type: job.employment_type.clone(),
            salary: job.salary.clone(),
            skills: job.skills.clone(),
            description_summary: job.description_summary.clone(),
        }
    }

    /// Score as a whole percentage
    pub fn score_percentage(&self) -> u8 {
        score_percentage(self.score)
    }
}

impl RankingReport {
    /// Build a report from ranked results, keeping at most `top_results` rows
    pub fn new(
        metadata: ReportMetadata,
        summary: RankingSummary,
        ranked: &[RankedResult],
        top_results: usize,
        skill_gaps: SkillGaps,
        top_skills: Vec<SkillFrequency>,
    ) -> Self {
        let results = ranked
            .iter()
            .take(top_results)
            .enumerate()
            .map(|(i, result)| RankedJobEntry::from_result(i + 1, result))
            .collect();

        Self {
            metadata,
            summary,
            results,
            skill_gaps,
            top_skills,
        }
    }
}

pub fn score_percentage(score: f32) -> u8 {
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}
