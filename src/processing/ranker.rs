//! Personalized job ranking: embedding similarity blended with location, recency and skill signals

use crate::config::{RankingConfig, RankingWeights};
use crate::error::Result;
use crate::processing::embeddings::EmbeddingProvider;
use crate::processing::normalizer::normalize_skill;
use crate::processing::vector_index::{similarity_to_unit, VectorSearch};
use crate::schema::{CandidateProfile, StructuredJob};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The four sub-scores behind a final score, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub embedding: f32,
    pub location: f32,
    pub recency: f32,
    pub skill_overlap: f32,
}

impl ScoreBreakdown {
    pub fn combine(&self, weights: &RankingWeights) -> f32 {
        let score = weights.embedding * self.embedding
            + weights.location * self.location
            + weights.recency * self.recency
            + weights.skill_overlap * self.skill_overlap;
        if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 1.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub job: StructuredJob,
    pub score: f32,
    pub breakdown: ScoreBreakdown,
}

pub struct Scorer {
    config: RankingConfig,
}

impl Scorer {
    pub fn new(config: RankingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Rank jobs against a profile, best first.
    ///
    /// The index must hold job embeddings keyed by `source_url`. Jobs missing
    /// from the search result get an embedding sub-score of zero instead of
    /// failing the ranking. Equal scores keep their input order.
    pub fn rank(
        &self,
        jobs: &[StructuredJob],
        profile: &CandidateProfile,
        user_locations: &[String],
        embedder: &dyn EmbeddingProvider,
        index: &dyn VectorSearch,
    ) -> Result<Vec<RankedResult>> {
        if jobs.is_empty() {
            return Ok(Vec::new());
        }

        let profile_vector = embedder.embed_text(&profile_summary_text(profile))?;
        let top_k = jobs.len().saturating_add(self.config.over_fetch);
        let hits = index.search(&profile_vector, top_k)?;

        // Hits are sorted best first, so the first entry per id is its best one
        let mut similarity_by_id: HashMap<&str, f32> = HashMap::with_capacity(hits.len());
        for (job_id, similarity) in &hits {
            similarity_by_id.entry(job_id.as_str()).or_insert(*similarity);
        }

        let profile_skills = skill_set(&profile.skills);
        let locations: Vec<String> = user_locations
            .iter()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .collect();

        let mut ranked: Vec<RankedResult> = jobs
            .iter()
            .map(|job| {
                let breakdown = ScoreBreakdown {
                    embedding: similarity_by_id
                        .get(job.source_url.as_str())
                        .map(|s| similarity_to_unit(*s))
                        .unwrap_or(0.0),
                    location: location_score(job, &locations),
                    recency: recency_score(job.posted_days_ago, self.config.recency_horizon_days),
                    skill_overlap: skill_overlap_score(&job.skills, &profile_skills),
                };
                RankedResult {
                    job: job.clone(),
                    score: breakdown.combine(&self.config.weights),
                    breakdown,
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        let missing = jobs
            .iter()
            .filter(|j| !similarity_by_id.contains_key(j.source_url.as_str()))
            .count();
        if missing > 0 {
            log::warn!("{} of {} jobs had no embedding match in the index", missing, jobs.len());
        }
        log::info!("Ranked {} jobs", ranked.len());

        Ok(ranked)
    }
}

/// Single text describing the candidate, embedded once per ranking.
pub fn profile_summary_text(profile: &CandidateProfile) -> String {
    let mut parts = Vec::new();
    if !profile.skills.is_empty() {
        parts.push(format!("Skills: {}", profile.skills.join(", ")));
    }
    if !profile.domain.trim().is_empty() {
        parts.push(format!("Domain: {}", profile.domain.trim()));
    }
    if !profile.tools.is_empty() {
        parts.push(format!("Tools: {}", profile.tools.join(", ")));
    }
    if !profile.experience_years.trim().is_empty() {
        parts.push(format!("Experience: {}", profile.experience_years.trim()));
    }
    parts.join(" | ")
}

/// 1.0 when no preference is given or any preferred location matches, else 0.0.
///
/// `locations` must already be trimmed, lowercased and non-blank.
pub fn location_score(job: &StructuredJob, locations: &[String]) -> f32 {
    if locations.is_empty() {
        return 1.0;
    }

    let job_location = format!(
        "{} {}",
        job.location.as_deref().unwrap_or(""),
        job.searched_location.as_deref().unwrap_or("")
    )
    .to_lowercase();

    let matched = locations.iter().any(|loc| {
        job_location.contains(loc.as_str())
            || (loc.contains("remote") && job_location.contains("remote"))
    });
    if matched {
        1.0
    } else {
        0.0
    }
}

/// Linear decay from 1.0 for a fresh posting to 0.0 at `horizon_days`.
///
/// Unknown age counts as fresh.
pub fn recency_score(posted_days_ago: Option<u32>, horizon_days: u32) -> f32 {
    match posted_days_ago {
        None | Some(0) => 1.0,
        Some(days) => (1.0 - days as f32 / horizon_days.max(1) as f32).max(0.0),
    }
}

/// Share of the job's required skills that the candidate covers.
///
/// A job listing no skills cannot be missed, so it scores 1.0.
pub fn skill_overlap_score(job_skills: &[String], profile_skills: &HashSet<String>) -> f32 {
    let required = skill_set(job_skills);
    if required.is_empty() {
        return 1.0;
    }
    let covered = required.intersection(profile_skills).count();
    (covered as f32 / required.len() as f32).min(1.0)
}

/// Trimmed lowercase skill names, blanks removed.
pub fn skill_set(skills: &[String]) -> HashSet<String> {
    skills
        .iter()
        .map(|s| normalize_skill(s))
        .filter(|s| !s.is_empty())
        .collect()
}
