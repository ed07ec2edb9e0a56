//! End-to-end ranking run: dedup, age backfill, filters, indexing, scoring and gaps

use crate::config::Config;
use crate::error::Result;
use crate::processing::date_parser::backfill_posting_age;
use crate::processing::dedup::dedupe_structured_with_prefix;
use crate::processing::embeddings::EmbeddingProvider;
use crate::processing::filters::{filter_by_date, filter_by_source, valid_only};
use crate::processing::gap_analyzer::{
    compute_skill_gaps, skill_frequency, SkillFrequency, SkillGaps,
};
use crate::processing::ranker::{RankedResult, Scorer};
use crate::processing::vector_index::build_job_index;
use crate::schema::{CandidateProfile, SourceKey, StructuredJob};
use chrono::{DateTime, Utc};
use log::info;

/// Skills listed in the "most requested" summary
const TOP_SKILLS: usize = 10;

/// Per-run options coming from the command line
#[derive(Debug, Clone, Default)]
pub struct RankOptions {
    pub locations: Vec<String>,
    pub sources: Vec<SourceKey>,
    pub days_limit: Option<u32>,
    /// Keep jobs flagged as reposts or irrelevant
    pub include_invalid: bool,
}

#[derive(Debug, Clone)]
pub struct RankingOutcome {
    /// Every surviving job, best first
    pub ranked: Vec<RankedResult>,
    pub skill_gaps: SkillGaps,
    pub top_skills: Vec<SkillFrequency>,
    pub jobs_loaded: usize,
    pub jobs_after_dedup: usize,
    pub jobs_after_filters: usize,
}

pub struct RankingPipeline<'a> {
    config: &'a Config,
    embedder: &'a dyn EmbeddingProvider,
    scorer: Scorer,
}

impl<'a> RankingPipeline<'a> {
    pub fn new(config: &'a Config, embedder: &'a dyn EmbeddingProvider) -> Result<Self> {
        let scorer = Scorer::new(config.ranking.clone())?;
        Ok(Self { config, embedder, scorer })
    }

    /// Rank `jobs` for `profile`, with posting ages measured from `now`.
    pub fn run(
        &self,
        jobs: &[StructuredJob],
        profile: &CandidateProfile,
        options: &RankOptions,
        now: DateTime<Utc>,
    ) -> Result<RankingOutcome> {
        let unique = dedupe_structured_with_prefix(jobs, self.config.dedup.key_prefix_chars);
        info!("Deduplicated {} jobs down to {}", jobs.len(), unique.len());

        let dated = backfill_posting_age(&unique, now);
        let mut pool = filter_by_source(&dated, &options.sources);
        pool = filter_by_date(&pool, options.days_limit);
        if !options.include_invalid {
            pool = valid_only(&pool);
        }
        info!("{} jobs left after filtering", pool.len());

        let index = build_job_index(&pool, self.embedder)?;
        let ranked = self
            .scorer
            .rank(&pool, profile, &options.locations, self.embedder, &index)?;

        let ranking = &self.config.ranking;
        let top_jobs: Vec<StructuredJob> = ranked
            .iter()
            .take(ranking.gap_top_jobs)
            .map(|r| r.job.clone())
            .collect();
        let skill_gaps = compute_skill_gaps(&top_jobs, profile, ranking.gap_skills_per_job);
        let top_skills = skill_frequency(&pool, TOP_SKILLS);

        Ok(RankingOutcome {
            ranked,
            skill_gaps,
            top_skills,
            jobs_loaded: jobs.len(),
            jobs_after_dedup: unique.len(),
            jobs_after_filters: pool.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::embeddings::HashingEmbedder;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
    }

    fn job(url: &str, title: &str, skills: &[&str], summary: &str) -> StructuredJob {
        let mut job = StructuredJob::new("indeed", url);
        job.title = Some(title.to_string());
        job.company = Some("Acme".to_string());
        job.skills = skills.iter().map(|s| s.to_string()).collect();
        job.description_summary = Some(summary.to_string());
        job
    }

    #[test]
    fn test_run_dedupes_filters_and_ranks() {
        let config = Config::default();
        let embedder = HashingEmbedder::default();
        let pipeline = RankingPipeline::new(&config, &embedder).unwrap();

        let mut invalid = job("https://x.com/3", "Recruiter spam", &[], "posted 1 day ago");
        invalid.is_valid_job = false;
        let jobs = vec![
            job("https://x.com/1", "Rust Engineer", &["Rust", "Kafka"], "Posted 2 days ago"),
            job(
                "https://x.com/1?utm=feed",
                "Rust Engineer",
                &["Rust", "Kafka"],
                "Posted 2 days ago",
            ),
            job("https://x.com/2", "Java Developer", &["Java"], "Posted 40 days ago"),
            invalid,
        ];
        let profile = CandidateProfile::with_skills(["Rust"]);

        let outcome = pipeline.run(&jobs, &profile, &RankOptions::default(), now()).unwrap();
        assert_eq!(outcome.jobs_loaded, 4);
        assert_eq!(outcome.jobs_after_dedup, 3);
        assert_eq!(outcome.jobs_after_filters, 2);
        assert_eq!(outcome.ranked.len(), 2);
        assert_eq!(outcome.ranked[0].job.source_url, "https://x.com/1");
        assert_eq!(outcome.ranked[0].job.posted_days_ago, Some(2));
        assert_eq!(outcome.skill_gaps.missing_skills, vec!["Kafka", "Java"]);
    }

    #[test]
    fn test_days_limit_and_invalid_jobs() {
        let config = Config::default();
        let embedder = HashingEmbedder::default();
        let pipeline = RankingPipeline::new(&config, &embedder).unwrap();

        let mut invalid = job("https://x.com/3", "Repost", &[], "posted 1 day ago");
        invalid.is_valid_job = false;
        let jobs = vec![
            job("https://x.com/1", "Rust Engineer", &["Rust"], "Posted 2 days ago"),
            job("https://x.com/2", "Old posting", &["Go"], "Posted 40 days ago"),
            invalid,
        ];
        let options = RankOptions {
            days_limit: Some(7),
            include_invalid: true,
            ..RankOptions::default()
        };

        let outcome = pipeline
            .run(&jobs, &CandidateProfile::default(), &options, now())
            .unwrap();
        let urls: Vec<&str> = outcome.ranked.iter().map(|r| r.job.source_url.as_str()).collect();
        assert_eq!(urls.len(), 2);
        assert!(urls.contains(&"https://x.com/1"));
        assert!(urls.contains(&"https://x.com/3"));
    }

    #[test]
    fn test_empty_input() {
        let config = Config::default();
        let embedder = HashingEmbedder::default();
        let pipeline = RankingPipeline::new(&config, &embedder).unwrap();

        let outcome = pipeline
            .run(&[], &CandidateProfile::default(), &RankOptions::default(), now())
            .unwrap();
        assert!(outcome.ranked.is_empty());
        assert!(outcome.skill_gaps.is_empty());
        assert!(outcome.top_skills.is_empty());
    }
}
