//! Integration tests for the job signal pipeline

use chrono::Utc;
use job_signal::config::{Config, OutputFormat};
use job_signal::input::InputManager;
use job_signal::output::formatter::save_json;
use job_signal::output::report::{RankingReport, RankingSummary, ReportMetadata};
use job_signal::output::ReportGenerator;
use job_signal::processing::dedup::{dedupe_raw, dedupe_structured};
use job_signal::processing::embeddings::HashingEmbedder;
use job_signal::processing::pipeline::{RankOptions, RankingOutcome, RankingPipeline};
use job_signal::schema::{CandidateProfile, SourceKey, StructuredJob};
use std::path::Path;
use tempfile::TempDir;

async fn load_fixtures() -> (Vec<StructuredJob>, CandidateProfile) {
    let mut manager = InputManager::new();
    let jobs = manager.load_jobs(Path::new("tests/fixtures/jobs.json")).await.unwrap();
    let profile = manager.load_profile(Path::new("tests/fixtures/profile.json")).await.unwrap();
    (jobs, profile)
}

fn rank(
    jobs: &[StructuredJob],
    profile: &CandidateProfile,
    options: &RankOptions,
) -> RankingOutcome {
    let config = Config::default();
    let embedder = HashingEmbedder::default();
    let pipeline = RankingPipeline::new(&config, &embedder).unwrap();
    pipeline.run(jobs, profile, options, Utc::now()).unwrap()
}

#[tokio::test]
async fn test_raw_signal_dedup_from_file() {
    let mut manager = InputManager::new();
    let signals = manager
        .load_signals(Path::new("tests/fixtures/raw_signals.json"))
        .await
        .unwrap();
    assert_eq!(signals.len(), 5);

    let unique = dedupe_raw(&signals);
    let urls: Vec<&str> = unique.iter().map(|s| s.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://careers.acme.io/jobs/101",
            "https://jobs.globex.com/88",
            "https://www.linkedin.com/posts/initech-hiring",
        ]
    );

    // Deduplicating again changes nothing
    assert_eq!(dedupe_raw(&unique), unique);
}

#[tokio::test]
async fn test_json_and_jsonl_inputs_agree() {
    let (jobs, _) = load_fixtures().await;

    let temp_dir = TempDir::new().unwrap();
    let jsonl_path = temp_dir.path().join("jobs.jsonl");
    let lines: Vec<String> = jobs.iter().map(|j| serde_json::to_string(j).unwrap()).collect();
    std::fs::write(&jsonl_path, lines.join("\n\n")).unwrap();

    let mut manager = InputManager::new();
    let from_jsonl = manager.load_jobs(&jsonl_path).await.unwrap();
    assert_eq!(from_jsonl, jobs);
    assert_eq!(dedupe_structured(&from_jsonl).len(), 4);
}

#[tokio::test]
async fn test_full_ranking_pipeline() {
    let (jobs, profile) = load_fixtures().await;
    let options = RankOptions {
        locations: vec!["Berlin".to_string()],
        ..RankOptions::default()
    };

    let outcome = rank(&jobs, &profile, &options);
    assert_eq!(outcome.jobs_loaded, 5);
    assert_eq!(outcome.jobs_after_dedup, 4);
    assert_eq!(outcome.jobs_after_filters, 3);
    assert_eq!(outcome.ranked.len(), 3);

    assert!(outcome.ranked.iter().all(|r| (0.0..=1.0).contains(&r.score)));
    assert!(outcome.ranked.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(outcome.ranked.iter().all(|r| r.job.is_valid_job));

    let top = &outcome.ranked[0];
    assert_eq!(top.job.source_url, "https://careers.acme.io/jobs/101");
    assert_eq!(top.breakdown.location, 1.0);
    assert_eq!(top.breakdown.skill_overlap, 0.5);

    let globex = outcome
        .ranked
        .iter()
        .find(|r| r.job.company.as_deref() == Some("Globex"))
        .unwrap();
    assert_eq!(globex.job.posted_days_ago, Some(20));
    assert_eq!(globex.breakdown.location, 0.0);

    for skill in ["Tokio", "Kubernetes", "SQL", "Go"] {
        assert!(outcome.skill_gaps.missing_skills.iter().any(|s| s == skill), "{} missing", skill);
    }
    assert!(!outcome.skill_gaps.missing_skills.iter().any(|s| s == "Rust"));
    assert_eq!(outcome.skill_gaps.recommended_skills, outcome.skill_gaps.missing_skills);
}

#[tokio::test]
async fn test_source_and_date_filters() {
    let (jobs, profile) = load_fixtures().await;

    let recent = rank(
        &jobs,
        &profile,
        &RankOptions {
            days_limit: Some(7),
            ..RankOptions::default()
        },
    );
    let urls: Vec<&str> = recent.ranked.iter().map(|r| r.job.source_url.as_str()).collect();
    assert_eq!(urls, vec!["https://careers.acme.io/jobs/101"]);

    let linkedin = rank(
        &jobs,
        &profile,
        &RankOptions {
            sources: vec![SourceKey::from("linkedin_post")],
            include_invalid: true,
            ..RankOptions::default()
        },
    );
    assert_eq!(linkedin.ranked.len(), 2);
    assert!(linkedin.ranked.iter().all(|r| r.job.source.as_str() == "linkedin_post"));
}

#[tokio::test]
async fn test_report_rendering_and_export() {
    let (jobs, profile) = load_fixtures().await;
    let config = Config::default();
    let outcome = rank(&jobs, &profile, &RankOptions::default());

    let report = RankingReport::new(
        ReportMetadata {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            jobs_file: "tests/fixtures/jobs.json".to_string(),
            profile_file: "tests/fixtures/profile.json".to_string(),
            embedding_model: "hashing".to_string(),
            processing_time_ms: 0,
        },
        RankingSummary {
            jobs_loaded: outcome.jobs_loaded,
            jobs_after_dedup: outcome.jobs_after_dedup,
            jobs_after_filters: outcome.jobs_after_filters,
            weights: config.ranking.weights,
            locations: vec![],
            sources: vec![],
            days_limit: None,
        },
        &outcome.ranked,
        2,
        outcome.skill_gaps.clone(),
        outcome.top_skills.clone(),
    );
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.results[0].source_url, outcome.ranked[0].job.source_url);

    let generator = ReportGenerator::with_options(false, true, true, true);
    let csv = generator.generate_report(&report, OutputFormat::Csv).unwrap();
    assert_eq!(csv.lines().count(), 3);

    let markdown = generator.generate_report(&report, OutputFormat::Markdown).unwrap();
    assert!(markdown.contains("**Jobs:** `jobs.json`"));

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out").join("report.json");
    save_json(&report, &path).unwrap();
    let saved: RankingReport =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved.results, report.results);
}

#[test]
fn test_config_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("job-signal").join("config.toml");

    let created = Config::load_from(&path).unwrap();
    assert!(path.exists());
    assert_eq!(created, Config::default());

    let mut changed = created.clone();
    changed.output.top_results = 5;
    changed.ranking.recency_horizon_days = 30;
    changed.save_to(&path).unwrap();
    assert_eq!(Config::load_from(&path).unwrap(), changed);
}
