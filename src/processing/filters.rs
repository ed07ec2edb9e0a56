//! Source, posting-age and validity filters over structured jobs

use crate::schema::{SourceKey, StructuredJob};
use std::collections::HashSet;

/// Keep jobs from the selected sources; an empty selection keeps everything.
pub fn filter_by_source(
    jobs: &[StructuredJob],
    selected_sources: &[SourceKey],
) -> Vec<StructuredJob> {
    if selected_sources.is_empty() {
        return jobs.to_vec();
    }
    let selected: HashSet<&SourceKey> = selected_sources.iter().collect();
    jobs.iter().filter(|j| selected.contains(&j.source)).cloned().collect()
}

/// Keep jobs posted within `days_limit` days.
///
/// `None` keeps everything. With a limit, jobs of unknown age are dropped.
pub fn filter_by_date(jobs: &[StructuredJob], days_limit: Option<u32>) -> Vec<StructuredJob> {
    match days_limit {
        None => jobs.to_vec(),
        Some(limit) => jobs
            .iter()
            .filter(|j| j.posted_days_ago.map_or(false, |days| days <= limit))
            .cloned()
            .collect(),
    }
}

pub fn valid_only(jobs: &[StructuredJob]) -> Vec<StructuredJob> {
    jobs.iter().filter(|j| j.is_valid_job).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(source: &str, days: Option<u32>, valid: bool) -> StructuredJob {
        let mut job = StructuredJob::new(source, format!("https://x.com/{}/{:?}", source, days));
        job.posted_days_ago = days;
        job.is_valid_job = valid;
        job
    }

    #[test]
    fn test_filter_by_source() {
        let jobs = vec![
            job("indeed", None, true),
            job("linkedin_post", None, true),
            job("indeed", Some(1), true),
        ];
        assert_eq!(filter_by_source(&jobs, &[]).len(), 3);

        let indeed = filter_by_source(&jobs, &[SourceKey::from("indeed")]);
        assert_eq!(indeed.len(), 2);
        assert!(indeed.iter().all(|j| j.source.as_str() == "indeed"));
    }

    #[test]
    fn test_filter_by_date_drops_unknown_ages() {
        let jobs = vec![
            job("a", Some(2), true),
            job("b", None, true),
            job("c", Some(7), true),
            job("d", Some(8), true),
        ];
        assert_eq!(filter_by_date(&jobs, None).len(), 4);

        let week: Vec<String> = filter_by_date(&jobs, Some(7))
            .into_iter()
            .map(|j| j.source.to_string())
            .collect();
        assert_eq!(week, vec!["a", "c"]);
    }

    #[test]
    fn test_valid_only() {
        let jobs = vec![job("a", None, true), job("b", None, false)];
        let valid = valid_only(&jobs);
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].source.as_str(), "a");
    }
}
