//! First-seen-wins deduplication of raw signals and structured jobs

use crate::processing::normalizer::{normalize_key, normalize_url};
use crate::schema::{RawSignal, StructuredJob};
use std::collections::HashSet;

/// Characters of title and company kept in the structured dedup key
pub const DEFAULT_KEY_PREFIX_CHARS: usize = 50;

/// Identity of a structured job: (title prefix, company prefix, normalized url)
pub type JobKey = (String, String, String);

/// Remove duplicate raw signals by normalized URL.
///
/// Signals whose URL normalizes to an empty string cannot be deduplicated
/// safely and are dropped. Survivors keep their input order.
pub fn dedupe_raw(signals: &[RawSignal]) -> Vec<RawSignal> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut result = Vec::with_capacity(signals.len());

    for signal in signals {
        let key = normalize_url(&signal.url);
        if key.is_empty() {
            continue;
        }
        if seen.insert(key) {
            result.push(signal.clone());
        }
    }

    log::debug!(
        "Raw signal dedup kept {} of {} signals",
        result.len(),
        signals.len()
    );
    result
}

/// Remove duplicate structured jobs using the default key prefix length.
pub fn dedupe_structured(jobs: &[StructuredJob]) -> Vec<StructuredJob> {
    dedupe_structured_with_prefix(jobs, DEFAULT_KEY_PREFIX_CHARS)
}

/// Remove duplicate structured jobs keyed on title, company and URL.
///
/// Title and company are lowercased and cut to `prefix_chars` characters, so
/// minor trailing variation is tolerated while company and URL must still agree.
pub fn dedupe_structured_with_prefix(
    jobs: &[StructuredJob],
    prefix_chars: usize,
) -> Vec<StructuredJob> {
    let mut seen: HashSet<JobKey> = HashSet::new();
    let mut result = Vec::with_capacity(jobs.len());

    for job in jobs {
        if seen.insert(job_key(job, prefix_chars)) {
            result.push(job.clone());
        }
    }

    log::debug!(
        "Structured job dedup kept {} of {} jobs",
        result.len(),
        jobs.len()
    );
    result
}

pub fn job_key(job: &StructuredJob, prefix_chars: usize) -> JobKey {
    (
        normalize_key(job.title.as_deref().unwrap_or(""), prefix_chars),
        normalize_key(job.company.as_deref().unwrap_or(""), prefix_chars),
        normalize_url(&job.source_url),
    )
}
