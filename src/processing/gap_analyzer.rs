//! Skill gap detection across top-ranked jobs

use crate::processing::normalizer::normalize_skill;
use crate::processing::ranker::skill_set;
use crate::schema::{CandidateProfile, StructuredJob};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillGaps {
    /// Skills required by the jobs but absent from the profile, first-seen order
    pub missing_skills: Vec<String>,
    /// Currently the same list as `missing_skills`
    pub recommended_skills: Vec<String>,
}

impl SkillGaps {
    pub fn is_empty(&self) -> bool {
        self.missing_skills.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillFrequency {
    pub skill: String,
    pub count: usize,
}

/// Compare the leading skills of each job with the candidate's skills.
///
/// At most `top_n_per_job` listed skills are taken from every job. Each
/// missing skill is reported once, spelled as in its first occurrence.
pub fn compute_skill_gaps(
    top_jobs: &[StructuredJob],
    profile: &CandidateProfile,
    top_n_per_job: usize,
) -> SkillGaps {
    let known = skill_set(&profile.skills);
    let mut reported: HashSet<String> = HashSet::new();
    let mut missing = Vec::new();

    let pooled = top_jobs
        .iter()
        .flat_map(|job| job.skills.iter().take(top_n_per_job))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty());

    for skill in pooled {
        let key = normalize_skill(skill);
        if !known.contains(&key) && reported.insert(key) {
            missing.push(skill.to_string());
        }
    }

    SkillGaps {
        recommended_skills: missing.clone(),
        missing_skills: missing,
    }
}

/// Most requested skills across valid jobs, most frequent first.
///
/// Skills are counted by exact trimmed spelling; ties keep first appearance.
pub fn skill_frequency(jobs: &[StructuredJob], top_n: usize) -> Vec<SkillFrequency> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for skill in jobs
        .iter()
        .filter(|j| j.is_valid_job)
        .flat_map(|j| j.skills.iter())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
    {
        let count = counts.entry(skill).or_insert(0);
        if *count == 0 {
            order.push(skill);
        }
        *count += 1;
    }

    let mut ranked: Vec<SkillFrequency> = order
        .into_iter()
        .map(|skill| SkillFrequency {
            skill: skill.to_string(),
            count: counts[skill],
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(top_n);
    ranked
}
