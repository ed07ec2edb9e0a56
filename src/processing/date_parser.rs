//! Posting age extraction from relative ("3 days ago") and absolute ("Jan 12, 2025") phrases

use crate::schema::StructuredJob;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use regex::Regex;

/// Posting timestamp and age in whole days, when they could be determined
pub type PostedDate = (Option<DateTime<Utc>>, Option<u32>);

const MONTH_PATTERN: &str = concat!(
    r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?",
    r"|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)",
);

pub struct PostedDateParser {
    hours_ago: Regex,
    days_ago: Regex,
    weeks_ago: Regex,
    months_ago: Regex,
    day_month_year: Regex,
    month_day_year: Regex,
    iso_date: Regex,
}

impl Default for PostedDateParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PostedDateParser {
    pub fn new() -> Self {
        Self {
            hours_ago: Regex::new(r"(?i)(\d+)\s*h(?:ours?|rs?)?\s+ago")
                .expect("Invalid hours regex"),
            days_ago: Regex::new(r"(?i)(\d+)\s*days?\s+ago").expect("Invalid days regex"),
            weeks_ago: Regex::new(r"(?i)(\d+)\s*weeks?\s+ago").expect("Invalid weeks regex"),
            months_ago: Regex::new(r"(?i)(\d+)\s*months?\s+ago").expect("Invalid months regex"),
            day_month_year: Regex::new(&format!(
                r"(?i)\b(\d{{1,2}})\s+{}\.?\s*,?\s*(\d{{4}})",
                MONTH_PATTERN
            ))
            .expect("Invalid day-month-year regex"),
            month_day_year: Regex::new(&format!(
                r"(?i)\b{}\.?\s+(\d{{1,2}})\s*,?\s*(\d{{4}})",
                MONTH_PATTERN
            ))
            .expect("Invalid month-day-year regex"),
            iso_date: Regex::new(r"(\d{4})-(\d{2})-(\d{2})").expect("Invalid ISO date regex"),
        }
    }

    /// Extract a posting date from free text relative to `now`.
    ///
    /// Relative phrases win over absolute dates. Absolute dates in the
    /// future or outside the calendar are ignored.
    pub fn parse(&self, raw_text: &str, now: DateTime<Utc>) -> PostedDate {
        let text = raw_text.trim();
        if text.is_empty() {
            return (None, None);
        }

        if let Some(hours) = capture_number(&self.hours_ago, text) {
            let posted = now.checked_sub_signed(Duration::hours(hours as i64));
            return (posted, Some(hours / 24));
        }
        let units = [(&self.days_ago, 1), (&self.weeks_ago, 7), (&self.months_ago, 30)];
        for (regex, days_per_unit) in units {
            if let Some(count) = capture_number(regex, text) {
                let days = count.saturating_mul(days_per_unit);
                return (now.checked_sub_signed(Duration::days(days as i64)), Some(days));
            }
        }

        let absolute = self
            .day_month_year
            .captures(text)
            .and_then(|c| {
                let month = month_number(c.get(2)?.as_str())?;
                build_date(c.get(3)?.as_str(), month, c.get(1)?.as_str())
            })
            .or_else(|| {
                let c = self.month_day_year.captures(text)?;
                let month = month_number(c.get(1)?.as_str())?;
                build_date(c.get(3)?.as_str(), month, c.get(2)?.as_str())
            })
            .or_else(|| {
                let c = self.iso_date.captures(text)?;
                let month = c.get(2)?.as_str().parse().ok()?;
                build_date(c.get(1)?.as_str(), month, c.get(3)?.as_str())
            });

        match absolute {
            Some(posted) if posted <= now => (Some(posted), Some(days_between(posted, now))),
            _ => (None, None),
        }
    }
}

/// Parse a posting date with a throwaway parser.
pub fn normalize_posted_date(raw_text: &str, now: DateTime<Utc>) -> PostedDate {
    PostedDateParser::new().parse(raw_text, now)
}

/// Fill in missing `posted_days_ago` values.
///
/// Uses `posted_date` when present, otherwise tries the description summary.
/// Jobs that already carry an age are returned unchanged.
pub fn backfill_posting_age(jobs: &[StructuredJob], now: DateTime<Utc>) -> Vec<StructuredJob> {
    let parser = PostedDateParser::new();
    let mut filled = 0usize;

    let result = jobs
        .iter()
        .map(|job| {
            let mut job = job.clone();
            if job.posted_days_ago.is_none() {
                if let Some(posted) = job.posted_date {
                    job.posted_days_ago = Some(days_between(posted, now));
                } else if let Some(summary) = job.description_summary.as_deref() {
                    let (posted, days) = parser.parse(summary, now);
                    job.posted_date = posted;
                    job.posted_days_ago = days;
                }
                if job.posted_days_ago.is_some() {
                    filled += 1;
                }
            }
            job
        })
        .collect();

    log::debug!("Backfilled posting age for {} jobs", filled);
    result
}

/// Whole days from `posted` to `now`, zero for future timestamps
fn days_between(posted: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let days = (now - posted).num_days().max(0);
    u32::try_from(days).unwrap_or(u32::MAX)
}

fn capture_number(regex: &Regex, text: &str) -> Option<u32> {
    regex.captures(text)?.get(1)?.as_str().parse().ok()
}

fn build_date(year: &str, month: u32, day: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(year.parse().ok()?, month, day.parse().ok()?)?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

fn month_number(name: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    let prefix: String = name.to_lowercase().chars().take(3).collect();
    MONTHS.iter().position(|m| *m == prefix).map(|i| i as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_relative_phrases() {
        let parser = PostedDateParser::new();
        assert_eq!(parser.parse("Posted 3h ago", now()).1, Some(0));
        assert_eq!(parser.parse("posted 50 hours ago", now()).1, Some(2));
        assert_eq!(parser.parse("2 days ago", now()).1, Some(2));
        assert_eq!(parser.parse("1 Day ago", now()).1, Some(1));
        assert_eq!(parser.parse("Posted 2 weeks ago", now()).1, Some(14));
        assert_eq!(parser.parse("3 months ago", now()).1, Some(90));

        let (posted, _) = parser.parse("2 days ago", now());
        assert_eq!(posted, Some(now() - Duration::days(2)));
    }

    #[test]
    fn test_absolute_dates() {
        let parser = PostedDateParser::new();
        assert_eq!(parser.parse("Jan 12, 2025", now()).1, Some(48));
        assert_eq!(parser.parse("Posted 12 January 2025", now()).1, Some(48));
        assert_eq!(parser.parse("12 Feb., 2025", now()).1, Some(17));
        assert_eq!(parser.parse("posted on 2025-02-28", now()).1, Some(1));

        let (posted, _) = parser.parse("2025-01-12", now());
        assert_eq!(posted, Some(Utc.with_ymd_and_hms(2025, 1, 12, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_future_and_invalid_dates_are_ignored() {
        let parser = PostedDateParser::new();
        assert_eq!(parser.parse("Dec 24, 2030", now()), (None, None));
        assert_eq!(parser.parse("2025-02-30", now()), (None, None));
        assert_eq!(parser.parse("Hiring now!", now()), (None, None));
        assert_eq!(parser.parse("   ", now()), (None, None));
        assert_eq!(normalize_posted_date("Posted 1 week ago", now()).1, Some(7));
    }

    #[test]
    fn test_backfill_prefers_existing_values() {
        let mut dated = StructuredJob::new("indeed", "https://x.com/1");
        dated.posted_date = Some(now() - Duration::days(10));
        let mut described = StructuredJob::new("indeed", "https://x.com/2");
        described.description_summary = Some("Great team. Posted 4 days ago.".to_string());
        let mut known = StructuredJob::new("indeed", "https://x.com/3");
        known.posted_days_ago = Some(7);
        known.description_summary = Some("1 day ago".to_string());
        let mut future = StructuredJob::new("indeed", "https://x.com/4");
        future.posted_date = Some(now() + Duration::days(3));
        let unknown = StructuredJob::new("indeed", "https://x.com/5");

        let jobs = backfill_posting_age(&[dated, described, known, future, unknown], now());
        let ages: Vec<Option<u32>> = jobs.iter().map(|j| j.posted_days_ago).collect();
        assert_eq!(ages, vec![Some(10), Some(4), Some(7), Some(0), None]);
    }
}
