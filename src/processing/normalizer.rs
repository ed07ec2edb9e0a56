//! Canonical forms of URLs and text keys used for equality comparisons

/// Normalize a URL for deduplication.
///
/// Drops the fragment and the whole query string, then trailing slashes.
/// Query parameters are not part of job identity, so two postings that differ
/// only by a query-string id collapse into one.
pub fn normalize_url(url: &str) -> String {
    let mut url = url;

    if let Some(pos) = url.find('#') {
        url = &url[..pos];
    }
    if let Some(pos) = url.find('?') {
        url = &url[..pos];
    }

    url.trim()
        .trim_end_matches(|c: char| c == '/' || c.is_whitespace())
        .to_string()
}

/// Trim, lowercase and keep at most `max_chars` characters.
pub fn normalize_key(text: &str, max_chars: usize) -> String {
    text.trim().to_lowercase().chars().take(max_chars).collect()
}

/// Case-insensitive form of a skill name.
pub fn normalize_skill(skill: &str) -> String {
    skill.trim().to_lowercase()
}
