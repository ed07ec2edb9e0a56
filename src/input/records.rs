//! Decoding of JSON and JSON Lines record files

use crate::error::{JobSignalError, Result};
use crate::input::file_detector::FileType;
use serde::de::DeserializeOwned;

/// Decode every record in `content`.
///
/// JSON files must hold an array. JSON Lines files hold one record per
/// line; blank lines are skipped.
pub fn parse_records<T: DeserializeOwned>(
    content: &str,
    file_type: FileType,
    origin: &str,
) -> Result<Vec<T>> {
    match file_type {
        FileType::Json => serde_json::from_str(content).map_err(|e| {
            JobSignalError::InvalidInput(format!(
                "{}: expected a JSON array of records: {}",
                origin, e
            ))
        }),
        FileType::JsonLines => content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|e| {
                    JobSignalError::InvalidInput(format!("{}:{}: {}", origin, index + 1, e))
                })
            })
            .collect(),
        FileType::Unknown => Err(JobSignalError::UnsupportedFormat(format!(
            "Unsupported file type for: {}",
            origin
        ))),
    }
}

/// Decode a single record: the object of a JSON file, or the first
/// non-blank line of a JSON Lines file.
pub fn parse_single<T: DeserializeOwned>(
    content: &str,
    file_type: FileType,
    origin: &str,
) -> Result<T> {
    match file_type {
        FileType::Json => serde_json::from_str(content).map_err(|e| {
            JobSignalError::InvalidInput(format!("{}: expected a JSON object: {}", origin, e))
        }),
        FileType::JsonLines => {
            let line = content
                .lines()
                .find(|line| !line.trim().is_empty())
                .ok_or_else(|| {
                    JobSignalError::InvalidInput(format!("{}: file is empty", origin))
                })?;
            serde_json::from_str(line)
                .map_err(|e| JobSignalError::InvalidInput(format!("{}: {}", origin, e)))
        }
        FileType::Unknown => Err(JobSignalError::UnsupportedFormat(format!(
            "Unsupported file type for: {}",
            origin
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CandidateProfile, RawSignal};

    #[test]
    fn test_json_array() {
        let content = r#"[
            {"source": "indeed", "url": "https://x.com/1"},
            {"source": "indeed", "url": "https://x.com/2"}
        ]"#;
        let signals: Vec<RawSignal> =
            parse_records(content, FileType::Json, "signals.json").unwrap();
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[1].url, "https://x.com/2");
        assert!(signals[0].title_snippet.is_empty());
    }

    #[test]
    fn test_json_lines_skip_blank_lines_and_report_line_numbers() {
        let content = concat!(
            "{\"source\": \"a\", \"url\": \"u1\"}\n",
            "\n   \n",
            "{\"source\": \"b\", \"url\": \"u2\"}\n",
        );
        let signals: Vec<RawSignal> =
            parse_records(content, FileType::JsonLines, "s.jsonl").unwrap();
        assert_eq!(signals.len(), 2);

        let broken = "{\"source\": \"a\", \"url\": \"u1\"}\nnot json\n";
        let err = parse_records::<RawSignal>(broken, FileType::JsonLines, "s.jsonl").unwrap_err();
        assert!(err.to_string().contains("s.jsonl:2"));
    }

    #[test]
    fn test_single_object() {
        let profile: CandidateProfile = parse_single(
            r#"{"skills": ["Rust"], "domain": "backend"}"#,
            FileType::Json,
            "p.json",
        )
        .unwrap();
        assert_eq!(profile.skills, vec!["Rust"]);
        assert!(profile.tools.is_empty());

        assert!(parse_single::<CandidateProfile>("\n\n", FileType::JsonLines, "p.jsonl").is_err());
        assert!(matches!(
            parse_single::<CandidateProfile>("{}", FileType::Unknown, "p.txt"),
            Err(JobSignalError::UnsupportedFormat(_))
        ));
    }
}
