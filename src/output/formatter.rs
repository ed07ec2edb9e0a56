//! Output formatters for ranking reports

use crate::config::OutputFormat;
use crate::error::{JobSignalError, Result};
use crate::output::report::*;
use colored::{Color, Colorize};
use serde::Serialize;
use std::path::Path;

/// Renders a report in one output format.
///
/// Implementations must keep `report.results` in the given order.
pub trait OutputFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// One CSV row per ranked job
pub struct CsvFormatter;

/// Report generator that coordinates the different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    csv_formatter: CsvFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };
        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, percentage: u8) -> String {
        let (badge, color) = match percentage {
            80..=100 => ("STRONG", Color::Green),
            65..=79 => ("GOOD", Color::BrightGreen),
            50..=64 => ("FAIR", Color::Yellow),
            _ => ("WEAK", Color::Red),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_entry(&self, entry: &RankedJobEntry) -> String {
        let mut output = String::new();
        let company = entry.company.as_deref().unwrap_or("Unknown company");

        output.push_str(&format!(
            "{:>3}. {} {} {}% {}\n",
            entry.rank,
            self.colorize(&entry.title, Color::Cyan),
            self.colorize(&format!("@ {}", company), Color::White),
            entry.score_percentage(),
            self.format_score_badge(entry.score_percentage())
        ));
        output.push_str(&format!(
            "     📍 {} | 🕒 {} | 🔗 {}\n",
            entry.location.as_deref().unwrap_or("n/a"),
            format_age(entry.posted_days_ago),
            entry.source_url
        ));

        if self.detailed {
            output.push_str(&format!(
                concat!(
                    "     embedding {:.2} | location {:.2} | recency {:.2}",
                    " | skills {:.2} | source {}\n"
                ),
                entry.breakdown.embedding,
                entry.breakdown.location,
                entry.breakdown.recency,
                entry.breakdown.skill_overlap,
                entry.source
            ));
            if !entry.skills.is_empty() {
                output.push_str(&format!("     Skills: {}\n", entry.skills.join(", ")));
            }
            if let Some(salary) = &entry.salary {
                output.push_str(&format!("     Salary: {}\n", salary));
            }
            if let Some(summary) = &entry.description_summary {
                output.push_str(&format!("     {}\n", summary));
            }
        }
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("🎯 JOB SIGNAL RANKING", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms | Model: {}\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms,
            report.metadata.embedding_model
        ));
        output.push_str(&format!(
            "Jobs: {} loaded, {} after dedup, {} after filters\n",
            report.summary.jobs_loaded,
            report.summary.jobs_after_dedup,
            report.summary.jobs_after_filters
        ));

        output.push_str(&self.format_header("Top Matches", 2));
        if report.results.is_empty() {
            output.push_str(
                &self.colorize("  No jobs matched the current filters.\n", Color::Yellow),
            );
        }
        for entry in &report.results {
            output.push_str(&self.format_entry(entry));
        }

        if !report.skill_gaps.is_empty() {
            output.push_str(&self.format_header("📚 Skill Gaps", 2));
            for skill in &report.skill_gaps.missing_skills {
                output.push_str(&format!("  • {}\n", self.colorize(skill, Color::Yellow)));
            }
        }

        if self.detailed && !report.top_skills.is_empty() {
            output.push_str(&self.format_header("Most Requested Skills", 3));
            for freq in &report.top_skills {
                output.push_str(&format!("  {:<24} {}\n", freq.skill, freq.count));
            }
        }

        if self.detailed {
            let weights = &report.summary.weights;
            output.push_str(&self.format_header("Weights", 3));
            output.push_str(&format!(
                "  embedding {:.2} | location {:.2} | recency {:.2} | skills {:.2}\n",
                weights.embedding, weights.location, weights.recency, weights.skill_overlap
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    /// Pipes and newlines would break a table row
    fn cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# 🎯 Job Signal Ranking\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms | **Model:** `{}`\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms,
                report.metadata.embedding_model
            ));
            output.push_str(&format!(
                "**Jobs:** `{}` | **Profile:** `{}`\n\n",
                file_name(&report.metadata.jobs_file),
                file_name(&report.metadata.profile_file)
            ));
        }

        output.push_str("## Top Matches\n\n");
        if report.results.is_empty() {
            output.push_str("_No jobs matched the current filters._\n\n");
        } else {
            output.push_str("| # | Score | Title | Company | Location | Posted | Link |\n");
            output.push_str("|---|-------|-------|---------|----------|--------|------|\n");
            for entry in &report.results {
                output.push_str(&format!(
                    "| {} | {}% | {} | {} | {} | {} | [link]({}) |\n",
                    entry.rank,
                    entry.score_percentage(),
                    Self::cell(&entry.title),
                    Self::cell(entry.company.as_deref().unwrap_or("")),
                    Self::cell(entry.location.as_deref().unwrap_or("")),
                    format_age(entry.posted_days_ago),
                    entry.source_url
                ));
            }
            output.push('\n');
        }

        if !report.skill_gaps.is_empty() {
            output.push_str("## Skill Gaps\n\n");
            for skill in &report.skill_gaps.missing_skills {
                output.push_str(&format!("- {}\n", skill));
            }
            output.push('\n');
        }

        if !report.top_skills.is_empty() {
            output.push_str("## Most Requested Skills\n\n");
            for freq in &report.top_skills {
                output.push_str(&format!("- {} ({})\n", freq.skill, freq.count));
            }
            output.push('\n');
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    rank: usize,
    score: f32,
    embedding: f32,
    location_score: f32,
    recency: f32,
    skill_overlap: f32,
    title: &'a str,
    company: &'a str,
    location: &'a str,
    source: &'a str,
    posted_days_ago: Option<u32>,
    skills: String,
    source_url: &'a str,
}

impl OutputFormatter for CsvFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for entry in &report.results {
            writer.serialize(CsvRow {
                rank: entry.rank,
                score: entry.score,
                embedding: entry.breakdown.embedding,
                location_score: entry.breakdown.location,
                recency: entry.breakdown.recency,
                skill_overlap: entry.breakdown.skill_overlap,
                title: &entry.title,
                company: entry.company.as_deref().unwrap_or(""),
                location: entry.location.as_deref().unwrap_or(""),
                source: &entry.source,
                posted_days_ago: entry.posted_days_ago,
                skills: entry.skills.join("; "),
                source_url: &entry.source_url,
            })?;
        }

        let bytes = writer.into_inner().map_err(|e| {
            JobSignalError::OutputFormatting(format!("Failed to flush CSV output: {}", e))
        })?;
        String::from_utf8(bytes).map_err(|e| JobSignalError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Csv
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
            csv_formatter: CsvFormatter,
        }
    }

    pub fn generate_report(&self, report: &RankingReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Csv => self.csv_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

/// Write any serializable records as pretty JSON
pub fn save_json<T: Serialize + ?Sized>(records: &T, file_path: &Path) -> Result<()> {
    save_report_to_file(&serde_json::to_string_pretty(records)?, file_path)
}

pub fn suggest_filename(format: OutputFormat, base_name: &str, timestamp: bool) -> String {
    let stem = Path::new(base_name).file_stem().unwrap_or_default().to_string_lossy();
    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Csv => "csv",
    };
    format!("{}_ranking{}.{}", stem, timestamp_suffix, extension)
}

fn format_age(posted_days_ago: Option<u32>) -> String {
    match posted_days_ago {
        None => "date unknown".to_string(),
        Some(0) => "today".to_string(),
        Some(1) => "1 day ago".to_string(),
        Some(days) => format!("{} days ago", days),
    }
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}
