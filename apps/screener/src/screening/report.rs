//! Renders a `ScanReport` as a fixed-width table, CSV or pretty JSON.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::screening::batch::ScanReport;

/// Candidates listed under "Recommendations" in the table view.
const RECOMMENDED: usize = 3;
/// Skills shown per row in the table view.
const TABLE_SKILLS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Table,
    Csv,
    Json,
}

pub fn render(report: &ScanReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Table => Ok(render_table(report)),
        ReportFormat::Csv => render_csv(report),
        ReportFormat::Json => {
            serde_json::to_string_pretty(report).context("failed to serialize scan report")
        }
    }
}

pub const CSV_HEADER: [&str; 14] = [
    "rank",
    "file_name",
    "composite",
    "decision",
    "skills",
    "experience",
    "education",
    "bonus",
    "years_experience",
    "position_match",
    "categories",
    "matched_skills",
    "word_count",
    "recommendation",
];

pub fn render_csv(report: &ScanReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for c in &report.candidates {
        let b = &c.result.breakdown;
        writer.write_record([
            c.rank.to_string(),
            c.file_name.clone(),
            format!("{:.1}", c.composite),
            c.decision.to_string(),
            format!("{:.1}", b.skills.score),
            format!("{:.1}", b.experience.score),
            format!("{:.1}", b.education.score),
            format!("{:.1}", b.bonus.score),
            format!("{:.1}", c.years_experience),
            c.position_match.to_string(),
            c.category_labels(),
            c.result.matched_skills.join("; "),
            c.word_count.to_string(),
            c.recommendation.clone(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV writer: {e}"))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

pub fn render_table(report: &ScanReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Screening for {} ({}), {} candidate(s)",
        report.profile_display_name, report.position_profile, report.stats.count
    );
    let _ = writeln!(out);

    if report.candidates.is_empty() {
        let _ = writeln!(out, "No documents scored.");
    } else {
        let _ = writeln!(
            out,
            "{:>4}  {:<28} {:>6}  {:<8} {:>6} {:>6}  {:<28} {}",
            "#", "File", "Score", "Decision", "Match", "Years", "Categories", "Top skills"
        );
        let _ = writeln!(out, "{}", "-".repeat(110));
        for c in &report.candidates {
            let skills: Vec<&str> = c
                .result
                .matched_skills
                .iter()
                .take(TABLE_SKILLS)
                .map(String::as_str)
                .collect();
            let skills = if skills.is_empty() {
                "-".to_string()
            } else {
                skills.join(", ")
            };
            let _ = writeln!(
                out,
                "{:>4}  {:<28} {:>6.1}  {:<8} {:>5}% {:>6.1}  {:<28} {}",
                c.rank,
                truncate(&c.file_name, 28),
                c.composite,
                c.decision.as_str(),
                c.position_match,
                c.years_experience,
                truncate(&c.category_labels(), 28),
                skills
            );
        }
    }

    let stats = &report.stats;
    let _ = writeln!(out);
    let _ = writeln!(out, "Statistics");
    let _ = writeln!(out, "  Average score:  {:.1}/100", stats.average);
    let _ = writeln!(out, "  Highest score:  {:.1}/100", stats.highest);
    let _ = writeln!(out, "  Lowest score:   {:.1}/100", stats.lowest);
    let _ = writeln!(out, "  Qualified:      {}/{}", stats.qualified, stats.count);

    if !report.candidates.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Recommendations");
        for c in report.top(RECOMMENDED) {
            let _ = writeln!(
                out,
                "  {}. {} ({:.1}/100): {}",
                c.rank, c.file_name, c.composite, c.recommendation
            );
        }
    }

    if !report.skipped.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Skipped ({})", report.skipped.len());
        for s in &report.skipped {
            let _ = writeln!(out, "  {}: {}", s.file_name, s.reason);
        }
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}
