//! Batch scan. Scores every supported document in a directory.
//!
//! Each file is read with `tokio::fs`, then extracted and scored inside
//! `spawn_blocking` (PDF decoding is CPU-bound). Files run concurrently on a
//! `JoinSet`; the shared screener and its tables are read-only.
//!
//! Unreadable documents are skipped and recorded. An unknown profile aborts
//! the scan before any file is touched.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::errors::ScreeningError;
use crate::extraction::{extract_normalized, CandidateDocument, DocumentFormat};
use crate::scoring::aggregate::ScreeningResult;
use crate::scoring::screener::Screener;
use crate::screening::candidate::CandidateSummary;
use crate::screening::decision::DecisionPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedDocument {
    pub file_name: String,
    pub reason: String,
}

/// Aggregate numbers over the scored candidates. All zero for an empty batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    pub count: usize,
    pub average: f64,
    pub highest: f64,
    pub lowest: f64,
    /// Candidates at or above the review threshold.
    pub qualified: usize,
}

impl BatchStats {
    pub fn compute(candidates: &[CandidateSummary], policy: &DecisionPolicy) -> Self {
        let scores: Vec<f64> = candidates.iter().map(|c| c.composite).collect();
        if scores.is_empty() {
            return Self {
                count: 0,
                average: 0.0,
                highest: 0.0,
                lowest: 0.0,
                qualified: 0,
            };
        }
        Self {
            count: scores.len(),
            average: scores.iter().sum::<f64>() / scores.len() as f64,
            highest: scores.iter().copied().fold(f64::MIN, f64::max),
            lowest: scores.iter().copied().fold(f64::MAX, f64::min),
            qualified: scores.iter().filter(|s| policy.is_qualified(**s)).count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub position_profile: String,
    pub profile_display_name: String,
    pub backend: String,
    pub scanned_at: DateTime<Utc>,
    /// Ranked, best first.
    pub candidates: Vec<CandidateSummary>,
    pub skipped: Vec<SkippedDocument>,
    pub stats: BatchStats,
}

impl ScanReport {
    /// The `n` best-ranked candidates.
    pub fn top(&self, n: usize) -> &[CandidateSummary] {
        &self.candidates[..n.min(self.candidates.len())]
    }
}

pub async fn scan_directory(
    screener: Arc<dyn Screener>,
    policy: DecisionPolicy,
    dir: &Path,
    position_profile: &str,
) -> Result<ScanReport> {
    let profile = screener.profile(position_profile)?.clone();
    let files = list_documents(dir).await?;
    info!(
        dir = %dir.display(),
        profile = %profile.name,
        files = files.len(),
        "Starting batch scan"
    );

    let mut tasks = JoinSet::new();
    for path in files {
        let screener = Arc::clone(&screener);
        let profile_name = profile.name.clone();
        tasks.spawn(async move {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let outcome = score_file(screener, &path, &file_name, profile_name).await;
            (file_name, outcome)
        });
    }

    let mut candidates = Vec::new();
    let mut skipped = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (file_name, outcome) = joined.context("document scoring task panicked")?;
        match outcome {
            Ok((word_count, result)) => candidates.push(CandidateSummary::build(
                file_name,
                word_count,
                result,
                &profile,
                &policy,
            )),
            Err(ScreeningError::Parse(reason)) => {
                warn!(file = %file_name, %reason, "Skipping unreadable document");
                skipped.push(SkippedDocument { file_name, reason });
            }
            Err(err) => return Err(err.into()),
        }
    }

    rank(&mut candidates);
    skipped.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    let stats = BatchStats::compute(&candidates, &policy);

    info!(
        scored = stats.count,
        skipped = skipped.len(),
        qualified = stats.qualified,
        "Batch scan complete"
    );

    Ok(ScanReport {
        position_profile: profile.name.clone(),
        profile_display_name: profile.display_name.clone(),
        backend: screener.backend().to_string(),
        scanned_at: Utc::now(),
        candidates,
        skipped,
        stats,
    })
}

/// Composite descending; equal scores fall back to file name so output is stable.
fn rank(candidates: &mut [CandidateSummary]) {
    candidates.sort_by(|a, b| {
        b.composite
            .total_cmp(&a.composite)
            .then_with(|| a.file_name.cmp(&b.file_name))
    });
    for (i, candidate) in candidates.iter_mut().enumerate() {
        candidate.rank = i + 1;
    }
}

/// Regular files with a supported extension, sorted by path.
async fn list_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("cannot read directory {}", dir.display()))?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let supported = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(DocumentFormat::from_extension)
            .is_some();
        if supported && entry.file_type().await?.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

async fn score_file(
    screener: Arc<dyn Screener>,
    path: &Path,
    file_name: &str,
    profile_name: String,
) -> Result<(usize, ScreeningResult), ScreeningError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ScreeningError::parse(format!("cannot read '{file_name}': {e}")))?;
    let document = CandidateDocument::new(file_name, bytes)?;

    tokio::task::spawn_blocking(move || -> Result<(usize, ScreeningResult), ScreeningError> {
        let text = extract_normalized(&document)?;
        let word_count = text.split_whitespace().count();
        let result = screener.score(&text, &profile_name)?;
        Ok((word_count, result))
    })
    .await
    .map_err(|e| ScreeningError::parse(format!("extraction of '{file_name}' aborted: {e}")))?
}
