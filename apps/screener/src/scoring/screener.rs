//! Screener trait, the one operation the core exposes: `score(text, profile)`.
//!
//! Default: `RuleBasedScreener` (deterministic, no I/O, fully testable).
//!
//! `AppState` holds an `Arc<dyn Screener>`; the batch scanner shares the same
//! instance across worker tasks.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::errors::ScreeningError;
use crate::extraction::{extract_normalized, normalize_text, CandidateDocument};
use crate::scoring::aggregate::{aggregate, ScreeningResult};
use crate::scoring::bonus::evaluate_bonus;
use crate::scoring::education::evaluate_education;
use crate::scoring::experience::evaluate_experience;
use crate::scoring::skills::match_skills;
use crate::scoring::tables::{PositionProfile, ScoringTables};

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching handlers or the
/// batch scanner.
pub trait Screener: Send + Sync {
    /// Scores already-extracted text against a named position profile.
    fn score(
        &self,
        document_text: &str,
        position_profile: &str,
    ) -> Result<ScreeningResult, ScreeningError>;

    /// Short label reported alongside results, e.g. `"rule_based"`.
    fn backend(&self) -> &'static str;

    /// Looks up a profile by name; unknown names are a `Configuration` error.
    fn profile(&self, name: &str) -> Result<&PositionProfile, ScreeningError>;

    /// Profiles this screener can score against.
    fn profiles(&self) -> Vec<&PositionProfile>;

    /// Highest composite this screener can produce.
    fn composite_ceiling(&self) -> f64;

    /// Extracts the document's text, then scores it.
    fn score_document(
        &self,
        document: &CandidateDocument,
        position_profile: &str,
    ) -> Result<ScreeningResult, ScreeningError> {
        let text = extract_normalized(document)?;
        self.score(&text, position_profile)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// RuleBasedScreener: default implementation
// ────────────────────────────────────────────────────────────────────────────

/// Keyword, heuristic and regex pipeline over static lookup tables.
///
/// The evaluation date ("present" in date ranges) is fixed at construction,
/// so identical inputs always produce identical results.
#[derive(Debug, Clone)]
pub struct RuleBasedScreener {
    tables: Arc<ScoringTables>,
    evaluation_date: NaiveDate,
}

impl RuleBasedScreener {
    pub const BACKEND: &'static str = "rule_based";

    pub fn new(tables: Arc<ScoringTables>, evaluation_date: NaiveDate) -> Self {
        Self {
            tables,
            evaluation_date,
        }
    }
}

impl Screener for RuleBasedScreener {
    fn score(
        &self,
        document_text: &str,
        position_profile: &str,
    ) -> Result<ScreeningResult, ScreeningError> {
        let profile = self.tables.profile(position_profile)?;
        let params = &self.tables.params;
        let lists = &self.tables.lists;

        // normalizing is idempotent, so extracted text passes through unchanged
        let text = normalize_text(document_text);

        let skills = match_skills(&text, profile, params);
        let experience = evaluate_experience(&text, lists, params, self.evaluation_date);
        let education = evaluate_education(&text, lists, params);
        let bonus = evaluate_bonus(&text, lists, params);

        let result = aggregate(profile, skills, experience, education, bonus);
        debug!(
            profile = %profile.name,
            composite = result.breakdown.total,
            skills = result.breakdown.skills.score,
            experience = result.breakdown.experience.score,
            education = result.breakdown.education.score,
            bonus = result.breakdown.bonus.score,
            bonus_signals = result.breakdown.bonus.signal_count(),
            "Scored document"
        );
        Ok(result)
    }

    fn backend(&self) -> &'static str {
        Self::BACKEND
    }

    fn profile(&self, name: &str) -> Result<&PositionProfile, ScreeningError> {
        self.tables.profile(name)
    }

    fn profiles(&self) -> Vec<&PositionProfile> {
        self.tables.profiles().collect()
    }

    fn composite_ceiling(&self) -> f64 {
        self.tables.params.composite_ceiling()
    }
}
