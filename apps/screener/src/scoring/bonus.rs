//! Bonus Evaluator: small additive points for extra signals, capped.
//!
//! Signals (each counted once, however often it appears):
//! - notable employer named
//! - certification keyword
//! - quantified achievement (`40%`, `$2m`, "reduced latency by 30")
//! - recognition (award, publication, patent)

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::scoring::params::ScoringParams;
use crate::scoring::tables::LookupLists;
use crate::scoring::terms::all_present;

lazy_static! {
    static ref PERCENT_RE: Regex = Regex::new(r"\d+(?:\.\d+)?\s*%").unwrap();
    static ref CURRENCY_RE: Regex = Regex::new(r"[$€£]\s?\d").unwrap();
    static ref CHANGE_BY_RE: Regex = Regex::new(
        r"\b(?:increased|reduced|decreased|improved|cut|grew|saved|boosted|lowered)\b[a-z0-9 ,\-]{0,40}?\bby\s+[$€£]?\d"
    )
    .unwrap();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusScore {
    pub score: f64,
    pub max: f64,
    pub employers: Vec<String>,
    pub certifications: Vec<String>,
    /// Text of every quantified-achievement match, in text order.
    pub achievements: Vec<String>,
    pub recognitions: Vec<String>,
}

impl BonusScore {
    /// Number of distinct signals that contributed points.
    pub fn signal_count(&self) -> usize {
        [
            !self.employers.is_empty(),
            !self.certifications.is_empty(),
            !self.achievements.is_empty(),
            !self.recognitions.is_empty(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

pub fn evaluate_bonus(text: &str, lists: &LookupLists, params: &ScoringParams) -> BonusScore {
    let employers = all_present(text, &lists.notable_employers);
    let certifications = all_present(text, &lists.certification_terms);
    let achievements = quantified_achievements(text);
    let recognitions = all_present(text, &lists.recognition_terms);

    let signals = [
        (employers.is_empty(), params.notable_employer_points),
        (certifications.is_empty(), params.certification_points),
        (achievements.is_empty(), params.quantified_achievement_points),
        (recognitions.is_empty(), params.recognition_points),
    ];
    let raw: f64 = signals
        .iter()
        .filter(|(absent, _)| !absent)
        .map(|(_, points)| points)
        .sum();

    BonusScore {
        score: raw.min(params.bonus_max),
        max: params.bonus_max,
        employers,
        certifications,
        achievements,
        recognitions,
    }
}

fn quantified_achievements(text: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = [&*PERCENT_RE, &*CURRENCY_RE, &*CHANGE_BY_RE]
        .iter()
        .flat_map(|re| re.find_iter(text))
        .map(|m| (m.start(), m.as_str().trim().to_string()))
        .collect();
    found.sort();
    found.dedup_by(|a, b| a.1 == b.1);
    found.into_iter().map(|(_, s)| s).collect()
}
