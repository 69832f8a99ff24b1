//! Education Evaluator: highest degree level plus a top-university bonus, capped.

use serde::{Deserialize, Serialize};

use crate::scoring::params::ScoringParams;
use crate::scoring::tables::LookupLists;
use crate::scoring::terms::{all_present, first_present};

/// Degree levels in ascending precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegreeLevel {
    None,
    Associate,
    Bachelor,
    Master,
    Phd,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationScore {
    pub score: f64,
    pub max: f64,
    pub degree: DegreeLevel,
    /// The keyword that established the degree level.
    pub degree_term: Option<String>,
    pub universities: Vec<String>,
    pub base_score: f64,
    pub university_bonus: f64,
}

pub fn evaluate_education(
    text: &str,
    lists: &LookupLists,
    params: &ScoringParams,
) -> EducationScore {
    let terms = &lists.degree_terms;
    let ladder = [
        (DegreeLevel::Phd, &terms.phd, params.phd_score),
        (DegreeLevel::Master, &terms.master, params.master_score),
        (DegreeLevel::Bachelor, &terms.bachelor, params.bachelor_score),
        (DegreeLevel::Associate, &terms.associate, params.associate_score),
    ];

    let (degree, degree_term, base_score) = ladder
        .iter()
        .find_map(|(level, keywords, score)| {
            first_present(text, keywords).map(|term| (*level, Some(term.to_string()), *score))
        })
        .unwrap_or((DegreeLevel::None, None, 0.0));

    let universities = all_present(text, &lists.top_universities);
    let university_bonus = if universities.is_empty() {
        0.0
    } else {
        params.top_university_bonus
    };

    EducationScore {
        score: (base_score + university_bonus).min(params.education_max),
        max: params.education_max,
        degree,
        degree_term,
        universities,
        base_score,
        university_bonus,
    }
}
