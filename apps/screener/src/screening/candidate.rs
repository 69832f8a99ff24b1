//! Per-candidate view used by batch reports: decision, position match,
//! categories and a short recommendation reason on top of a `ScreeningResult`.

use serde::{Deserialize, Serialize};

use crate::scoring::aggregate::ScreeningResult;
use crate::scoring::tables::PositionProfile;
use crate::screening::decision::{Decision, DecisionPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Developer")]
    Developer,
    #[serde(rename = "Cloud/DevOps")]
    CloudDevOps,
    #[serde(rename = "Data Science")]
    DataScience,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Developer,
        Category::CloudDevOps,
        Category::DataScience,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Developer => "Developer",
            Category::CloudDevOps => "Cloud/DevOps",
            Category::DataScience => "Data Science",
        }
    }

    /// Any one of these matched puts a candidate in the category.
    fn signal_skills(&self) -> &'static [&'static str] {
        match self {
            Category::Developer => &["python", "java", "javascript"],
            Category::CloudDevOps => &["aws", "docker", "kubernetes", "cloud"],
            Category::DataScience => &["machine learning", "ai", "tensorflow", "pytorch"],
        }
    }

    /// Profiles for which membership in this category is a selling point.
    fn strong_for(&self) -> &'static [&'static str] {
        match self {
            Category::Developer => &["software_engineer", "full_stack"],
            Category::CloudDevOps => &["devops"],
            Category::DataScience => &["data_scientist"],
        }
    }

    fn strength(&self) -> &'static str {
        match self {
            Category::Developer => "Strong developer profile",
            Category::CloudDevOps => "Strong DevOps/cloud expertise",
            Category::DataScience => "Strong data science background",
        }
    }
}

pub fn categorize(matched_skills: &[String]) -> Vec<Category> {
    Category::ALL
        .into_iter()
        .filter(|c| {
            c.signal_skills()
                .iter()
                .any(|s| matched_skills.iter().any(|m| m == s))
        })
        .collect()
}

/// Share of the profile's required skills present, as a whole percentage.
/// Profiles without required skills match 0%.
pub fn position_match(matched_skills: &[String], required_skills: &[String]) -> u32 {
    if required_skills.is_empty() {
        return 0;
    }
    let hits = required_skills
        .iter()
        .filter(|r| matched_skills.contains(r))
        .count();
    let pct = (hits as f64 / required_skills.len() as f64 * 100.0).round();
    pct.min(100.0) as u32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSummary {
    /// 1-based position after ranking; 0 until ranked.
    pub rank: usize,
    pub file_name: String,
    pub composite: f64,
    pub decision: Decision,
    pub position_match: u32,
    pub years_experience: f64,
    pub categories: Vec<Category>,
    pub word_count: usize,
    pub recommendation: String,
    pub result: ScreeningResult,
}

impl CandidateSummary {
    pub fn build(
        file_name: impl Into<String>,
        word_count: usize,
        result: ScreeningResult,
        profile: &PositionProfile,
        policy: &DecisionPolicy,
    ) -> Self {
        let composite = result.composite();
        let decision = policy.decide(composite);
        let position_match = position_match(&result.matched_skills, &profile.required_skills);
        let years_experience = result.breakdown.experience.years;
        let categories = categorize(&result.matched_skills);
        let recommendation = recommendation_reason(
            decision,
            position_match,
            years_experience,
            &categories,
            &profile.name,
        );

        Self {
            rank: 0,
            file_name: file_name.into(),
            composite,
            decision,
            position_match,
            years_experience,
            categories,
            word_count,
            recommendation,
            result,
        }
    }

    pub fn category_labels(&self) -> String {
        if self.categories.is_empty() {
            return "General".to_string();
        }
        self.categories
            .iter()
            .map(Category::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn recommendation_reason(
    decision: Decision,
    position_match: u32,
    years: f64,
    categories: &[Category],
    profile_name: &str,
) -> String {
    let mut reasons = Vec::new();

    match decision {
        Decision::Accept => reasons.push("High overall score"),
        Decision::Review => reasons.push("Good overall score"),
        Decision::Reject => {}
    }

    if position_match >= 80 {
        reasons.push("Excellent skill match for position");
    } else if position_match >= 60 {
        reasons.push("Good skill match");
    }

    if years >= 5.0 {
        reasons.push("Significant experience");
    } else if years >= 3.0 {
        reasons.push("Adequate experience");
    }

    for category in categories {
        if category.strong_for().contains(&profile_name) {
            reasons.push(category.strength());
        }
    }

    if reasons.is_empty() {
        "Meets basic requirements".to_string()
    } else {
        reasons.join("; ")
    }
}
