//! Score Aggregator: sums the four capped sub-scores into the composite.

use serde::{Deserialize, Serialize};

use crate::scoring::bonus::BonusScore;
use crate::scoring::education::EducationScore;
use crate::scoring::experience::ExperienceScore;
use crate::scoring::skills::SkillScore;
use crate::scoring::tables::PositionProfile;

/// Matched skills named in the summary line.
pub const SUMMARY_TOP_SKILLS: usize = 3;

/// The four sub-scores and their sum. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skills: SkillScore,
    pub experience: ExperienceScore,
    pub education: EducationScore,
    pub bonus: BonusScore,
    /// Composite 0–100, always `skills + experience + education + bonus`.
    pub total: f64,
}

impl ScoreBreakdown {
    fn new(
        skills: SkillScore,
        experience: ExperienceScore,
        education: EducationScore,
        bonus: BonusScore,
    ) -> Self {
        let total = skills.score + experience.score + education.score + bonus.score;
        Self {
            skills,
            experience,
            education,
            bonus,
            total,
        }
    }
}

/// The unit handed to every caller: CLI, HTTP, batch reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    pub profile: String,
    pub profile_display_name: String,
    pub breakdown: ScoreBreakdown,
    pub summary: String,
    pub matched_skills: Vec<String>,
}

impl ScreeningResult {
    pub fn composite(&self) -> f64 {
        self.breakdown.total
    }
}

pub fn aggregate(
    profile: &PositionProfile,
    skills: SkillScore,
    experience: ExperienceScore,
    education: EducationScore,
    bonus: BonusScore,
) -> ScreeningResult {
    let matched_skills = skills.matched_names();
    let breakdown = ScoreBreakdown::new(skills, experience, education, bonus);
    let summary = summarize(&profile.display_name, &breakdown);

    ScreeningResult {
        profile: profile.name.clone(),
        profile_display_name: profile.display_name.clone(),
        breakdown,
        summary,
        matched_skills,
    }
}

fn summarize(display_name: &str, breakdown: &ScoreBreakdown) -> String {
    let top = breakdown.skills.top_skills(SUMMARY_TOP_SKILLS);
    let top = if top.is_empty() {
        "none matched".to_string()
    } else {
        top.join(", ")
    };
    format!(
        "{display_name}: {:.1}/100. Top skills: {top}.",
        breakdown.total
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::bonus::evaluate_bonus;
    use crate::scoring::education::evaluate_education;
    use crate::scoring::experience::evaluate_experience;
    use crate::scoring::params::COMPOSITE_MAX;
    use crate::scoring::skills::match_skills;
    use crate::scoring::tables::ScoringTables;
    use chrono::NaiveDate;

    fn run(text: &str, profile: &str) -> ScreeningResult {
        let tables = ScoringTables::builtin().unwrap();
        let profile = tables.profile(profile).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        aggregate(
            profile,
            match_skills(text, profile, &tables.params),
            evaluate_experience(text, &tables.lists, &tables.params, date),
            evaluate_education(text, &tables.lists, &tables.params),
            evaluate_bonus(text, &tables.lists, &tables.params),
        )
    }

    #[test]
    fn test_total_is_sum_of_sub_scores() {
        let result = run(
            "lead engineer, 6 years experience, python aws docker, bs in cs, 30% faster builds",
            "software_engineer",
        );
        let b = &result.breakdown;
        assert_eq!(
            b.total,
            b.skills.score + b.experience.score + b.education.score + b.bonus.score
        );
    }

    #[test]
    fn test_saturated_resume_stays_in_range() {
        let text = "principal engineer, 25 years of experience. phd, stanford. ex-google, \
                    certified, award, cut costs by 40%. python java javascript aws docker \
                    kubernetes sql react node.js tensorflow pytorch machine learning ai cloud";
        for profile in ["software_engineer", "data_scientist", "devops", "full_stack"] {
            let total = run(text, profile).composite();
            assert!((0.0..=COMPOSITE_MAX).contains(&total), "{profile}: {total}");
        }
    }

    #[test]
    fn test_empty_text_scores_zero() {
        let result = run("", "software_engineer");
        assert_eq!(result.composite(), 0.0);
        assert!(result.matched_skills.is_empty());
        assert!(result.summary.contains("none matched"));
    }

    #[test]
    fn test_summary_names_profile_score_and_top_skills() {
        let result = run("git, python, aws, kubernetes", "software_engineer");
        assert!(result.summary.starts_with("Software Engineer: "));
        assert!(result.summary.contains(&format!("{:.1}/100", result.composite())));
        assert!(result.summary.ends_with("Top skills: aws, python, kubernetes."));
    }

    #[test]
    fn test_matched_skills_in_table_order() {
        let result = run("docker and python", "software_engineer");
        assert_eq!(result.matched_skills, vec!["python", "docker"]);
        assert_eq!(result.profile, "software_engineer");
    }
}
