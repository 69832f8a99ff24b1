//! Skill Matcher: weighted keyword presence, capped and rescaled to 0–30.
//!
//! Algorithm:
//! 1. For each keyword in the profile's table (table order), test bounded presence.
//! 2. raw = Σ weights of present keywords (+ focus points if the profile's focus rule fires).
//! 3. score = min(raw, ceiling) / ceiling × skills_max
//!
//! Presence, not frequency: repeating a keyword never raises the score.

use serde::{Deserialize, Serialize};

use crate::scoring::params::ScoringParams;
use crate::scoring::tables::PositionProfile;
use crate::scoring::terms::contains_term;

/// A keyword found in the text with the weight it contributed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillHit {
    pub skill: String,
    pub weight: u32,
}

/// Skills sub-score with its evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillScore {
    pub score: f64,
    pub max: f64,
    /// Sum of matched weights plus focus points, before the ceiling.
    pub raw_points: u32,
    pub ceiling: f64,
    /// Matched keywords in table order.
    pub matched: Vec<SkillHit>,
    pub focus_bonus_applied: bool,
}

impl SkillScore {
    pub fn matched_names(&self) -> Vec<String> {
        self.matched.iter().map(|h| h.skill.clone()).collect()
    }

    /// Up to `n` matched skills, heaviest first; equal weights keep table order.
    pub fn top_skills(&self, n: usize) -> Vec<&str> {
        let mut hits: Vec<&SkillHit> = self.matched.iter().collect();
        hits.sort_by(|a, b| b.weight.cmp(&a.weight));
        hits.into_iter().take(n).map(|h| h.skill.as_str()).collect()
    }
}

pub fn match_skills(text: &str, profile: &PositionProfile, params: &ScoringParams) -> SkillScore {
    let matched: Vec<SkillHit> = profile
        .keywords
        .iter()
        .filter(|kw| contains_term(text, &kw.term))
        .map(|kw| SkillHit {
            skill: kw.term.clone(),
            weight: kw.weight,
        })
        .collect();

    let mut raw_points = matched
        .iter()
        .fold(0u32, |acc, h| acc.saturating_add(h.weight));

    let focus_bonus_applied = profile.focus.as_ref().is_some_and(|focus| {
        let hits = focus
            .skills
            .iter()
            .filter(|s| matched.iter().any(|h| &h.skill == *s))
            .count();
        hits >= focus.min_matches
    });
    if focus_bonus_applied {
        raw_points = raw_points.saturating_add(profile.focus.as_ref().map_or(0, |f| f.bonus_points));
    }

    let ceiling = params.skill_raw_ceiling;
    let score = (f64::from(raw_points).min(ceiling) / ceiling) * params.skills_max;

    SkillScore {
        score,
        max: params.skills_max,
        raw_points,
        ceiling,
        matched,
        focus_bonus_applied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::tables::{FocusRule, KeywordWeightTable, ScoringTables};

    fn custom_profile(pairs: &[(&str, u32)], focus: Option<FocusRule>) -> PositionProfile {
        PositionProfile {
            name: "custom".to_string(),
            display_name: "Custom".to_string(),
            keywords: KeywordWeightTable::from_pairs(pairs).unwrap(),
            required_skills: vec![],
            focus,
        }
    }

    fn builtin(name: &str) -> PositionProfile {
        ScoringTables::builtin().unwrap().profile(name).unwrap().clone()
    }

    #[test]
    fn test_empty_text_scores_zero() {
        let result = match_skills("", &builtin("software_engineer"), &ScoringParams::default());
        assert_eq!(result.score, 0.0);
        assert!(result.matched.is_empty());
        assert_eq!(result.raw_points, 0);
    }

    #[test]
    fn test_repetition_does_not_raise_score() {
        let profile = builtin("software_engineer");
        let params = ScoringParams::default();
        let once = match_skills("python developer", &profile, &params);
        let thrice = match_skills("python python python developer", &profile, &params);
        assert_eq!(once.score, thrice.score);
        assert_eq!(once.matched, thrice.matched);
    }

    #[test]
    fn test_matched_in_table_order() {
        let result = match_skills(
            "docker, aws and python",
            &builtin("software_engineer"),
            &ScoringParams::default(),
        );
        assert_eq!(result.matched_names(), vec!["python", "aws", "docker"]);
    }

    #[test]
    fn test_linear_rescale() {
        let profile = custom_profile(&[("rust", 25), ("go", 10)], None);
        let result = match_skills("rust engineer", &profile, &ScoringParams::default());
        // 25 / 50 * 30
        assert!((result.score - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_exact_ceiling_saturates_at_max() {
        let profile = custom_profile(&[("rust", 30), ("go", 20), ("zig", 5)], None);
        let result = match_skills("rust and go", &profile, &ScoringParams::default());
        assert_eq!(result.raw_points, 50);
        assert_eq!(result.score, 30.0);
    }

    #[test]
    fn test_builtin_table_exact_ceiling() {
        // 12 + 12 + 10 + 8 + 4 + 4 = 50 raw points, none of them required skills
        let result = match_skills(
            "machine learning, ai, kubernetes, cloud, mongodb, flask",
            &builtin("software_engineer"),
            &ScoringParams::default(),
        );
        assert_eq!(result.raw_points, 50);
        assert_eq!(result.score, 30.0);
    }

    #[test]
    fn test_above_ceiling_does_not_overflow() {
        let profile = custom_profile(&[("rust", 40), ("go", 40)], None);
        let result = match_skills("rust go", &profile, &ScoringParams::default());
        assert_eq!(result.raw_points, 80);
        assert_eq!(result.score, 30.0);
    }

    #[test]
    fn test_raw_points_saturate_instead_of_wrapping() {
        // unvalidated table, as deserialized
        let keywords: KeywordWeightTable = serde_json::from_value(serde_json::json!([
            {"term": "rust", "weight": u32::MAX},
            {"term": "go", "weight": u32::MAX}
        ]))
        .unwrap();
        let profile = PositionProfile {
            name: "custom".to_string(),
            display_name: "Custom".to_string(),
            keywords,
            required_skills: vec![],
            focus: None,
        };
        let result = match_skills("rust go", &profile, &ScoringParams::default());
        assert_eq!(result.raw_points, u32::MAX);
        assert_eq!(result.score, 30.0);
    }

    #[test]
    fn test_focus_rule_adds_raw_points() {
        let focus = FocusRule {
            skills: vec!["rust".to_string(), "go".to_string()],
            min_matches: 2,
            bonus_points: 5,
        };
        let profile = custom_profile(&[("rust", 10), ("go", 10)], Some(focus));
        let params = ScoringParams::default();

        let both = match_skills("rust go", &profile, &params);
        assert!(both.focus_bonus_applied);
        assert_eq!(both.raw_points, 25);

        let one = match_skills("rust", &profile, &params);
        assert!(!one.focus_bonus_applied);
        assert_eq!(one.raw_points, 10);
    }

    #[test]
    fn test_devops_focus_fires_with_three_cloud_skills() {
        let result = match_skills(
            "aws docker kubernetes",
            &builtin("devops"),
            &ScoringParams::default(),
        );
        assert!(result.focus_bonus_applied);
        // 12 + 10 + 12 + 5
        assert_eq!(result.raw_points, 39);
    }

    #[test]
    fn test_top_skills_by_weight() {
        let result = match_skills(
            "python, git, aws, kubernetes",
            &builtin("software_engineer"),
            &ScoringParams::default(),
        );
        // aws 12, python 10, kubernetes 10, git 4
        assert_eq!(result.top_skills(3), vec!["aws", "python", "kubernetes"]);
    }
}
