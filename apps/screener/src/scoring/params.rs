use serde::{Deserialize, Serialize};

use crate::errors::ScreeningError;

/// Composite scores never exceed this.
pub const COMPOSITE_MAX: f64 = 100.0;

/// One step of the years-to-score mapping: at least `min_years` earns `score`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExperienceStep {
    pub min_years: f64,
    pub score: f64,
}

/// Tunable constants of the rule-based pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    // Skills
    pub skill_raw_ceiling: f64,
    pub skills_max: f64,

    // Experience
    /// Descending by `min_years`; the first step the estimate reaches wins.
    pub experience_steps: Vec<ExperienceStep>,
    /// Score for a positive estimate below the lowest step.
    pub experience_floor_score: f64,
    pub seniority_bonus: f64,
    pub experience_max: f64,
    pub max_years: f64,

    // Education
    pub phd_score: f64,
    pub master_score: f64,
    pub bachelor_score: f64,
    pub associate_score: f64,
    pub top_university_bonus: f64,
    pub education_max: f64,

    // Bonus
    pub notable_employer_points: f64,
    pub certification_points: f64,
    pub quantified_achievement_points: f64,
    pub recognition_points: f64,
    pub bonus_max: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            skill_raw_ceiling: 50.0,
            skills_max: 30.0,

            experience_steps: vec![
                ExperienceStep { min_years: 10.0, score: 20.0 },
                ExperienceStep { min_years: 5.0, score: 16.0 },
                ExperienceStep { min_years: 3.0, score: 12.0 },
                ExperienceStep { min_years: 1.0, score: 7.0 },
            ],
            experience_floor_score: 3.0,
            seniority_bonus: 5.0,
            experience_max: 25.0,
            max_years: 50.0,

            phd_score: 15.0,
            master_score: 12.0,
            bachelor_score: 8.0,
            associate_score: 4.0,
            top_university_bonus: 3.0,
            education_max: 15.0,

            notable_employer_points: 3.0,
            certification_points: 3.0,
            quantified_achievement_points: 2.0,
            recognition_points: 2.0,
            bonus_max: 10.0,
        }
    }
}

impl ScoringParams {
    /// Sum of the four category caps; the composite can never exceed it.
    pub fn composite_ceiling(&self) -> f64 {
        self.skills_max + self.experience_max + self.education_max + self.bonus_max
    }

    pub fn validate(&self) -> Result<(), ScreeningError> {
        let named = [
            ("skill_raw_ceiling", self.skill_raw_ceiling),
            ("skills_max", self.skills_max),
            ("experience_floor_score", self.experience_floor_score),
            ("seniority_bonus", self.seniority_bonus),
            ("experience_max", self.experience_max),
            ("max_years", self.max_years),
            ("phd_score", self.phd_score),
            ("master_score", self.master_score),
            ("bachelor_score", self.bachelor_score),
            ("associate_score", self.associate_score),
            ("top_university_bonus", self.top_university_bonus),
            ("education_max", self.education_max),
            ("notable_employer_points", self.notable_employer_points),
            ("certification_points", self.certification_points),
            ("quantified_achievement_points", self.quantified_achievement_points),
            ("recognition_points", self.recognition_points),
            ("bonus_max", self.bonus_max),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(ScreeningError::configuration(format!(
                    "parameter '{name}' must be finite and non-negative, got {value}"
                )));
            }
        }
        if self.skill_raw_ceiling <= 0.0 {
            return Err(ScreeningError::configuration(
                "skill_raw_ceiling must be greater than zero",
            ));
        }
        if self.composite_ceiling() > COMPOSITE_MAX {
            return Err(ScreeningError::configuration(format!(
                "category caps sum to {}, which exceeds {COMPOSITE_MAX}",
                self.composite_ceiling()
            )));
        }
        if self
            .experience_steps
            .windows(2)
            .any(|w| w[0].min_years <= w[1].min_years || w[0].score < w[1].score)
        {
            return Err(ScreeningError::configuration(
                "experience_steps must be ordered by descending min_years with non-increasing scores",
            ));
        }
        if self
            .experience_steps
            .iter()
            .any(|s| !s.min_years.is_finite() || !s.score.is_finite() || s.score < 0.0)
        {
            return Err(ScreeningError::configuration(
                "experience_steps must hold finite, non-negative values",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ScoringParams::default().validate().is_ok());
    }

    #[test]
    fn test_default_caps_fit_in_composite() {
        assert!(ScoringParams::default().composite_ceiling() <= COMPOSITE_MAX);
    }

    #[test]
    fn test_caps_over_100_rejected() {
        let params = ScoringParams {
            bonus_max: 40.0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ScreeningError::Configuration(_))
        ));
    }

    #[test]
    fn test_negative_value_rejected() {
        let params = ScoringParams {
            seniority_bonus: -1.0,
            ..Default::default()
        };
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("seniority_bonus"));
    }

    #[test]
    fn test_unordered_steps_rejected() {
        let params = ScoringParams {
            experience_steps: vec![
                ExperienceStep { min_years: 1.0, score: 7.0 },
                ExperienceStep { min_years: 10.0, score: 20.0 },
            ],
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let params: ScoringParams = serde_json::from_str(r#"{"bonus_max": 5.0}"#).unwrap();
        assert_eq!(params.bonus_max, 5.0);
        assert_eq!(params.skills_max, 30.0);
    }
}
