//! Static lookup data: keyword weight tables, position profiles and term lists.
//!
//! `ScoringConfig` is the serde shape (built-in or loaded from JSON);
//! `ScoringTables` is the validated, resolved form built once at startup and
//! shared read-only by every scoring request.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ScreeningError;
use crate::scoring::params::ScoringParams;

/// Upper bound for keyword weights, required-skill bonuses and focus points.
pub const MAX_KEYWORD_WEIGHT: u32 = 1_000;

// ────────────────────────────────────────────────────────────────────────────
// Keyword weight table
// ────────────────────────────────────────────────────────────────────────────

/// A canonical skill term and its positive weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordWeight {
    pub term: String,
    pub weight: u32,
}

/// Ordered skill → weight mapping. Table order is the order matched skills
/// are reported in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordWeightTable {
    entries: Vec<KeywordWeight>,
}

impl KeywordWeightTable {
    #[cfg(test)]
    pub fn new(entries: Vec<KeywordWeight>) -> Result<Self, ScreeningError> {
        let table = Self { entries };
        table.validate()?;
        Ok(table)
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, u32)]) -> Result<Self, ScreeningError> {
        Self::new(
            pairs
                .iter()
                .map(|(term, weight)| KeywordWeight {
                    term: term.to_string(),
                    weight: *weight,
                })
                .collect(),
        )
    }

    /// Weights must lie in `1..=MAX_KEYWORD_WEIGHT`, terms must be non-empty
    /// trimmed lowercase, and each term unique.
    pub fn validate(&self) -> Result<(), ScreeningError> {
        if self.entries.is_empty() {
            return Err(ScreeningError::configuration("keyword weight table is empty"));
        }
        for (i, entry) in self.entries.iter().enumerate() {
            check_term("keyword", i, &entry.term)?;
            if entry.weight == 0 {
                return Err(ScreeningError::configuration(format!(
                    "keyword '{}' has a zero weight",
                    entry.term
                )));
            }
            if entry.weight > MAX_KEYWORD_WEIGHT {
                return Err(ScreeningError::configuration(format!(
                    "keyword '{}' weight {} exceeds {MAX_KEYWORD_WEIGHT}",
                    entry.term, entry.weight
                )));
            }
            if self.entries[..i].iter().any(|e| e.term == entry.term) {
                return Err(ScreeningError::configuration(format!(
                    "keyword '{}' appears more than once",
                    entry.term
                )));
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeywordWeight> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn weight_of(&self, term: &str) -> Option<u32> {
        self.entries.iter().find(|e| e.term == term).map(|e| e.weight)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.weight_of(term).is_some()
    }

    /// Copy of this table with `bonus` added to the weight of each listed term.
    fn boosted(&self, terms: &[String], bonus: u32) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|e| KeywordWeight {
                    term: e.term.clone(),
                    weight: if terms.contains(&e.term) {
                        e.weight.saturating_add(bonus)
                    } else {
                        e.weight
                    },
                })
                .collect(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Position profiles
// ────────────────────────────────────────────────────────────────────────────

/// Extra raw skill points when enough of a profile's focus skills are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusRule {
    pub skills: Vec<String>,
    pub min_matches: usize,
    pub bonus_points: u32,
}

/// Serde shape of a profile as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSpec {
    pub display_name: String,
    /// Replaces the shared base table for this profile when present.
    #[serde(default)]
    pub keywords: Option<KeywordWeightTable>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default = "default_required_skill_bonus")]
    pub required_skill_bonus: u32,
    #[serde(default)]
    pub focus: Option<FocusRule>,
}

fn default_required_skill_bonus() -> u32 {
    2
}

/// A resolved position profile: effective weight table with required-skill
/// boosts already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionProfile {
    pub name: String,
    pub display_name: String,
    pub keywords: KeywordWeightTable,
    pub required_skills: Vec<String>,
    pub focus: Option<FocusRule>,
}

impl PositionProfile {
    fn resolve(
        name: &str,
        spec: &ProfileSpec,
        base: &KeywordWeightTable,
    ) -> Result<Self, ScreeningError> {
        let table = spec.keywords.as_ref().unwrap_or(base);
        table
            .validate()
            .map_err(|e| ScreeningError::configuration(format!("profile '{name}': {e}")))?;

        if spec.required_skill_bonus > MAX_KEYWORD_WEIGHT {
            return Err(ScreeningError::configuration(format!(
                "profile '{name}': required_skill_bonus {} exceeds {MAX_KEYWORD_WEIGHT}",
                spec.required_skill_bonus
            )));
        }
        for skill in &spec.required_skills {
            if !table.contains(skill) {
                return Err(ScreeningError::configuration(format!(
                    "profile '{name}': required skill '{skill}' is not in its keyword table"
                )));
            }
        }
        if let Some(focus) = &spec.focus {
            if let Some(skill) = focus.skills.iter().find(|s| !table.contains(s)) {
                return Err(ScreeningError::configuration(format!(
                    "profile '{name}': focus skill '{skill}' is not in its keyword table"
                )));
            }
            if focus.bonus_points > MAX_KEYWORD_WEIGHT {
                return Err(ScreeningError::configuration(format!(
                    "profile '{name}': focus bonus_points {} exceeds {MAX_KEYWORD_WEIGHT}",
                    focus.bonus_points
                )));
            }
            if focus.min_matches == 0 || focus.min_matches > focus.skills.len() {
                return Err(ScreeningError::configuration(format!(
                    "profile '{name}': focus min_matches must be between 1 and {}",
                    focus.skills.len()
                )));
            }
        }

        Ok(Self {
            name: name.to_string(),
            display_name: spec.display_name.clone(),
            keywords: table.boosted(&spec.required_skills, spec.required_skill_bonus),
            required_skills: spec.required_skills.clone(),
            focus: spec.focus.clone(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Term lists
// ────────────────────────────────────────────────────────────────────────────

/// Degree keywords per level. Abbreviation-based, so ambiguous forms can
/// false-positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeTerms {
    pub phd: Vec<String>,
    pub master: Vec<String>,
    pub bachelor: Vec<String>,
    pub associate: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupLists {
    pub top_universities: Vec<String>,
    pub notable_employers: Vec<String>,
    pub certification_terms: Vec<String>,
    pub recognition_terms: Vec<String>,
    pub senior_role_terms: Vec<String>,
    pub degree_terms: DegreeTerms,
}

impl LookupLists {
    /// Terms are matched against lowercased text, so each must be non-empty
    /// trimmed lowercase.
    pub fn validate(&self) -> Result<(), ScreeningError> {
        let named = [
            ("top_universities", &self.top_universities),
            ("notable_employers", &self.notable_employers),
            ("certification_terms", &self.certification_terms),
            ("recognition_terms", &self.recognition_terms),
            ("senior_role_terms", &self.senior_role_terms),
            ("degree_terms.phd", &self.degree_terms.phd),
            ("degree_terms.master", &self.degree_terms.master),
            ("degree_terms.bachelor", &self.degree_terms.bachelor),
            ("degree_terms.associate", &self.degree_terms.associate),
        ];
        for (list, terms) in named {
            for (i, term) in terms.iter().enumerate() {
                check_term(list, i, term)?;
            }
        }
        Ok(())
    }
}

fn check_term(kind: &str, position: usize, term: &str) -> Result<(), ScreeningError> {
    if term.trim().is_empty() {
        return Err(ScreeningError::configuration(format!(
            "{kind} term at position {position} is empty"
        )));
    }
    if term != term.trim() || term != term.to_lowercase() {
        return Err(ScreeningError::configuration(format!(
            "{kind} term '{term}' must be trimmed lowercase"
        )));
    }
    Ok(())
}

impl Default for LookupLists {
    fn default() -> Self {
        Self {
            top_universities: strings(&[
                "massachusetts institute of technology",
                "mit",
                "stanford",
                "harvard",
                "caltech",
                "princeton",
                "cambridge",
                "oxford",
                "carnegie mellon",
                "carnegie",
                "berkeley",
            ]),
            notable_employers: strings(&[
                "google", "microsoft", "amazon", "facebook", "apple", "netflix", "meta", "tesla",
                "spacex", "uber", "airbnb",
            ]),
            certification_terms: strings(&["certified", "certification", "certificate"]),
            recognition_terms: strings(&[
                "award", "awarded", "published", "publication", "patent", "patents",
            ]),
            senior_role_terms: strings(&[
                "senior", "lead", "staff", "principal", "manager", "director",
            ]),
            degree_terms: DegreeTerms {
                phd: strings(&["phd", "ph.d", "doctorate", "doctor of philosophy"]),
                master: strings(&[
                    "master", "masters", "m.s.", "ms in", "msc", "m.sc", "mba", "m.tech",
                    "m.eng", "ma in",
                ]),
                bachelor: strings(&[
                    "bachelor", "bachelors", "b.s.", "bs in", "bsc", "b.sc", "b.tech", "b.e.",
                    "b.a.", "ba in", "undergraduate degree",
                ]),
                associate: strings(&["associate degree", "associate's degree", "diploma"]),
            },
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Config ↔ tables
// ────────────────────────────────────────────────────────────────────────────

/// Serde shape of the whole scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub params: ScoringParams,
    #[serde(default)]
    pub lists: LookupLists,
    pub base_keywords: KeywordWeightTable,
    pub profiles: BTreeMap<String, ProfileSpec>,
}

impl ScoringConfig {
    /// Built-in configuration with the four standard position profiles.
    pub fn builtin() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            "software_engineer".to_string(),
            profile(
                "Software Engineer",
                &["python", "java", "javascript", "aws", "docker", "sql"],
                None,
            ),
        );
        profiles.insert(
            "data_scientist".to_string(),
            profile(
                "Data Scientist",
                &["python", "machine learning", "tensorflow", "pytorch", "sql"],
                Some(FocusRule {
                    skills: strings(&["machine learning", "ai", "tensorflow", "pytorch"]),
                    min_matches: 2,
                    bonus_points: 5,
                }),
            ),
        );
        profiles.insert(
            "devops".to_string(),
            profile(
                "DevOps",
                &["aws", "docker", "kubernetes", "linux", "git", "cloud"],
                Some(FocusRule {
                    skills: strings(&["aws", "docker", "kubernetes", "cloud"]),
                    min_matches: 3,
                    bonus_points: 5,
                }),
            ),
        );
        profiles.insert(
            "full_stack".to_string(),
            profile(
                "Full Stack",
                &["python", "javascript", "react", "node.js", "aws", "docker"],
                None,
            ),
        );

        Self {
            params: ScoringParams::default(),
            lists: LookupLists::default(),
            base_keywords: KeywordWeightTable {
                entries: BASE_KEYWORDS
                    .iter()
                    .map(|(term, weight)| KeywordWeight {
                        term: term.to_string(),
                        weight: *weight,
                    })
                    .collect(),
            },
            profiles,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ScreeningError> {
        serde_json::from_str(json).map_err(|e| {
            ScreeningError::configuration(format!("malformed scoring configuration: {e}"))
        })
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ScreeningError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ScreeningError::configuration(format!(
                "cannot read scoring configuration {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&json)
    }
}

/// Validated, resolved lookup data. Read-only after construction.
#[derive(Debug, Clone)]
pub struct ScoringTables {
    pub params: ScoringParams,
    pub lists: LookupLists,
    profiles: BTreeMap<String, PositionProfile>,
}

impl ScoringTables {
    pub fn from_config(config: ScoringConfig) -> Result<Self, ScreeningError> {
        config.params.validate()?;
        config.lists.validate()?;
        if config.profiles.is_empty() {
            return Err(ScreeningError::configuration("no position profiles configured"));
        }

        let profiles = config
            .profiles
            .iter()
            .map(|(name, spec)| {
                PositionProfile::resolve(name, spec, &config.base_keywords)
                    .map(|p| (name.clone(), p))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(Self {
            params: config.params,
            lists: config.lists,
            profiles,
        })
    }

    pub fn builtin() -> Result<Self, ScreeningError> {
        Self::from_config(ScoringConfig::builtin())
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ScreeningError> {
        Self::from_config(ScoringConfig::from_json_file(path)?)
    }

    /// Looks up a profile by name; unknown names are a configuration error.
    pub fn profile(&self, name: &str) -> Result<&PositionProfile, ScreeningError> {
        self.profiles.get(name).ok_or_else(|| {
            ScreeningError::configuration(format!(
                "unknown position profile '{name}' (available: {})",
                self.profile_names().join(", ")
            ))
        })
    }

    pub fn profile_names(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    pub fn profiles(&self) -> impl Iterator<Item = &PositionProfile> {
        self.profiles.values()
    }
}

const BASE_KEYWORDS: &[(&str, u32)] = &[
    ("python", 8),
    ("java", 8),
    ("javascript", 6),
    ("aws", 10),
    ("docker", 8),
    ("kubernetes", 10),
    ("sql", 6),
    ("react", 5),
    ("node.js", 5),
    ("tensorflow", 8),
    ("pytorch", 8),
    ("machine learning", 12),
    ("ai", 12),
    ("cloud", 8),
    ("devops", 10),
    ("azure", 6),
    ("gcp", 6),
    ("linux", 5),
    ("git", 4),
    ("spring", 6),
    ("django", 5),
    ("flask", 4),
    ("fastapi", 4),
    ("mongodb", 4),
    ("postgresql", 4),
    ("mysql", 4),
    ("redis", 3),
    ("kafka", 4),
    ("spark", 5),
];

fn profile(display_name: &str, required: &[&str], focus: Option<FocusRule>) -> ProfileSpec {
    ProfileSpec {
        display_name: display_name.to_string(),
        keywords: None,
        required_skills: strings(required),
        required_skill_bonus: default_required_skill_bonus(),
        focus,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
