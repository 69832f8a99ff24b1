//! Experience Estimator: years of experience from free text.
//!
//! Two strategies, first success wins:
//! 1. Explicit phrases ("8 years of experience", "experience: 4 years"); max N wins.
//! 2. Date ranges ("2018 – 2023", "jan 2019 to present"), merged then summed.
//!
//! Years map to a score through a descending step table; a seniority bonus is
//! added only when some experience was estimated.

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::scoring::params::ScoringParams;
use crate::scoring::tables::LookupLists;
use crate::scoring::terms::first_present;

lazy_static! {
    // "8 years of experience", "8+ yrs professional experience", "3-5 years' experience"
    static ref PHRASE_RE: Regex = Regex::new(
        r"(?:^|[^\d.])(?:(\d{1,2}(?:\.\d+)?)\s*(?:-|–|to)\s*)?(\d{1,2}(?:\.\d+)?)\s*\+?\s*(?:years?|yrs?)'?(?:\s+of)?(?:\s+[a-z/&-]+){0,2}?\s+experience"
    )
    .unwrap();
    // "experience: 8 years"
    static ref LABEL_RE: Regex =
        Regex::new(r"experience\s*:\s*(\d{1,2}(?:\.\d+)?)\s*\+?\s*(?:years?|yrs?)").unwrap();
    static ref DATE_RANGE_RE: Regex = Regex::new(
        r"\b(?:(?P<sm>jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+|(?P<smn>\d{1,2})/)?(?P<sy>(?:19|20)\d{2})\s*(?:-|–|—|to|until|through)\s*(?:(?:(?P<em>jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+|(?P<emn>\d{1,2})/)?(?P<ey>(?:19|20)\d{2})|(?P<open>present|current|now|today))\b"
    )
    .unwrap();
}

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceSource {
    ExplicitPhrase,
    DateRanges,
    NotFound,
}

/// How much the estimate can be trusted: stated outright, inferred, or absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Unknown,
}

/// One date range found in the text, after clamping to the evaluation date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeSpan {
    pub text: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub open_ended: bool,
}

/// Experience sub-score with its evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceScore {
    pub score: f64,
    pub max: f64,
    pub years: f64,
    pub source: ExperienceSource,
    pub confidence: Confidence,
    /// Matched explicit phrases, in text order.
    pub phrases: Vec<String>,
    /// Date ranges as found (before merging), in text order.
    pub ranges: Vec<DateRangeSpan>,
    pub base_score: f64,
    pub senior_term: Option<String>,
    pub seniority_bonus: f64,
}

pub fn evaluate_experience(
    text: &str,
    lists: &LookupLists,
    params: &ScoringParams,
    evaluation_date: NaiveDate,
) -> ExperienceScore {
    let phrases = explicit_phrases(text);
    let stated = phrases.iter().map(|(_, y)| *y).reduce(f64::max);
    let (years, source, ranges) = if let Some(max) = stated {
        (max, ExperienceSource::ExplicitPhrase, Vec::new())
    } else {
        let ranges = date_ranges(text, evaluation_date);
        if ranges.is_empty() {
            (0.0, ExperienceSource::NotFound, ranges)
        } else {
            let years = f64::from(merged_months(&ranges)) / 12.0;
            (years, ExperienceSource::DateRanges, ranges)
        }
    };
    let years = years.clamp(0.0, params.max_years);

    let confidence = match source {
        ExperienceSource::ExplicitPhrase => Confidence::High,
        ExperienceSource::DateRanges => Confidence::Medium,
        ExperienceSource::NotFound => Confidence::Unknown,
    };

    let base_score = years_to_score(years, params).min(params.experience_max);
    let senior_term = first_present(text, &lists.senior_role_terms).map(str::to_string);
    let seniority_bonus = if years > 0.0 && senior_term.is_some() {
        params.seniority_bonus
    } else {
        0.0
    };
    let score = (base_score + seniority_bonus).min(params.experience_max);

    ExperienceScore {
        score,
        max: params.experience_max,
        years,
        source,
        confidence,
        phrases: phrases.into_iter().map(|(p, _)| p).collect(),
        ranges,
        base_score,
        senior_term,
        seniority_bonus,
    }
}

/// Monotonic step mapping from years to the base experience score.
pub fn years_to_score(years: f64, params: &ScoringParams) -> f64 {
    if years <= 0.0 {
        return 0.0;
    }
    params
        .experience_steps
        .iter()
        .find(|step| years >= step.min_years)
        .map_or(params.experience_floor_score, |step| step.score)
}

fn explicit_phrases(text: &str) -> Vec<(String, f64)> {
    let mut found = Vec::new();
    for caps in PHRASE_RE.captures_iter(text) {
        // ranges like "3-5 years" count the lower bound
        let years = caps
            .get(1)
            .or_else(|| caps.get(2))
            .and_then(|m| m.as_str().parse::<f64>().ok());
        if let (Some(years), Some(whole)) = (years, caps.get(0)) {
            found.push((trim_phrase(whole.as_str()), years));
        }
    }
    for caps in LABEL_RE.captures_iter(text) {
        if let (Some(years), Some(whole)) = (
            caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok()),
            caps.get(0),
        ) {
            found.push((whole.as_str().to_string(), years));
        }
    }
    found
}

fn trim_phrase(raw: &str) -> String {
    raw.trim_start_matches(|c: char| !c.is_ascii_digit()).to_string()
}

fn date_ranges(text: &str, evaluation_date: NaiveDate) -> Vec<DateRangeSpan> {
    let ceiling = first_of_month(evaluation_date.year(), evaluation_date.month())
        .unwrap_or(evaluation_date);

    DATE_RANGE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let start = endpoint(&caps, "sy", "sm", "smn")?;
            let open_ended = caps.name("open").is_some();
            let end = if open_ended {
                ceiling
            } else {
                let mut end = endpoint(&caps, "ey", "em", "emn")?;
                // "2023 - 2023" covers that calendar year
                let year_only = caps.name("em").is_none() && caps.name("emn").is_none();
                if year_only && end.year() == start.year() {
                    end = first_of_month(end.year() + 1, 1)?;
                }
                end.min(ceiling)
            };
            if start >= end {
                return None;
            }
            Some(DateRangeSpan {
                text: caps.get(0)?.as_str().to_string(),
                start,
                end,
                open_ended,
            })
        })
        .collect()
}

fn endpoint(caps: &Captures<'_>, year: &str, month_name: &str, month_num: &str) -> Option<NaiveDate> {
    let year: i32 = caps.name(year)?.as_str().parse().ok()?;
    let month = match (caps.name(month_name), caps.name(month_num)) {
        (Some(name), _) => MONTHS.iter().position(|m| *m == name.as_str())? as u32 + 1,
        (None, Some(num)) => num.as_str().parse::<u32>().ok().filter(|m| (1..=12).contains(m))?,
        (None, None) => 1,
    };
    first_of_month(year, month)
}

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let total = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    total.max(0) as u32
}

/// Total months covered by the union of the ranges; overlaps count once.
fn merged_months(ranges: &[DateRangeSpan]) -> u32 {
    let mut spans: Vec<(NaiveDate, NaiveDate)> = ranges.iter().map(|r| (r.start, r.end)).collect();
    spans.sort();

    let mut total = 0;
    let mut current: Option<(NaiveDate, NaiveDate)> = None;
    for (start, end) in spans {
        current = match current {
            Some((cs, ce)) if start <= ce => Some((cs, ce.max(end))),
            Some((cs, ce)) => {
                total += months_between(cs, ce);
                Some((start, end))
            }
            None => Some((start, end)),
        };
    }
    if let Some((cs, ce)) = current {
        total += months_between(cs, ce);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn evaluate(text: &str) -> ExperienceScore {
        evaluate_experience(
            text,
            &LookupLists::default(),
            &ScoringParams::default(),
            eval_date(),
        )
    }

    #[test]
    fn test_explicit_phrase_variants() {
        assert_eq!(evaluate("8 years of experience in python").years, 8.0);
        assert_eq!(evaluate("10 years experience").years, 10.0);
        assert_eq!(evaluate("8+ years of professional experience").years, 8.0);
        assert_eq!(evaluate("4 yrs experience").years, 4.0);
        assert_eq!(evaluate("experience: 6 years").years, 6.0);
    }

    #[test]
    fn test_max_phrase_wins() {
        let result = evaluate("2 years experience in go, 7 years of experience in java");
        assert_eq!(result.years, 7.0);
        assert_eq!(result.source, ExperienceSource::ExplicitPhrase);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.phrases.len(), 2);
    }

    #[test]
    fn test_range_phrase_takes_lower_bound() {
        assert_eq!(evaluate("3-5 years of experience").years, 3.0);
    }

    #[test]
    fn test_years_inside_year_number_not_misread() {
        let result = evaluate("since 2015 years experience was not tracked");
        assert_eq!(result.source, ExperienceSource::NotFound);
    }

    #[test]
    fn test_phrase_beats_date_ranges() {
        let result = evaluate("2 years experience. engineer 2010 - 2020");
        assert_eq!(result.years, 2.0);
        assert!(result.ranges.is_empty());
    }

    #[test]
    fn test_year_only_range() {
        let result = evaluate("software engineer (2018 – 2023)");
        assert_eq!(result.source, ExperienceSource::DateRanges);
        assert_eq!(result.confidence, Confidence::Medium);
        assert_eq!(result.years, 5.0);
    }

    #[test]
    fn test_single_year_range_counts_the_year() {
        let result = evaluate("intern, 2023 – 2023");
        assert_eq!(result.source, ExperienceSource::DateRanges);
        assert_eq!(result.years, 1.0);
        assert_eq!(result.score, 7.0);

        // same year as the evaluation date stops at the current month
        let current = evaluate("contractor 2024 - 2024");
        assert!((current.years - 5.0 / 12.0).abs() < 1e-9);

        let from_march = evaluate("mar 2023 - 2023");
        assert!((from_march.years - 10.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_present_resolves_to_evaluation_date() {
        // jan 2020 → jun 2024 = 53 months
        let result = evaluate("backend engineer jan 2020 to present");
        assert!(result.ranges[0].open_ended);
        assert!((result.years - 53.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_month_names_and_numeric_months() {
        let named = evaluate("march 2019 - september 2020");
        assert!((named.years - 18.0 / 12.0).abs() < 1e-9);
        let numeric = evaluate("03/2019 - 09/2020");
        assert!((numeric.years - 18.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_sequential_ranges_sum() {
        let result = evaluate("netflix 2020-2024; google 2016-2020");
        assert_eq!(result.years, 8.0);
        assert_eq!(result.ranges.len(), 2);
    }

    #[test]
    fn test_overlapping_ranges_merge() {
        let result = evaluate("acme 2015-2020, side project 2018-2021");
        assert_eq!(result.years, 6.0);
    }

    #[test]
    fn test_duplicate_range_counted_once() {
        let result = evaluate("summary: 2019-2023. experience: lead, 2019-2023");
        assert_eq!(result.years, 4.0);
    }

    #[test]
    fn test_future_end_clamped_and_inverted_ignored() {
        let clamped = evaluate("2022 - 2030");
        // jan 2022 → jun 2024
        assert!((clamped.years - 29.0 / 12.0).abs() < 1e-9);
        assert_eq!(evaluate("2023 - 2019").source, ExperienceSource::NotFound);
    }

    #[test]
    fn test_no_evidence_scores_zero() {
        let result = evaluate("senior engineer who loves rust");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.seniority_bonus, 0.0);
        assert_eq!(result.source, ExperienceSource::NotFound);
        assert_eq!(result.confidence, Confidence::Unknown);
    }

    #[test]
    fn test_more_years_never_scores_lower() {
        let two = evaluate("2 years experience").score;
        let ten = evaluate("10 years experience").score;
        assert!(ten >= two);
    }

    #[test]
    fn test_step_function() {
        let params = ScoringParams::default();
        assert_eq!(years_to_score(0.0, &params), 0.0);
        assert_eq!(years_to_score(0.5, &params), 3.0);
        assert_eq!(years_to_score(1.0, &params), 7.0);
        assert_eq!(years_to_score(3.0, &params), 12.0);
        assert_eq!(years_to_score(8.0, &params), 16.0);
        assert_eq!(years_to_score(10.0, &params), 20.0);
        assert_eq!(years_to_score(35.0, &params), 20.0);
    }

    #[test]
    fn test_seniority_bonus_applied_and_capped() {
        let result = evaluate("senior engineer with 8 years of experience");
        assert_eq!(result.senior_term.as_deref(), Some("senior"));
        assert_eq!(result.score, 21.0);

        let capped = evaluate_experience(
            "principal engineer, 12 years experience",
            &LookupLists::default(),
            &ScoringParams {
                seniority_bonus: 10.0,
                ..Default::default()
            },
            eval_date(),
        );
        assert_eq!(capped.score, 25.0);
    }

    #[test]
    fn test_years_capped() {
        let result = evaluate("1950 - present");
        assert_eq!(result.years, ScoringParams::default().max_years);
    }
}
