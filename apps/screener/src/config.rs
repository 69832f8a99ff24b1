use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};

use crate::screening::decision::DecisionPolicy;

/// Application configuration loaded from environment variables.
/// Every variable is optional; bad values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Profile used when a request or scan does not name one.
    pub default_profile: String,
    /// JSON scoring configuration replacing the built-in tables.
    pub profiles_path: Option<PathBuf>,
    /// What "present" / "current" in date ranges resolve to.
    pub evaluation_date: NaiveDate,
    pub decision_policy: DecisionPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = DecisionPolicy::default();

        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let evaluation_date = match lookup("SCREENER_EVALUATION_DATE") {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .with_context(|| format!("SCREENER_EVALUATION_DATE '{raw}' is not YYYY-MM-DD"))?,
            None => Utc::now().date_naive(),
        };

        let accept_above = parse_threshold(&lookup, "SCREENER_ACCEPT_ABOVE", defaults.accept_above)?;
        let review_from = parse_threshold(&lookup, "SCREENER_REVIEW_FROM", defaults.review_from)?;
        let decision_policy = DecisionPolicy::new(accept_above, review_from)
            .context("invalid SCREENER_ACCEPT_ABOVE / SCREENER_REVIEW_FROM")?;

        Ok(Config {
            port,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            default_profile: lookup("SCREENER_DEFAULT_PROFILE")
                .unwrap_or_else(|| "software_engineer".to_string()),
            profiles_path: lookup("SCREENER_PROFILES_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            evaluation_date,
            decision_policy,
        })
    }
}

fn parse_threshold(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: f64,
) -> Result<f64> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .with_context(|| format!("{key} must be a number, got '{raw}'")),
        None => Ok(default),
    }
}
