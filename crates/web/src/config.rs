use anyhow::{Context, Result};
use assessment::config::ScoringConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub scoring: ScoringConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut scoring = ScoringConfig::default();
        if let Some(gates) = lookup("GATE_DIMENSIONS") {
            scoring.gate_dimensions = ScoringConfig::parse_gate_dimensions(&gates)
                .context("GATE_DIMENSIONS is not a valid gate list")?;
        }
        if let Some(label) = lookup("PRIMARY_SUBMISSION_TYPE") {
            scoring.primary_submission_type = label;
        }
        if let Some(label) = lookup("ALTERNATE_SUBMISSION_TYPE") {
            scoring.alternate_submission_type = label;
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a number")?,
            database_url: lookup("DATABASE_URL").context("Cannot load DATABASE_URL env variable")?,
            scoring,
        })
    }
}
