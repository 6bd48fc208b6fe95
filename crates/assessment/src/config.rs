use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AssessmentError;

/// How a gate dimension decides whether a supplier stays in the scoring pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExclusionPolicy {
    /// Every requirement the supplier answered in the dimension must sum non-zero.
    #[default]
    AllRequirementsNonZero,
    /// The supplier's sum across the whole dimension must be non-zero.
    AtLeastOneNonZero,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDimension {
    pub name: String,
    #[serde(default)]
    pub policy: ExclusionPolicy,
}

impl GateDimension {
    pub fn new(name: impl Into<String>, policy: ExclusionPolicy) -> Self {
        Self {
            name: name.into(),
            policy,
        }
    }
}

impl fmt::Display for GateDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.policy {
            ExclusionPolicy::AllRequirementsNonZero => write!(f, "{}", self.name),
            ExclusionPolicy::AtLeastOneNonZero => write!(f, "{}:at-least-one", self.name),
        }
    }
}

/// Parses `Name` or `Name:at-least-one` (also `Name:all`).
impl FromStr for GateDimension {
    type Err = AssessmentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (name, policy) = match value.rsplit_once(':') {
            Some((name, policy)) => {
                let policy = match policy.trim().to_lowercase().as_str() {
                    "all" | "all-requirements" => ExclusionPolicy::AllRequirementsNonZero,
                    "at-least-one" | "any" => ExclusionPolicy::AtLeastOneNonZero,
                    other => {
                        return Err(AssessmentError::validation(format!(
                            "Exclusion policy [{other}] not recognised for gate dimension [{name}]"
                        )));
                    }
                };
                (name.trim(), policy)
            }
            None => (value.trim(), ExclusionPolicy::default()),
        };

        if name.is_empty() {
            return Err(AssessmentError::validation("Gate dimension name must not be empty"));
        }

        Ok(Self::new(name, policy))
    }
}

/// Scoring behaviour that varies between deployments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub gate_dimensions: Vec<GateDimension>,
    /// Submission-type label summed into the primary bucket.
    pub primary_submission_type: String,
    /// Submission-type label whose presence switches the total to the averaged form.
    pub alternate_submission_type: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            gate_dimensions: vec![GateDimension::new(
                "Location",
                ExclusionPolicy::AllRequirementsNonZero,
            )],
            primary_submission_type: "Supplier".to_string(),
            alternate_submission_type: "Sub Contractor".to_string(),
        }
    }
}

impl ScoringConfig {
    /// Parses a comma separated gate list; blank entries are skipped.
    pub fn parse_gate_dimensions(value: &str) -> Result<Vec<GateDimension>, AssessmentError> {
        value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::parse)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gates_location() {
        let config = ScoringConfig::default();
        assert_eq!(
            config.gate_dimensions,
            vec![GateDimension::new("Location", ExclusionPolicy::AllRequirementsNonZero)]
        );
        assert_eq!(config.primary_submission_type, "Supplier");
        assert_eq!(config.alternate_submission_type, "Sub Contractor");
    }

    #[test]
    fn test_parse_gate_dimensions() {
        let gates =
            ScoringConfig::parse_gate_dimensions("Location, Security Clearance:at-least-one,").unwrap();
        assert_eq!(
            gates,
            vec![
                GateDimension::new("Location", ExclusionPolicy::AllRequirementsNonZero),
                GateDimension::new("Security Clearance", ExclusionPolicy::AtLeastOneNonZero),
            ]
        );
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let err = "Location:sometimes".parse::<GateDimension>().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let gate = GateDimension::new("Location", ExclusionPolicy::AtLeastOneNonZero);
        assert_eq!(gate.to_string().parse::<GateDimension>().unwrap(), gate);
    }

    #[test]
    fn test_deserialize_partial_config_keeps_defaults() {
        let config: ScoringConfig =
            serde_json::from_str(r#"{"primary_submission_type": "Prime"}"#).unwrap();
        assert_eq!(config.primary_submission_type, "Prime");
        assert_eq!(config.alternate_submission_type, "Sub Contractor");
        assert_eq!(config.gate_dimensions.len(), 1);
    }
}
