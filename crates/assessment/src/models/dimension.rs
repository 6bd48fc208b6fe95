use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// How a buyer answers a submission type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SelectionKind {
    Select,
    MultiSelect,
    Integer,
    /// A kind recorded in the reference data that this engine cannot interpret.
    Unsupported(String),
}

impl SelectionKind {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "select" => Self::Select,
            "multiselect" => Self::MultiSelect,
            "integer" => Self::Integer,
            _ => Self::Unsupported(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Select => "select",
            Self::MultiSelect => "multiselect",
            Self::Integer => "integer",
            Self::Unsupported(kind) => kind,
        }
    }

    pub fn uses_valid_values(&self) -> bool {
        matches!(self, Self::Select | Self::MultiSelect)
    }
}

impl fmt::Display for SelectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for SelectionKind {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<SelectionKind> for String {
    fn from(value: SelectionKind) -> Self {
        value.as_str().to_string()
    }
}

/// A submission type ("criterion") as configured for one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionSubmissionType {
    pub code: String,
    pub name: String,
    pub selection_kind: SelectionKind,
}

/// A coded option for select and multi-select submission types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ValidValue {
    pub value_code: String,
    pub value_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dimension {
    pub dimension_id: i32,
    pub name: String,
    pub submission_types: Vec<DimensionSubmissionType>,
    pub valid_values: Vec<ValidValue>,
}

impl Dimension {
    pub fn submission_type(&self, code: &str) -> Option<&DimensionSubmissionType> {
        self.submission_types.iter().find(|st| st.code == code)
    }

    /// Lookup used when writing: buyers send the display name.
    pub fn valid_value_by_name(&self, name: &str) -> Option<&ValidValue> {
        self.valid_values.iter().find(|vv| vv.value_name == name)
    }

    /// Lookup used when reading back: selections store the code.
    pub fn valid_value_by_code(&self, code: &str) -> Option<&ValidValue> {
        self.valid_values.iter().find(|vv| vv.value_code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_kind_parse_is_case_insensitive() {
        assert_eq!(SelectionKind::parse("SELECT"), SelectionKind::Select);
        assert_eq!(SelectionKind::parse("MultiSelect"), SelectionKind::MultiSelect);
        assert_eq!(SelectionKind::parse(" integer "), SelectionKind::Integer);
    }

    #[test]
    fn test_unknown_selection_kind_is_kept() {
        let kind = SelectionKind::parse("freetext");
        assert_eq!(kind, SelectionKind::Unsupported("freetext".to_string()));
        assert_eq!(kind.to_string(), "freetext");
        assert!(!kind.uses_valid_values());
    }

    #[test]
    fn test_valid_value_lookups() {
        let dimension = Dimension {
            dimension_id: 1,
            name: "Security Clearance".to_string(),
            submission_types: vec![],
            valid_values: vec![ValidValue {
                value_code: "SC".to_string(),
                value_name: "Security Check".to_string(),
            }],
        };

        assert_eq!(
            dimension.valid_value_by_name("Security Check").map(|v| v.value_code.as_str()),
            Some("SC")
        );
        assert_eq!(
            dimension.valid_value_by_code("SC").map(|v| v.value_name.as_str()),
            Some("Security Check")
        );
        assert!(dimension.valid_value_by_name("security check").is_none());
    }
}
