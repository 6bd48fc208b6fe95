use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;

use crate::config::{ExclusionPolicy, GateDimension};
use crate::error::Result;
use crate::models::CalculationBase;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GateKey<'r> {
    Requirement(i32, &'r str),
    Dimension(i32),
}

/// Drops suppliers that show no capability in a gate dimension.
pub struct EliminationFilter<'a> {
    gates: &'a [GateDimension],
}

impl<'a> EliminationFilter<'a> {
    pub fn new(gates: &'a [GateDimension]) -> Self {
        Self { gates }
    }

    fn gate_for(&self, dimension_name: &str) -> Option<&GateDimension> {
        self.gates.iter().find(|gate| gate.name == dimension_name)
    }

    /// Keeps every row of each supplier that passes all gates, in input order.
    ///
    /// Suppliers with no rows in any gate dimension pass.
    pub fn apply(&self, rows: Vec<CalculationBase>) -> Result<Vec<CalculationBase>> {
        let mut sums: HashMap<&str, HashMap<GateKey<'_>, Decimal>> = HashMap::new();

        for row in &rows {
            let Some(gate) = self.gate_for(&row.dimension_name) else {
                continue;
            };
            let key = match gate.policy {
                ExclusionPolicy::AllRequirementsNonZero => {
                    GateKey::Requirement(row.dimension_id, row.requirement_name.as_str())
                }
                ExclusionPolicy::AtLeastOneNonZero => GateKey::Dimension(row.dimension_id),
            };
            *sums
                .entry(row.supplier_id.as_str())
                .or_default()
                .entry(key)
                .or_insert(Decimal::ZERO) += row.numeric_value()?;
        }

        let eliminated: HashSet<String> = sums
            .into_iter()
            .filter_map(|(supplier_id, keys)| {
                let zero_key = keys.iter().find(|(_, sum)| sum.is_zero())?;
                tracing::debug!(
                    supplier_id,
                    gate = ?zero_key.0,
                    "Supplier eliminated by gate dimension"
                );
                Some(supplier_id.to_string())
            })
            .collect();

        if eliminated.is_empty() {
            return Ok(rows);
        }

        Ok(rows
            .into_iter()
            .filter(|row| !eliminated.contains(&row.supplier_id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(supplier: &str, dimension: &str, requirement: &str, criterion: &str, value: &str) -> CalculationBase {
        CalculationBase {
            assessment_id: 1,
            supplier_id: supplier.to_string(),
            dimension_id: if dimension == "Location" { 1 } else { 2 },
            dimension_name: dimension.to_string(),
            requirement_name: requirement.to_string(),
            submission_type_name: criterion.to_string(),
            submission_value: Some(value.to_string()),
            dimension_divisor: 1,
            selection_weight_pct: Decimal::from(100),
            dimension_weight_pct: Decimal::from(50),
        }
    }

    fn suppliers(rows: &[CalculationBase]) -> Vec<&str> {
        let mut ids: Vec<&str> = rows.iter().map(|r| r.supplier_id.as_str()).collect();
        ids.dedup();
        ids
    }

    fn location_gate(policy: ExclusionPolicy) -> Vec<GateDimension> {
        vec![GateDimension::new("Location", policy)]
    }

    #[test]
    fn test_zero_requirement_eliminates_supplier_entirely() {
        let gates = location_gate(ExclusionPolicy::AllRequirementsNonZero);
        let rows = vec![
            row("a", "Location", "London", "Supplier", "0"),
            row("a", "Skills", "Rust", "Supplier", "5"),
            row("b", "Location", "London", "Supplier", "4"),
            row("b", "Skills", "Rust", "Supplier", "3"),
        ];

        let kept = EliminationFilter::new(&gates).apply(rows).unwrap();

        assert_eq!(suppliers(&kept), vec!["b"]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_any_submission_type_can_carry_a_requirement() {
        let gates = location_gate(ExclusionPolicy::AllRequirementsNonZero);
        let rows = vec![
            row("a", "Location", "London", "Supplier", "0"),
            row("a", "Location", "London", "Sub Contractor", "2"),
        ];

        let kept = EliminationFilter::new(&gates).apply(rows).unwrap();

        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_every_requirement_must_be_non_zero() {
        let gates = location_gate(ExclusionPolicy::AllRequirementsNonZero);
        let rows = vec![
            row("a", "Location", "London", "Supplier", "1"),
            row("a", "Location", "Leeds", "Supplier", "0"),
        ];

        assert!(EliminationFilter::new(&gates).apply(rows).unwrap().is_empty());
    }

    #[test]
    fn test_at_least_one_policy_sums_whole_dimension() {
        let gates = location_gate(ExclusionPolicy::AtLeastOneNonZero);
        let rows = vec![
            row("a", "Location", "London", "Supplier", "1"),
            row("a", "Location", "Leeds", "Supplier", "0"),
            row("b", "Location", "London", "Supplier", "0"),
            row("b", "Location", "Leeds", "Supplier", "0"),
        ];

        let kept = EliminationFilter::new(&gates).apply(rows).unwrap();

        assert_eq!(suppliers(&kept), vec!["a"]);
    }

    #[test]
    fn test_supplier_without_gate_rows_is_retained() {
        let gates = location_gate(ExclusionPolicy::AllRequirementsNonZero);
        let rows = vec![
            row("a", "Skills", "Rust", "Supplier", "0"),
            row("b", "Location", "London", "Supplier", "0"),
        ];

        let kept = EliminationFilter::new(&gates).apply(rows).unwrap();

        assert_eq!(suppliers(&kept), vec!["a"]);
    }

    #[test]
    fn test_missing_value_counts_as_zero() {
        let gates = location_gate(ExclusionPolicy::AllRequirementsNonZero);
        let mut missing = row("a", "Location", "London", "Supplier", "0");
        missing.submission_value = None;

        assert!(EliminationFilter::new(&gates).apply(vec![missing]).unwrap().is_empty());
    }

    #[test]
    fn test_non_numeric_gate_value_is_an_error() {
        let gates = location_gate(ExclusionPolicy::AllRequirementsNonZero);
        let rows = vec![row("a", "Location", "London", "Supplier", "yes")];

        let err = EliminationFilter::new(&gates).apply(rows).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_negative_value_cannot_cancel_a_positive_one() {
        let gates = location_gate(ExclusionPolicy::AllRequirementsNonZero);
        let rows = vec![
            row("a", "Location", "London", "Supplier", "4"),
            row("a", "Location", "London", "Sub Contractor", "-4"),
        ];

        let err = EliminationFilter::new(&gates).apply(rows).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_input_order_is_preserved() {
        let gates = location_gate(ExclusionPolicy::AllRequirementsNonZero);
        let rows = vec![
            row("b", "Skills", "Rust", "Supplier", "1"),
            row("a", "Location", "London", "Supplier", "1"),
            row("b", "Location", "London", "Supplier", "1"),
            row("a", "Skills", "Rust", "Supplier", "1"),
        ];

        let kept = EliminationFilter::new(&gates).apply(rows.clone()).unwrap();

        assert_eq!(kept, rows);
    }
}
