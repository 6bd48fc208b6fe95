use rust_decimal::Decimal;

use crate::dto::SupplierScores;
use crate::error::Result;
use crate::models::AssessmentResult;
use crate::repository::ResultStore;

/// Writes one result per (assessment, supplier), updating rows that already exist.
pub struct ResultPersister<'a, R: ResultStore> {
    store: &'a R,
}

impl<'a, R: ResultStore> ResultPersister<'a, R> {
    pub fn new(store: &'a R) -> Self {
        Self { store }
    }

    pub async fn persist(
        &self,
        assessment_id: i32,
        scores: &[SupplierScores],
        principal: &str,
    ) -> Result<Vec<AssessmentResult>> {
        let mut saved = Vec::with_capacity(scores.len());

        for supplier in scores {
            let value = Decimal::from(supplier.total);
            let result = match self
                .store
                .find_result(assessment_id, &supplier.supplier_id)
                .await?
            {
                Some(mut existing) => {
                    existing.update_value(value, principal);
                    existing
                }
                None => AssessmentResult::new(assessment_id, &supplier.supplier_id, value, principal),
            };

            self.store.save_result(&result).await?;
            saved.push(result);
        }

        Ok(saved)
    }
}
