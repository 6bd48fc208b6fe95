use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Audit stamps carried by every mutable assessment entity.
///
/// The created pair is written once; later changes only move the updated pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Timestamps {
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub updated_at: Option<NaiveDateTime>,
    pub updated_by: Option<String>,
}

impl Timestamps {
    pub fn created_by(principal: &str) -> Self {
        Self {
            created_at: Utc::now().naive_utc(),
            created_by: principal.to_string(),
            updated_at: None,
            updated_by: None,
        }
    }

    pub fn touch(&mut self, principal: &str) {
        self.updated_at = Some(Utc::now().naive_utc());
        self.updated_by = Some(principal.to_string());
    }
}
