use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

use crate::error::WebError;

pub const PRINCIPAL_HEADER: &str = "x-principal";

/// The acting user, as asserted by the caller in the `x-principal` header.
///
/// No authentication happens here; the value is only stamped on what the request writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts
            .headers
            .get(PRINCIPAL_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| WebError::BadRequest(format!("Missing {PRINCIPAL_HEADER} header")))?;

        Ok(Self(principal.to_string()))
    }
}
