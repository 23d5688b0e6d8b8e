//! Path parameter extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::response::ApiError;

/// Suggestion index from the `:idx` path segment
#[derive(Debug, Clone, Copy)]
pub struct IdxPath(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for IdxPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        let idx = raw
            .parse::<i64>()
            .ok()
            .filter(|idx| *idx > 0)
            .ok_or_else(|| ApiError::invalid_path(format!("`{raw}` is not a suggestion index")))?;

        Ok(IdxPath(idx))
    }
}
