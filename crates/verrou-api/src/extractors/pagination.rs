//! Pagination query parameter extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use verrou_core::types::PageQuery;

use super::query::QueryParams;
use crate::error::ApiError;

/// `page`, `limit`, `search`, `sort_by` and `sort_order`, clamped to valid ranges.
#[derive(Debug, Clone)]
pub struct Pagination(pub PageQuery);

impl std::ops::Deref for Pagination {
    type Target = PageQuery;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let QueryParams(query) = QueryParams::<PageQuery>::from_request_parts(parts, state).await?;
        Ok(Self(query.normalized()))
    }
}
