//! Pagination utilities for list endpoints.
//!
//! Lists are paged with two query parameters:
//! - `amount`: items per page (1-100, default: 10)
//! - `page`: zero-based page number (default: 0)
//!
//! The row offset is `amount * page`.
//!
//! # Example
//!
//! ```ignore
//! async fn list_articles(
//!     Query(params): Query<PaginationParams>,
//! ) -> Result<Json<PaginatedArticles>, AppError> {
//!     let rows = fetch(params.amount(), params.offset()).await?;
//!     let total = count().await?;
//!     Ok(Json(PaginatedArticles { articles: rows, meta: PaginationMeta::new(&params, total) }))
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_AMOUNT: i64 = 10;
pub const MAX_AMOUNT: i64 = 100;

/// Deserializes an optional string into an optional i64.
///
/// Query parameters may arrive as empty strings, which are treated as `None`.
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Metadata about a paginated response, flattened next to the items.
///
/// ```json
/// { "articles": [...], "total_count": 42, "amount": 10, "page": 1, "has_more": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of items across all pages
    pub total_count: i64,
    /// Items per page that was applied
    pub amount: i64,
    /// Zero-based page that was returned
    pub page: i64,
    /// Whether there are more items after this page
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(params: &PaginationParams, total_count: i64) -> Self {
        let amount = params.amount();
        let offset = params.offset();
        Self {
            total_count,
            amount,
            page: params.page(),
            has_more: offset.saturating_add(amount) < total_count,
        }
    }
}

/// Query parameters for `amount`/`page` pagination.
///
/// - `amount` is clamped to the range [1, 100]
/// - `page` is clamped to a minimum of 0
#[derive(Debug, Clone, Default, Hash, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Items per page (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub amount: Option<i64>,
    /// Zero-based page number (default: 0)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl PaginationParams {
    #[must_use]
    pub fn amount(&self) -> i64 {
        self.amount.unwrap_or(DEFAULT_AMOUNT).clamp(1, MAX_AMOUNT)
    }

    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(0).max(0)
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        self.amount().saturating_mul(self.page())
    }
}
