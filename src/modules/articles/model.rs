use blog_core::PaginationMeta;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Article {
    pub id: i64,
    pub header: String,
    pub topic: String,
    pub short_text: String,
    pub long_text: String,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ArticleWithStats {
    pub id: i64,
    pub header: String,
    pub topic: String,
    pub short_text: String,
    pub long_text: String,
    pub author_id: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateArticleDto {
    #[validate(length(min = 1, max = 200))]
    pub header: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub topic: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub short_text: String,
    #[serde(default)]
    pub long_text: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateArticleDto {
    #[validate(length(min = 1, max = 200))]
    pub header: Option<String>,
    #[validate(length(max = 100))]
    pub topic: Option<String>,
    #[validate(length(max = 1000))]
    pub short_text: Option<String>,
    pub long_text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedArticlesResponse {
    pub articles: Vec<ArticleWithStats>,
    #[serde(flatten)]
    pub meta: PaginationMeta,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    pub newid: i64,
}
