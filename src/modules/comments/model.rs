use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub author_id: i64,
    pub article_id: i64,
    pub reply_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CommentWithLikes {
    pub id: i64,
    pub text: String,
    pub author_id: i64,
    pub article_id: i64,
    pub reply_id: Option<i64>,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCommentDto {
    #[validate(length(min = 1, max = 5000))]
    pub text: String,
    #[validate(range(min = 1))]
    pub article_id: i64,
    /// Comment of the same article this one answers
    #[validate(range(min = 1))]
    pub reply_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCommentDto {
    #[validate(length(min = 1, max = 5000))]
    pub text: String,
    #[validate(range(min = 1))]
    pub reply_id: Option<i64>,
}
