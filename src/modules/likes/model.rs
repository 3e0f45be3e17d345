use anyhow::anyhow;
use blog_core::AppError;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// What a like points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Article(i64),
    Comment(i64),
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LikeDto {
    #[validate(range(min = 1))]
    pub article_id: Option<i64>,
    #[validate(range(min = 1))]
    pub comment_id: Option<i64>,
}

impl LikeDto {
    /// Exactly one of `article_id` and `comment_id` must be given.
    pub fn target(&self) -> Result<LikeTarget, AppError> {
        match (self.article_id, self.comment_id) {
            (Some(id), None) => Ok(LikeTarget::Article(id)),
            (None, Some(id)) => Ok(LikeTarget::Comment(id)),
            _ => Err(AppError::bad_request(anyhow!(
                "Exactly one of article_id and comment_id is required"
            ))),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LikeParams {
    /// `true` to like, `false` to take the like back
    pub flag: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LikeResponse {
    pub liked: bool,
    pub message: String,
}
