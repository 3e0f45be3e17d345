use anyhow::anyhow;
use blog_core::AppError;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::articles::service::ArticleService;
use crate::modules::comments::service::CommentService;
use crate::modules::likes::model::LikeTarget;

pub struct LikeService;

impl LikeService {
    /// Records a like. Liking the same target twice is a conflict.
    #[instrument]
    pub async fn like(db: &PgPool, user_id: i64, target: LikeTarget) -> Result<(), AppError> {
        let (sql, id) = match target {
            LikeTarget::Article(id) => {
                if !ArticleService::exists(db, id).await? {
                    return Err(AppError::not_found(anyhow!("Article not found")));
                }
                ("INSERT INTO likes (user_id, article_id) VALUES ($1, $2)", id)
            }
            LikeTarget::Comment(id) => {
                if !CommentService::exists(db, id).await? {
                    return Err(AppError::not_found(anyhow!("Comment not found")));
                }
                ("INSERT INTO likes (user_id, comment_id) VALUES ($1, $2)", id)
            }
        };

        sqlx::query(sql)
            .bind(user_id)
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::conflict(anyhow!("Already liked"));
                    }
                    if db_err.is_foreign_key_violation() {
                        return AppError::not_found(anyhow!("Like target no longer exists"));
                    }
                }
                AppError::from(e)
            })?;

        Ok(())
    }

    /// Removes the like if present. Returns whether anything was removed.
    #[instrument]
    pub async fn unlike(db: &PgPool, user_id: i64, target: LikeTarget) -> Result<bool, AppError> {
        let (sql, id) = match target {
            LikeTarget::Article(id) => ("DELETE FROM likes WHERE user_id = $1 AND article_id = $2", id),
            LikeTarget::Comment(id) => ("DELETE FROM likes WHERE user_id = $1 AND comment_id = $2", id),
        };

        let result = sqlx::query(sql).bind(user_id).bind(id).execute(db).await?;
        Ok(result.rows_affected() > 0)
    }
}
