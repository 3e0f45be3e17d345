use anyhow::anyhow;
use blog_core::AppError;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::articles::service::ArticleService;
use crate::modules::comments::model::{
    Comment, CommentWithLikes, CreateCommentDto, UpdateCommentDto,
};

const COMMENT_COLUMNS: &str =
    "id, raw_text AS text, author_id, article_id, reply_comment_id AS reply_id, created_at, updated_at";

pub struct CommentService;

impl CommentService {
    #[instrument]
    pub async fn create_comment(
        db: &PgPool,
        author_id: i64,
        dto: CreateCommentDto,
    ) -> Result<Comment, AppError> {
        if !ArticleService::exists(db, dto.article_id).await? {
            return Err(AppError::not_found(anyhow!("Article not found")));
        }

        if let Some(reply_id) = dto.reply_id {
            Self::check_reply_target(db, dto.article_id, reply_id).await?;
        }

        let query = format!(
            r#"INSERT INTO comments (raw_text, author_id, article_id, reply_comment_id)
               VALUES ($1, $2, $3, $4)
               RETURNING {COMMENT_COLUMNS}"#
        );
        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(&dto.text)
            .bind(author_id)
            .bind(dto.article_id)
            .bind(dto.reply_id)
            .fetch_one(db)
            .await?;

        Ok(comment)
    }

    #[instrument]
    pub async fn get_comment(db: &PgPool, id: i64) -> Result<Comment, AppError> {
        let query = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Comment not found")))
    }

    /// Replaces the text and reply target of an existing comment.
    ///
    /// A comment may not reply to itself, nor to any comment that already
    /// sits below it in the reply chain.
    #[instrument]
    pub async fn update_comment(
        db: &PgPool,
        existing: &Comment,
        dto: UpdateCommentDto,
    ) -> Result<Comment, AppError> {
        if let Some(reply_id) = dto.reply_id {
            if reply_id == existing.id {
                return Err(AppError::bad_request(anyhow!(
                    "A comment cannot reply to itself"
                )));
            }
            Self::check_reply_target(db, existing.article_id, reply_id).await?;
            if Self::reply_chain_contains(db, reply_id, existing.id).await? {
                return Err(AppError::bad_request(anyhow!(
                    "Reply would create a cycle of comments"
                )));
            }
        }

        let query = format!(
            r#"UPDATE comments
               SET raw_text = $1, reply_comment_id = $2, updated_at = NOW()
               WHERE id = $3
               RETURNING {COMMENT_COLUMNS}"#
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(&dto.text)
            .bind(dto.reply_id)
            .bind(existing.id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Comment not found")))
    }

    /// Replies to the comment go with it by cascade.
    #[instrument]
    pub async fn delete_comment(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Comment not found")));
        }
        Ok(())
    }

    /// Oldest first, each with its like count.
    #[instrument]
    pub async fn get_article_comments(
        db: &PgPool,
        article_id: i64,
    ) -> Result<Vec<CommentWithLikes>, AppError> {
        if !ArticleService::exists(db, article_id).await? {
            return Err(AppError::not_found(anyhow!("Article not found")));
        }

        let comments = sqlx::query_as::<_, CommentWithLikes>(
            r#"SELECT
                c.id,
                c.raw_text AS text,
                c.author_id,
                c.article_id,
                c.reply_comment_id AS reply_id,
                (SELECT COUNT(*) FROM likes l WHERE l.comment_id = c.id) AS like_count,
                c.created_at,
                c.updated_at
               FROM comments c
               WHERE c.article_id = $1
               ORDER BY c.created_at, c.id"#,
        )
        .bind(article_id)
        .fetch_all(db)
        .await?;

        Ok(comments)
    }

    #[instrument]
    pub async fn exists(db: &PgPool, id: i64) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM comments WHERE id = $1)")
                .bind(id)
                .fetch_one(db)
                .await?;
        Ok(exists)
    }

    async fn check_reply_target(
        db: &PgPool,
        article_id: i64,
        reply_id: i64,
    ) -> Result<(), AppError> {
        let target_article: Option<i64> =
            sqlx::query_scalar("SELECT article_id FROM comments WHERE id = $1")
                .bind(reply_id)
                .fetch_optional(db)
                .await?;

        match target_article {
            None => Err(AppError::not_found(anyhow!("Reply target comment not found"))),
            Some(id) if id != article_id => Err(AppError::bad_request(anyhow!(
                "Reply target belongs to a different article"
            ))),
            Some(_) => Ok(()),
        }
    }

    /// Whether walking up the reply chain from `start` reaches `needle`.
    async fn reply_chain_contains(db: &PgPool, start: i64, needle: i64) -> Result<bool, AppError> {
        let found: bool = sqlx::query_scalar(
            r#"WITH RECURSIVE chain AS (
                   SELECT id, reply_comment_id FROM comments WHERE id = $1
                   UNION
                   SELECT c.id, c.reply_comment_id
                   FROM comments c
                   JOIN chain ON c.id = chain.reply_comment_id
               )
               SELECT EXISTS(SELECT 1 FROM chain WHERE id = $2)"#,
        )
        .bind(start)
        .bind(needle)
        .fetch_one(db)
        .await?;
        Ok(found)
    }
}
