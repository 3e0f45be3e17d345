use anyhow::anyhow;
use blog_core::{AppError, PaginationMeta, PaginationParams};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::articles::model::{
    Article, ArticleWithStats, CreateArticleDto, PaginatedArticlesResponse, UpdateArticleDto,
};

const ARTICLE_WITH_STATS_SELECT: &str = r#"SELECT
        a.id,
        a.header,
        a.topic,
        a.short_text,
        a.long_text,
        a.author_id,
        (SELECT COUNT(*) FROM likes l WHERE l.article_id = a.id) AS like_count,
        (SELECT COUNT(*) FROM comments c WHERE c.article_id = a.id) AS comment_count,
        a.created_at,
        a.updated_at
       FROM articles a"#;

pub struct ArticleService;

impl ArticleService {
    #[instrument]
    pub async fn create_article(
        db: &PgPool,
        author_id: i64,
        dto: CreateArticleDto,
    ) -> Result<Article, AppError> {
        let article = sqlx::query_as::<_, Article>(
            r#"INSERT INTO articles (header, topic, short_text, long_text, author_id)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, header, topic, short_text, long_text, author_id, created_at, updated_at"#,
        )
        .bind(&dto.header)
        .bind(&dto.topic)
        .bind(&dto.short_text)
        .bind(&dto.long_text)
        .bind(author_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_foreign_key_violation()
            {
                return AppError::not_found(anyhow!("Author no longer exists"));
            }
            AppError::from(e)
        })?;

        Ok(article)
    }

    /// Newest first. An empty page is a valid result.
    #[instrument]
    pub async fn get_articles(
        db: &PgPool,
        params: PaginationParams,
    ) -> Result<PaginatedArticlesResponse, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
            .fetch_one(db)
            .await?;

        let query = format!("{ARTICLE_WITH_STATS_SELECT} ORDER BY a.created_at DESC, a.id DESC LIMIT $1 OFFSET $2");
        let articles = sqlx::query_as::<_, ArticleWithStats>(&query)
            .bind(params.amount())
            .bind(params.offset())
            .fetch_all(db)
            .await?;

        Ok(PaginatedArticlesResponse {
            articles,
            meta: PaginationMeta::new(&params, total),
        })
    }

    #[instrument]
    pub async fn get_article(db: &PgPool, id: i64) -> Result<ArticleWithStats, AppError> {
        let query = format!("{ARTICLE_WITH_STATS_SELECT} WHERE a.id = $1");
        sqlx::query_as::<_, ArticleWithStats>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Article not found")))
    }

    #[instrument]
    pub async fn get_author_id(db: &PgPool, id: i64) -> Result<i64, AppError> {
        sqlx::query_scalar("SELECT author_id FROM articles WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Article not found")))
    }

    /// Applies only the fields present in `dto`.
    #[instrument]
    pub async fn update_article(
        db: &PgPool,
        id: i64,
        dto: UpdateArticleDto,
    ) -> Result<Article, AppError> {
        sqlx::query_as::<_, Article>(
            r#"UPDATE articles
               SET header = COALESCE($1, header),
                   topic = COALESCE($2, topic),
                   short_text = COALESCE($3, short_text),
                   long_text = COALESCE($4, long_text),
                   updated_at = NOW()
               WHERE id = $5
               RETURNING id, header, topic, short_text, long_text, author_id, created_at, updated_at"#,
        )
        .bind(&dto.header)
        .bind(&dto.topic)
        .bind(&dto.short_text)
        .bind(&dto.long_text)
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Article not found")))
    }

    /// Comments and likes of the article go with it by cascade.
    #[instrument]
    pub async fn delete_article(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Article not found")));
        }
        Ok(())
    }

    #[instrument]
    pub async fn exists(db: &PgPool, id: i64) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM articles WHERE id = $1)")
                .bind(id)
                .fetch_one(db)
                .await?;
        Ok(exists)
    }
}
