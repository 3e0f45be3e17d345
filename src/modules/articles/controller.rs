use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use blog_core::ids::require_positive_id;
use blog_core::{AppError, PaginationParams};
use tracing::{info, instrument};

use crate::docs::ErrorResponse;
use crate::middleware::role::ensure_author_or_admin;
use crate::middleware::session::AuthSession;
use crate::middleware::unauthorized::UnauthorizedBody;
use crate::modules::articles::model::{
    Article, ArticleWithStats, CreateArticleDto, CreatedResponse, PaginatedArticlesResponse,
    UpdateArticleDto,
};
use crate::modules::articles::service::ArticleService;
use crate::modules::users::model::MessageResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Publish an article
#[utoipa::path(
    post,
    path = "/v1/res/art",
    request_body = CreateArticleDto,
    responses(
        (status = 201, description = "Article created", body = CreatedResponse),
        (status = 401, description = "Not authenticated or missing role", body = UnauthorizedBody),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("cookie_auth" = [])),
    tag = "Articles"
)]
#[instrument(skip(state))]
pub async fn create_article(
    State(state): State<AppState>,
    session: AuthSession,
    ValidatedJson(dto): ValidatedJson<CreateArticleDto>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let author_id = session.user_id()?;
    let article = ArticleService::create_article(&state.db, author_id, dto).await?;
    info!(article_id = article.id, author_id, "Article created");
    Ok((StatusCode::CREATED, Json(CreatedResponse { newid: article.id })))
}

/// List articles, newest first
#[utoipa::path(
    get,
    path = "/v1/res/art",
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of articles", body = PaginatedArticlesResponse),
        (status = 401, description = "Not authenticated or missing role", body = UnauthorizedBody)
    ),
    security(("cookie_auth" = [])),
    tag = "Articles"
)]
#[instrument(skip(state))]
pub async fn get_articles(
    State(state): State<AppState>,
    _session: AuthSession,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedArticlesResponse>, AppError> {
    let page = ArticleService::get_articles(&state.db, params).await?;
    Ok(Json(page))
}

/// Get one article with its like and comment counts
#[utoipa::path(
    get,
    path = "/v1/res/art/{id}",
    params(("id" = i64, Path, description = "Article id")),
    responses(
        (status = 200, description = "The article", body = ArticleWithStats),
        (status = 401, description = "Not authenticated or missing role", body = UnauthorizedBody),
        (status = 404, description = "Article not found", body = ErrorResponse)
    ),
    security(("cookie_auth" = [])),
    tag = "Articles"
)]
#[instrument(skip(state))]
pub async fn get_article(
    State(state): State<AppState>,
    _session: AuthSession,
    Path(id): Path<i64>,
) -> Result<Json<ArticleWithStats>, AppError> {
    let id = require_positive_id(id, "article")?;
    let article = ArticleService::get_article(&state.db, id).await?;
    Ok(Json(article))
}

/// Edit an article
#[utoipa::path(
    put,
    path = "/v1/res/art/{id}",
    params(("id" = i64, Path, description = "Article id")),
    request_body = UpdateArticleDto,
    responses(
        (status = 200, description = "Article updated", body = Article),
        (status = 401, description = "Not authenticated or missing role", body = UnauthorizedBody),
        (status = 403, description = "Neither the author nor an admin", body = ErrorResponse),
        (status = 404, description = "Article not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("cookie_auth" = [])),
    tag = "Articles"
)]
#[instrument(skip(state))]
pub async fn update_article(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateArticleDto>,
) -> Result<Json<Article>, AppError> {
    let id = require_positive_id(id, "article")?;
    let author_id = ArticleService::get_author_id(&state.db, id).await?;
    ensure_author_or_admin(&session, author_id)?;
    let article = ArticleService::update_article(&state.db, id, dto).await?;
    Ok(Json(article))
}

/// Remove an article with its comments and likes
#[utoipa::path(
    delete,
    path = "/v1/res/art/{id}",
    params(("id" = i64, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated or missing role", body = UnauthorizedBody),
        (status = 404, description = "Article not found", body = ErrorResponse)
    ),
    security(("cookie_auth" = [])),
    tag = "Articles"
)]
#[instrument(skip(state))]
pub async fn delete_article(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = require_positive_id(id, "article")?;
    ArticleService::delete_article(&state.db, id).await?;
    info!(article_id = id, deleted_by = session.subject_id, "Article deleted");
    Ok(Json(MessageResponse::new("Article deleted")))
}
