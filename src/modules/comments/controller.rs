use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use blog_core::AppError;
use blog_core::ids::require_positive_id;
use tracing::{info, instrument};

use crate::docs::ErrorResponse;
use crate::middleware::role::ensure_author_or_admin;
use crate::middleware::session::AuthSession;
use crate::middleware::unauthorized::UnauthorizedBody;
use crate::modules::articles::model::CreatedResponse;
use crate::modules::comments::model::{
    Comment, CommentWithLikes, CreateCommentDto, UpdateCommentDto,
};
use crate::modules::comments::service::CommentService;
use crate::modules::users::model::MessageResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Comment on an article
#[utoipa::path(
    post,
    path = "/v1/res/comm",
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment created", body = CreatedResponse),
        (status = 400, description = "Reply target belongs to another article", body = ErrorResponse),
        (status = 401, description = "Not authenticated or missing role", body = UnauthorizedBody),
        (status = 404, description = "Article or reply target not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("cookie_auth" = [])),
    tag = "Comments"
)]
#[instrument(skip(state))]
pub async fn create_comment(
    State(state): State<AppState>,
    session: AuthSession,
    ValidatedJson(dto): ValidatedJson<CreateCommentDto>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let author_id = session.user_id()?;
    let comment = CommentService::create_comment(&state.db, author_id, dto).await?;
    info!(comment_id = comment.id, article_id = comment.article_id, "Comment created");
    Ok((StatusCode::CREATED, Json(CreatedResponse { newid: comment.id })))
}

/// List the comments of an article
#[utoipa::path(
    get,
    path = "/v1/res/comm/{id}",
    params(("id" = i64, Path, description = "Article id")),
    responses(
        (status = 200, description = "Comments with like counts", body = Vec<CommentWithLikes>),
        (status = 401, description = "Not authenticated or missing role", body = UnauthorizedBody),
        (status = 404, description = "Article not found", body = ErrorResponse)
    ),
    security(("cookie_auth" = [])),
    tag = "Comments"
)]
#[instrument(skip(state))]
pub async fn get_article_comments(
    State(state): State<AppState>,
    _session: AuthSession,
    Path(article_id): Path<i64>,
) -> Result<Json<Vec<CommentWithLikes>>, AppError> {
    let article_id = require_positive_id(article_id, "article")?;
    let comments = CommentService::get_article_comments(&state.db, article_id).await?;
    Ok(Json(comments))
}

/// Edit a comment
#[utoipa::path(
    put,
    path = "/v1/res/comm/{id}",
    params(("id" = i64, Path, description = "Comment id")),
    request_body = UpdateCommentDto,
    responses(
        (status = 200, description = "Comment updated", body = Comment),
        (status = 400, description = "Invalid reply target", body = ErrorResponse),
        (status = 401, description = "Not authenticated or missing role", body = UnauthorizedBody),
        (status = 403, description = "Neither the author nor an admin", body = ErrorResponse),
        (status = 404, description = "Comment not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("cookie_auth" = [])),
    tag = "Comments"
)]
#[instrument(skip(state))]
pub async fn update_comment(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateCommentDto>,
) -> Result<Json<Comment>, AppError> {
    let id = require_positive_id(id, "comment")?;
    let existing = CommentService::get_comment(&state.db, id).await?;
    ensure_author_or_admin(&session, existing.author_id)?;
    let comment = CommentService::update_comment(&state.db, &existing, dto).await?;
    Ok(Json(comment))
}

/// Remove a comment and its replies
#[utoipa::path(
    delete,
    path = "/v1/res/comm/{id}",
    params(("id" = i64, Path, description = "Comment id")),
    responses(
        (status = 200, description = "Comment deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated or missing role", body = UnauthorizedBody),
        (status = 404, description = "Comment not found", body = ErrorResponse)
    ),
    security(("cookie_auth" = [])),
    tag = "Comments"
)]
#[instrument(skip(state))]
pub async fn delete_comment(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = require_positive_id(id, "comment")?;
    CommentService::delete_comment(&state.db, id).await?;
    info!(comment_id = id, deleted_by = session.subject_id, "Comment deleted");
    Ok(Json(MessageResponse::new("Comment deleted")))
}
