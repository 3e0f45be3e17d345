use axum::Json;
use axum::extract::{Query, State};
use blog_core::AppError;
use tracing::{info, instrument};

use crate::docs::ErrorResponse;
use crate::metrics::track_like_toggled;
use crate::middleware::session::AuthSession;
use crate::middleware::unauthorized::UnauthorizedBody;
use crate::modules::likes::model::{LikeDto, LikeParams, LikeResponse};
use crate::modules::likes::service::LikeService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Like (`flag=true`) or unlike (`flag=false`) an article or a comment
#[utoipa::path(
    post,
    path = "/v1/res/like",
    params(LikeParams),
    request_body = LikeDto,
    responses(
        (status = 200, description = "Like state changed", body = LikeResponse),
        (status = 400, description = "Not exactly one target given", body = ErrorResponse),
        (status = 401, description = "Not authenticated or missing role", body = UnauthorizedBody),
        (status = 404, description = "Target not found", body = ErrorResponse),
        (status = 409, description = "Already liked", body = ErrorResponse)
    ),
    security(("cookie_auth" = [])),
    tag = "Likes"
)]
#[instrument(skip(state))]
pub async fn toggle_like(
    State(state): State<AppState>,
    session: AuthSession,
    Query(params): Query<LikeParams>,
    ValidatedJson(dto): ValidatedJson<LikeDto>,
) -> Result<Json<LikeResponse>, AppError> {
    let user_id = session.user_id()?;
    let target = dto.target()?;

    let message = if params.flag {
        LikeService::like(&state.db, user_id, target).await?;
        "Liked"
    } else if LikeService::unlike(&state.db, user_id, target).await? {
        "Like removed"
    } else {
        "Nothing to remove"
    };

    track_like_toggled(params.flag);
    info!(user_id, ?target, liked = params.flag, "Like toggled");

    Ok(Json(LikeResponse {
        liked: params.flag,
        message: message.to_string(),
    }))
}
