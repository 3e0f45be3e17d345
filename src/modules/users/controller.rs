use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;
use blog_core::AppError;
use blog_core::ids::require_positive_id;
use tracing::{info, instrument};

use crate::docs::ErrorResponse;
use crate::metrics::{
    track_login_failure, track_login_success, track_token_issued, track_user_created,
};
use crate::middleware::role::ensure_self_or_admin;
use crate::middleware::session::AuthSession;
use crate::middleware::unauthorized::UnauthorizedBody;
use crate::modules::users::model::{
    CreateUserDto, CreateUserResponse, LoginRequest, LoginResponse, MessageResponse,
    UpdateContactInfoDto, UpdateLocationDto, UpdatePersonalInfoDto, UserProfile,
};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Create a new user
#[utoipa::path(
    post,
    path = "/v1/user",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = CreateUserResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 409, description = "Login already taken", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<CreateUserResponse>), AppError> {
    let id = UserService::create_user(&state.db, dto).await?;
    track_user_created();
    info!(user_id = id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            id,
            message: "User created".to_string(),
        }),
    ))
}

/// Log in and receive the session cookie
#[utoipa::path(
    put,
    path = "/v1/user",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; the session cookie is set", body = LoginResponse),
        (status = 400, description = "Invalid login or password", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state, jar))]
pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let user = match UserService::authenticate(&state.db, &dto).await {
        Ok(user) => user,
        Err(e) => {
            track_login_failure();
            return Err(e);
        }
    };

    let subject_id = u64::try_from(user.user_id).map_err(AppError::internal)?;
    let (token, cookie) = state
        .sessions
        .issue_cookie(subject_id, &user.roles)
        .map_err(AppError::internal)?;

    track_login_success();
    track_token_issued();
    info!(user_id = user.user_id, roles = ?user.roles, "User logged in");

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            token,
            user_id: user.user_id,
        }),
    ))
}

/// Drop the session cookie
#[utoipa::path(
    post,
    path = "/v1/user/logout",
    responses(
        (status = 200, description = "Session cookie removed", body = MessageResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state, jar))]
pub async fn logout_user(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.remove(state.sessions.removal_cookie()),
        Json(MessageResponse::new("Logged out")),
    )
}

/// List all users
#[utoipa::path(
    get,
    path = "/v1/user",
    responses(
        (status = 200, description = "All users", body = Vec<UserProfile>),
        (status = 401, description = "Not authenticated or missing role", body = UnauthorizedBody),
        (status = 404, description = "No users exist", body = ErrorResponse)
    ),
    security(("cookie_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    _session: AuthSession,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    let users = UserService::get_users(&state.db).await?;
    Ok(Json(users))
}

/// Get one user
#[utoipa::path(
    get,
    path = "/v1/user/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserProfile),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 401, description = "Not authenticated or missing role", body = UnauthorizedBody),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("cookie_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    _session: AuthSession,
    Path(id): Path<i64>,
) -> Result<Json<UserProfile>, AppError> {
    let id = require_positive_id(id, "user")?;
    let user = UserService::get_user(&state.db, id).await?;
    Ok(Json(user))
}

/// Delete a user with all of its records
#[utoipa::path(
    delete,
    path = "/v1/user/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated or missing role", body = UnauthorizedBody),
        (status = 403, description = "Neither the account owner nor an admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("cookie_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = require_positive_id(id, "user")?;
    ensure_self_or_admin(&session, id)?;
    UserService::delete_user(&state.db, id).await?;
    info!(user_id = id, deleted_by = session.subject_id, "User deleted");
    Ok(Json(MessageResponse::new("User deleted")))
}

/// Replace a user's contact info
#[utoipa::path(
    put,
    path = "/v1/user/{id}/contact",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateContactInfoDto,
    responses(
        (status = 200, description = "Contact info updated", body = MessageResponse),
        (status = 401, description = "Not authenticated or missing role", body = UnauthorizedBody),
        (status = 403, description = "Neither the account owner nor an admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("cookie_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn update_contact_info(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateContactInfoDto>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = require_positive_id(id, "user")?;
    ensure_self_or_admin(&session, id)?;
    UserService::update_contact_info(&state.db, id, dto).await?;
    Ok(Json(MessageResponse::new("Contact info updated")))
}

/// Replace a user's personal info
#[utoipa::path(
    put,
    path = "/v1/user/{id}/personal",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdatePersonalInfoDto,
    responses(
        (status = 200, description = "Personal info updated", body = MessageResponse),
        (status = 401, description = "Not authenticated or missing role", body = UnauthorizedBody),
        (status = 403, description = "Neither the account owner nor an admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("cookie_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn update_personal_info(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdatePersonalInfoDto>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = require_positive_id(id, "user")?;
    ensure_self_or_admin(&session, id)?;
    UserService::update_personal_info(&state.db, id, dto).await?;
    Ok(Json(MessageResponse::new("Personal info updated")))
}

/// Replace a user's location
#[utoipa::path(
    put,
    path = "/v1/user/{id}/personal/location",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateLocationDto,
    responses(
        (status = 200, description = "Location updated", body = MessageResponse),
        (status = 401, description = "Not authenticated or missing role", body = UnauthorizedBody),
        (status = 403, description = "Neither the account owner nor an admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("cookie_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn update_location(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateLocationDto>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = require_positive_id(id, "user")?;
    ensure_self_or_admin(&session, id)?;
    UserService::update_location(&state.db, id, dto).await?;
    Ok(Json(MessageResponse::new("Location updated")))
}
