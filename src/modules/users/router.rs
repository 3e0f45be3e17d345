use axum::{
    Router,
    routing::{get, post, put},
};
use blog_auth::RoleId;

use crate::middleware::role::{RoleRequirementError, guard};
use crate::modules::users::controller::{
    create_user, delete_user, get_user, get_users, login_user, logout_user, update_contact_info,
    update_location, update_personal_info,
};
use crate::state::AppState;

/// Routes mounted under `/v1/user`.
///
/// Account creation, login and logout are public; everything else needs a
/// session with the `common` role.
pub fn init_users_router(state: &AppState) -> Result<Router<AppState>, RoleRequirementError> {
    let public = Router::new()
        .route("/", post(create_user).put(login_user))
        .route("/logout", post(logout_user));

    let protected = Router::new()
        .route("/", get(get_users))
        .route("/{id}", get(get_user).delete(delete_user))
        .route("/{id}/contact", put(update_contact_info))
        .route("/{id}/personal", put(update_personal_info))
        .route("/{id}/personal/location", put(update_location));

    let protected = guard(protected, &state.sessions, &[RoleId::COMMON])?;

    Ok(public.merge(protected))
}
