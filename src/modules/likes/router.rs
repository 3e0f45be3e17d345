use axum::{Router, routing::post};
use blog_auth::RoleId;

use crate::middleware::role::{RoleRequirementError, guard};
use crate::modules::likes::controller::toggle_like;
use crate::state::AppState;

pub fn init_likes_router(state: &AppState) -> Result<Router<AppState>, RoleRequirementError> {
    let routes = Router::new().route("/like", post(toggle_like));
    guard(routes, &state.sessions, &[RoleId::COMMON])
}
