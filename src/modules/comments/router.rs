use axum::{
    Router,
    routing::{get, post, put},
};
use blog_auth::RoleId;

use crate::middleware::role::{RoleRequirementError, guard};
use crate::modules::comments::controller::{
    create_comment, delete_comment, get_article_comments, update_comment,
};
use crate::state::AppState;

/// `GET /comm/{id}` lists the comments of article `{id}`; the other `{id}`
/// routes address a single comment.
pub fn init_comments_router(state: &AppState) -> Result<Router<AppState>, RoleRequirementError> {
    let readers = Router::new().route("/comm/{id}", get(get_article_comments));

    let writers = Router::new()
        .route("/comm", post(create_comment))
        .route("/comm/{id}", put(update_comment).delete(delete_comment));

    Ok(guard(readers, &state.sessions, &[RoleId::COMMON])?
        .merge(guard(writers, &state.sessions, &[RoleId::MODERATOR])?))
}
