use axum::{
    Router,
    routing::{get, post, put},
};
use blog_auth::RoleId;

use crate::middleware::role::{RoleRequirementError, guard};
use crate::modules::articles::controller::{
    create_article, delete_article, get_article, get_articles, update_article,
};
use crate::state::AppState;

/// Reading needs `common`; writing needs `moderator`.
pub fn init_articles_router(state: &AppState) -> Result<Router<AppState>, RoleRequirementError> {
    let readers = Router::new()
        .route("/art", get(get_articles))
        .route("/art/{id}", get(get_article));

    let writers = Router::new()
        .route("/art", post(create_article))
        .route("/art/{id}", put(update_article).delete(delete_article));

    Ok(guard(readers, &state.sessions, &[RoleId::COMMON])?
        .merge(guard(writers, &state.sessions, &[RoleId::MODERATOR])?))
}
