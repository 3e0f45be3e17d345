use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use blog_config::CorsConfig;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::{metrics_middleware, metrics_router};
use crate::middleware::role::RoleRequirementError;
use crate::modules::articles::init_articles_router;
use crate::modules::comments::init_comments_router;
use crate::modules::likes::init_likes_router;
use crate::modules::users::init_users_router;
use crate::state::AppState;

/// Accounts, sessions, API docs and metrics.
pub fn init_user_router(state: AppState) -> Result<Router, RoleRequirementError> {
    let mut router = Router::new()
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/v1/user", init_users_router(&state)?);

    if let Some(handle) = state.metrics.clone() {
        router = router.merge(metrics_router(handle));
    }

    Ok(with_common_layers(router, state))
}

/// Articles, comments and likes.
pub fn init_resource_router(state: AppState) -> Result<Router, RoleRequirementError> {
    let resources = init_articles_router(&state)?
        .merge(init_comments_router(&state)?)
        .merge(init_likes_router(&state)?);

    let router = Router::new().nest("/v1/res", resources);

    Ok(with_common_layers(router, state))
}

fn with_common_layers(router: Router<AppState>, state: AppState) -> Router {
    let cors = cors_layer(&state.cors_config);

    router
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
