//! Role authorization.
//!
//! A [`RoleRequirement`] is attached to a group of routes when the router is
//! built. [`require_roles`] runs after [`require_session`] and lets a request
//! through only when the session holds **every** required role.
//!
//! ```rust,ignore
//! let routes = Router::new().route("/art", post(create_article));
//! let routes = guard(routes, &state.sessions, &[RoleId::MODERATOR])?;
//! ```

use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use blog_auth::{RoleId, RoleSet};
use blog_core::AppError;
use thiserror::Error;
use tracing::debug;

use crate::middleware::session::{AuthSession, SessionManager, require_session};
use crate::middleware::unauthorized::AuthFailure;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleRequirementError {
    #[error("a route group was configured with an empty role requirement")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRequirement {
    roles: Arc<RoleSet>,
}

impl RoleRequirement {
    pub fn new<I>(roles: I) -> Result<Self, RoleRequirementError>
    where
        I: IntoIterator<Item = RoleId>,
    {
        let roles: RoleSet = roles.into_iter().collect();
        if roles.is_empty() {
            return Err(RoleRequirementError::Empty);
        }
        Ok(Self {
            roles: Arc::new(roles),
        })
    }

    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    /// All-of check. An empty grant never satisfies a requirement.
    pub fn is_satisfied_by(&self, granted: &RoleSet) -> bool {
        !granted.is_empty() && self.roles.is_subset(granted)
    }
}

pub async fn require_roles(
    State(requirement): State<RoleRequirement>,
    req: Request,
    next: Next,
) -> Response {
    let Some(session) = req.extensions().get::<AuthSession>() else {
        return AuthFailure::MissingCredential.into_response();
    };

    if !requirement.is_satisfied_by(&session.roles) {
        debug!(
            subject_id = session.subject_id,
            granted = ?session.roles,
            required = ?requirement.roles(),
            "Role requirement not met"
        );
        return AuthFailure::InsufficientRole.into_response();
    }

    next.run(req).await
}

/// Wraps every route of `router` in session extraction followed by the role
/// check for `roles`.
pub fn guard<S>(
    router: Router<S>,
    sessions: &SessionManager,
    roles: &[RoleId],
) -> Result<Router<S>, RoleRequirementError>
where
    S: Clone + Send + Sync + 'static,
{
    let requirement = RoleRequirement::new(roles.iter().copied())?;

    // The layer added last runs first.
    Ok(router
        .route_layer(middleware::from_fn_with_state(requirement, require_roles))
        .route_layer(middleware::from_fn_with_state(
            sessions.clone(),
            require_session,
        )))
}

/// Mutations of a user's own records are allowed for that user and for admins.
pub fn ensure_self_or_admin(session: &AuthSession, user_id: i64) -> Result<(), AppError> {
    if session.is_admin() || session.user_id()? == user_id {
        return Ok(());
    }
    Err(AppError::forbidden(anyhow!(
        "Only the account owner or an admin can modify this user"
    )))
}

/// Content may be changed by its author or by an admin.
pub fn ensure_author_or_admin(session: &AuthSession, author_id: i64) -> Result<(), AppError> {
    if session.is_admin() || session.user_id()? == author_id {
        return Ok(());
    }
    Err(AppError::forbidden(anyhow!(
        "Only the author or an admin can modify this resource"
    )))
}
