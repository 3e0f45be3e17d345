//! Session extraction.
//!
//! [`require_session`] reads the session cookie, verifies the token and stores
//! an [`AuthSession`] in the request extensions. Handlers behind it take
//! `AuthSession` as an extractor.

use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use blog_auth::{Claims, RoleId, RoleSet, TokenCodec, TokenError};
use blog_config::JwtConfig;
use blog_core::AppError;
use tracing::{Span, debug};

use crate::middleware::unauthorized::AuthFailure;

/// Identity attached to an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub subject_id: u64,
    pub roles: RoleSet,
}

impl AuthSession {
    pub fn has_role(&self, role: RoleId) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(RoleId::ADMIN)
    }

    /// Subject id as a database key.
    pub fn user_id(&self) -> Result<i64, AppError> {
        i64::try_from(self.subject_id)
            .map_err(|_| AppError::bad_request(anyhow!("Session subject is out of range")))
    }
}

impl From<Claims> for AuthSession {
    fn from(claims: Claims) -> Self {
        Self {
            subject_id: claims.sub,
            roles: claims.roles,
        }
    }
}

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = AuthFailure;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthSession>()
            .cloned()
            .ok_or(AuthFailure::MissingCredential)
    }
}

/// Token codec plus the cookie settings used to carry tokens.
#[derive(Clone, Debug)]
pub struct SessionManager {
    codec: TokenCodec,
    cookie_name: Arc<str>,
    cookie_secure: bool,
}

impl SessionManager {
    pub fn new(codec: TokenCodec, cookie_name: &str, cookie_secure: bool) -> Self {
        Self {
            codec,
            cookie_name: Arc::from(cookie_name),
            cookie_secure,
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(
            TokenCodec::from_config(config),
            &config.cookie_name,
            config.cookie_secure,
        )
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Resolves the session carried by the request cookies.
    ///
    /// An absent cookie, an empty value and the literal `"0"` all count as
    /// no credential.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthSession, AuthFailure> {
        let jar = CookieJar::from_headers(headers);
        let token = jar
            .get(&self.cookie_name)
            .map(|cookie| cookie.value())
            .filter(|value| !value.is_empty() && *value != "0")
            .ok_or(AuthFailure::MissingCredential)?;

        let claims = self.codec.verify(token)?;
        Ok(AuthSession::from(claims))
    }

    /// Signs a token for the subject and wraps it in the session cookie.
    pub fn issue_cookie(
        &self,
        subject_id: u64,
        roles: &RoleSet,
    ) -> Result<(String, Cookie<'static>), TokenError> {
        let ttl = self.codec.ttl();
        let token = self.codec.issue(subject_id, roles, ttl)?;
        let cookie = Cookie::build((self.cookie_name.to_string(), token.clone()))
            .path("/")
            .http_only(true)
            .secure(self.cookie_secure)
            .max_age(time::Duration::seconds(ttl.num_seconds()))
            .build();
        Ok((token, cookie))
    }

    /// Cookie that makes the browser drop the session.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((self.cookie_name.to_string(), ""))
            .path("/")
            .http_only(true)
            .secure(self.cookie_secure)
            .build()
    }
}

pub async fn require_session(
    State(sessions): State<SessionManager>,
    mut req: Request,
    next: Next,
) -> Response {
    match sessions.authenticate(req.headers()) {
        Ok(session) => {
            Span::current().record(crate::logging::SUBJECT_FIELD, session.subject_id);
            debug!(subject_id = session.subject_id, roles = ?session.roles, "Session accepted");
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        Err(failure) => failure.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;
    use chrono::Duration;

    fn manager() -> SessionManager {
        SessionManager::new(
            TokenCodec::new(b"session-test-secret", Duration::hours(1)),
            "jwt_token",
            false,
        )
    }

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_missing_cookie() {
        let result = manager().authenticate(&HeaderMap::new());
        assert!(matches!(result, Err(AuthFailure::MissingCredential)));
    }

    #[test]
    fn test_empty_and_zero_cookie_values_are_missing() {
        let manager = manager();
        for raw in ["jwt_token=", "jwt_token=0"] {
            let result = manager.authenticate(&headers_with_cookie(raw));
            assert!(matches!(result, Err(AuthFailure::MissingCredential)), "{raw}");
        }
    }

    #[test]
    fn test_other_cookie_names_ignored() {
        let manager = manager();
        let roles: RoleSet = [RoleId::COMMON].into_iter().collect();
        let (token, _) = manager.issue_cookie(5, &roles).unwrap();
        let result = manager.authenticate(&headers_with_cookie(&format!("session={token}")));
        assert!(matches!(result, Err(AuthFailure::MissingCredential)));
    }

    #[test]
    fn test_issued_cookie_round_trips() {
        let manager = manager();
        let roles: RoleSet = [RoleId::COMMON, RoleId::MODERATOR].into_iter().collect();
        let (token, cookie) = manager.issue_cookie(42, &roles).unwrap();

        assert_eq!(cookie.name(), "jwt_token");
        assert_eq!(cookie.value(), token);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(1)));

        let session = manager
            .authenticate(&headers_with_cookie(&format!("theme=dark; jwt_token={token}")))
            .unwrap();
        assert_eq!(session.subject_id, 42);
        assert_eq!(session.roles, roles);
    }

    #[test]
    fn test_garbage_token_is_token_failure() {
        let result = manager().authenticate(&headers_with_cookie("jwt_token=not.a.jwt"));
        assert!(matches!(result, Err(AuthFailure::Token(_))));
    }

    #[test]
    fn test_user_id_conversion() {
        let session = AuthSession { subject_id: 9, roles: RoleSet::new() };
        assert_eq!(session.user_id().unwrap(), 9);
        let huge = AuthSession { subject_id: u64::MAX, roles: RoleSet::new() };
        assert!(huge.user_id().is_err());
    }
}
