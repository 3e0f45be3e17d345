use std::env;

pub const DEFAULT_COOKIE_NAME: &str = "jwt_token";
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
/// Longest accepted token lifetime (one year).
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Session token settings.
///
/// The secret, TTL and cookie name are read once at startup and stay constant
/// for the process lifetime.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub token_ttl_hours: i64,
    pub cookie_name: String,
    pub cookie_secure: bool,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, falling back to
    /// defaults for missing or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            secret: lookup("JWT_SECRET")
                .unwrap_or_else(|| "your-secret-key-change-in-production".to_string()),
            token_ttl_hours: lookup("JWT_TOKEN_TTL_HOURS")
                .and_then(|s| s.parse().ok())
                .filter(|hours: &i64| *hours > 0)
                .map(|hours| hours.min(MAX_TOKEN_TTL_HOURS))
                .unwrap_or(DEFAULT_TOKEN_TTL_HOURS),
            cookie_name: lookup("JWT_COOKIE_NAME")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
            cookie_secure: lookup("JWT_COOKIE_SECURE")
                .map(|s| matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(false),
        }
    }

    pub fn token_ttl_seconds(&self) -> i64 {
        self.token_ttl_hours.saturating_mul(3600)
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("cookie_name", &self.cookie_name)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}
