use serde::{Deserialize, Serialize};

use crate::roles::RoleSet;

/// Payload of a session token.
///
/// `sub`, `roles` and `exp` are required; a token missing any of them is
/// malformed. `iat` defaults to 0 for tokens minted without it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id (subject claim)
    pub sub: u64,
    /// Roles granted at issuance
    pub roles: RoleSet,
    /// Expiration timestamp (Unix seconds)
    pub exp: i64,
    /// Issued-at timestamp (Unix seconds)
    #[serde(default)]
    pub iat: i64,
}
