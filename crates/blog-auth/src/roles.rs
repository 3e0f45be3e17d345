use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric role identifier, as stored in `roles.id` and embedded in tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(pub u32);

impl RoleId {
    pub const GUEST: RoleId = RoleId(0);
    pub const COMMON: RoleId = RoleId(1);
    pub const MODERATOR: RoleId = RoleId(2);
    pub const ADMIN: RoleId = RoleId(3);

    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::GUEST => Some("guest"),
            Self::COMMON => Some("common"),
            Self::MODERATOR => Some("moderator"),
            Self::ADMIN => Some("admin"),
            _ => None,
        }
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "role#{}", self.0),
        }
    }
}

impl TryFrom<i32> for RoleId {
    type Error = std::num::TryFromIntError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u32::try_from(value).map(RoleId)
    }
}

/// Roles granted to a subject. Ordered so tokens serialize deterministically.
pub type RoleSet = BTreeSet<RoleId>;

/// Roles granted to every newly created account.
pub const DEFAULT_USER_ROLES: [RoleId; 2] = [RoleId::COMMON, RoleId::MODERATOR];
