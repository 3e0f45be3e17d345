//! Request authentication and authorization.
//!
//! - [`session`]: cookie token verification and the [`AuthSession`] extractor
//! - [`role`]: all-of role checks per route group
//! - [`unauthorized`]: the uniform 401 body
//!
//! Protected routes run `require_session` then `require_roles`; both reject
//! with the same body.

pub mod role;
pub mod session;
pub mod unauthorized;

pub use role::{RoleRequirement, RoleRequirementError, guard};
pub use session::{AuthSession, SessionManager};
pub use unauthorized::{AuthFailure, UnauthorizedBody};
