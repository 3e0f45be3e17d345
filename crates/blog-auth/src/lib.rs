//! # Blog Auth
//!
//! Session tokens and roles for the blog service.
//!
//! - [`roles`]: [`RoleId`] and the [`RoleSet`] carried by a session
//! - [`claims`]: the JWT payload
//! - [`jwt`]: [`TokenCodec`], which issues and verifies HS256 session tokens
//!
//! # Example
//!
//! ```ignore
//! use blog_auth::{RoleId, RoleSet, TokenCodec};
//! use blog_config::JwtConfig;
//!
//! let codec = TokenCodec::from_config(&JwtConfig::from_env());
//! let roles: RoleSet = [RoleId::COMMON].into_iter().collect();
//!
//! let token = codec.issue(42, &roles, codec.ttl())?;
//! let claims = codec.verify(&token)?;
//! assert_eq!(claims.sub, 42);
//! ```

pub mod claims;
pub mod jwt;
pub mod roles;

pub use claims::Claims;
pub use jwt::{TokenCodec, TokenError};
pub use roles::{RoleId, RoleSet};
