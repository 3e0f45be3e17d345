//! # Blog API
//!
//! A blog backend built with Axum and PostgreSQL: user accounts with profile,
//! contact and location records, articles, comments and likes.
//!
//! ## Routers
//!
//! Two routers share one [`state::AppState`] and are served on separate
//! listeners:
//!
//! - **user router** (`USER_HTTP_ADDR`): `/v1/user/...`, `/scalar`, `/metrics`
//! - **resource router** (`RESOURCE_HTTP_ADDR`): `/v1/res/...`
//!
//! ## Sessions
//!
//! Logging in (`PUT /v1/user`) sets an HTTP-only cookie holding an HS256 JWT
//! with the user id, the user's role ids and an expiry. Protected routes run
//! [`middleware::session::require_session`] and then
//! [`middleware::role::require_roles`]; a route group lists the roles it needs
//! and a session must hold all of them. Every rejection carries the same 401
//! body.
//!
//! | Role | Id |
//! |------|----|
//! | guest | 0 |
//! | common | 1 |
//! | moderator | 2 |
//! | admin | 3 |
//!
//! New accounts get `common` and `moderator`.
//!
//! ## Layout
//!
//! ```text
//! crates/
//! ├── blog-core/     # AppError, pagination, password hashing
//! ├── blog-config/   # JwtConfig, CorsConfig, ServerConfig
//! ├── blog-auth/     # RoleId, Claims, TokenCodec
//! └── blog-db/       # pool + migrations
//! src/
//! ├── middleware/    # session, role, unauthorized
//! ├── modules/       # users, articles, comments, likes
//! ├── router.rs      # init_user_router, init_resource_router
//! └── ...
//! ```

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

pub use blog_auth;
pub use blog_config;
pub use blog_core;
pub use blog_db;
