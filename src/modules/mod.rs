//! Feature modules. Each has `model`, `service`, `controller` and `router`.
//!
//! `users` is served by the user router; `articles`, `comments` and `likes`
//! by the resource router.

pub mod articles;
pub mod comments;
pub mod likes;
pub mod users;
