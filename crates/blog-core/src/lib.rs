//! # Blog Core
//!
//! Core types, errors, and utilities shared by the blog service crates.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Page/amount query parameters and response metadata
//! - [`password`]: bcrypt password hashing and verification
//! - [`ids`]: Path identifier checks
//!
//! # Example
//!
//! ```ignore
//! use blog_core::errors::AppError;
//! use blog_core::password::hash_password;
//!
//! let error = AppError::not_found(anyhow::anyhow!("Article not found"));
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod ids;
pub mod pagination;
pub mod password;

pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
