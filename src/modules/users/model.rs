use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub country: String,
    pub city: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub personal_status: String,
    pub description: String,
    pub location: Location,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContactInfo {
    pub email: String,
    pub mobile: String,
}

/// Public view of an account. The password hash never leaves the service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: i64,
    pub login: String,
    pub personal: PersonalInfo,
    pub contact: ContactInfo,
    pub created_at: DateTime<Utc>,
}

/// Flat join of a user with its sub-records; missing sub-records read as empty.
#[derive(Debug, FromRow)]
pub(crate) struct UserProfileRow {
    pub id: i64,
    pub login: String,
    pub first_name: String,
    pub last_name: String,
    pub personal_status: String,
    pub description: String,
    pub country: String,
    pub city: String,
    pub email: String,
    pub mobile: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserProfileRow> for UserProfile {
    fn from(row: UserProfileRow) -> Self {
        Self {
            id: row.id,
            login: row.login,
            personal: PersonalInfo {
                first_name: row.first_name,
                last_name: row.last_name,
                personal_status: row.personal_status,
                description: row.description,
                location: Location {
                    country: row.country,
                    city: row.city,
                },
            },
            contact: ContactInfo {
                email: row.email,
                mobile: row.mobile,
            },
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct Credentials {
    pub id: i64,
    pub password: String,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 3, max = 64, message = "login must be 3-64 characters"))]
    pub login: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "password must be 8-128 characters"))]
    pub password: String,
}

impl std::fmt::Debug for CreateUserDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserDto")
            .field("login", &self.login)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateUserResponse {
    pub id: i64,
    pub message: String,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "login is required"))]
    pub login: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateContactInfoDto {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub mobile: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePersonalInfoDto {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub last_name: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub personal_status: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLocationDto {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub country: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub city: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
