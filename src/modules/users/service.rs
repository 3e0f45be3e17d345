use anyhow::anyhow;
use blog_auth::roles::DEFAULT_USER_ROLES;
use blog_auth::{RoleId, RoleSet};
use blog_core::{AppError, hash_password, verify_password};
use sqlx::PgPool;
use tracing::{instrument, warn};

use crate::modules::users::model::{
    CreateUserDto, Credentials, LoginRequest, UpdateContactInfoDto, UpdateLocationDto,
    UpdatePersonalInfoDto, UserProfile, UserProfileRow,
};

const PROFILE_SELECT: &str = r#"SELECT
        u.id,
        u.login,
        COALESCE(p.first_name, '') AS first_name,
        COALESCE(p.last_name, '') AS last_name,
        COALESCE(p.personal_status, '') AS personal_status,
        COALESCE(p.description, '') AS description,
        COALESCE(l.country, '') AS country,
        COALESCE(l.city, '') AS city,
        COALESCE(c.email, '') AS email,
        COALESCE(c.mobile, '') AS mobile,
        u.created_at
       FROM users u
       LEFT JOIN personal_infos p ON p.id = u.personal_info_id
       LEFT JOIN locations l ON l.id = p.location_id
       LEFT JOIN contact_infos c ON c.id = u.contact_info_id"#;

/// Identity established by a successful login.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub roles: RoleSet,
}

pub struct UserService;

impl UserService {
    /// Creates the account together with empty personal info, location and
    /// contact records, and grants the default roles.
    #[instrument]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<i64, AppError> {
        let password_hash = hash_password(&dto.password)?;

        let mut tx = db.begin().await?;

        let location_id: i64 =
            sqlx::query_scalar("INSERT INTO locations DEFAULT VALUES RETURNING id")
                .fetch_one(&mut *tx)
                .await?;

        let personal_info_id: i64 = sqlx::query_scalar(
            "INSERT INTO personal_infos (location_id) VALUES ($1) RETURNING id",
        )
        .bind(location_id)
        .fetch_one(&mut *tx)
        .await?;

        let contact_info_id: i64 =
            sqlx::query_scalar("INSERT INTO contact_infos (email) VALUES ($1) RETURNING id")
                .bind(&dto.email)
                .fetch_one(&mut *tx)
                .await?;

        let user_id: i64 = sqlx::query_scalar(
            r#"INSERT INTO users (login, password, personal_info_id, contact_info_id)
               VALUES ($1, $2, $3, $4)
               RETURNING id"#,
        )
        .bind(&dto.login)
        .bind(&password_hash)
        .bind(personal_info_id)
        .bind(contact_info_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::conflict(anyhow!("Login is already taken"));
            }
            AppError::from(e)
        })?;

        for role in DEFAULT_USER_ROLES {
            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
                .bind(user_id)
                .bind(role.0 as i32)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(user_id)
    }

    /// Checks the password and returns the user's id and current roles.
    ///
    /// Unknown logins and wrong passwords produce the same error.
    #[instrument]
    pub async fn authenticate(
        db: &PgPool,
        dto: &LoginRequest,
    ) -> Result<AuthenticatedUser, AppError> {
        let invalid = || AppError::bad_request(anyhow!("Invalid login or password"));

        let credentials = sqlx::query_as::<_, Credentials>(
            "SELECT id, password FROM users WHERE login = $1",
        )
        .bind(&dto.login)
        .fetch_optional(db)
        .await?
        .ok_or_else(invalid)?;

        if !verify_password(&dto.password, &credentials.password)? {
            return Err(invalid());
        }

        let roles = Self::get_user_roles(db, credentials.id).await?;

        Ok(AuthenticatedUser {
            user_id: credentials.id,
            roles,
        })
    }

    #[instrument]
    pub async fn get_user_roles(db: &PgPool, user_id: i64) -> Result<RoleSet, AppError> {
        let ids: Vec<i32> = sqlx::query_scalar(
            "SELECT role_id FROM user_roles WHERE user_id = $1 ORDER BY role_id",
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;

        let mut roles = RoleSet::new();
        for id in ids {
            match RoleId::try_from(id) {
                Ok(role) => {
                    roles.insert(role);
                }
                Err(_) => warn!(user_id, role_id = id, "Skipping negative role id"),
            }
        }
        Ok(roles)
    }

    #[instrument]
    pub async fn get_users(db: &PgPool) -> Result<Vec<UserProfile>, AppError> {
        let query = format!("{PROFILE_SELECT} ORDER BY u.id");
        let rows = sqlx::query_as::<_, UserProfileRow>(&query)
            .fetch_all(db)
            .await?;

        if rows.is_empty() {
            return Err(AppError::not_found(anyhow!("No users found")));
        }

        Ok(rows.into_iter().map(UserProfile::from).collect())
    }

    #[instrument]
    pub async fn get_user(db: &PgPool, user_id: i64) -> Result<UserProfile, AppError> {
        let query = format!("{PROFILE_SELECT} WHERE u.id = $1");
        let row = sqlx::query_as::<_, UserProfileRow>(&query)
            .bind(user_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        Ok(row.into())
    }

    /// Removes the user and every record hanging off it in one transaction.
    /// Roles, articles, comments and likes go with the user row by cascade.
    #[instrument]
    pub async fn delete_user(db: &PgPool, user_id: i64) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let refs: Option<(Option<i64>, Option<i64>, Option<i64>)> = sqlx::query_as(
            r#"SELECT u.personal_info_id, u.contact_info_id, p.location_id
               FROM users u
               LEFT JOIN personal_infos p ON p.id = u.personal_info_id
               WHERE u.id = $1
               FOR UPDATE OF u"#,
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((personal_info_id, contact_info_id, location_id)) = refs else {
            return Err(AppError::not_found(anyhow!("User not found")));
        };

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if let Some(id) = personal_info_id {
            sqlx::query("DELETE FROM personal_infos WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        if let Some(id) = location_id {
            sqlx::query("DELETE FROM locations WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        if let Some(id) = contact_info_id {
            sqlx::query("DELETE FROM contact_infos WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    #[instrument]
    pub async fn update_contact_info(
        db: &PgPool,
        user_id: i64,
        dto: UpdateContactInfoDto,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"UPDATE contact_infos c
               SET email = $1, mobile = $2
               FROM users u
               WHERE u.id = $3 AND c.id = u.contact_info_id"#,
        )
        .bind(&dto.email)
        .bind(&dto.mobile)
        .bind(user_id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("User not found")));
        }
        Ok(())
    }

    #[instrument]
    pub async fn update_personal_info(
        db: &PgPool,
        user_id: i64,
        dto: UpdatePersonalInfoDto,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"UPDATE personal_infos p
               SET first_name = $1, last_name = $2, personal_status = $3, description = $4
               FROM users u
               WHERE u.id = $5 AND p.id = u.personal_info_id"#,
        )
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.personal_status)
        .bind(&dto.description)
        .bind(user_id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("User not found")));
        }
        Ok(())
    }

    #[instrument]
    pub async fn update_location(
        db: &PgPool,
        user_id: i64,
        dto: UpdateLocationDto,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"UPDATE locations l
               SET country = $1, city = $2
               FROM users u
               JOIN personal_infos p ON p.id = u.personal_info_id
               WHERE u.id = $3 AND l.id = p.location_id"#,
        )
        .bind(&dto.country)
        .bind(&dto.city)
        .bind(user_id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("User not found")));
        }
        Ok(())
    }
}
