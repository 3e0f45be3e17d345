use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use blog::blog_auth::{RoleId, RoleSet};
use blog::blog_config::{CorsConfig, JwtConfig};
use blog::blog_core::hash_password;
use blog::router::{init_resource_router, init_user_router};
use blog::state::AppState;
#[allow(unused_imports)]
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestUser {
    pub id: i64,
    pub login: String,
    pub password: String,
    pub roles: Vec<RoleId>,
}

/// State with built-in JWT defaults and no metrics.
pub fn test_state(pool: PgPool) -> AppState {
    let jwt_config = JwtConfig::from_lookup(|key| match key {
        "JWT_SECRET" => Some("integration-test-secret".to_string()),
        _ => None,
    });
    AppState::new(
        pool,
        &jwt_config,
        CorsConfig::from_origins("http://localhost:3000"),
        None,
    )
}

#[allow(dead_code)]
pub fn user_app(pool: PgPool) -> Router {
    init_user_router(test_state(pool)).unwrap()
}

#[allow(dead_code)]
pub fn resource_app(pool: PgPool) -> Router {
    init_resource_router(test_state(pool)).unwrap()
}

/// Inserts a bare account with exactly the given roles.
pub async fn create_test_user(
    tx: &mut Transaction<'_, Postgres>,
    login: &str,
    password: &str,
    roles: &[RoleId],
) -> TestUser {
    let hashed = hash_password(password).unwrap();

    let contact_id: i64 = sqlx::query_scalar(
        "INSERT INTO contact_infos (email) VALUES ($1) RETURNING id",
    )
    .bind(format!("{login}@test.com"))
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    let location_id: i64 = sqlx::query_scalar("INSERT INTO locations DEFAULT VALUES RETURNING id")
        .fetch_one(&mut **tx)
        .await
        .unwrap();

    let personal_id: i64 = sqlx::query_scalar(
        "INSERT INTO personal_infos (location_id) VALUES ($1) RETURNING id",
    )
    .bind(location_id)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO users (login, password, personal_info_id, contact_info_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(login)
    .bind(&hashed)
    .bind(personal_id)
    .bind(contact_id)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    for role in roles {
        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
            .bind(id)
            .bind(role.0 as i32)
            .execute(&mut **tx)
            .await
            .unwrap();
    }

    TestUser {
        id,
        login: login.to_string(),
        password: password.to_string(),
        roles: roles.to_vec(),
    }
}

/// `Cookie` header value carrying a freshly signed session for `user`.
#[allow(dead_code)]
pub fn session_cookie(pool: &PgPool, user: &TestUser) -> String {
    let state = test_state(pool.clone());
    let roles: RoleSet = user.roles.iter().copied().collect();
    let (token, _) = state
        .sessions
        .issue_cookie(user.id as u64, &roles)
        .unwrap();
    format!("{}={}", state.sessions.cookie_name(), token)
}

#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn generate_unique_login() -> String {
    format!("user_{}", &Uuid::new_v4().simple().to_string()[..12])
}
