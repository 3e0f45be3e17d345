mod common;

use axum::http::StatusCode;
use axum::response::Response;
use blog::blog_auth::RoleId;
use common::{
    TestUser, create_test_user, empty_request, generate_unique_login, json_request, resource_app,
    session_cookie,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

const WRITER_ROLES: [RoleId; 2] = [RoleId::COMMON, RoleId::MODERATOR];

async fn body_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn seed_user(pool: &PgPool, roles: &[RoleId]) -> (TestUser, String) {
    let mut tx = pool.begin().await.unwrap();
    let user = create_test_user(&mut tx, &generate_unique_login(), "password123", roles).await;
    tx.commit().await.unwrap();
    let cookie = session_cookie(pool, &user);
    (user, cookie)
}

async fn create_article(pool: &PgPool, cookie: &str, header: &str) -> i64 {
    let response = resource_app(pool.clone())
        .oneshot(json_request(
            "POST",
            "/v1/res/art",
            Some(cookie),
            json!({ "header": header, "topic": "rust", "short_text": "short", "long_text": "long" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["newid"].as_i64().unwrap()
}

async fn create_comment(pool: &PgPool, cookie: &str, article_id: i64, reply_id: Option<i64>) -> Response {
    resource_app(pool.clone())
        .oneshot(json_request(
            "POST",
            "/v1/res/comm",
            Some(cookie),
            json!({ "text": "nice post", "article_id": article_id, "reply_id": reply_id }),
        ))
        .await
        .unwrap()
}

async fn toggle_like(pool: &PgPool, cookie: &str, flag: bool, body: Value) -> Response {
    resource_app(pool.clone())
        .oneshot(json_request(
            "POST",
            &format!("/v1/res/like?flag={flag}"),
            Some(cookie),
            body,
        ))
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_moderator_creates_and_reads_article(pool: PgPool) {
    let (author, cookie) = seed_user(&pool, &WRITER_ROLES).await;
    let id = create_article(&pool, &cookie, "Hello").await;

    let response = resource_app(pool.clone())
        .oneshot(empty_request("GET", &format!("/v1/res/art/{id}"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let article = body_json(response).await;
    assert_eq!(article["header"], "Hello");
    assert_eq!(article["author_id"], author.id);
    assert_eq!(article["like_count"], 0);
    assert_eq!(article["comment_count"], 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_common_user_cannot_write_articles(pool: PgPool) {
    let (_, cookie) = seed_user(&pool, &[RoleId::COMMON]).await;

    let response = resource_app(pool.clone())
        .oneshot(json_request(
            "POST",
            "/v1/res/art",
            Some(&cookie),
            json!({ "header": "Nope" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error_type"], "Unauthorized");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);

    // Reading is still allowed.
    let response = resource_app(pool)
        .oneshot(empty_request("GET", "/v1/res/art", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_resources_require_session(pool: PgPool) {
    for (method, uri) in [
        ("GET", "/v1/res/art"),
        ("GET", "/v1/res/art/1"),
        ("GET", "/v1/res/comm/1"),
        ("DELETE", "/v1/res/art/1"),
        ("POST", "/v1/res/like?flag=true"),
    ] {
        let response = resource_app(pool.clone())
            .oneshot(empty_request(method, uri, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_article_pagination(pool: PgPool) {
    let (_, cookie) = seed_user(&pool, &WRITER_ROLES).await;
    for i in 0..5 {
        create_article(&pool, &cookie, &format!("Article {i}")).await;
    }

    let response = resource_app(pool.clone())
        .oneshot(empty_request("GET", "/v1/res/art?amount=2&page=1", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["total_count"], 5);
    assert_eq!(page["amount"], 2);
    assert_eq!(page["page"], 1);
    assert_eq!(page["has_more"], true);
    let articles = page["articles"].as_array().unwrap();
    assert_eq!(articles.len(), 2);
    // Newest first: page 1 holds the third and second newest.
    assert_eq!(articles[0]["header"], "Article 2");
    assert_eq!(articles[1]["header"], "Article 1");

    let response = resource_app(pool.clone())
        .oneshot(empty_request("GET", "/v1/res/art?amount=2&page=9", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert!(page["articles"].as_array().unwrap().is_empty());
    assert_eq!(page["has_more"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_article_author_only(pool: PgPool) {
    let (_, author_cookie) = seed_user(&pool, &WRITER_ROLES).await;
    let (_, other_cookie) = seed_user(&pool, &WRITER_ROLES).await;
    let (_, admin_cookie) =
        seed_user(&pool, &[RoleId::COMMON, RoleId::MODERATOR, RoleId::ADMIN]).await;
    let id = create_article(&pool, &author_cookie, "Original").await;
    let uri = format!("/v1/res/art/{id}");

    let response = resource_app(pool.clone())
        .oneshot(json_request("PUT", &uri, Some(&other_cookie), json!({ "header": "Stolen" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = resource_app(pool.clone())
        .oneshot(json_request("PUT", &uri, Some(&author_cookie), json!({ "header": "Edited" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let article = body_json(response).await;
    assert_eq!(article["header"], "Edited");
    assert_eq!(article["topic"], "rust");

    let response = resource_app(pool.clone())
        .oneshot(json_request("PUT", &uri, Some(&admin_cookie), json!({ "topic": "moderated" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["topic"], "moderated");

    let response = resource_app(pool)
        .oneshot(json_request(
            "PUT",
            "/v1/res/art/999999",
            Some(&author_cookie),
            json!({ "header": "Ghost" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_like_article_twice_conflicts(pool: PgPool) {
    let (_, cookie) = seed_user(&pool, &WRITER_ROLES).await;
    let id = create_article(&pool, &cookie, "Likeable").await;

    let response = toggle_like(&pool, &cookie, true, json!({ "article_id": id })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["liked"], true);

    let response = toggle_like(&pool, &cookie, true, json!({ "article_id": id })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = resource_app(pool.clone())
        .oneshot(empty_request("GET", &format!("/v1/res/art/{id}"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["like_count"], 1);

    let response = toggle_like(&pool, &cookie, false, json!({ "article_id": id })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["liked"], false);
    assert_eq!(body["message"], "Like removed");

    let response = toggle_like(&pool, &cookie, false, json!({ "article_id": id })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Nothing to remove");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_like_requires_single_existing_target(pool: PgPool) {
    let (_, cookie) = seed_user(&pool, &[RoleId::COMMON]).await;

    let response = toggle_like(&pool, &cookie, true, json!({ "article_id": 424242 })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = toggle_like(&pool, &cookie, true, json!({ "comment_id": 424242 })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = toggle_like(&pool, &cookie, true, json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response =
        toggle_like(&pool, &cookie, true, json!({ "article_id": 1, "comment_id": 1 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_comment_thread(pool: PgPool) {
    let (_, cookie) = seed_user(&pool, &WRITER_ROLES).await;
    let article_id = create_article(&pool, &cookie, "Discussed").await;

    let response = create_comment(&pool, &cookie, article_id, None).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let root_id = body_json(response).await["newid"].as_i64().unwrap();

    let response = create_comment(&pool, &cookie, article_id, Some(root_id)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let reply_id = body_json(response).await["newid"].as_i64().unwrap();

    let response = toggle_like(&pool, &cookie, true, json!({ "comment_id": reply_id })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = resource_app(pool.clone())
        .oneshot(empty_request("GET", &format!("/v1/res/comm/{article_id}"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let comments = body_json(response).await;
    let comments = comments.as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["id"], root_id);
    assert!(comments[0]["reply_id"].is_null());
    assert_eq!(comments[1]["reply_id"], root_id);
    assert_eq!(comments[1]["like_count"], 1);

    let response = resource_app(pool.clone())
        .oneshot(empty_request("GET", &format!("/v1/res/art/{article_id}"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["comment_count"], 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_comment_reply_rules(pool: PgPool) {
    let (_, cookie) = seed_user(&pool, &WRITER_ROLES).await;
    let first = create_article(&pool, &cookie, "First").await;
    let second = create_article(&pool, &cookie, "Second").await;

    let response = create_comment(&pool, &cookie, first, None).await;
    let on_first = body_json(response).await["newid"].as_i64().unwrap();

    // Replies stay within one article.
    let response = create_comment(&pool, &cookie, second, Some(on_first)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = create_comment(&pool, &cookie, first, Some(999999)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = create_comment(&pool, &cookie, 999999, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = create_comment(&pool, &cookie, first, Some(on_first)).await;
    let child = body_json(response).await["newid"].as_i64().unwrap();

    // Self reply.
    let response = resource_app(pool.clone())
        .oneshot(json_request(
            "PUT",
            &format!("/v1/res/comm/{on_first}"),
            Some(&cookie),
            json!({ "text": "edited", "reply_id": on_first }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Parent replying to its own child.
    let response = resource_app(pool.clone())
        .oneshot(json_request(
            "PUT",
            &format!("/v1/res/comm/{on_first}"),
            Some(&cookie),
            json!({ "text": "edited", "reply_id": child }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = resource_app(pool)
        .oneshot(json_request(
            "PUT",
            &format!("/v1/res/comm/{child}"),
            Some(&cookie),
            json!({ "text": "now top level" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let comment = body_json(response).await;
    assert_eq!(comment["text"], "now top level");
    assert!(comment["reply_id"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_article_cascades(pool: PgPool) {
    let (_, cookie) = seed_user(&pool, &WRITER_ROLES).await;
    let article_id = create_article(&pool, &cookie, "Doomed").await;
    let response = create_comment(&pool, &cookie, article_id, None).await;
    let comment_id = body_json(response).await["newid"].as_i64().unwrap();
    toggle_like(&pool, &cookie, true, json!({ "article_id": article_id })).await;
    toggle_like(&pool, &cookie, true, json!({ "comment_id": comment_id })).await;

    let response = resource_app(pool.clone())
        .oneshot(empty_request("DELETE", &format!("/v1/res/art/{article_id}"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    for table in ["articles", "comments", "likes"] {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0, "{table}");
    }

    let response = resource_app(pool.clone())
        .oneshot(empty_request("GET", &format!("/v1/res/comm/{article_id}"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = resource_app(pool)
        .oneshot(empty_request("DELETE", &format!("/v1/res/art/{article_id}"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
