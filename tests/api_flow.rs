//! 端到端 API 流程：路由 + 认证中间件 + SQLite（内存）

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf::infrastructure::http::{build_router, AppState};
use bookshelf::infrastructure::identity::StaticTokenVerifier;
use bookshelf::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteAuthorRepository, SqliteBookRepository,
    SqliteDescriptionRepository, SqlitePublisherRepository,
};

const ALICE: &str = "alice-token";
const BOB: &str = "bob-token";

async fn app() -> Router {
    let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
    run_migrations(&pool).await.unwrap();

    let verifier = StaticTokenVerifier::new([
        (ALICE.to_string(), "alice".to_string()),
        (BOB.to_string(), "bob".to_string()),
    ]);

    let state = AppState::new(
        Arc::new(SqliteBookRepository::new(pool.clone())),
        Arc::new(SqliteDescriptionRepository::new(pool.clone())),
        Arc::new(SqliteAuthorRepository::new(pool.clone())),
        Arc::new(SqlitePublisherRepository::new(pool)),
        Arc::new(verifier),
    );

    build_router(Arc::new(state))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_book(app: &Router, token: &str, body: Value) -> i64 {
    let (status, json) = send(app, Method::POST, "/books", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::OK, "{json}");
    json["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = app().await;
    let (status, json) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = app().await;

    let (status, json) = send(&app, Method::GET, "/books", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["errno"], 401);

    let (status, _) = send(&app, Method::GET, "/books", Some("nope"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_book_lifecycle() {
    let app = app().await;

    let id = create_book(
        &app,
        ALICE,
        json!({
            "title": "Rust in Action",
            "isbn": "9781617294556",
            "author_name": "Tim McNamara",
            "publisher_name": "Manning"
        }),
    )
    .await;

    // 列表
    let (status, json) = send(&app, Method::GET, "/books", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["errno"], 0);
    assert_eq!(json["data"]["total_count"], 1);
    assert_eq!(json["data"]["books"][0]["author"]["name"], "Tim McNamara");
    assert_eq!(json["data"]["books"][0]["read_state"], "not_read");

    // 阅读状态循环
    let uri = format!("/book/{}/state/start", id);
    let (status, json) = send(&app, Method::PUT, &uri, Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["read_state"], "reading");
    assert!(json["data"]["start_at"].is_string());

    let uri = format!("/book/{}/state/end", id);
    let (_, json) = send(&app, Method::PUT, &uri, Some(ALICE), None).await;
    assert_eq!(json["data"]["read_state"], "read");
    assert!(json["data"]["end_at"].is_string());

    // 状态过滤
    let (_, json) = send(&app, Method::GET, "/books?status=read", Some(ALICE), None).await;
    assert_eq!(json["data"]["total_count"], 1);
    let (_, json) = send(&app, Method::GET, "/books?status=reading", Some(ALICE), None).await;
    assert_eq!(json["data"]["total_count"], 0);

    // 笔记
    let uri = format!("/book/{}/description", id);
    let (status, json) = send(
        &app,
        Method::POST,
        &uri,
        Some(ALICE),
        Some(json!({ "content": "ownership chapter" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let description_id = json["data"]["id"].as_i64().unwrap();

    let (_, json) = send(&app, Method::GET, &uri, Some(ALICE), None).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let (_, json) = send(&app, Method::GET, &format!("/book/{}", id), Some(ALICE), None).await;
    assert_eq!(json["data"]["descriptions"][0]["content"], "ownership chapter");

    // 分享视图无需认证且不含阅读数据
    let (status, json) = send(&app, Method::GET, &format!("/share/book/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["title"], "Rust in Action");
    assert!(json["data"].get("read_state").is_none());
    assert_eq!(json["data"]["descriptions"].as_array().unwrap().len(), 1);

    // 删除笔记
    let uri = format!("/description/{}", description_id);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);

    // 删除书籍
    let uri = format!("/book/{}", id);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, json) = send(&app, Method::GET, &uri, Some(ALICE), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["errno"], 500);
}

#[tokio::test]
async fn test_missing_book_is_server_error_without_detail() {
    let app = app().await;

    for (method, uri) in [
        (Method::GET, "/book/999"),
        (Method::DELETE, "/book/999"),
        (Method::PUT, "/book/999/state/start"),
    ] {
        let (status, json) = send(&app, method, uri, Some(ALICE), None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(json["errno"], 500);
        assert_eq!(json["error"], "internal server error");
        assert!(json["data"].is_null());
    }
}

#[tokio::test]
async fn test_update_book_derives_read_state() {
    let app = app().await;
    let id = create_book(&app, ALICE, json!({ "title": "Dune" })).await;

    let (status, json) = send(
        &app,
        Method::PUT,
        "/books",
        Some(ALICE),
        Some(json!({
            "id": id,
            "title": "Dune Messiah",
            "start_at": "2024-01-01T00:00:00Z",
            "end_at": "2024-02-01T00:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["data"]["title"], "Dune Messiah");
    assert_eq!(json["data"]["read_state"], "read");

    // 只有结束时间
    let (status, _) = send(
        &app,
        Method::PUT,
        "/books",
        Some(ALICE),
        Some(json!({ "id": id, "title": "Dune", "end_at": "2024-02-01T00:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_books_are_scoped_to_account() {
    let app = app().await;
    let id = create_book(&app, ALICE, json!({ "title": "Private" })).await;

    let (_, json) = send(&app, Method::GET, "/books", Some(BOB), None).await;
    assert_eq!(json["data"]["total_count"], 0);

    let uri = format!("/book/{}", id);
    let (status, _) = send(&app, Method::GET, &uri, Some(BOB), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(BOB), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&app, Method::GET, &uri, Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_bad_input_is_rejected() {
    let app = app().await;

    let (status, _) = send(&app, Method::GET, "/book/abc", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/book/-1", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/books?sort_key=title;drop", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/books?status=finished", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, "/books", Some(ALICE), Some(json!({ "title": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/counted/date/born/daily", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_statistics() {
    let app = app().await;
    for (title, author) in [("A", "山田 太郎/Yamada Taro"), ("B", "山田太郎"), ("C", "Roe")] {
        create_book(&app, ALICE, json!({ "title": title, "author_name": author })).await;
    }
    create_book(&app, ALICE, json!({ "title": "D" })).await;

    let (status, json) = send(&app, Method::GET, "/counted/author", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][0]["name"], "山田太郎");
    assert_eq!(json["data"][0]["count"], 2);
    assert_eq!(json["data"][1]["name"], "Roe");
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let (_, json) = send(&app, Method::GET, "/counted_authors", Some(ALICE), None).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);

    let (status, json) = send(&app, Method::GET, "/counted/date/register/monthly", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][0]["count"], 4);

    // 没有开始阅读的书
    let (_, json) = send(&app, Method::GET, "/counted/date/start/daily", Some(ALICE), None).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_author_conflicts() {
    let app = app().await;
    let body = json!({ "name": "Ursula K. Le Guin" });

    let (status, _) = send(&app, Method::POST, "/author", Some(ALICE), Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(&app, Method::POST, "/author", Some(ALICE), Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["errno"], 409);
}
