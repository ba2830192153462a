// ABOUTME: HTTP-level tests for the tags router
// ABOUTME: Drives handlers through the router and checks status codes and bodies

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::ServiceExt;

use storefront_api::{create_tags_router, DbState};

async fn test_app() -> (Router, SqlitePool) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .unwrap();

    storefront_storage::MIGRATOR.run(&pool).await.unwrap();

    for i in 1..=5 {
        sqlx::query("INSERT INTO products (product_name, price, stock) VALUES (?, ?, ?)")
            .bind(format!("Product {}", i))
            .bind(19.99_f64)
            .bind(10_i64)
            .execute(&pool)
            .await
            .unwrap();
    }

    let db = DbState::new(pool.clone());
    let app = Router::new()
        .nest("/api/tags", create_tags_router())
        .with_state(db);

    (app, pool)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn list_tags_returns_empty_array() {
    let (app, _pool) = test_app().await;

    let response = app.oneshot(get_request("/api/tags")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test]
async fn get_missing_tag_returns_404() {
    let (app, _pool) = test_app().await;

    let response = app.oneshot(get_request("/api/tags/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn create_with_products_returns_join_rows() {
    let (app, _pool) = test_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/tags",
            json!({ "tag_name": "metal", "productIds": [2, 5] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let rows = body.as_array().expect("expected an array of join rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["product_id"], json!(2));
    assert_eq!(rows[1]["product_id"], json!(5));
}

#[tokio::test]
async fn create_without_product_ids_returns_tag() {
    let (app, _pool) = test_app().await;

    // productIds omitted entirely: treated as an empty list
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/tags",
            json!({ "tag_name": "vinyl" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["tag_name"], json!("vinyl"));
    assert_eq!(body["products"], json!([]));
}

#[tokio::test]
async fn create_duplicate_name_returns_400() {
    let (app, pool) = test_app().await;

    let request = json!({ "tag_name": "metal", "productIds": [] });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/tags", request.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(json_request("POST", "/api/tags", request))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn update_reconciles_and_returns_counts_and_rows() {
    let (app, _pool) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/tags",
            json!({ "tag_name": "metal", "productIds": [1, 2, 3] }),
        ))
        .await
        .unwrap();
    let created = json_body(response).await;
    let tag_id = created[0]["tag_id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/tags/{}", tag_id),
            json!({ "tag_name": "metal", "productIds": [2, 3, 4] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body[0], json!(1));
    assert_eq!(body[1].as_array().unwrap().len(), 1);
    assert_eq!(body[1][0]["product_id"], json!(4));

    let response = app
        .oneshot(get_request(&format!("/api/tags/{}", tag_id)))
        .await
        .unwrap();
    let tag = json_body(response).await;
    let ids: Vec<i64> = tag["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 3, 4]);
}

#[tokio::test]
async fn update_missing_tag_returns_404() {
    let (app, pool) = test_app().await;

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/tags/999",
            json!({ "tag_name": "ghost", "productIds": [1] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product_tags")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn delete_returns_count_then_404() {
    let (app, _pool) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/tags",
            json!({ "tag_name": "doomed" }),
        ))
        .await
        .unwrap();
    let tag = json_body(response).await;
    let tag_id = tag["id"].as_i64().unwrap();

    let uri = format!("/api/tags/{}", tag_id);
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!(1));

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
