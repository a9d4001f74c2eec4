//! Black-box tests: real PostgreSQL in a container, real actix-web server,
//! requests over HTTP with reqwest.

mod common;

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use storefront_service::{build_server, AppConfig, DbPool};

use common::{free_port, start_db, TestDb};

struct TestApp {
    _db: TestDb,
    pool: DbPool,
    base_url: String,
    http: Client,
}

async fn spawn_app() -> TestApp {
    let db = start_db(8).await;
    let config = AppConfig {
        host: "127.0.0.1".to_string(),
        port: free_port(),
        statement_timeout_ms: Some(5_000),
        ..db.config.clone()
    };

    let pool = db.pool.clone();
    let server = build_server(pool.clone(), &config).expect("Failed to bind the service");
    tokio::spawn(server);

    let base_url = format!("http://127.0.0.1:{}", config.port);
    let http = Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("client");

    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    while http.get(format!("{}/health", base_url)).send().await.is_err() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "service did not become ready"
        );
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    TestApp {
        _db: db,
        pool,
        base_url,
        http,
    }
}

impl TestApp {
    fn seed_user(&self, username: &str) -> i32 {
        common::seed_user(&self.pool, username)
    }

    fn seed_product(&self, name: &str, price: &str, stock: i32, category: Option<&str>) -> i32 {
        common::seed_product(&self.pool, name, price, stock, category)
    }

    fn stock_of(&self, product_id: i32) -> i32 {
        common::stock_of(&self.pool, product_id)
    }

    fn order_count(&self) -> i64 {
        common::order_count(&self.pool)
    }

    async fn post_order(&self, body: Value) -> (StatusCode, Value) {
        let resp = self
            .http
            .post(format!("{}/orders", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("POST /orders");
        let status = resp.status();
        (status, resp.json().await.expect("json body"))
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("GET");
        let status = resp.status();
        (status, resp.json().await.expect("json body"))
    }
}

#[tokio::test]
async fn order_lifecycle_over_http() {
    let app = spawn_app().await;
    let buyer = app.seed_user("alice");
    let product = app.seed_product("Desk Lamp", "10.00", 5, Some("lighting"));

    let (status, body) = app
        .post_order(json!({
            "user_id": buyer,
            "items": [{ "product_id": product, "quantity": 3 }]
        }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["total_amount"], "30.00");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["message"], "Order created successfully");
    assert_eq!(app.stock_of(product), 2);

    let order_id = body["order_id"].as_i64().expect("order_id");
    let (status, details) = app.get(&format!("/orders/{}", order_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["order_id"], order_id);
    assert_eq!(details["total_amount"], "30.00");
    assert_eq!(details["username"], "alice");
    assert_eq!(details["email"], "alice@example.com");
    assert_eq!(
        details["items"],
        json!([{
            "product_id": product,
            "product_name": "Desk Lamp",
            "quantity": 3,
            "price": "10.00"
        }])
    );

    let (status, body) = app
        .post_order(json!({
            "user_id": buyer,
            "items": [{ "product_id": product, "quantity": 5 }]
        }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        format!("Insufficient stock for product {}", product)
    );
    assert_eq!(app.stock_of(product), 2);
    assert_eq!(app.order_count(), 1);

    let (status, body) = app
        .post_order(json!({
            "user_id": buyer,
            "items": [
                { "product_id": product, "quantity": 1 },
                { "product_id": product + 500, "quantity": 1 }
            ]
        }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], format!("Product {} not found", product + 500));
    assert_eq!(app.stock_of(product), 2);

    let (status, body) = app.get(&format!("/orders/{}", order_id + 100)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Order not found");
}

#[tokio::test]
async fn malformed_order_requests_are_rejected_without_writes() {
    let app = spawn_app().await;
    let buyer = app.seed_user("bob");
    let product = app.seed_product("Pen", "1.25", 10, None);

    let (status, _) = app.post_order(json!({ "user_id": buyer, "items": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post_order(json!({ "user_id": 0, "items": [{ "product_id": product, "quantity": 1 }] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post_order(json!({ "user_id": buyer, "items": [{ "product_id": product, "quantity": 0 }] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let resp = app
        .http
        .post(format!("{}/orders", app.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("POST /orders");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("json body");
    assert_eq!(body["error"], "Invalid JSON");

    assert_eq!(app.stock_of(product), 10);
    assert_eq!(app.order_count(), 0);
}

#[tokio::test]
async fn concurrent_requests_for_last_unit_over_http() {
    let app = spawn_app().await;
    let first = app.seed_user("carol");
    let second = app.seed_user("dave");
    let product = app.seed_product("Limited Print", "250.00", 1, None);

    let order_a = app.post_order(json!({
        "user_id": first,
        "items": [{ "product_id": product, "quantity": 1 }]
    }));
    let order_b = app.post_order(json!({
        "user_id": second,
        "items": [{ "product_id": product, "quantity": 1 }]
    }));
    let ((a, _), (b, _)) = futures::join!(order_a, order_b);

    let mut statuses = vec![a, b];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::BAD_REQUEST]);
    assert_eq!(app.stock_of(product), 0);
    assert_eq!(app.order_count(), 1);
}

#[tokio::test]
async fn read_endpoints_over_http() {
    let app = spawn_app().await;
    let user = app.seed_user("erin");
    for i in 0..3 {
        app.seed_product(&format!("Novel {i}"), "12.50", 4, Some("books"));
    }
    app.seed_product("Stool", "35.00", 2, Some("furniture"));

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "storefront-service");

    let (status, body) = app.get(&format!("/users/{}", user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "erin");

    let (status, body) = app.get(&format!("/users/{}", user + 1)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let (status, body) = app.get("/users/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid user ID");

    let (status, body) = app.get("/orders/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid order ID");

    let (status, body) = app.get("/products?category=books&limit=2&page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"], json!({ "page": 2, "limit": 2, "total": 3 }));
    let listed = body["products"].as_array().expect("products array");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["category"], "books");
    assert_eq!(listed[0]["price"], "12.50");

    let (status, body) = app.get("/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"], json!({ "page": 1, "limit": 10, "total": 4 }));
}
