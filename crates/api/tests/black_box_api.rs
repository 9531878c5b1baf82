use std::sync::Arc;

use catalog_api::app::services::AppServices;
use reqwest::StatusCode;
use serde_json::{json, Value};

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod) over a fresh in-memory store, bound to an ephemeral port.
        let app = catalog_api::app::build_app(Arc::new(AppServices::in_memory()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create(&self, name: &str, price: f64) -> Value {
        let res = self
            .client
            .post(self.url("/products"))
            .json(&json!({ "name": name, "price": price }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        res.json().await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;

    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn incoming_request_id_is_echoed() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .get(srv.url("/health"))
        .header("x-request-id", "req-42")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn widget_lifecycle_over_http() {
    let srv = TestServer::spawn().await;

    let created = srv.create("Widget", 9.99).await;
    assert_eq!(created["id"], json!(1));
    assert_eq!(created["name"], json!("Widget"));
    assert_eq!(created["price"], json!(9.99));
    assert_eq!(created["isAvailable"], json!(true));

    let res = srv
        .client
        .get(srv.url("/products?page=1&limit=10"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let page: Value = res.json().await.unwrap();
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
    assert_eq!(page["data"][0]["id"], json!(1));
    assert_eq!(
        page["metadata"],
        json!({ "page": 1, "totalRows": 1, "totalPages": 1 })
    );

    let res = srv.client.delete(srv.url("/products/1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let removed: Value = res.json().await.unwrap();
    assert_eq!(removed["isAvailable"], json!(false));

    let res = srv.client.get(srv.url("/products/1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], json!("product_not_found"));
    assert_eq!(body["message"], json!("Product #1 not found"));
    assert_eq!(body["status"], json!(400));
}

#[tokio::test]
async fn list_uses_defaults_when_query_is_empty() {
    let srv = TestServer::spawn().await;
    for i in 0..12 {
        srv.create(&format!("Product {i}"), 1.0).await;
    }

    let res = srv.client.get(srv.url("/products")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let page: Value = res.json().await.unwrap();
    assert_eq!(page["data"].as_array().unwrap().len(), 10);
    assert_eq!(page["metadata"]["page"], json!(1));
    assert_eq!(page["metadata"]["totalRows"], json!(12));
    assert_eq!(page["metadata"]["totalPages"], json!(2));
}

#[tokio::test]
async fn malformed_requests_are_rejected() {
    let srv = TestServer::spawn().await;

    let res = srv.client.get(srv.url("/products/abc")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], json!("invalid_id"));

    let res = srv
        .client
        .get(srv.url("/products?page=0"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], json!("validation_error"));

    let res = srv
        .client
        .get(srv.url("/products?limit=many"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv
        .client
        .post(srv.url("/products"))
        .json(&json!({ "price": 1.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], json!("invalid_body"));
}

#[tokio::test]
async fn patch_ignores_id_in_body() {
    let srv = TestServer::spawn().await;
    srv.create("first", 1.0).await;
    srv.create("second", 2.0).await;

    let res = srv
        .client
        .patch(srv.url("/products/1"))
        .json(&json!({ "id": 2, "name": "X" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["id"], json!(1));
    assert_eq!(updated["name"], json!("X"));
    assert_eq!(updated["price"], json!(1.0));

    let other: Value = srv
        .client
        .get(srv.url("/products/2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(other["name"], json!("second"));
}

#[tokio::test]
async fn validate_collapses_duplicates_and_reports_missing_ids() {
    let srv = TestServer::spawn().await;
    srv.create("a", 1.0).await;
    srv.create("b", 2.0).await;

    // Soft-deleted products still count as existing.
    let res = srv.client.delete(srv.url("/products/2")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = srv
        .client
        .post(srv.url("/products/validate"))
        .json(&json!({ "ids": [1, 1, 2] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let rows: Value = res.json().await.unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 2);

    let res = srv
        .client
        .post(srv.url("/products/validate"))
        .json(&json!({ "ids": [1, 999] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], json!("products_not_found"));
    assert_eq!(body["message"], json!("One or more products were not found"));
}
