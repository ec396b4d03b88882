use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use product_catalog_api::app::product::ProductStore;
use product_catalog_api::infrastructure::{AppConfig, Environment};
use product_catalog_api::{router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

const API_KEY: &str = "test-key";

fn test_config() -> AppConfig {
    AppConfig {
        api_key: API_KEY.to_string(),
        ..AppConfig::default()
    }
}

fn app_with(store: ProductStore, config: AppConfig) -> (Router, Arc<ProductStore>) {
    let store = Arc::new(store);
    let app = router(AppState::new(config, Arc::clone(&store)));
    (app, store)
}

fn sample_app() -> (Router, Arc<ProductStore>) {
    app_with(ProductStore::with_sample_data(), test_config())
}

fn request(method: Method, uri: &str, body: Option<Value>, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, request(Method::GET, uri, None, None)).await
}

fn widget() -> Value {
    json!({
        "name": "Xy",
        "description": "A widget",
        "price": 10,
        "category": "misc"
    })
}

#[tokio::test]
async fn test_root_describes_api() {
    let (app, _) = sample_app();
    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["endpoints"]["products"], "/api/products");
}

#[tokio::test]
async fn test_list_products_default_page() {
    let (app, _) = sample_app();
    let (status, body) = get(&app, "/api/products").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 3);
    assert_eq!(
        body["pagination"],
        json!({ "current": 1, "pages": 1, "total": 3, "limit": 10 })
    );
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Laptop", "Smartphone", "Coffee Maker"]);
}

#[tokio::test]
async fn test_list_products_with_filters_and_paging() {
    let (app, _) = sample_app();

    let (status, body) = get(&app, "/api/products?category=ELECTRONICS&limit=1&page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["name"], "Smartphone");
    assert_eq!(
        body["pagination"],
        json!({ "current": 2, "pages": 2, "total": 2, "limit": 1, "prev": 1 })
    );

    let (_, body) = get(&app, "/api/products?inStock=false").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["name"], "Coffee Maker");

    let (_, body) = get(&app, "/api/products?minPrice=100&maxPrice=1000").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["name"], "Smartphone");
}

#[tokio::test]
async fn test_list_out_of_range_page_is_empty() {
    let (app, _) = sample_app();
    let (status, body) = get(&app, "/api/products?page=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["pagination"]["pages"], 1);
    assert_eq!(body["pagination"]["total"], 3);
}

#[tokio::test]
async fn test_list_rejects_bad_query_params() {
    let (app, _) = sample_app();

    let (status, body) = get(&app, "/api/products?minPrice=100&maxPrice=50").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "Minimum price cannot be greater than maximum price"
    );
    assert!(body.get("stack").is_none());

    let (status, body) = get(&app, "/api/products?limit=0&page=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Page must be a positive integer");
}

#[tokio::test]
async fn test_search() {
    let (app, _) = sample_app();

    let (status, body) = get(&app, "/api/products/search?q=coffee").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "coffee");
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["name"], "Coffee Maker");

    let (status, body) = get(&app, "/api/products/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Search query is required. Use ?q=searchTerm"
    );

    let (status, _) = get(&app, "/api/products/search?q=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stats() {
    let (app, _) = sample_app();
    let (status, body) = get(&app, "/api/products/stats").await;
    assert_eq!(status, StatusCode::OK);

    let stats = &body["data"];
    assert_eq!(stats["totalProducts"], 3);
    assert_eq!(stats["inStockProducts"], 2);
    assert_eq!(stats["outOfStockProducts"], 1);
    assert_eq!(
        stats["categoryBreakdown"],
        json!({ "electronics": 2, "kitchen": 1 })
    );
    assert_eq!(
        stats["priceStatistics"],
        json!({ "min": 50.0, "max": 1200.0, "average": 683.33 })
    );
}

#[tokio::test]
async fn test_get_product() {
    let (app, _) = sample_app();

    let (status, body) = get(&app, "/api/products/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Coffee Maker");
    assert_eq!(body["data"]["inStock"], false);

    let (status, body) = get(&app, "/api/products/404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn test_create_get_delete_round_trip() {
    let (app, store) = app_with(ProductStore::new(), test_config());

    let (status, body) = send(
        &app,
        request(Method::POST, "/api/products", Some(widget()), Some(API_KEY)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Product created successfully");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = get(&app, &format!("/api/products/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({
            "id": id,
            "name": "Xy",
            "description": "A widget",
            "price": 10.0,
            "category": "misc",
            "inStock": true
        })
    );

    let (status, body) = send(
        &app,
        request(Method::DELETE, &format!("/api/products/{}", id), None, Some(API_KEY)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product deleted successfully");
    assert_eq!(body["data"]["id"], id.as_str());
    assert!(store.is_empty());

    let (status, _) = get(&app, &format!("/api/products/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_trims_text_fields() {
    let (app, _) = sample_app();
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/products",
            Some(json!({
                "name": "  Desk Lamp ",
                "description": " Warm light ",
                "price": 19.99,
                "category": " home ",
                "inStock": false
            })),
            Some(API_KEY),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "Desk Lamp");
    assert_eq!(body["data"]["description"], "Warm light");
    assert_eq!(body["data"]["category"], "home");
    assert_eq!(body["data"]["inStock"], false);
}

#[tokio::test]
async fn test_create_requires_api_key() {
    let (app, store) = sample_app();

    let (status, body) = send(
        &app,
        request(Method::POST, "/api/products", Some(widget()), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        "API key is required. Please include x-api-key in headers."
    );

    let (status, body) = send(
        &app,
        request(Method::POST, "/api/products", Some(widget()), Some("wrong")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid API key");
    assert_eq!(store.len(), 3);
}

#[tokio::test]
async fn test_create_reports_all_violations() {
    let (app, store) = sample_app();
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/products",
            Some(json!({ "name": "A", "price": -5, "category": "misc" })),
            Some(API_KEY),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Validation failed: Name is required and must be at least 2 characters long, \
         Description is required and must be at least 5 characters long, \
         Price is required and must be a positive number"
    );
    assert_eq!(store.len(), 3);
}

#[tokio::test]
async fn test_malformed_json_is_validation_error() {
    let (app, _) = sample_app();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/products")
        .header("x-api-key", API_KEY)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid JSON format");
}

#[tokio::test]
async fn test_update_product() {
    let (app, _) = sample_app();

    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            "/api/products/1",
            Some(json!({ "price": 999.5, "inStock": false })),
            Some(API_KEY),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product updated successfully");
    assert_eq!(body["data"]["price"], 999.5);
    assert_eq!(body["data"]["inStock"], false);
    assert_eq!(body["data"]["name"], "Laptop");

    let (_, body) = get(&app, "/api/products/1").await;
    assert_eq!(body["data"]["price"], 999.5);
}

#[tokio::test]
async fn test_update_with_empty_payload_is_noop() {
    let (app, _) = sample_app();
    let (_, before) = get(&app, "/api/products/2").await;

    let (status, body) = send(
        &app,
        request(Method::PUT, "/api/products/2", Some(json!({})), Some(API_KEY)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], before["data"]);
}

#[tokio::test]
async fn test_update_errors() {
    let (app, _) = sample_app();

    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            "/api/products/1",
            Some(json!({ "description": "tiny" })),
            Some(API_KEY),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Validation failed: Description must be at least 5 characters long"
    );

    let (status, _) = send(
        &app,
        request(
            Method::PUT,
            "/api/products/missing",
            Some(json!({ "price": 1 })),
            Some(API_KEY),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        request(Method::PUT, "/api/products/1", Some(json!({ "price": 1 })), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_missing_leaves_store_untouched() {
    let (app, store) = sample_app();
    let (status, body) = send(
        &app,
        request(Method::DELETE, "/api/products/nope", None, Some(API_KEY)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
    assert_eq!(store.len(), 3);
}

#[tokio::test]
async fn test_unmatched_route() {
    let (app, _) = sample_app();

    let (status, body) = get(&app, "/api/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Can't find /api/unknown on this server!");

    let (status, body) = send(
        &app,
        request(Method::PATCH, "/api/products/1", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        "Can't find /api/products/1 on this server!"
    );
}

#[tokio::test]
async fn test_unsupported_write_method_is_not_gated() {
    let (app, store) = sample_app();

    let (status, body) = send(
        &app,
        request(Method::POST, "/api/products/1", Some(widget()), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        "Can't find /api/products/1 on this server!"
    );

    let (status, body) = send(&app, request(Method::DELETE, "/api/products", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Can't find /api/products on this server!");

    let (status, _) = send(
        &app,
        request(Method::PUT, "/api/products/stats", Some(json!({})), Some("wrong")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(store.len(), 3);
}

#[tokio::test]
async fn test_api_key_checked_before_body() {
    let (app, _) = sample_app();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/products")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        "API key is required. Please include x-api-key in headers."
    );
}

#[tokio::test]
async fn test_update_without_json_content_type_is_rejected() {
    let (app, _) = sample_app();
    let req = Request::builder()
        .method(Method::PUT)
        .uri("/api/products/1")
        .header("x-api-key", API_KEY)
        .body(Body::from("{}"))
        .unwrap();

    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (_, body) = get(&app, "/api/products/1").await;
    assert_eq!(body["data"]["name"], "Laptop");
}

#[tokio::test]
async fn test_development_mode_adds_stack() {
    let config = AppConfig {
        environment: Environment::Development,
        ..test_config()
    };
    let (app, _) = app_with(ProductStore::with_sample_data(), config);

    let (status, body) = get(&app, "/api/products/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let stack = body["stack"].as_str().unwrap();
    assert!(stack.starts_with("NotFoundError: Product not found"));
    assert!(stack.contains("/api/products/missing"));
}
