//! Integration tests for the product service.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use catalog_api::routes::products::AppState;
use common::ProductId;
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            metrics_exporter_prometheus::PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> (axum::Router, Arc<AppState>) {
    let state = catalog_api::create_default_state();
    let app = catalog_api::create_app(state.clone(), get_metrics_handle());
    (app, state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn patch_products(body: String) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri("/products")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_list_products_returns_seed_catalog() {
    let (app, _) = setup();

    let response = app
        .oneshot(Request::builder().uri("/products").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let products = json["products"].as_array().unwrap();
    assert_eq!(products.len(), 6);
    assert_eq!(products[0]["id"], 1);
    assert_eq!(products[0]["name"], "Product 1");
    assert_eq!(products[0]["price"], 10.5);
    assert_eq!(products[0]["inventory_count"], 5);
    assert_eq!(products[0]["category"], "Premium");
    assert!(products[0]["created_at"].as_str().is_some());
    assert_eq!(products[5]["id"], 6);
}

#[tokio::test]
async fn test_get_product_by_id() {
    let (app, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/products/4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["price"], 12.5);
    assert_eq!(json["inventory_count"], 9);
}

#[tokio::test]
async fn test_get_unknown_product_returns_404() {
    let (app, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/products/42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["error"].as_str().is_some());
}

#[tokio::test]
async fn test_get_invalid_id_returns_400() {
    let (app, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/products/abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_overwrites_inventory() {
    let (app, state) = setup();
    let mut product = state.catalog.get(ProductId::new(3)).await.unwrap();
    product.inventory_count = 4;

    let response = app
        .oneshot(patch_products(
            serde_json::to_string(&vec![product]).unwrap(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["updated"], 1);
    assert_eq!(
        state
            .catalog
            .get(ProductId::new(3))
            .await
            .unwrap()
            .inventory_count,
        4
    );
}

#[tokio::test]
async fn test_patch_with_unknown_id_applies_nothing() {
    let (app, state) = setup();
    let known = state.catalog.get(ProductId::new(1)).await.unwrap();
    let body = serde_json::json!([
        {
            "id": 1,
            "name": known.name,
            "price": 10.5,
            "inventory_count": 0,
            "category": "Premium",
            "created_at": known.created_at,
        },
        {
            "id": 77,
            "name": "Ghost",
            "price": 1.0,
            "inventory_count": 0,
            "category": "Budget",
            "created_at": known.created_at,
        }
    ]);

    let response = app
        .oneshot(patch_products(body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        state
            .catalog
            .get(ProductId::new(1))
            .await
            .unwrap()
            .inventory_count,
        5
    );
}

#[tokio::test]
async fn test_patch_malformed_body_returns_400() {
    let (app, _) = setup();

    let response = app
        .oneshot(patch_products("{\"not\": \"a list\"".to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].as_str().is_some());
}

#[tokio::test]
async fn test_patch_negative_inventory_returns_400() {
    let (app, state) = setup();
    let known = state.catalog.get(ProductId::new(2)).await.unwrap();
    let body = serde_json::json!([{
        "id": 2,
        "name": known.name,
        "price": 5.5,
        "inventory_count": -1,
        "category": "Regular",
        "created_at": known.created_at,
    }]);

    let response = app
        .oneshot(patch_products(body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_negative_price_returns_400() {
    let (app, state) = setup();
    let known = state.catalog.get(ProductId::new(2)).await.unwrap();
    let body = serde_json::json!([{
        "id": 2,
        "name": known.name,
        "price": -5.0,
        "inventory_count": 3,
        "category": "Regular",
        "created_at": known.created_at,
    }]);

    let response = app
        .oneshot(patch_products(body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        state
            .catalog
            .get(ProductId::new(2))
            .await
            .unwrap()
            .inventory_count,
        7
    );
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _) = setup();

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.starts_with("text/plain"));
}
