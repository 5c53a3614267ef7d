//! Order service driving a real product service over HTTP.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use catalog_api::InMemoryCatalog;
use chrono::Utc;
use common::ProductId;
use domain::seed_catalog;
use metrics_exporter_prometheus::PrometheusHandle;
use reconciliation::{CatalogClient, CoordinatorOptions, HttpCatalogClient, PlacementError};
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

/// Serves a seeded product service on an ephemeral port.
async fn spawn_product_service() -> (String, InMemoryCatalog) {
    let catalog = InMemoryCatalog::new(seed_catalog(Utc::now()));
    let app = catalog_api::create_app(catalog_api::create_state(catalog.clone()), get_metrics_handle());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), catalog)
}

/// Serves `/products` routes that answer only after `delay`.
async fn spawn_slow_product_service(delay: Duration) -> String {
    let slow = move || async move {
        tokio::time::sleep(delay).await;
        axum::Json(serde_json::json!({ "products": [] }))
    };
    let app = axum::Router::new().route("/products", axum::routing::get(slow).patch(slow));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn order_service(base_url: &str, options: CoordinatorOptions) -> axum::Router {
    let client = HttpCatalogClient::new(base_url, Duration::from_secs(5)).unwrap();
    api::create_app(api::create_default_state(client, options), get_metrics_handle())
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn inventory(catalog: &InMemoryCatalog, id: u64) -> u32 {
    catalog.get(ProductId::new(id)).await.unwrap().inventory_count
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_http_client_reads_and_writes_catalog() {
    let (base_url, catalog) = spawn_product_service().await;
    let client = HttpCatalogClient::new(&base_url, Duration::from_secs(5)).unwrap();

    let products = client.fetch_catalog().await.unwrap();
    assert_eq!(products.len(), 6);
    assert_eq!(products[0].price.cents(), 1050);

    let update = products[2].with_inventory(1);
    client.apply_inventory(vec![update]).await.unwrap();
    assert_eq!(inventory(&catalog, 3).await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_http_client_reports_rejected_update() {
    let (base_url, catalog) = spawn_product_service().await;
    let client = HttpCatalogClient::new(&base_url, Duration::from_secs(5)).unwrap();

    let mut products = client.fetch_catalog().await.unwrap();
    let mut ghost = products[0].with_inventory(0);
    ghost.id = ProductId::new(500);
    products.push(ghost);

    let err = client.apply_inventory(products).await.unwrap_err();

    assert!(matches!(err, PlacementError::CatalogUpdateFailed(_)));
    assert_eq!(inventory(&catalog, 1).await, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_catalog_times_out_with_typed_errors() {
    let base_url = spawn_slow_product_service(Duration::from_secs(5)).await;
    let client = HttpCatalogClient::new(&base_url, Duration::from_millis(200)).unwrap();

    let started = Instant::now();
    let err = client.fetch_catalog().await.unwrap_err();
    let elapsed = started.elapsed();
    match err {
        PlacementError::CatalogUnavailable(msg) => assert!(msg.contains("timed out"), "{msg}"),
        other => panic!("expected CatalogUnavailable, got {other:?}"),
    }
    assert!(elapsed < Duration::from_secs(2), "fetch took {elapsed:?}");

    let started = Instant::now();
    let err = client.apply_inventory(vec![]).await.unwrap_err();
    let elapsed = started.elapsed();
    match err {
        PlacementError::CatalogUpdateFailed(msg) => assert!(msg.contains("timed out"), "{msg}"),
        other => panic!("expected CatalogUpdateFailed, got {other:?}"),
    }
    assert!(elapsed < Duration::from_secs(2), "apply took {elapsed:?}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_catalog_fails_placement_with_500() {
    let base_url = spawn_slow_product_service(Duration::from_secs(5)).await;
    let client = HttpCatalogClient::new(&base_url, Duration::from_millis(200)).unwrap();
    let app = api::create_app(
        api::create_default_state(client, CoordinatorOptions::default()),
        get_metrics_handle(),
    );

    let (status, json) = send(
        &app,
        json_request(
            "POST",
            "/orders",
            serde_json::json!({ "items": [{ "product_id": 1, "product_qty": 1 }] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().contains("timed out"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_place_order_across_services() {
    let (base_url, catalog) = spawn_product_service().await;
    let app = order_service(&base_url, CoordinatorOptions::default());

    let (status, json) = send(
        &app,
        json_request(
            "POST",
            "/orders",
            serde_json::json!({
                "items": [
                    { "product_id": 1, "product_qty": 2 },
                    { "product_id": 4, "product_qty": 1 },
                    { "product_id": 6, "product_qty": 1 }
                ]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], 38.7);
    assert_eq!(json["discount"], 10);
    assert_eq!(inventory(&catalog, 1).await, 3);
    assert_eq!(inventory(&catalog, 4).await, 8);
    assert_eq!(inventory(&catalog, 6).await, 13);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_insufficient_inventory_across_services() {
    let (base_url, catalog) = spawn_product_service().await;
    let app = order_service(&base_url, CoordinatorOptions::default());

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/orders",
            serde_json::json!({ "items": [{ "product_id": 1, "product_qty": 6 }] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(inventory(&catalog, 1).await, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancel_restocks_across_services() {
    let (base_url, catalog) = spawn_product_service().await;
    let app = order_service(
        &base_url,
        CoordinatorOptions {
            restock_on_cancel: true,
        },
    );

    send(
        &app,
        json_request(
            "POST",
            "/orders",
            serde_json::json!({ "items": [{ "product_id": 5, "product_qty": 4 }] }),
        ),
    )
    .await;
    assert_eq!(inventory(&catalog, 5).await, 6);

    let (status, json) = send(
        &app,
        json_request("PATCH", "/orders/1", serde_json::json!({ "status": "Cancelled" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "Cancelled");
    assert_eq!(inventory(&catalog, 5).await, 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unreachable_catalog_returns_500() {
    // Nothing listens on port 9 in test environments.
    let app = order_service("http://127.0.0.1:9", CoordinatorOptions::default());

    let (status, json) = send(
        &app,
        json_request(
            "POST",
            "/orders",
            serde_json::json!({ "items": [{ "product_id": 1, "product_qty": 1 }] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().is_some());
}
