use axum::body::Body;
use axum::http::{Request, StatusCode};
use mockito::Matcher;
use order_api::app::build_router;
use order_api::config::ApiConfig;
use order_api::lifecycle::ApiSystem;
use std::collections::HashMap;
use tower::ServiceExt;

/// Full system against a fake sidecar: the dead letter accepted before shutdown
/// must be published by the time `shutdown` returns.
#[tokio::test]
async fn test_shutdown_drains_dead_letters() {
    let mut sidecar = mockito::Server::new_async().await;
    let publish = sidecar
        .mock("POST", "/v1.0/publish/orderpubsub/deadletters")
        .match_query(Matcher::Regex("metadata.reason=.*90".into()))
        .match_body(Matcher::Json(serde_json::json!({"customerId": 5, "orderId": 90})))
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let port = sidecar.socket_address().port().to_string();
    let env: HashMap<&str, &str> = HashMap::from([
        ("BASE_URL", "http://127.0.0.1"),
        ("DAPR_HTTP_PORT", port.as_str()),
        ("OUTBOUND_TIMEOUT_SECS", "2"),
    ]);
    let config = ApiConfig::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap();

    let system = ApiSystem::start(&config).unwrap();
    let app = build_router(system.state());

    let request = Request::builder()
        .method("POST")
        .uri("/orders")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({"data": {"customerId": 5, "orderId": 90}}).to_string(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    system.shutdown().await;
    publish.assert_async().await;
}
