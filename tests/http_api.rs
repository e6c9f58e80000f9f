mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use storefront_api::app::build_router;
use tower::ServiceExt;

use common::{create_product, create_user, setup_state};

async fn send(app: &Router, request: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, body))
}

fn json_request(method: &str, uri: &str, body: &Value) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body)?))?)
}

fn empty_request(method: &str, uri: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())?)
}

#[tokio::test]
async fn health_reports_database_up() -> anyhow::Result<()> {
    let app = build_router(setup_state().await?, &[]);

    let (status, body) = send(&app, empty_request("GET", "/health")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "up");
    Ok(())
}

#[tokio::test]
async fn order_lifecycle_over_http() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user_id = create_user(&state.orm, "buyer").await?;
    let product_id = create_product(&state.orm, "Widget", 250).await?;
    let app = build_router(state, &[]);

    let payload = json!({
        "user_id": user_id,
        "status": "pending",
        "total": 500,
        "items": [{ "product_id": product_id, "quantity": 2, "price": 250 }]
    });
    let (status, body) = send(&app, json_request("POST", "/api/orders", &payload)?).await?;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = body["data"]["id"].as_i64().expect("order id");
    assert!(order_id > 0);
    let items = body["data"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert!(items[0]["id"].as_i64().expect("item id") > 0);
    assert_eq!(items[0]["order_id"].as_i64(), Some(order_id));

    let (status, body) = send(&app, empty_request("GET", "/api/orders")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["items"][0]["quantity"], 2);

    let update = json!({ "status": "paid", "payment_session_id": "cs_test_abc" });
    let uri = format!("/api/orders/{order_id}");
    let (status, body) = send(&app, json_request("PUT", &uri, &update)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "paid");
    assert_eq!(body["data"]["total"], 500);

    let (status, _) = send(&app, empty_request("DELETE", &uri)?).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, empty_request("GET", &uri)?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not Found");
    Ok(())
}

#[tokio::test]
async fn malformed_requests_are_bad_requests() -> anyhow::Result<()> {
    let app = build_router(setup_state().await?, &[]);

    let broken = Request::builder()
        .method("POST")
        .uri("/api/orders")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"user_id\": 1, \"items\": ["))?;
    let (status, _) = send(&app, broken).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, empty_request("GET", "/api/orders/not-a-number")?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let no_items = json!({ "user_id": 1, "total": 0, "items": [] });
    let (status, body) = send(&app, json_request("POST", "/api/orders", &no_items)?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["error"].as_str().unwrap_or_default().contains("item"));
    Ok(())
}

#[tokio::test]
async fn storage_failure_is_a_generic_server_error() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user_id = create_user(&state.orm, "buyer").await?;
    let app = build_router(state, &[]);

    let payload = json!({
        "user_id": user_id,
        "total": 100,
        "items": [{ "product_id": 31337, "quantity": 1, "price": 100 }]
    });
    let (status, body) = send(&app, json_request("POST", "/api/orders", &payload)?).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Database error");

    let (_, body) = send(&app, empty_request("GET", "/api/orders")?).await?;
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn catalogue_and_users_are_served() -> anyhow::Result<()> {
    let app = build_router(setup_state().await?, &[]);

    let product = json!({ "name": "Ferris Mug", "price": 1200 });
    let (status, body) =
        send(&app, json_request("POST", "/api/admin/products", &product)?).await?;
    assert_eq!(status, StatusCode::CREATED);
    let product_id = body["data"]["id"].as_i64().expect("product id");

    let (status, body) = send(&app, empty_request("GET", "/api/products")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"].as_i64(), Some(product_id));

    let user = json!({ "external_id": "idp|grace", "email": "grace@example.com" });
    let (status, body) = send(&app, json_request("POST", "/api/users", &user)?).await?;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = body["data"]["id"].as_i64().expect("user id");

    let (status, body) =
        send(&app, empty_request("GET", &format!("/api/users/{user_id}"))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "grace@example.com");
    Ok(())
}

#[tokio::test]
async fn unknown_route_uses_the_standard_envelope() -> anyhow::Result<()> {
    let app = build_router(setup_state().await?, &[]);

    let (status, body) = send(&app, empty_request("GET", "/api/nowhere")?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["path"], "/api/nowhere");
    Ok(())
}
