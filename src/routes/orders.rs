use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::orders::{CreateOrderRequest, OrderList, UpdateOrderRequest},
    error::AppResult,
    models::Order,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route(
            "/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "All orders with their items, newest first", body = ApiResponse<OrderList>),
        (status = 500, description = "Internal Server Error"),
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with items", body = ApiResponse<Order>),
        (status = 400, description = "Invalid order id"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let Path(id) = id?;
    let resp = order_service::get_order(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created with all items", body = ApiResponse<Order>),
        (status = 400, description = "Invalid order payload"),
        (status = 500, description = "Internal Server Error"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Order>>)> {
    let Json(payload) = payload?;
    let resp = order_service::create_order(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order ID")
    ),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Status and payment session updated. When no order matches (lenient mode) the body echoes only the submitted id, status and payment_session_id; other fields are zero values, not a stored order", body = ApiResponse<Order>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Not Found (strict mode only)"),
    ),
    tag = "Orders"
)]
pub async fn update_order(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateOrderRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let resp = order_service::update_order(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order and its items deleted"),
        (status = 404, description = "Not Found (strict mode only)"),
    ),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let Path(id) = id?;
    let resp = order_service::delete_order(&state, id).await?;
    Ok(Json(resp))
}
