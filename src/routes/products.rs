use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::{get, post, put},
};

use crate::{
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    error::AppResult,
    models::Product,
    response::ApiResponse,
    services::product_service,
    state::AppState,
};

/// Public catalogue.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/{id}", get(get_product))
}

/// Catalogue management.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_product))
        .route("/{id}", put(update_product).delete(delete_product))
}

#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let Path(id) = id?;
    let resp = product_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Create product", body = ApiResponse<Product>),
        (status = 400, description = "Invalid product payload"),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let Json(payload) = payload?;
    let resp = product_service::create_product(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let resp = product_service::update_product(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted product"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let Path(id) = id?;
    let resp = product_service::delete_product(&state, id).await?;
    Ok(Json(resp))
}
