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
    dto::users::{CreateUserRequest, UpdateUserRequest, UserList},
    error::AppResult,
    models::User,
    response::ApiResponse,
    services::user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "List users", body = ApiResponse<UserList>)
    ),
    tag = "Users"
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = user_service::list_users(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Get user", body = ApiResponse<User>),
        (status = 404, description = "User not found"),
    ),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<ApiResponse<User>>> {
    let Path(id) = id?;
    let resp = user_service::get_user(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Create user", body = ApiResponse<User>),
        (status = 400, description = "Invalid payload or duplicate external_id"),
    ),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let Json(payload) = payload?;
    let resp = user_service::create_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = ApiResponse<User>),
        (status = 404, description = "User not found"),
    ),
    tag = "Users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<User>>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let resp = user_service::update_user(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Deleted user"),
        (status = 404, description = "User not found"),
    ),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let Path(id) = id?;
    let resp = user_service::delete_user(&state, id).await?;
    Ok(Json(resp))
}
