use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, QueryOrder, Set, SqlErr};

use crate::{
    dto::users::{CreateUserRequest, UpdateUserRequest, UserList},
    entity::users::{ActiveModel, Column, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_users(state: &AppState) -> AppResult<ApiResponse<UserList>> {
    let items: Vec<User> = Users::find()
        .order_by_asc(Column::Email)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(user_from_entity)
        .collect();

    let meta = Meta::with_total(items.len());
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

pub async fn get_user(state: &AppState, id: i32) -> AppResult<ApiResponse<User>> {
    let user = match Users::find_by_id(id).one(&state.orm).await? {
        Some(u) => u,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("User", user_from_entity(user), None))
}

pub async fn create_user(
    state: &AppState,
    payload: CreateUserRequest,
) -> AppResult<ApiResponse<User>> {
    let external_id = payload.external_id.trim();
    if external_id.is_empty() {
        return Err(AppError::InvalidInput("external_id must not be empty".into()));
    }
    validate_email(&payload.email)?;

    let now = Utc::now();
    let user = ActiveModel {
        id: NotSet,
        external_id: Set(external_id.to_string()),
        email: Set(payload.email.trim().to_string()),
        name: Set(payload.name),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await
    .map_err(duplicate_as_invalid)?;

    tracing::info!(user_id = user.id, "user created");
    Ok(ApiResponse::success(
        "User created",
        user_from_entity(user),
        Some(Meta::empty()),
    ))
}

pub async fn update_user(
    state: &AppState,
    id: i32,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<User>> {
    let existing = match Users::find_by_id(id).one(&state.orm).await? {
        Some(u) => u,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    if let Some(email) = payload.email {
        validate_email(&email)?;
        active.email = Set(email.trim().to_string());
    }
    if let Some(name) = payload.name {
        active.name = Set(Some(name));
    }
    active.updated_at = Set(Utc::now().into());

    let user = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        user_from_entity(user),
        Some(Meta::empty()),
    ))
}

pub async fn delete_user(
    state: &AppState,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Users::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(AppError::InvalidInput("email is not valid".into())),
    }
}

fn duplicate_as_invalid(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::InvalidInput("a user with this external_id already exists".into())
        }
        _ => AppError::StorageError(err),
    }
}

fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        external_id: model.external_id,
        email: model.email,
        name: model.name,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_needs_local_part_and_domain() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ada@").is_err());
        assert!(validate_email("ada").is_err());
    }
}
