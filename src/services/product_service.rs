use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

use crate::dto::products::{CreateProductRequest, ProductList, UpdateProductRequest};
use crate::{
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_products(state: &AppState) -> AppResult<ApiResponse<ProductList>> {
    let items: Vec<Product> = Products::find()
        .order_by_asc(Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    let meta = Meta::with_total(items.len());
    let data = ProductList { items };
    Ok(ApiResponse::success("Products", data, Some(meta)))
}

pub async fn get_product(state: &AppState, id: i32) -> AppResult<ApiResponse<Product>> {
    let result = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(product_from_entity);
    let result = match result {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Product", result, None))
}

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    validate_name(&payload.name)?;
    validate_price(payload.price)?;

    let now = Utc::now();
    let active = ActiveModel {
        id: NotSet,
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        price: Set(payload.price),
        payment_product_id: Set(payload.payment_product_id),
        payment_price_id: Set(payload.payment_price_id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    let product = active.insert(&state.orm).await?;

    tracing::info!(product_id = product.id, "product created");
    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    id: i32,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        validate_name(&name)?;
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price {
        validate_price(price)?;
        active.price = Set(price);
    }
    if let Some(payment_product_id) = payload.payment_product_id {
        active.payment_product_id = Set(Some(payment_product_id));
    }
    if let Some(payment_price_id) = payload.payment_price_id {
        active.payment_price_id = Set(Some(payment_price_id));
    }
    active.updated_at = Set(Utc::now().into());

    let product = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidInput("name must not be empty".into()));
    }
    Ok(())
}

fn validate_price(price: i64) -> Result<(), AppError> {
    if price <= 0 {
        return Err(AppError::InvalidInput("price must be positive".into()));
    }
    Ok(())
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        payment_product_id: model.payment_product_id,
        payment_price_id: model.payment_price_id,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
