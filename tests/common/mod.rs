#![allow(dead_code)]

use chrono::Utc;
use sea_orm::ActiveModelTrait;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{DatabaseConnection, Set};
use storefront_api::{
    db::{create_orm_conn, run_migrations},
    entity::{products::ActiveModel as ProductActive, users::ActiveModel as UserActive},
    models::{Order, OrderItem},
    repository::OrderRepository,
    state::AppState,
};

/// Fresh in-memory database with the full schema applied.
///
/// A single pooled connection keeps every query on the same SQLite memory
/// database.
pub async fn setup_state() -> anyhow::Result<AppState> {
    let orm = create_orm_conn("sqlite::memory:", 1).await?;
    run_migrations(&orm).await?;

    Ok(AppState {
        orders: OrderRepository::new(orm.clone()),
        orm,
        strict_existence: false,
    })
}

pub async fn create_user(orm: &DatabaseConnection, external_id: &str) -> anyhow::Result<i32> {
    let now = Utc::now();
    let user = UserActive {
        id: NotSet,
        external_id: Set(external_id.to_string()),
        email: Set(format!("{external_id}@example.com")),
        name: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(orm)
    .await?;

    Ok(user.id)
}

pub async fn create_product(orm: &DatabaseConnection, name: &str, price: i64) -> anyhow::Result<i32> {
    let now = Utc::now();
    let product = ProductActive {
        id: NotSet,
        name: Set(name.to_string()),
        description: Set(None),
        price: Set(price),
        payment_product_id: Set(None),
        payment_price_id: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(orm)
    .await?;

    Ok(product.id)
}

/// Unsaved order; `lines` are `(product_id, quantity, price)`.
pub fn new_order(user_id: i32, total: i64, lines: &[(i32, i32, i64)]) -> Order {
    Order {
        user_id,
        status: "pending".into(),
        total,
        items: lines
            .iter()
            .map(|&(product_id, quantity, price)| OrderItem {
                product_id,
                quantity,
                price,
                ..OrderItem::default()
            })
            .collect(),
        ..Order::default()
    }
}
