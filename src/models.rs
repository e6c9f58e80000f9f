use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub external_id: String,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Current list price in minor units.
    pub price: i64,
    pub payment_product_id: Option<String>,
    pub payment_price_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order header together with the items it owns.
///
/// `id`, `created_at` and `updated_at` are assigned by the repository; an
/// order that has not been persisted yet carries `id == 0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub status: String,
    /// Amount charged in minor units, as supplied by the caller.
    pub total: i64,
    pub payment_session_id: Option<String>,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    /// Unit price at time of purchase, independent of the product's current price.
    pub price: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
