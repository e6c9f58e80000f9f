use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Order, OrderItem};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderItemRequest {
    pub product_id: i32,
    pub quantity: i32,
    /// Unit price to record for this line, in minor units.
    pub price: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub user_id: i32,
    /// Defaults to `pending`.
    pub status: Option<String>,
    pub total: i64,
    pub payment_session_id: Option<String>,
    pub items: Vec<CreateOrderItemRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub status: String,
    pub payment_session_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

impl From<CreateOrderRequest> for Order {
    fn from(payload: CreateOrderRequest) -> Self {
        let status = payload
            .status
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "pending".to_string());

        Order {
            user_id: payload.user_id,
            status,
            total: payload.total,
            payment_session_id: payload.payment_session_id,
            items: payload
                .items
                .into_iter()
                .map(|item| OrderItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price: item.price,
                    ..OrderItem::default()
                })
                .collect(),
            ..Order::default()
        }
    }
}
