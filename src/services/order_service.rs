use crate::{
    dto::orders::{CreateOrderRequest, OrderList, UpdateOrderRequest},
    error::{AppError, AppResult},
    models::Order,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_orders(state: &AppState) -> AppResult<ApiResponse<OrderList>> {
    let orders = state.orders.list().await?;

    let meta = Meta::with_total(orders.len());
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order(state: &AppState, id: i32) -> AppResult<ApiResponse<Order>> {
    let order = match state.orders.find_by_id(id).await? {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    Ok(ApiResponse::success("OK", order, Some(Meta::empty())))
}

pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    validate_new_order(&payload)?;

    let mut order = Order::from(payload);
    state.orders.create(&mut order).await?;

    tracing::info!(order_id = order.id, user_id = order.user_id, "order placed");
    Ok(ApiResponse::success(
        "Order created",
        order,
        Some(Meta::empty()),
    ))
}

pub async fn update_order(
    state: &AppState,
    id: i32,
    payload: UpdateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    let status = payload.status.trim();
    if status.is_empty() {
        return Err(AppError::InvalidInput("status must not be empty".into()));
    }

    let mut order = Order {
        id,
        status: status.to_string(),
        payment_session_id: payload.payment_session_id,
        ..Order::default()
    };
    let affected = state.orders.update(&mut order).await?;

    if affected == 0 {
        if state.strict_existence {
            return Err(AppError::NotFound);
        }
        tracing::warn!(order_id = id, "update matched no order");
        // Only id, status and payment_session_id are meaningful in the echo.
        return Ok(ApiResponse::success(
            "No order matched; submitted fields echoed",
            order,
            Some(Meta::empty()),
        ));
    }

    // Re-read so the caller sees the stored total, owner and items.
    let order = match state.orders.find_by_id(id).await? {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    Ok(ApiResponse::success(
        "Order updated",
        order,
        Some(Meta::empty()),
    ))
}

pub async fn delete_order(
    state: &AppState,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let removed = state.orders.delete(id).await?;

    if removed == 0 {
        if state.strict_existence {
            return Err(AppError::NotFound);
        }
        tracing::warn!(order_id = id, "delete matched no order");
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn validate_new_order(payload: &CreateOrderRequest) -> Result<(), AppError> {
    if payload.user_id <= 0 {
        return Err(AppError::InvalidInput("user_id must be positive".into()));
    }
    if payload.total < 0 {
        return Err(AppError::InvalidInput("total must not be negative".into()));
    }
    if payload.items.is_empty() {
        return Err(AppError::InvalidInput("order must contain at least one item".into()));
    }
    for item in &payload.items {
        if item.product_id <= 0 {
            return Err(AppError::InvalidInput("product_id must be positive".into()));
        }
        if item.quantity <= 0 {
            return Err(AppError::InvalidInput(format!(
                "quantity for product {} must be positive",
                item.product_id
            )));
        }
        if item.price < 0 {
            return Err(AppError::InvalidInput(format!(
                "price for product {} must not be negative",
                item.product_id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::orders::CreateOrderItemRequest;

    fn request(items: Vec<CreateOrderItemRequest>) -> CreateOrderRequest {
        CreateOrderRequest {
            user_id: 1,
            status: None,
            total: 500,
            payment_session_id: None,
            items,
        }
    }

    fn item(product_id: i32, quantity: i32, price: i64) -> CreateOrderItemRequest {
        CreateOrderItemRequest {
            product_id,
            quantity,
            price,
        }
    }

    #[test]
    fn accepts_well_formed_order() {
        assert!(validate_new_order(&request(vec![item(7, 2, 250)])).is_ok());
    }

    #[test]
    fn rejects_order_without_items() {
        let err = validate_new_order(&request(vec![])).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn rejects_non_positive_quantity() {
        let err = validate_new_order(&request(vec![item(7, 0, 250)])).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(msg) if msg.contains("quantity")));
    }

    #[test]
    fn rejects_negative_amounts() {
        assert!(validate_new_order(&request(vec![item(7, 1, -1)])).is_err());

        let mut payload = request(vec![item(7, 1, 100)]);
        payload.total = -5;
        assert!(validate_new_order(&payload).is_err());
    }

    #[test]
    fn missing_status_defaults_to_pending() {
        let order = Order::from(request(vec![item(7, 2, 250)]));
        assert_eq!(order.status, "pending");
        assert_eq!(order.id, 0);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].order_id, 0);
    }
}
