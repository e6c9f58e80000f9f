//! Persistence of the order aggregate.
//!
//! An [`Order`] is stored as one `orders` row plus one `order_items` row per
//! item. Creation and deletion touch both tables inside a single transaction so
//! that a header without its items, or items without their header, is never
//! observable.

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::{
    db,
    entity::{
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    models::{Order, OrderItem},
};

#[derive(Clone)]
pub struct OrderRepository {
    conn: DatabaseConnection,
}

impl OrderRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All orders, most recent first, each with its complete item list.
    pub async fn list(&self) -> Result<Vec<Order>, DbErr> {
        let headers = Orders::find()
            .order_by_desc(OrderCol::CreatedAt)
            .order_by_desc(OrderCol::Id)
            .all(&self.conn)
            .await?;

        // One item query per order; a single batched fetch is the obvious next step
        // if listing ever becomes hot.
        let mut orders = Vec::with_capacity(headers.len());
        for header in headers {
            let items = load_items(&self.conn, header.id).await?;
            orders.push(order_from_entity(header, items));
        }
        Ok(orders)
    }

    /// `Ok(None)` when no order has this id.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Order>, DbErr> {
        let header = match Orders::find_by_id(id).one(&self.conn).await? {
            Some(header) => header,
            None => return Ok(None),
        };
        let items = load_items(&self.conn, header.id).await?;
        Ok(Some(order_from_entity(header, items)))
    }

    /// Insert the header and every item atomically.
    ///
    /// On success `order` carries the assigned ids and timestamps, and every
    /// item's `order_id` points at the new header. On failure nothing was
    /// written and `order` is left as it was passed in.
    pub async fn create(&self, order: &mut Order) -> Result<(), DbErr> {
        let now = Utc::now();
        let txn = self.conn.begin().await?;
        let outcome = insert_aggregate(&txn, order, now).await;
        let (order_id, item_ids) = db::settle(txn, outcome).await?;

        order.id = order_id;
        order.created_at = now;
        order.updated_at = now;
        for (item, item_id) in order.items.iter_mut().zip(item_ids) {
            item.id = item_id;
            item.order_id = order_id;
            item.created_at = now;
            item.updated_at = now;
        }

        tracing::debug!(order_id, items = order.items.len(), "order created");
        Ok(())
    }

    /// Write `status` and `payment_session_id` of the header identified by
    /// `order.id`. Totals, owner and items are never modified here.
    ///
    /// Returns the number of rows affected, which is 0 when the order does not
    /// exist.
    pub async fn update(&self, order: &mut Order) -> Result<u64, DbErr> {
        let now = Utc::now();
        let result = Orders::update_many()
            .col_expr(OrderCol::Status, Expr::value(order.status.clone()))
            .col_expr(
                OrderCol::PaymentSessionId,
                Expr::value(order.payment_session_id.clone()),
            )
            .col_expr(OrderCol::UpdatedAt, Expr::value(to_db_time(now)))
            .filter(OrderCol::Id.eq(order.id))
            .exec(&self.conn)
            .await?;

        order.updated_at = now;
        tracing::debug!(order_id = order.id, rows = result.rows_affected, "order updated");
        Ok(result.rows_affected)
    }

    /// Delete the items and then the header in one transaction.
    ///
    /// Returns the number of header rows removed; deleting an unknown id is
    /// not an error.
    pub async fn delete(&self, id: i32) -> Result<u64, DbErr> {
        let txn = self.conn.begin().await?;
        let outcome = delete_aggregate(&txn, id).await;
        let removed = db::settle(txn, outcome).await?;

        tracing::debug!(order_id = id, rows = removed, "order deleted");
        Ok(removed)
    }
}

async fn load_items<C: ConnectionTrait>(conn: &C, order_id: i32) -> Result<Vec<OrderItem>, DbErr> {
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order_id))
        .order_by_asc(OrderItemCol::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();
    Ok(items)
}

async fn insert_aggregate<C: ConnectionTrait>(
    conn: &C,
    order: &Order,
    now: DateTime<Utc>,
) -> Result<(i32, Vec<i32>), DbErr> {
    let header = OrderActive {
        id: NotSet,
        user_id: Set(order.user_id),
        status: Set(order.status.clone()),
        total: Set(order.total),
        payment_session_id: Set(order.payment_session_id.clone()),
        created_at: Set(to_db_time(now)),
        updated_at: Set(to_db_time(now)),
    }
    .insert(conn)
    .await?;

    let mut item_ids = Vec::with_capacity(order.items.len());
    for item in &order.items {
        let row = OrderItemActive {
            id: NotSet,
            order_id: Set(header.id),
            product_id: Set(item.product_id),
            quantity: Set(item.quantity),
            price: Set(item.price),
            created_at: Set(to_db_time(now)),
            updated_at: Set(to_db_time(now)),
        }
        .insert(conn)
        .await?;
        item_ids.push(row.id);
    }

    Ok((header.id, item_ids))
}

async fn delete_aggregate<C: ConnectionTrait>(conn: &C, id: i32) -> Result<u64, DbErr> {
    OrderItems::delete_many()
        .filter(OrderItemCol::OrderId.eq(id))
        .exec(conn)
        .await?;

    let result = Orders::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected)
}

fn to_db_time(at: DateTime<Utc>) -> sea_orm::prelude::DateTimeWithTimeZone {
    at.into()
}

fn order_from_entity(model: OrderModel, items: Vec<OrderItem>) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        status: model.status,
        total: model.total,
        payment_session_id: model.payment_session_id,
        items,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        quantity: model.quantity,
        price: model.price,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
