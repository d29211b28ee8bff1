//! Aggregate maintenance engine.
//!
//! Two derived values are stored on base tables: `orders.total_amount` (sum
//! of `quantity * unit_price` over the order's rows) and
//! `customers.order_count` (count of the customer's orders). Instead of
//! database triggers, every mutation entry point in the service layer calls
//! the matching hook on its own transaction, so the detail change and the
//! aggregate update commit or roll back together.
//!
//! Recomputation is always a full re-aggregation over the current detail
//! set, never an incremental delta. A missed update path then shows up as a
//! stale value exactly until the next mutation, instead of drifting forever.

use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter};
use tracing::debug;

use crate::entities::{customer, order, order_row};

/// Recomputes and persists `orders.total_amount` for the given order as the
/// sum of `quantity * unit_price` over all of its current rows. An order
/// with no rows gets 0, never NULL.
///
/// Runs on the caller's connection, which for every service mutation is the
/// enclosing transaction.
pub async fn recompute_order_total<C>(conn: &C, order_id: i32) -> Result<Decimal, DbErr>
where
    C: ConnectionTrait,
{
    let rows = order_row::Entity::find()
        .filter(order_row::Column::OrderId.eq(order_id))
        .all(conn)
        .await?;

    let total: Decimal = rows.iter().map(order_row::Model::row_amount).sum();

    order::Entity::update_many()
        .col_expr(order::Column::TotalAmount, Expr::value(total))
        .filter(order::Column::Id.eq(order_id))
        .exec(conn)
        .await?;

    debug!(order_id, %total, "Recomputed order total");
    Ok(total)
}

/// Recomputes and persists `customers.order_count` for the given customer.
/// A customer with no orders gets 0.
pub async fn recompute_customer_order_count<C>(conn: &C, customer_id: i32) -> Result<i32, DbErr>
where
    C: ConnectionTrait,
{
    let count = order::Entity::find()
        .filter(order::Column::CustomerId.eq(customer_id))
        .count(conn)
        .await? as i32;

    customer::Entity::update_many()
        .col_expr(customer::Column::OrderCount, Expr::value(count))
        .filter(customer::Column::Id.eq(customer_id))
        .exec(conn)
        .await?;

    debug!(customer_id, count, "Recomputed customer order count");
    Ok(count)
}

/// Hook for a freshly inserted order row.
pub async fn on_order_row_inserted<C>(conn: &C, row: &order_row::Model) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    recompute_order_total(conn, row.order_id).await.map(|_| ())
}

/// Hook for an updated order row, keyed by the row's current order id.
pub async fn on_order_row_updated<C>(conn: &C, row: &order_row::Model) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    recompute_order_total(conn, row.order_id).await.map(|_| ())
}

/// Hook for a deleted order row. Takes the order id captured before the
/// delete, since the row itself is gone.
pub async fn on_order_row_deleted<C>(conn: &C, order_id: i32) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    recompute_order_total(conn, order_id).await.map(|_| ())
}

/// Hook for a freshly inserted order.
pub async fn on_order_inserted<C>(conn: &C, order: &order::Model) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    recompute_customer_order_count(conn, order.customer_id)
        .await
        .map(|_| ())
}

/// Hook for an updated order, keyed by the order's current customer id.
pub async fn on_order_updated<C>(conn: &C, order: &order::Model) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    recompute_customer_order_count(conn, order.customer_id)
        .await
        .map(|_| ())
}

/// Hook for a deleted order. Takes the customer id captured before the
/// delete.
pub async fn on_order_deleted<C>(conn: &C, customer_id: i32) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    recompute_customer_order_count(conn, customer_id)
        .await
        .map(|_| ())
}
