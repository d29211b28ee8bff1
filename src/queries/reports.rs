//! Read-only reporting queries.
//!
//! Reports are computed on read instead of being kept as SQL views: each
//! read recomputes its join + group-by + aggregate against the base
//! tables, so they carry no consistency obligation of their own and can be
//! cross-checked against the stored aggregates in tests. Emails come back in
//! stored (obfuscated) form; the service layer deobfuscates before display.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DbErr, FromQueryResult, Statement};
use serde::Serialize;

/// One order with its customer and a total recomputed from its rows.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct OrderSummary {
    pub order_id: i32,
    pub order_date: DateTime<Utc>,
    pub customer_name: String,
    pub customer_email: String,
    pub total_amount: Decimal,
}

/// One customer with a recomputed count of their orders. Customers with no
/// orders appear with 0.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct CustomerOrderCount {
    pub customer_id: i32,
    pub name: String,
    pub email: String,
    pub number_of_orders: i64,
}

/// One product with the total quantity sold across all order rows. Products
/// never sold appear with 0, not as an absent row.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct ProductSales {
    pub product_id: i32,
    pub product_name: String,
    pub total_quantity_sold: i64,
}

/// Orders joined with their customers, totals recomputed from the rows,
/// newest order first.
pub async fn order_summaries<C>(conn: &C) -> Result<Vec<OrderSummary>, DbErr>
where
    C: ConnectionTrait,
{
    let stmt = Statement::from_string(
        conn.get_database_backend(),
        r#"
        SELECT
            o.id AS order_id,
            o.order_date AS order_date,
            c.name AS customer_name,
            c.email AS customer_email,
            COALESCE(SUM(r.quantity * r.unit_price), 0) AS total_amount
        FROM orders o
        JOIN customers c ON c.id = o.customer_id
        LEFT JOIN order_rows r ON r.order_id = o.id
        GROUP BY o.id, o.order_date, c.name, c.email
        ORDER BY o.order_date DESC
        "#,
    );
    OrderSummary::find_by_statement(stmt).all(conn).await
}

/// Customers with their order counts, including customers with none.
pub async fn customer_order_counts<C>(conn: &C) -> Result<Vec<CustomerOrderCount>, DbErr>
where
    C: ConnectionTrait,
{
    let stmt = Statement::from_string(
        conn.get_database_backend(),
        r#"
        SELECT
            c.id AS customer_id,
            c.name AS name,
            c.email AS email,
            COALESCE(COUNT(o.id), 0) AS number_of_orders
        FROM customers c
        LEFT JOIN orders o ON o.customer_id = c.id
        GROUP BY c.id, c.name, c.email
        ORDER BY c.id
        "#,
    );
    CustomerOrderCount::find_by_statement(stmt).all(conn).await
}

/// Products with total quantity sold, including products never ordered.
pub async fn product_sales<C>(conn: &C) -> Result<Vec<ProductSales>, DbErr>
where
    C: ConnectionTrait,
{
    let stmt = Statement::from_string(
        conn.get_database_backend(),
        r#"
        SELECT
            p.id AS product_id,
            p.name AS product_name,
            COALESCE(SUM(r.quantity), 0) AS total_quantity_sold
        FROM products p
        LEFT JOIN order_rows r ON r.product_id = p.id
        GROUP BY p.id, p.name
        ORDER BY p.id
        "#,
    );
    ProductSales::find_by_statement(stmt).all(conn).await
}
