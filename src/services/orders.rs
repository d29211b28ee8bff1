use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    aggregates, crypto,
    db::DbPool,
    entities::{
        customer::{self, Entity as CustomerEntity},
        order::{self, Entity as OrderEntity, OrderStatus},
        order_row::{self, Entity as OrderRowEntity},
        product::Entity as ProductEntity,
    },
    errors::ServiceError,
    queries::reports::{self, OrderSummary},
    services::{validate_pagination, Page},
};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct OrderItemInput {
    pub product_id: i32,
    #[validate(range(min = 1, message = "Quantity must be a positive number"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub customer_id: i32,
    #[validate(length(min = 1, message = "An order needs at least one line item"))]
    pub items: Vec<OrderItemInput>,
}

/// One order in a listing, with the owning customer's name and the stored
/// (engine-maintained) total.
#[derive(Debug, Serialize)]
pub struct OrderListItem {
    pub id: i32,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub customer_name: String,
    pub total_amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct OrderRowDetail {
    pub row_id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub row_amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct OrderDetails {
    pub id: i32,
    pub customer_id: i32,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub rows: Vec<OrderRowDetail>,
}

/// Service for managing orders and their rows.
///
/// Every mutation runs in one transaction together with the aggregate
/// recompute it triggers, so a failure rolls back both and no reader ever
/// sees a detail row without a consistent parent total or order count.
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
}

impl OrderService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists orders ordered by id, one page at a time, with customer names.
    #[instrument(skip(self))]
    pub async fn list(&self, page: u64, page_size: u64) -> Result<Page<OrderListItem>, ServiceError> {
        validate_pagination(page, page_size)?;
        let db = &*self.db_pool;

        let paginator = OrderEntity::find()
            .order_by_asc(order::Column::Id)
            .paginate(db, page_size);
        let total = paginator.num_items().await?;
        let orders = paginator.fetch_page(page - 1).await?;

        let items = self.with_customer_names(orders).await?;
        Ok(Page {
            items,
            total,
            page,
            page_size,
        })
    }

    /// All orders belonging to one customer, oldest first.
    #[instrument(skip(self))]
    pub async fn list_by_customer(&self, customer_id: i32) -> Result<Vec<OrderListItem>, ServiceError> {
        let db = &*self.db_pool;
        CustomerEntity::find_by_id(customer_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("customer {customer_id}")))?;

        let orders = OrderEntity::find()
            .filter(order::Column::CustomerId.eq(customer_id))
            .order_by_asc(order::Column::Id)
            .all(db)
            .await?;
        self.with_customer_names(orders).await
    }

    /// All orders with the given status, oldest first.
    #[instrument(skip(self))]
    pub async fn list_by_status(&self, status: OrderStatus) -> Result<Vec<OrderListItem>, ServiceError> {
        let db = &*self.db_pool;
        let orders = OrderEntity::find()
            .filter(order::Column::Status.eq(status))
            .order_by_asc(order::Column::Id)
            .all(db)
            .await?;
        self.with_customer_names(orders).await
    }

    /// Gets an order with its rows and product names.
    #[instrument(skip(self))]
    pub async fn get_details(&self, order_id: i32) -> Result<OrderDetails, ServiceError> {
        let db = &*self.db_pool;
        let order = OrderEntity::find_by_id(order_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("order {order_id}")))?;

        let rows = OrderRowEntity::find()
            .filter(order_row::Column::OrderId.eq(order_id))
            .order_by_asc(order_row::Column::Id)
            .find_also_related(ProductEntity)
            .all(db)
            .await?;

        let rows = rows
            .into_iter()
            .map(|(row, product)| OrderRowDetail {
                row_id: row.id,
                product_id: row.product_id,
                product_name: product.map(|p| p.name).unwrap_or_default(),
                quantity: row.quantity,
                unit_price: row.unit_price,
                row_amount: row.row_amount(),
            })
            .collect();

        Ok(OrderDetails {
            id: order.id,
            customer_id: order.customer_id,
            order_date: order.order_date,
            status: order.status,
            total_amount: order.total_amount,
            rows,
        })
    }

    /// Creates an order with one or more rows. Each row captures the
    /// product's current price as its immutable unit price. The order total
    /// and the customer's order count are recomputed in the same
    /// transaction.
    #[instrument(skip(self, request), fields(customer_id = request.customer_id))]
    pub async fn create(&self, request: CreateOrderRequest) -> Result<OrderDetails, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        for item in &request.items {
            item.validate()
                .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        }

        let db = &*self.db_pool;
        let txn = db.begin().await?;

        CustomerEntity::find_by_id(request.customer_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("customer {}", request.customer_id)))?;

        let order = order::ActiveModel {
            customer_id: Set(request.customer_id),
            order_date: Set(Utc::now()),
            status: Set(OrderStatus::Processing),
            total_amount: Set(Decimal::ZERO),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::from_db)?;

        for item in &request.items {
            let product = ProductEntity::find_by_id(item.product_id)
                .one(&txn)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("product {}", item.product_id)))?;

            let row = order_row::ActiveModel {
                order_id: Set(order.id),
                product_id: Set(product.id),
                quantity: Set(item.quantity),
                unit_price: Set(product.price),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::from_db)?;

            aggregates::on_order_row_inserted(&txn, &row).await?;
        }

        aggregates::on_order_inserted(&txn, &order).await?;
        txn.commit().await?;

        info!(order_id = order.id, customer_id = order.customer_id, "Order created");
        self.get_details(order.id).await
    }

    /// Updates an order's status.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        order_id: i32,
        status: OrderStatus,
    ) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await?;

        let order = OrderEntity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("order {order_id}")))?;

        let mut active: order::ActiveModel = order.into();
        active.status = Set(status);
        let updated = active.update(&txn).await.map_err(ServiceError::from_db)?;

        aggregates::on_order_updated(&txn, &updated).await?;
        txn.commit().await?;

        info!(order_id, %status, "Order status updated");
        Ok(())
    }

    /// Deletes an order and (by cascade) its rows, then recomputes the
    /// owning customer's order count in the same transaction.
    #[instrument(skip(self))]
    pub async fn delete(&self, order_id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await?;

        let order = OrderEntity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("order {order_id}")))?;

        // The foreign key is about to disappear with the order.
        let customer_id = order.customer_id;
        order.delete(&txn).await.map_err(ServiceError::from_db)?;
        aggregates::on_order_deleted(&txn, customer_id).await?;
        txn.commit().await?;

        info!(order_id, "Order deleted");
        Ok(())
    }

    /// Adds a row to an existing order, capturing the product's current
    /// price, and recomputes the order total in the same transaction.
    #[instrument(skip(self, item), fields(product_id = item.product_id))]
    pub async fn add_row(
        &self,
        order_id: i32,
        item: OrderItemInput,
    ) -> Result<OrderDetails, ServiceError> {
        item.validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let txn = db.begin().await?;

        OrderEntity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("order {order_id}")))?;

        let product = ProductEntity::find_by_id(item.product_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("product {}", item.product_id)))?;

        let row = order_row::ActiveModel {
            order_id: Set(order_id),
            product_id: Set(product.id),
            quantity: Set(item.quantity),
            unit_price: Set(product.price),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::from_db)?;

        aggregates::on_order_row_inserted(&txn, &row).await?;
        txn.commit().await?;

        info!(order_id, row_id = row.id, "Order row added");
        self.get_details(order_id).await
    }

    /// Changes a row's quantity. The unit price is immutable; only the
    /// quantity can change, and the parent order's total is recomputed in
    /// the same transaction.
    #[instrument(skip(self))]
    pub async fn update_row_quantity(
        &self,
        row_id: i32,
        quantity: i32,
    ) -> Result<OrderDetails, ServiceError> {
        if quantity < 1 {
            return Err(ServiceError::InvalidInput(
                "quantity must be a positive number".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let txn = db.begin().await?;

        let row = OrderRowEntity::find_by_id(row_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("order row {row_id}")))?;

        let mut active: order_row::ActiveModel = row.into();
        active.quantity = Set(quantity);
        let updated = active.update(&txn).await.map_err(ServiceError::from_db)?;

        aggregates::on_order_row_updated(&txn, &updated).await?;
        txn.commit().await?;

        info!(row_id, quantity, "Order row quantity updated");
        self.get_details(updated.order_id).await
    }

    /// Deletes a row and recomputes the parent order's total in the same
    /// transaction.
    #[instrument(skip(self))]
    pub async fn delete_row(&self, row_id: i32) -> Result<OrderDetails, ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await?;

        let row = OrderRowEntity::find_by_id(row_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("order row {row_id}")))?;

        // Captured before the delete clears the foreign key.
        let order_id = row.order_id;
        row.delete(&txn).await.map_err(ServiceError::from_db)?;
        aggregates::on_order_row_deleted(&txn, order_id).await?;
        txn.commit().await?;

        info!(row_id, order_id, "Order row deleted");
        self.get_details(order_id).await
    }

    /// Order summaries joined with customers, totals recomputed from the
    /// rows at read time, newest first.
    #[instrument(skip(self))]
    pub async fn summaries(&self) -> Result<Vec<OrderSummary>, ServiceError> {
        let db = &*self.db_pool;
        let mut summaries = reports::order_summaries(db).await?;
        for summary in &mut summaries {
            summary.customer_email = crypto::deobfuscate(&summary.customer_email);
        }
        Ok(summaries)
    }

    /// Resolves customer names for a batch of orders in one query.
    async fn with_customer_names(
        &self,
        orders: Vec<order::Model>,
    ) -> Result<Vec<OrderListItem>, ServiceError> {
        let db = &*self.db_pool;
        let customer_ids: Vec<i32> = orders.iter().map(|o| o.customer_id).collect();
        let names: HashMap<i32, String> = CustomerEntity::find()
            .filter(customer::Column::Id.is_in(customer_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        Ok(orders
            .into_iter()
            .map(|o| OrderListItem {
                id: o.id,
                order_date: o.order_date,
                status: o.status,
                customer_name: names.get(&o.customer_id).cloned().unwrap_or_default(),
                total_amount: o.total_amount,
            })
            .collect())
    }
}
