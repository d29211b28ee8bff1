use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{
        category::Entity as CategoryEntity,
        product::{self, Entity as ProductEntity, Model as ProductModel},
    },
    errors::ServiceError,
    queries::reports::{self, ProductSales},
    services::{validate_pagination, Page},
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required (max 100 characters)"))]
    pub name: String,
    #[validate(length(max = 250, message = "Description must be at most 250 characters"))]
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 250, message = "Description must be at most 250 characters"))]
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<i32>,
}

fn check_price(price: Decimal) -> Result<(), ServiceError> {
    if price < Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "price must not be negative".to_string(),
        ));
    }
    Ok(())
}

/// Service for managing products.
#[derive(Clone)]
pub struct ProductService {
    db_pool: Arc<DbPool>,
}

impl ProductService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists products ordered by id, one page at a time.
    #[instrument(skip(self))]
    pub async fn list(&self, page: u64, page_size: u64) -> Result<Page<ProductModel>, ServiceError> {
        validate_pagination(page, page_size)?;
        let db = &*self.db_pool;

        let paginator = ProductEntity::find()
            .order_by_asc(product::Column::Id)
            .paginate(db, page_size);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page - 1).await?;

        Ok(Page {
            items,
            total,
            page,
            page_size,
        })
    }

    /// Lists all products belonging to one category.
    #[instrument(skip(self))]
    pub async fn list_by_category(&self, category_id: i32) -> Result<Vec<ProductModel>, ServiceError> {
        let db = &*self.db_pool;
        CategoryEntity::find_by_id(category_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("category {category_id}")))?;

        let products = ProductEntity::find()
            .filter(product::Column::CategoryId.eq(category_id))
            .order_by_asc(product::Column::Id)
            .all(db)
            .await?;
        Ok(products)
    }

    /// Gets a product by id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<ProductModel, ServiceError> {
        let db = &*self.db_pool;
        ProductEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("product {id}")))
    }

    /// Creates a product. The category, when given, must exist.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: CreateProductRequest) -> Result<ProductModel, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        check_price(request.price)?;

        let db = &*self.db_pool;
        if let Some(category_id) = request.category_id {
            CategoryEntity::find_by_id(category_id)
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("category {category_id}")))?;
        }

        let model = product::ActiveModel {
            name: Set(request.name),
            description: Set(request.description),
            price: Set(request.price),
            category_id: Set(request.category_id),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(ServiceError::from_db)?;

        info!(product_id = model.id, "Product created");
        Ok(model)
    }

    /// Partially updates a product. A price change applies to future order
    /// rows only; rows already written keep the unit price they captured.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i32,
        request: UpdateProductRequest,
    ) -> Result<ProductModel, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        if let Some(price) = request.price {
            check_price(price)?;
        }

        let db = &*self.db_pool;
        let product = ProductEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("product {id}")))?;

        if let Some(category_id) = request.category_id {
            CategoryEntity::find_by_id(category_id)
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("category {category_id}")))?;
        }

        let mut active: product::ActiveModel = product.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }
        if let Some(price) = request.price {
            active.price = Set(price);
        }
        if request.category_id.is_some() {
            active.category_id = Set(request.category_id);
        }

        let model = active.update(db).await.map_err(ServiceError::from_db)?;
        info!(product_id = id, "Product updated");
        Ok(model)
    }

    /// Deletes a product. Rejected (constraint violation) while any order
    /// row still references it, preserving historical order data.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let product = ProductEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("product {id}")))?;

        ProductEntity::delete_by_id(product.id)
            .exec(db)
            .await
            .map_err(ServiceError::from_db)?;
        info!(product_id = id, "Product deleted");
        Ok(())
    }

    /// Quantity sold per product, recomputed from order rows at read time.
    /// Products never sold report 0.
    #[instrument(skip(self))]
    pub async fn sales(&self) -> Result<Vec<ProductSales>, ServiceError> {
        let db = &*self.db_pool;
        Ok(reports::product_sales(db).await?)
    }
}
